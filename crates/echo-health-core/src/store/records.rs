//! Community pins, consultation receipts and the user profile.

use chrono::Utc;

use super::{generate_id, HealthStore};
use crate::audit::verify_digest;
use crate::config::RECEIPT_CAPACITY;
use crate::models::{
    CommunityPin, ConsultationReceipt, NewCommunityPin, NewConsultationReceipt, UserProfilePatch,
};

impl HealthStore {
    /// Append a community report and return its id.
    pub fn add_community_pin(&mut self, pin: NewCommunityPin) -> String {
        let id = generate_id(Utc::now());
        let pin = CommunityPin::from_new(id.clone(), pin);
        self.mutate(|state| state.community_pins.push(pin));
        id
    }

    /// Delete a pin by id. Returns whether anything was removed.
    pub fn remove_community_pin(&mut self, pin_id: &str) -> bool {
        self.mutate(|state| {
            let before = state.community_pins.len();
            state.community_pins.retain(|p| p.id != pin_id);
            state.community_pins.len() != before
        })
    }

    /// Record an AI exchange. Newest first, capped at 100 entries.
    pub fn add_consultation_receipt(&mut self, receipt: NewConsultationReceipt) -> String {
        let id = generate_id(Utc::now());
        let receipt = ConsultationReceipt::from_new(id.clone(), receipt);
        self.mutate(|state| {
            state.consultation_receipts.insert(0, receipt);
            state.consultation_receipts.truncate(RECEIPT_CAPACITY);
        });
        id
    }

    /// Check displayed response text against a stored receipt.
    /// `None` when no receipt has that id.
    pub fn verify_receipt(&self, receipt_id: &str, response_text: &str) -> Option<bool> {
        self.state
            .consultation_receipts
            .iter()
            .find(|r| r.id == receipt_id)
            .map(|r| verify_digest(response_text, &r.response_hash))
    }

    /// Shallow-merge profile fields.
    pub fn update_user_profile(&mut self, patch: UserProfilePatch) {
        self.mutate(|state| state.user_profile.merge(patch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::hash_data;
    use crate::models::{summarize_prompt, PinType};

    fn make_receipt(n: usize) -> NewConsultationReceipt {
        NewConsultationReceipt {
            timestamp: Utc::now(),
            agent_type: "dr-echo".into(),
            prompt_summary: summarize_prompt(&format!("question {}", n)),
            response_hash: hash_data(format!("answer {}", n).as_bytes()),
            model_version: "test-model".into(),
            disclaimer: "Not medical advice.".into(),
        }
    }

    fn make_pin(description: &str) -> NewCommunityPin {
        NewCommunityPin {
            lat: 51.5,
            lng: -0.12,
            pin_type: PinType::Caution,
            category: "air quality".into(),
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_add_and_remove_pin() {
        let mut store = HealthStore::in_memory();
        let keep = store.add_community_pin(make_pin("smoke"));
        let gone = store.add_community_pin(make_pin("pollen"));

        assert!(store.remove_community_pin(&gone));
        assert!(!store.remove_community_pin(&gone));
        assert_eq!(store.community_pins().len(), 1);
        assert_eq!(store.community_pins()[0].id, keep);
    }

    #[test]
    fn test_receipts_capped_newest_first() {
        let mut store = HealthStore::in_memory();
        for n in 0..150 {
            store.add_consultation_receipt(make_receipt(n));
        }

        let receipts = store.consultation_receipts();
        assert_eq!(receipts.len(), RECEIPT_CAPACITY);
        assert_eq!(receipts[0].prompt_summary, "question 149");
        assert_eq!(receipts[99].prompt_summary, "question 50");
    }

    #[test]
    fn test_verify_receipt() {
        let mut store = HealthStore::in_memory();
        let id = store.add_consultation_receipt(make_receipt(7));

        assert_eq!(store.verify_receipt(&id, "answer 7"), Some(true));
        assert_eq!(store.verify_receipt(&id, "answer 8"), Some(false));
        assert_eq!(store.verify_receipt("missing", "answer 7"), None);
    }

    #[test]
    fn test_profile_merge() {
        let mut store = HealthStore::in_memory();
        store.update_user_profile(UserProfilePatch {
            age: Some(29),
            ..Default::default()
        });
        store.update_user_profile(UserProfilePatch {
            blood_type: Some("A-".into()),
            ..Default::default()
        });

        assert_eq!(store.user_profile().age, Some(29));
        assert_eq!(store.user_profile().blood_type.as_deref(), Some("A-"));
    }
}
