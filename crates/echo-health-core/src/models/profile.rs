//! User profile.

use serde::{Deserialize, Serialize};

/// The single user's profile. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// Weight in kg
    pub weight: Option<f64>,
    /// Height in cm
    pub height: Option<f64>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
}

/// Partial update for [`UserProfile`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfilePatch {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub conditions: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
}

impl UserProfile {
    /// Shallow merge: supplied fields replace, lists included.
    pub fn merge(&mut self, patch: UserProfilePatch) {
        if patch.age.is_some() {
            self.age = patch.age;
        }
        if patch.gender.is_some() {
            self.gender = patch.gender;
        }
        if patch.weight.is_some() {
            self.weight = patch.weight;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }
        if patch.blood_type.is_some() {
            self.blood_type = patch.blood_type;
        }
        if patch.emergency_contact.is_some() {
            self.emergency_contact = patch.emergency_contact;
        }
        if let Some(conditions) = patch.conditions {
            self.conditions = conditions;
        }
        if let Some(medications) = patch.medications {
            self.medications = medications;
        }
    }
}
