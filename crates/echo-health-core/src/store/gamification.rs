//! Quests, Vita Points, levels and streaks.

use chrono::NaiveDate;
use tracing::debug;

use super::HealthStore;
use crate::config::POINTS_PER_LEVEL;
use crate::models::TaskCompletion;

/// `floor(points / 1000) + 1`.
pub fn level_for_points(points: u64) -> u32 {
    u32::try_from(points / POINTS_PER_LEVEL + 1).unwrap_or(u32::MAX)
}

impl HealthStore {
    /// Mark a quest task complete and recompute the quest's progress.
    ///
    /// Unknown quest ids or task names are silently ignored: ids come from the
    /// fixed catalog, not from user input.
    pub fn complete_quest_task(&mut self, quest_id: &str, task_name: &str) {
        self.complete_task_inner(quest_id, task_name);
    }

    /// Like [`complete_quest_task`](Self::complete_quest_task), additionally
    /// paying the quest's per-task share of its reward when the task flips to
    /// complete. Returns the points awarded (0 when nothing changed).
    pub fn complete_quest_task_with_reward(&mut self, quest_id: &str, task_name: &str) -> u64 {
        match self.complete_task_inner(quest_id, task_name) {
            Some((TaskCompletion::Completed, reward)) => {
                self.add_vita_points(reward);
                reward
            }
            _ => 0,
        }
    }

    /// Whether `quest_id` exists and has a task named `task_name`.
    pub fn has_quest_task(&self, quest_id: &str, task_name: &str) -> bool {
        self.quest(quest_id)
            .map(|q| q.has_task(task_name))
            .unwrap_or(false)
    }

    fn complete_task_inner(
        &mut self,
        quest_id: &str,
        task_name: &str,
    ) -> Option<(TaskCompletion, u64)> {
        if self.quest(quest_id).is_none() {
            debug!(quest_id, "complete_quest_task: unknown quest ignored");
            return None;
        }
        self.mutate(|state| {
            let quest = state.quests.iter_mut().find(|q| q.id == quest_id)?;
            let outcome = quest.complete_task(task_name);
            if outcome == TaskCompletion::UnknownTask {
                debug!(quest_id, task_name, "complete_quest_task: unknown task ignored");
            }
            Some((outcome, quest.task_reward()))
        })
    }

    /// Add Vita Points and recompute the level. Points only ever grow.
    pub fn add_vita_points(&mut self, points: u64) {
        self.mutate(|state| {
            state.vita_points = state.vita_points.saturating_add(points);
            state.level = level_for_points(state.vita_points);
        });
    }

    /// Register daily activity on `today` and update the streak: same day is a
    /// no-op, the next consecutive day extends it, any gap restarts at 1.
    pub fn record_check_in(&mut self, today: NaiveDate) {
        if self.state.last_check_in == Some(today) {
            return;
        }
        self.mutate(|state| {
            let consecutive = state
                .last_check_in
                .and_then(|last| last.succ_opt())
                .map(|next| next == today)
                .unwrap_or(false);
            state.streak_days = if consecutive { state.streak_days + 1 } else { 1 };
            state.last_check_in = Some(today);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(999), 1);
        assert_eq!(level_for_points(1000), 2);
        assert_eq!(level_for_points(2999), 3);
    }

    #[test]
    fn test_crossing_1000_levels_up() {
        let mut store = HealthStore::in_memory();
        store.add_vita_points(999);
        assert_eq!(store.level(), 1);
        store.add_vita_points(1);
        assert_eq!(store.level(), 2);
    }

    #[test]
    fn test_quest_progress_through_all_tasks() {
        let mut store = HealthStore::in_memory();
        let quest = store.quest("quest-steps").unwrap().clone();
        let total = quest.tasks.len();

        for (k, task) in quest.tasks.iter().enumerate() {
            store.complete_quest_task(&quest.id, &task.name);
            let expected = (100.0 * (k + 1) as f64 / total as f64).round() as u8;
            assert_eq!(store.quest(&quest.id).unwrap().progress, expected);
        }
        assert!(store.quest(&quest.id).unwrap().is_complete());
    }

    #[test]
    fn test_repeat_completion_leaves_progress() {
        let mut store = HealthStore::in_memory();
        store.complete_quest_task("quest-sleep", "Keep a fixed bedtime");
        let progress = store.quest("quest-sleep").unwrap().progress;

        store.complete_quest_task("quest-sleep", "Keep a fixed bedtime");
        assert_eq!(store.quest("quest-sleep").unwrap().progress, progress);
        assert_eq!(progress, 25);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut store = HealthStore::in_memory();
        let before = store.snapshot().quests.clone();

        store.complete_quest_task("quest-missing", "anything");
        store.complete_quest_task("quest-sleep", "Run a marathon");

        assert_eq!(store.snapshot().quests, before);
        assert!(!store.has_quest_task("quest-sleep", "Run a marathon"));
        assert!(store.has_quest_task("quest-sleep", "Log a sleep score"));
    }

    #[test]
    fn test_reward_paid_once_per_task() {
        let mut store = HealthStore::in_memory();

        // Hydration: 300 points over 3 tasks.
        let paid = store.complete_quest_task_with_reward("quest-hydration", "Carry a water bottle");
        assert_eq!(paid, 100);
        let again = store.complete_quest_task_with_reward("quest-hydration", "Carry a water bottle");
        assert_eq!(again, 0);
        assert_eq!(store.vita_points(), 100);
    }

    #[test]
    fn test_streak() {
        let mut store = HealthStore::in_memory();
        let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();

        store.record_check_in(day(1));
        assert_eq!(store.streak_days(), 1);
        store.record_check_in(day(1));
        assert_eq!(store.streak_days(), 1);
        store.record_check_in(day(2));
        store.record_check_in(day(3));
        assert_eq!(store.streak_days(), 3);
        store.record_check_in(day(5));
        assert_eq!(store.streak_days(), 1);
    }
}
