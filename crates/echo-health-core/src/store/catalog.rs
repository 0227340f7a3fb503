//! Built-in quest catalog seeded into every new store.

use chrono::{DateTime, Duration, Utc};

use crate::models::{HealthQuest, QuestCategory, QuestTask};

/// Static definition of a seeded quest.
#[derive(Debug, Clone, Copy)]
pub struct QuestDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub reward: u64,
    pub category: QuestCategory,
    /// Deadline offset from seeding time
    pub duration_days: i64,
    pub tasks: &'static [&'static str],
}

/// The fixed catalog. Quests cannot be added or removed at runtime.
pub const QUEST_CATALOG: &[QuestDefinition] = &[
    QuestDefinition {
        id: "quest-hydration",
        title: "Hydration Hero",
        description: "Build a steady water habit over three days.",
        reward: 300,
        category: QuestCategory::Hydration,
        duration_days: 3,
        tasks: &["Drink 8 glasses today", "Carry a water bottle", "Swap one soda for water"],
    },
    QuestDefinition {
        id: "quest-sleep",
        title: "Sleep Sanctuary",
        description: "Reset your evening routine for deeper rest.",
        reward: 400,
        category: QuestCategory::Sleep,
        duration_days: 7,
        tasks: &[
            "No screens 30 minutes before bed",
            "Keep a fixed bedtime",
            "Log a sleep score",
            "Wake without snoozing",
        ],
    },
    QuestDefinition {
        id: "quest-mindful",
        title: "Mindful Minutes",
        description: "Take short breathing breaks to lower stress.",
        reward: 250,
        category: QuestCategory::Mindfulness,
        duration_days: 5,
        tasks: &["Five minutes of box breathing", "Write down three gratitudes"],
    },
    QuestDefinition {
        id: "quest-steps",
        title: "Step It Up",
        description: "Walk a little further every day this week.",
        reward: 500,
        category: QuestCategory::Fitness,
        duration_days: 7,
        tasks: &[
            "Walk 5,000 steps",
            "Walk 7,500 steps",
            "Walk 10,000 steps",
            "Take the stairs twice",
            "Stretch after a walk",
        ],
    },
];

impl QuestDefinition {
    pub fn instantiate(&self, seeded_at: DateTime<Utc>) -> HealthQuest {
        HealthQuest {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            progress: 0,
            reward: self.reward,
            deadline: seeded_at + Duration::days(self.duration_days),
            category: self.category,
            tasks: self.tasks.iter().map(|name| QuestTask::new(*name)).collect(),
        }
    }
}

/// Instantiate the whole catalog with deadlines relative to `seeded_at`.
pub fn seed_quests(seeded_at: DateTime<Utc>) -> Vec<HealthQuest> {
    QUEST_CATALOG
        .iter()
        .map(|def| def.instantiate(seeded_at))
        .collect()
}
