//! Gamified health quests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quest grouping shown in the UI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Fitness,
    Nutrition,
    Sleep,
    Mindfulness,
    Hydration,
}

impl QuestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestCategory::Fitness => "fitness",
            QuestCategory::Nutrition => "nutrition",
            QuestCategory::Sleep => "sleep",
            QuestCategory::Mindfulness => "mindfulness",
            QuestCategory::Hydration => "hydration",
        }
    }
}

/// A single checkbox inside a quest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestTask {
    pub name: String,
    pub complete: bool,
}

impl QuestTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            complete: false,
        }
    }
}

/// Outcome of marking a task complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCompletion {
    /// The task flipped from incomplete to complete
    Completed,
    /// The task was already complete; nothing changed
    AlreadyComplete,
    /// No task with that name
    UnknownTask,
}

/// A named group of tasks with derived progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Percentage of completed tasks (0-100), derived from `tasks`
    pub progress: u8,
    /// Vita Points for finishing every task
    pub reward: u64,
    pub deadline: DateTime<Utc>,
    pub category: QuestCategory,
    pub tasks: Vec<QuestTask>,
}

impl HealthQuest {
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.complete).count()
    }

    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.complete)
    }

    pub fn has_task(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name == name)
    }

    /// `round(100 * completed / total)`; zero for a quest without tasks.
    pub fn computed_progress(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let ratio = self.completed_count() as f64 / self.tasks.len() as f64;
        (ratio * 100.0).round() as u8
    }

    /// Points paid out per completed task.
    pub fn task_reward(&self) -> u64 {
        if self.tasks.is_empty() {
            return 0;
        }
        (self.reward as f64 / self.tasks.len() as f64).round() as u64
    }

    /// Mark a task complete and refresh `progress`. Completion is one-way.
    pub fn complete_task(&mut self, name: &str) -> TaskCompletion {
        let outcome = match self.tasks.iter_mut().find(|t| t.name == name) {
            None => return TaskCompletion::UnknownTask,
            Some(task) if task.complete => TaskCompletion::AlreadyComplete,
            Some(task) => {
                task.complete = true;
                TaskCompletion::Completed
            }
        };
        self.progress = self.computed_progress();
        outcome
    }
}
