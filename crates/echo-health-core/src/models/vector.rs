//! The eight-dimension wellness snapshot.

use serde::{Deserialize, Serialize};

/// One axis of the health vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Cardiovascular,
    Metabolic,
    Respiratory,
    MentalHealth,
    Sleep,
    Activity,
    Nutrition,
    Stress,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Cardiovascular,
        Dimension::Metabolic,
        Dimension::Respiratory,
        Dimension::MentalHealth,
        Dimension::Sleep,
        Dimension::Activity,
        Dimension::Nutrition,
        Dimension::Stress,
    ];
}

/// Current self- or sensor-reported wellness, each dimension nominally in [0, 1].
///
/// The range is a caller contract; nothing here clamps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthVector {
    pub cardiovascular: f64,
    pub metabolic: f64,
    pub respiratory: f64,
    pub mental_health: f64,
    pub sleep: f64,
    pub activity: f64,
    pub nutrition: f64,
    pub stress: f64,
}

impl Default for HealthVector {
    fn default() -> Self {
        Self {
            cardiovascular: 0.75,
            metabolic: 0.7,
            respiratory: 0.8,
            mental_health: 0.65,
            sleep: 0.6,
            activity: 0.7,
            nutrition: 0.65,
            stress: 0.7,
        }
    }
}

impl HealthVector {
    /// Every dimension set to `value`.
    pub fn uniform(value: f64) -> Self {
        Self {
            cardiovascular: value,
            metabolic: value,
            respiratory: value,
            mental_health: value,
            sleep: value,
            activity: value,
            nutrition: value,
            stress: value,
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Cardiovascular => self.cardiovascular,
            Dimension::Metabolic => self.metabolic,
            Dimension::Respiratory => self.respiratory,
            Dimension::MentalHealth => self.mental_health,
            Dimension::Sleep => self.sleep,
            Dimension::Activity => self.activity,
            Dimension::Nutrition => self.nutrition,
            Dimension::Stress => self.stress,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: f64) {
        let slot = match dimension {
            Dimension::Cardiovascular => &mut self.cardiovascular,
            Dimension::Metabolic => &mut self.metabolic,
            Dimension::Respiratory => &mut self.respiratory,
            Dimension::MentalHealth => &mut self.mental_health,
            Dimension::Sleep => &mut self.sleep,
            Dimension::Activity => &mut self.activity,
            Dimension::Nutrition => &mut self.nutrition,
            Dimension::Stress => &mut self.stress,
        };
        *slot = value;
    }

    /// Values in [`Dimension::ALL`] order.
    pub fn values(&self) -> [f64; 8] {
        Dimension::ALL.map(|d| self.get(d))
    }

    /// Overwrite only the dimensions present in `patch`.
    pub fn merge(&mut self, patch: &HealthVectorPatch) {
        for dimension in Dimension::ALL {
            if let Some(value) = patch.get(dimension) {
                self.set(dimension, value);
            }
        }
    }
}

/// Partial update for [`HealthVector`]; `None` leaves a dimension untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthVectorPatch {
    pub cardiovascular: Option<f64>,
    pub metabolic: Option<f64>,
    pub respiratory: Option<f64>,
    pub mental_health: Option<f64>,
    pub sleep: Option<f64>,
    pub activity: Option<f64>,
    pub nutrition: Option<f64>,
    pub stress: Option<f64>,
}

impl HealthVectorPatch {
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Cardiovascular => self.cardiovascular,
            Dimension::Metabolic => self.metabolic,
            Dimension::Respiratory => self.respiratory,
            Dimension::MentalHealth => self.mental_health,
            Dimension::Sleep => self.sleep,
            Dimension::Activity => self.activity,
            Dimension::Nutrition => self.nutrition,
            Dimension::Stress => self.stress,
        }
    }

    /// Builder-style single-dimension patch.
    pub fn with(mut self, dimension: Dimension, value: f64) -> Self {
        let slot = match dimension {
            Dimension::Cardiovascular => &mut self.cardiovascular,
            Dimension::Metabolic => &mut self.metabolic,
            Dimension::Respiratory => &mut self.respiratory,
            Dimension::MentalHealth => &mut self.mental_health,
            Dimension::Sleep => &mut self.sleep,
            Dimension::Activity => &mut self.activity,
            Dimension::Nutrition => &mut self.nutrition,
            Dimension::Stress => &mut self.stress,
        };
        *slot = Some(value);
        self
    }
}
