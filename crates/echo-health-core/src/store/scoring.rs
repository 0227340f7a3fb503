//! Health vector updates and the derived health score.

use super::HealthStore;
use crate::models::{HealthVector, HealthVectorPatch};

/// Similarity of `vector` to the ideal point (all 1.0), scaled to 0-100.
///
/// Euclidean distance to the ideal, normalized by the ideal's distance from the
/// origin (sqrt 8). Not an average: one dimension at zero costs more than the
/// same total deficit spread evenly. Out-of-range inputs are not clamped, so
/// the result can leave 0..=100.
pub fn health_score(vector: &HealthVector) -> i32 {
    let values = vector.values();
    let distance = values
        .iter()
        .map(|v| (1.0 - v).powi(2))
        .sum::<f64>()
        .sqrt();
    let max_distance = (values.len() as f64).sqrt();
    ((1.0 - distance / max_distance) * 100.0).round() as i32
}

impl HealthStore {
    /// Shallow-merge supplied dimensions over the current vector.
    pub fn update_health_vector(&mut self, patch: HealthVectorPatch) {
        self.mutate(|state| state.health_vector.merge(&patch));
    }

    /// Score of the current vector. Pure: no side effects.
    pub fn compute_health_score(&self) -> i32 {
        health_score(&self.state.health_vector)
    }
}
