use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// TravelMatrices holds the travel distance (meters) and time (seconds) matrices.
/// Stored as flat row-major vectors, `from * n + to`.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct TravelMatrices {
    pub distances: Vec<f64>,
    pub times: Vec<f64>,
}

impl TravelMatrices {
    pub fn num_locations(&self) -> usize {
        self.distances.len().isqrt()
    }

    /// Both matrices are square, of the same size and have a zero diagonal.
    pub fn is_well_formed(&self, num_locations: usize) -> bool {
        let size = num_locations * num_locations;
        if self.distances.len() != size || self.times.len() != size {
            return false;
        }

        (0..num_locations).all(|i| {
            let index = i * num_locations + i;
            self.distances[index] == 0.0 && self.times[index] == 0.0
        }) && self
            .distances
            .iter()
            .chain(self.times.iter())
            .all(|value| value.is_finite() && *value >= 0.0)
    }
}

impl std::hash::Hash for TravelMatrices {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for d in &self.distances {
            state.write_u64(d.to_bits());
        }
        for t in &self.times {
            state.write_u64(t.to_bits());
        }
    }
}
