use jiff::SignedDuration;

use crate::problem::{meters::Meters, routing_problem::NodeIdx};

/// Integer distance and duration matrices between the nodes of a problem.
///
/// Stored flat, the entry for a pair of nodes is at `from * num_nodes + to`.
#[derive(Debug, Clone)]
pub struct TravelCostMatrix {
    distances: Vec<Meters>,
    times: Vec<SignedDuration>,
    num_nodes: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric<T: PartialEq>(matrix: &[T], num_nodes: usize) -> bool {
    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            if matrix[i * num_nodes + j] != matrix[j * num_nodes + i] {
                return false;
            }
        }
    }
    true
}

impl TravelCostMatrix {
    /// Builds the matrix from whole meters and whole seconds.
    pub fn from_flat(distances: Vec<i64>, times: Vec<i64>) -> Self {
        let num_nodes = distances.len().isqrt();
        debug_assert_eq!(num_nodes * num_nodes, distances.len());
        debug_assert_eq!(distances.len(), times.len());

        let is_symmetric = is_flat_matrix_symmetric(&distances, num_nodes)
            && is_flat_matrix_symmetric(&times, num_nodes);

        let mut matrix = TravelCostMatrix {
            distances: distances.into_iter().map(Meters::new).collect(),
            times: times.into_iter().map(SignedDuration::from_secs).collect(),
            num_nodes,
            is_symmetric,
        };

        for i in 0..num_nodes {
            let index = matrix.index(NodeIdx::new(i), NodeIdx::new(i));
            matrix.distances[index] = Meters::ZERO;
            matrix.times[index] = SignedDuration::ZERO;
        }

        matrix
    }

    /// Rounds provider matrices (meters and seconds as floats) to the integer domain.
    pub fn from_travel_matrices(matrices: &roundtrip_matrix::travel_matrices::TravelMatrices) -> Self {
        Self::from_flat(
            matrices
                .distances
                .iter()
                .map(|distance| distance.round() as i64)
                .collect(),
            matrices.times.iter().map(|time| time.round() as i64).collect(),
        )
    }

    #[inline(always)]
    fn index(&self, from: NodeIdx, to: NodeIdx) -> usize {
        from.get() * self.num_nodes + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: NodeIdx, to: NodeIdx) -> Meters {
        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: NodeIdx, to: NodeIdx) -> SignedDuration {
        self.times[self.index(from, to)]
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }
}

#[cfg(test)]
mod tests {
    use roundtrip_matrix::travel_matrices::TravelMatrices;

    use super::*;

    #[test]
    fn test_from_travel_matrices() {
        let matrix = TravelCostMatrix::from_travel_matrices(&TravelMatrices {
            distances: vec![0.0, 1500.4, 1500.6, 0.0],
            times: vec![0.0, 119.5, 120.2, 0.0],
        });

        assert_eq!(matrix.num_nodes(), 2);
        assert_eq!(
            matrix.travel_distance(NodeIdx::new(0), NodeIdx::new(1)),
            Meters::new(1500)
        );
        assert_eq!(
            matrix.travel_distance(NodeIdx::new(1), NodeIdx::new(0)),
            Meters::new(1501)
        );
        assert_eq!(
            matrix.travel_time(NodeIdx::new(0), NodeIdx::new(1)),
            SignedDuration::from_secs(120)
        );
        assert!(!matrix.is_symmetric());
    }

    #[test]
    fn test_is_symmetric() {
        let matrix = TravelCostMatrix::from_flat(
            vec![0, 10, 20, 10, 0, 30, 20, 30, 0],
            vec![0, 1, 2, 1, 0, 3, 2, 3, 0],
        );

        assert!(matrix.is_symmetric());
        assert_eq!(
            matrix.travel_distance(NodeIdx::new(2), NodeIdx::new(1)),
            Meters::new(30)
        );
    }
}
