use std::collections::BTreeMap;

use jiff::SignedDuration;
use serde::Serialize;

use crate::{problem::meters::Meters, solver::ls::r#move::LocalSearchMove};

#[derive(Debug, Clone, Serialize)]
pub struct BestDistanceRow {
    /// Time since the solver started
    pub elapsed: SignedDuration,
    pub distance: Meters,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStatistics {
    pub initial_distance: Meters,
    pub final_distance: Meters,

    pub gls_iterations: usize,
    pub local_optima: usize,
    pub penalty_updates: usize,
    pub evaluations: usize,

    /// Keyed by operator name, ordered for stable output
    pub accepted_moves: BTreeMap<&'static str, usize>,
    pub best_distance_evolution: Vec<BestDistanceRow>,
}

impl SearchStatistics {
    pub fn record_accepted_move(&mut self, local_search_move: &LocalSearchMove) {
        *self
            .accepted_moves
            .entry(local_search_move.operator_name())
            .or_insert(0) += 1;
    }

    pub fn record_best_distance(&mut self, elapsed: SignedDuration, distance: Meters) {
        self.best_distance_evolution
            .push(BestDistanceRow { elapsed, distance });
    }

    pub fn total_accepted_moves(&self) -> usize {
        self.accepted_moves.values().sum()
    }
}
