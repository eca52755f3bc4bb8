use fxhash::FxHashMap;

use crate::{
    problem::{
        meters::Meters,
        routing_problem::{NodeIdx, RoutingProblem},
    },
    solver::solution::route::Route,
};

/// Penalty counters keyed by directed edge. Only alive for one guided search run.
#[derive(Debug, Default, Clone)]
pub struct EdgePenalties {
    penalties: FxHashMap<(NodeIdx, NodeIdx), u32>,
}

impl EdgePenalties {
    pub fn get(&self, from: NodeIdx, to: NodeIdx) -> u32 {
        self.penalties.get(&(from, to)).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, from: NodeIdx, to: NodeIdx) -> u32 {
        let penalty = self.penalties.entry((from, to)).or_insert(0);
        *penalty += 1;
        *penalty
    }

    pub fn is_empty(&self) -> bool {
        self.penalties.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.penalties.values().map(|&penalty| penalty as u64).sum()
    }

    pub fn clear(&mut self) {
        self.penalties.clear();
    }

    /// Edge of `route` with the highest `distance * (1 + penalty)`, the first one on ties.
    /// `None` when every edge has zero length.
    pub fn max_utility_edge(
        &self,
        problem: &RoutingProblem,
        route: &Route,
    ) -> Option<(NodeIdx, NodeIdx)> {
        let mut best: Option<((NodeIdx, NodeIdx), i64)> = None;

        for (from, to) in route.edges() {
            let distance = problem.travel_distance(from, to);
            if distance <= Meters::ZERO {
                continue;
            }

            let utility = distance.value() * (1 + self.get(from, to) as i64);
            if best.is_none_or(|(_, best_utility)| utility > best_utility) {
                best = Some(((from, to), utility));
            }
        }

        best.map(|(edge, _)| edge)
    }
}
