use std::ops::ControlFlow;

use crate::{
    problem::routing_problem::{NodeIdx, RoutingProblem},
    solver::{
        ls::r#move::LocalSearchOperator,
        objective::{Cost, Objective},
        solution::route::Route,
    },
};

/// **2-Opt**
///
/// Reverses the stops between `from` and `to` (inclusive).
///
/// ```text
/// BEFORE:
///    ... (prev) --x--> [from] -> ... -> [to] --x--> (next) ...
///
/// AFTER:
///    ... (prev) -----> [to] -> ... -> [from] -----> (next) ...
///
/// Edges Removed: (prev->from), (to->next)
/// Edges Added:   (prev->to),   (from->next)
/// ```
///
/// The edges inside the segment are walked in the opposite direction afterwards, their cost is
/// read from the forward and reverse prefix sums of the route so asymmetric matrices stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoOptOperator {
    params: TwoOptParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoOptParams {
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn new(params: TwoOptParams) -> Self {
        debug_assert!(params.from >= 1 && params.from < params.to);
        TwoOptOperator { params }
    }

    fn reversed<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = NodeIdx> + 'a {
        route.nodes_iter(self.params.from, self.params.to + 1).rev()
    }
}

impl LocalSearchOperator for TwoOptOperator {
    fn generate_moves<C>(_problem: &RoutingProblem, route: &Route, mut consumer: C) -> ControlFlow<()>
    where
        C: FnMut(Self) -> ControlFlow<()>,
    {
        let num_stops = route.num_stops();

        for from in 1..num_stops {
            for to in (from + 1)..=num_stops {
                consumer(TwoOptOperator::new(TwoOptParams { from, to }))?;
            }
        }

        ControlFlow::Continue(())
    }

    fn cost_delta<O: Objective>(
        &self,
        problem: &RoutingProblem,
        route: &Route,
        objective: &O,
    ) -> Cost {
        let TwoOptParams { from, to } = self.params;

        let prev = route.node(from - 1);
        let first = route.node(from);
        let last = route.node(to);
        let next = route.node(to + 1);

        let current_cost = objective.arc_cost(problem, prev, first)
            + objective.segment_cost(problem, route, from, to)
            + objective.arc_cost(problem, last, next);

        let new_cost = objective.arc_cost(problem, prev, last)
            + objective.reversed_segment_cost(problem, route, from, to)
            + objective.arc_cost(problem, first, next);

        new_cost - current_cost
    }

    fn is_valid(&self, problem: &RoutingProblem, route: &Route) -> bool {
        route
            .is_valid_change(
                problem,
                self.reversed(route),
                self.params.from,
                self.params.to + 1,
            )
            .is_ok()
    }

    fn apply(&self, problem: &RoutingProblem, route: &mut Route) {
        let nodes = self.reversed(route).collect::<Vec<_>>();
        route.replace_nodes(problem, &nodes, self.params.from, self.params.to + 1);
    }
}
