use std::ops::ControlFlow;

use crate::{
    problem::routing_problem::{NodeIdx, RoutingProblem},
    solver::{
        ls::r#move::LocalSearchOperator,
        objective::{Cost, Objective},
        solution::route::Route,
    },
};

/// **Swap**
///
/// Exchanges the stops at `first` and `second`, with `first < second`.
///
/// ```text
/// BEFORE:
///    ... (A) -> [first] -> (B) ... (X) -> [second] -> (Y) ...
///
/// AFTER:
///    ... (A) -> [second] -> (B) ... (X) -> [first] -> (Y) ...
/// ```
///
/// Adjacent stops share an edge, which is only reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOperator {
    params: SwapOperatorParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOperatorParams {
    pub first: usize,
    pub second: usize,
}

impl SwapOperator {
    pub fn new(params: SwapOperatorParams) -> Self {
        debug_assert!(params.first >= 1 && params.first < params.second);
        SwapOperator { params }
    }

    /// Returns the nodes `[second, ...(first, second), first]`
    fn moved_nodes<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = NodeIdx> + 'a {
        let SwapOperatorParams { first, second } = self.params;

        std::iter::once(route.node(second))
            .chain(route.nodes_iter(first + 1, second))
            .chain(std::iter::once(route.node(first)))
    }
}

impl LocalSearchOperator for SwapOperator {
    fn generate_moves<C>(_problem: &RoutingProblem, route: &Route, mut consumer: C) -> ControlFlow<()>
    where
        C: FnMut(Self) -> ControlFlow<()>,
    {
        let num_stops = route.num_stops();

        for first in 1..num_stops {
            for second in (first + 1)..=num_stops {
                consumer(SwapOperator::new(SwapOperatorParams { first, second }))?;
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
        let SwapOperatorParams { first, second } = self.params;

        let prev_first = route.node(first - 1);
        let first_node = route.node(first);
        let next_first = route.node(first + 1);

        let prev_second = route.node(second - 1);
        let second_node = route.node(second);
        let next_second = route.node(second + 1);

        if second == first + 1 {
            let current_cost = objective.arc_cost(problem, prev_first, first_node)
                + objective.arc_cost(problem, first_node, second_node)
                + objective.arc_cost(problem, second_node, next_second);

            let new_cost = objective.arc_cost(problem, prev_first, second_node)
                + objective.arc_cost(problem, second_node, first_node)
                + objective.arc_cost(problem, first_node, next_second);

            return new_cost - current_cost;
        }

        let current_cost = objective.arc_cost(problem, prev_first, first_node)
            + objective.arc_cost(problem, first_node, next_first)
            + objective.arc_cost(problem, prev_second, second_node)
            + objective.arc_cost(problem, second_node, next_second);

        let new_cost = objective.arc_cost(problem, prev_first, second_node)
            + objective.arc_cost(problem, second_node, next_first)
            + objective.arc_cost(problem, prev_second, first_node)
            + objective.arc_cost(problem, first_node, next_second);

        new_cost - current_cost
    }

    fn is_valid(&self, problem: &RoutingProblem, route: &Route) -> bool {
        route
            .is_valid_change(
                problem,
                self.moved_nodes(route),
                self.params.first,
                self.params.second + 1,
            )
            .is_ok()
    }

    fn apply(&self, problem: &RoutingProblem, route: &mut Route) {
        let nodes = self.moved_nodes(route).collect::<Vec<_>>();
        route.replace_nodes(problem, &nodes, self.params.first, self.params.second + 1);
    }
}
