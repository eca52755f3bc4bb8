use std::ops::ControlFlow;

use crate::{
    problem::routing_problem::{NodeIdx, RoutingProblem},
    solver::{
        ls::r#move::LocalSearchOperator,
        objective::{Cost, Objective},
        solution::route::Route,
    },
};

/// **Relocate**
///
/// Moves the stop at `from` in front of the node currently at `to`.
///
/// ```text
/// BEFORE:
///    Route: ... (A) -> [from] -> (C) ... (X) -> (Y) ...
///
/// AFTER:
///    Route: ... (A) -> (C) ... (X) -> [from] -> (Y) ...
///
/// Edges Removed: (A->from), (from->C), (X->Y)
/// Edges Added:   (A->C),    (X->from), (from->Y)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocateOperator {
    params: RelocateOperatorParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocateOperatorParams {
    pub from: usize,
    pub to: usize,
}

impl RelocateOperator {
    pub fn new(params: RelocateOperatorParams) -> Self {
        debug_assert!(params.from != params.to && params.from + 1 != params.to);
        Self { params }
    }

    /// The nodes replacing the affected range, with that range as `(start, end)`.
    fn moved_nodes(&self, route: &Route) -> (Vec<NodeIdx>, usize, usize) {
        let RelocateOperatorParams { from, to } = self.params;
        let node = route.node(from);

        if from < to {
            // A - B - C - D - E, moving B in front of E gives C - D - B
            let nodes = route
                .nodes_iter(from + 1, to)
                .chain(std::iter::once(node))
                .collect();
            (nodes, from, to)
        } else {
            // Moving D in front of B gives D - B - C
            let nodes = std::iter::once(node)
                .chain(route.nodes_iter(to, from))
                .collect();
            (nodes, to, from + 1)
        }
    }
}

impl LocalSearchOperator for RelocateOperator {
    fn generate_moves<C>(_problem: &RoutingProblem, route: &Route, mut consumer: C) -> ControlFlow<()>
    where
        C: FnMut(Self) -> ControlFlow<()>,
    {
        let num_stops = route.num_stops();

        for from in 1..=num_stops {
            // `to` can be the closing depot, the stop then becomes the last one
            for to in 1..=(num_stops + 1) {
                if to == from || to == from + 1 {
                    continue;
                }

                consumer(RelocateOperator::new(RelocateOperatorParams { from, to }))?;
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
        let RelocateOperatorParams { from, to } = self.params;

        let a = route.node(from - 1);
        let b = route.node(from);
        let c = route.node(from + 1);

        let x = route.node(to - 1);
        let y = route.node(to);

        let current_cost = objective.arc_cost(problem, a, b)
            + objective.arc_cost(problem, b, c)
            + objective.arc_cost(problem, x, y);

        let new_cost = objective.arc_cost(problem, a, c)
            + objective.arc_cost(problem, x, b)
            + objective.arc_cost(problem, b, y);

        new_cost - current_cost
    }

    fn is_valid(&self, problem: &RoutingProblem, route: &Route) -> bool {
        let (nodes, start, end) = self.moved_nodes(route);
        route
            .is_valid_change(problem, nodes.into_iter(), start, end)
            .is_ok()
    }

    fn apply(&self, problem: &RoutingProblem, route: &mut Route) {
        let (nodes, start, end) = self.moved_nodes(route);
        route.replace_nodes(problem, &nodes, start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{solver::objective::DistanceObjective, test_utils};

    fn relocate(from: usize, to: usize, expected: &[usize]) {
        let problem = test_utils::create_grid_problem(8);
        let mut route = Route::from_stops(&problem, &test_utils::nodes(&[1, 2, 3, 4, 5, 6]));

        let operator = RelocateOperator::new(RelocateOperatorParams { from, to });

        let distance = route.distance();
        let delta = operator.cost_delta(&problem, &route, &DistanceObjective);
        assert!(operator.is_valid(&problem, &route));
        operator.apply(&problem, &mut route);

        assert_eq!(route.distance().value(), distance.value() + delta);
        assert_eq!(route.stops(), test_utils::nodes(expected).as_slice());
    }

    #[test]
    fn test_relocate_forward() {
        relocate(2, 5, &[1, 3, 4, 2, 5, 6]);
    }

    #[test]
    fn test_relocate_backward() {
        relocate(5, 2, &[1, 5, 2, 3, 4, 6]);
    }

    #[test]
    fn test_relocate_one_before() {
        relocate(4, 3, &[1, 2, 4, 3, 5, 6]);
    }

    #[test]
    fn test_relocate_to_end() {
        relocate(1, 7, &[2, 3, 4, 5, 6, 1]);
    }

    #[test]
    fn test_relocate_asymmetric() {
        let problem = test_utils::create_asymmetric_grid_problem(8);
        let mut route = Route::from_stops(&problem, &test_utils::nodes(&[1, 2, 3, 4, 5, 6]));

        let operator = RelocateOperator::new(RelocateOperatorParams { from: 6, to: 1 });

        let distance = route.distance();
        let delta = operator.cost_delta(&problem, &route, &DistanceObjective);
        operator.apply(&problem, &mut route);

        assert_eq!(route.distance().value(), distance.value() + delta);
        assert_eq!(route.stops(), test_utils::nodes(&[6, 1, 2, 3, 4, 5]).as_slice());
    }
}
