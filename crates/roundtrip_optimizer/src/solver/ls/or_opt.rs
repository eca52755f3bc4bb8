use std::ops::ControlFlow;

use crate::{
    problem::routing_problem::{NodeIdx, RoutingProblem},
    solver::{
        ls::r#move::LocalSearchOperator,
        objective::{Cost, Objective},
        solution::route::Route,
    },
};

pub const OR_OPT_SEGMENT_LENGTHS: [usize; 2] = [2, 3];

/// **Or-Opt**
///
/// Moves the block of `segment_length` stops starting at `from` in front of the node currently
/// at `to`, keeping the order inside the block.
///
/// ```text
/// BEFORE:
///    ... (A) -> [F ... L] -> (C) ... (X) -> (Y) ...
///
/// AFTER:
///    ... (A) -> (C) ... (X) -> [F ... L] -> (Y) ...
///
/// Edges Removed: (A->F), (L->C), (X->Y)
/// Edges Added:   (A->C), (X->F), (L->Y)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrOptOperator {
    params: OrOptOperatorParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrOptOperatorParams {
    pub from: usize,
    pub segment_length: usize,
    pub to: usize,
}

impl OrOptOperator {
    pub fn new(params: OrOptOperatorParams) -> Self {
        debug_assert!(params.segment_length >= 1);
        debug_assert!(params.to < params.from || params.to > params.from + params.segment_length);
        Self { params }
    }

    fn segment_end(&self) -> usize {
        self.params.from + self.params.segment_length
    }

    fn moved_nodes(&self, route: &Route) -> (Vec<NodeIdx>, usize, usize) {
        let OrOptOperatorParams { from, to, .. } = self.params;
        let end = self.segment_end();
        let segment = route.nodes_iter(from, end);

        if from < to {
            let nodes = route.nodes_iter(end, to).chain(segment).collect();
            (nodes, from, to)
        } else {
            let nodes = segment.chain(route.nodes_iter(to, from)).collect();
            (nodes, to, end)
        }
    }
}

impl LocalSearchOperator for OrOptOperator {
    fn generate_moves<C>(_problem: &RoutingProblem, route: &Route, mut consumer: C) -> ControlFlow<()>
    where
        C: FnMut(Self) -> ControlFlow<()>,
    {
        let num_stops = route.num_stops();

        for from in 1..=num_stops {
            for segment_length in OR_OPT_SEGMENT_LENGTHS {
                let end = from + segment_length;
                if end > num_stops + 1 {
                    continue;
                }

                for to in 1..=(num_stops + 1) {
                    if to >= from && to <= end {
                        continue;
                    }

                    consumer(OrOptOperator::new(OrOptOperatorParams {
                        from,
                        segment_length,
                        to,
                    }))?;
                }
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
        let OrOptOperatorParams { from, to, .. } = self.params;
        let end = self.segment_end();

        let a = route.node(from - 1);
        let first = route.node(from);
        let last = route.node(end - 1);
        let c = route.node(end);

        let x = route.node(to - 1);
        let y = route.node(to);

        let current_cost = objective.arc_cost(problem, a, first)
            + objective.arc_cost(problem, last, c)
            + objective.arc_cost(problem, x, y);

        let new_cost = objective.arc_cost(problem, a, c)
            + objective.arc_cost(problem, x, first)
            + objective.arc_cost(problem, last, y);

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
