use std::ops::ControlFlow;

use tracing::{Level, instrument};

use crate::{
    problem::routing_problem::RoutingProblem,
    solver::{
        ls::{
            r#move::{LocalSearchMove, LocalSearchOperator},
            or_opt::OrOptOperator,
            relocate::RelocateOperator,
            swap::SwapOperator,
            two_opt::TwoOptOperator,
        },
        objective::Objective,
        solution::route::Route,
    },
    utils::deadline::Deadline,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSearchOutcome {
    /// A full pass over every operator found no improving feasible move
    LocalOptimum,
    DeadlineReached,
}

/// First-improvement descent over 2-opt, relocate, swap and or-opt, in that order.
///
/// After every accepted move the scan restarts from 2-opt. The deadline is polled once every
/// `deadline_check_interval` evaluated moves.
pub struct LocalSearch<'a> {
    problem: &'a RoutingProblem,
    deadline: Deadline,
    deadline_check_interval: usize,
    evaluations: usize,
    deadline_reached: bool,
}

impl<'a> LocalSearch<'a> {
    pub(crate) fn new(
        problem: &'a RoutingProblem,
        deadline: Deadline,
        deadline_check_interval: usize,
    ) -> Self {
        Self {
            problem,
            deadline,
            deadline_check_interval: deadline_check_interval.max(1),
            evaluations: 0,
            deadline_reached: false,
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Improves `route` in place. `on_accepted` sees the route right after each applied move.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn run<O, F>(&mut self, route: &mut Route, objective: &O, mut on_accepted: F) -> LocalSearchOutcome
    where
        O: Objective,
        F: FnMut(&Route, &LocalSearchMove),
    {
        loop {
            match self.find_improving_move(route, objective) {
                Some(local_search_move) => {
                    local_search_move.apply(self.problem, route);
                    on_accepted(route, &local_search_move);
                }
                None if self.deadline_reached => return LocalSearchOutcome::DeadlineReached,
                None => return LocalSearchOutcome::LocalOptimum,
            }
        }
    }

    fn find_improving_move<O: Objective>(
        &mut self,
        route: &Route,
        objective: &O,
    ) -> Option<LocalSearchMove> {
        if let Some(op) = self.first_improvement::<TwoOptOperator, O>(route, objective) {
            return Some(LocalSearchMove::TwoOpt(op));
        }

        if let Some(op) = self.first_improvement::<RelocateOperator, O>(route, objective) {
            return Some(LocalSearchMove::Relocate(op));
        }

        if let Some(op) = self.first_improvement::<SwapOperator, O>(route, objective) {
            return Some(LocalSearchMove::Swap(op));
        }

        self.first_improvement::<OrOptOperator, O>(route, objective)
            .map(LocalSearchMove::OrOpt)
    }

    fn first_improvement<Op, O>(&mut self, route: &Route, objective: &O) -> Option<Op>
    where
        Op: LocalSearchOperator,
        O: Objective,
    {
        if self.deadline_reached {
            return None;
        }

        let problem = self.problem;
        let mut found = None;

        let _ = Op::generate_moves(problem, route, |op| {
            if self.evaluations % self.deadline_check_interval == 0 && self.deadline.is_reached() {
                self.deadline_reached = true;
                return ControlFlow::Break(());
            }
            self.evaluations += 1;

            if op.cost_delta(problem, route, objective) < 0 && op.is_valid(problem, route) {
                found = Some(op);
                return ControlFlow::Break(());
            }

            ControlFlow::Continue(())
        });

        found
    }
}
