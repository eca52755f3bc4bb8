use std::ops::ControlFlow;

use crate::{
    problem::routing_problem::RoutingProblem,
    solver::{
        ls::{
            or_opt::OrOptOperator, relocate::RelocateOperator, swap::SwapOperator,
            two_opt::TwoOptOperator,
        },
        objective::{Cost, Objective},
        solution::route::Route,
    },
};

pub trait LocalSearchOperator: Sized {
    /// Feeds every candidate move of `route` to `consumer` in increasing position order,
    /// stopping as soon as the consumer breaks.
    fn generate_moves<C>(problem: &RoutingProblem, route: &Route, consumer: C) -> ControlFlow<()>
    where
        C: FnMut(Self) -> ControlFlow<()>;

    fn cost_delta<O: Objective>(&self, problem: &RoutingProblem, route: &Route, objective: &O)
    -> Cost;

    fn is_valid(&self, problem: &RoutingProblem, route: &Route) -> bool;

    fn apply(&self, problem: &RoutingProblem, route: &mut Route);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSearchMove {
    /// Reverses the stops between two positions.
    TwoOpt(TwoOptOperator),
    /// Moves one stop to another position.
    Relocate(RelocateOperator),
    /// Exchanges two stops.
    Swap(SwapOperator),
    /// Moves a block of two or three consecutive stops to another position.
    OrOpt(OrOptOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::TwoOpt(_) => "two_opt",
            LocalSearchMove::Relocate(_) => "relocate",
            LocalSearchMove::Swap(_) => "swap",
            LocalSearchMove::OrOpt(_) => "or_opt",
        }
    }

    pub fn cost_delta<O: Objective>(
        &self,
        problem: &RoutingProblem,
        route: &Route,
        objective: &O,
    ) -> Cost {
        match self {
            LocalSearchMove::TwoOpt(op) => op.cost_delta(problem, route, objective),
            LocalSearchMove::Relocate(op) => op.cost_delta(problem, route, objective),
            LocalSearchMove::Swap(op) => op.cost_delta(problem, route, objective),
            LocalSearchMove::OrOpt(op) => op.cost_delta(problem, route, objective),
        }
    }

    pub fn is_valid(&self, problem: &RoutingProblem, route: &Route) -> bool {
        match self {
            LocalSearchMove::TwoOpt(op) => op.is_valid(problem, route),
            LocalSearchMove::Relocate(op) => op.is_valid(problem, route),
            LocalSearchMove::Swap(op) => op.is_valid(problem, route),
            LocalSearchMove::OrOpt(op) => op.is_valid(problem, route),
        }
    }

    pub fn apply(&self, problem: &RoutingProblem, route: &mut Route) {
        match self {
            LocalSearchMove::TwoOpt(op) => op.apply(problem, route),
            LocalSearchMove::Relocate(op) => op.apply(problem, route),
            LocalSearchMove::Swap(op) => op.apply(problem, route),
            LocalSearchMove::OrOpt(op) => op.apply(problem, route),
        }
    }
}
