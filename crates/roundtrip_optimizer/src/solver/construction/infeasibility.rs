use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    problem::routing_problem::{NodeIdx, RoutingProblem},
    solver::{
        feasibility::{self, Violation},
        solution::route::Route,
    },
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InfeasibilityReason {
    /// The stop fits on its own but its window clashes with the other stops
    WindowConflict,
    /// Depot -> stop -> depot alone is longer than the distance cap
    DistanceCapExceeded,
    /// Depot -> stop -> depot alone takes longer than the time cap or the shift
    TimeCapExceeded,
    /// Even driving straight from the depot arrives after the window closes
    UnreachableStop,
}

/// Why `node` cannot be inserted anywhere in `route`.
///
/// The stop is first checked on its own against the depot, the first failing check wins.
/// Otherwise the violation reported most often over every insertion position decides.
pub fn classify_unscheduled(
    problem: &RoutingProblem,
    route: &Route,
    node: NodeIdx,
) -> InfeasibilityReason {
    let direct = feasibility::visit_times(
        problem,
        NodeIdx::DEPOT,
        feasibility::depot_departure(problem, node),
        node,
    );

    if !problem.node(node).time_window().is_satisfied(direct.arrival) {
        return InfeasibilityReason::UnreachableStop;
    }

    let round_trip_distance =
        problem.travel_distance(NodeIdx::DEPOT, node) + problem.travel_distance(node, NodeIdx::DEPOT);
    if round_trip_distance > problem.max_distance() {
        return InfeasibilityReason::DistanceCapExceeded;
    }

    let round_trip_duration = direct.departure + problem.travel_time(node, NodeIdx::DEPOT);
    if round_trip_duration > problem.time_horizon() {
        return InfeasibilityReason::TimeCapExceeded;
    }

    let mut window_conflicts = 0;
    let mut distance_violations = 0;
    let mut time_violations = 0;

    for position in 1..=route.last_position() {
        match route.is_valid_change(problem, std::iter::once(node), position, position) {
            Err(Violation::Window(_) | Violation::Waiting(_)) => window_conflicts += 1,
            Err(Violation::DistanceCap) => distance_violations += 1,
            Err(Violation::TimeCap) => time_violations += 1,
            Ok(()) => {}
        }
    }

    let mut reason = (InfeasibilityReason::WindowConflict, window_conflicts);
    if distance_violations > reason.1 {
        reason = (InfeasibilityReason::DistanceCapExceeded, distance_violations);
    }
    if time_violations > reason.1 {
        reason = (InfeasibilityReason::TimeCapExceeded, time_violations);
    }

    reason.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnscheduledStop {
    pub stop_id: String,
    pub node: NodeIdx,
    pub reason: InfeasibilityReason,
}

/// Returned instead of a solution when no complete route could be built.
#[derive(Debug, Clone, Serialize)]
pub struct InfeasibilityReport {
    pub unscheduled: Vec<UnscheduledStop>,
    pub dominant_reason: InfeasibilityReason,

    /// Stops of the partial route, in visiting order
    pub scheduled_stop_ids: Vec<String>,
}

impl InfeasibilityReport {
    pub fn new(problem: &RoutingProblem, route: &Route, unscheduled: Vec<UnscheduledStop>) -> Self {
        let dominant_reason = dominant_reason(&unscheduled);

        InfeasibilityReport {
            unscheduled,
            dominant_reason,
            scheduled_stop_ids: route
                .stops()
                .iter()
                .map(|&node| problem.node(node).external_id().to_owned())
                .collect(),
        }
    }
}

/// Most frequent reason, the first in declaration order on ties.
fn dominant_reason(unscheduled: &[UnscheduledStop]) -> InfeasibilityReason {
    let reasons = [
        InfeasibilityReason::WindowConflict,
        InfeasibilityReason::DistanceCapExceeded,
        InfeasibilityReason::TimeCapExceeded,
        InfeasibilityReason::UnreachableStop,
    ];

    let mut dominant = (InfeasibilityReason::WindowConflict, 0);
    for reason in reasons {
        let count = unscheduled
            .iter()
            .filter(|stop| stop.reason == reason)
            .count();
        if count > dominant.1 {
            dominant = (reason, count);
        }
    }

    dominant.0
}
