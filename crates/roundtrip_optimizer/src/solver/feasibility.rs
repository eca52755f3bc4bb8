use jiff::SignedDuration;
use serde::Serialize;

use crate::problem::{
    meters::Meters,
    routing_problem::{NodeIdx, RoutingProblem},
};

/// The first constraint a route breaks, checked position by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Violation {
    /// Arrival at the stop is later than its window allows
    Window(NodeIdx),
    /// Waiting in front of the stop exceeds the allowed maximum
    Waiting(NodeIdx),
    DistanceCap,
    TimeCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitTimes {
    pub arrival: SignedDuration,
    pub waiting: SignedDuration,
    pub departure: SignedDuration,
}

/// Time transition from `previous` (left at `previous_departure`) to `node`.
#[inline]
pub fn visit_times(
    problem: &RoutingProblem,
    previous: NodeIdx,
    previous_departure: SignedDuration,
    node: NodeIdx,
) -> VisitTimes {
    let stop = problem.node(node);
    let arrival = previous_departure + problem.travel_time(previous, node);
    let waiting = stop.time_window().waiting_duration(arrival);

    VisitTimes {
        arrival,
        waiting,
        departure: arrival + waiting + stop.service_duration(),
    }
}

/// Offset at which the vehicle leaves the depot when `first` is the first node of the route.
///
/// Without a waiting cap the route starts with the shift. Under a cap the vehicle leaves as
/// late as it can without delaying the first service, bounded by the depot window. Every
/// departure up to that point gives the same service start, only the wait in front of
/// `first` shrinks.
pub fn depot_departure(problem: &RoutingProblem, first: NodeIdx) -> SignedDuration {
    if problem.max_waiting_duration().is_none() || first.is_depot() {
        return SignedDuration::ZERO;
    }

    let latest_start =
        problem.node(first).time_window().earliest() - problem.travel_time(NodeIdx::DEPOT, first);

    latest_start
        .min(problem.time_horizon())
        .max(SignedDuration::ZERO)
}

/// Checks both cumulative dimensions at a single position.
///
/// The depot only appears here as the end of the route, its window is the shift.
#[inline]
pub fn check_visit(
    problem: &RoutingProblem,
    node: NodeIdx,
    times: &VisitTimes,
    cumulative_distance: Meters,
) -> Result<(), Violation> {
    if cumulative_distance > problem.max_distance() {
        return Err(Violation::DistanceCap);
    }

    if node.is_depot() {
        return if times.arrival > problem.time_horizon() {
            Err(Violation::TimeCap)
        } else {
            Ok(())
        };
    }

    if !problem.node(node).time_window().is_satisfied(times.arrival) {
        return Err(Violation::Window(node));
    }

    if problem
        .max_waiting_duration()
        .is_some_and(|max_waiting| times.waiting > max_waiting)
    {
        return Err(Violation::Waiting(node));
    }

    if times.departure > problem.time_horizon() {
        return Err(Violation::TimeCap);
    }

    Ok(())
}

/// One flag per resource dimension of a finished route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeasibilityReport {
    pub distance_within_cap: bool,
    pub time_within_cap: bool,
    pub windows_satisfied: bool,
}

impl FeasibilityReport {
    pub fn is_feasible(&self) -> bool {
        self.distance_within_cap && self.time_within_cap && self.windows_satisfied
    }
}
