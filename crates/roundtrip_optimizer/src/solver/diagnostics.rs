use jiff::SignedDuration;
use serde::Serialize;
use tracing::{info, warn};

use crate::problem::routing_problem::{NodeIdx, RoutingProblem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopWarning {
    /// The window closes after the shift ends
    WindowOutsideShift,

    /// Informational, the arrival can still be up to the end of the window
    WindowShorterThanService {
        window: SignedDuration,
        service: SignedDuration,
    },

    /// Driving straight from the depot already misses the window
    UnreachableFromDepot { direct_travel: SignedDuration },
}

#[derive(Debug, Clone, Serialize)]
pub struct StopDiagnostic {
    pub stop_id: String,
    pub warning: StopWarning,
}

/// Checks on the raw input, run before any route is built.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintDiagnostics {
    pub shift_length: SignedDuration,
    pub time_horizon: SignedDuration,
    pub total_service_time: SignedDuration,
    pub service_exceeds_shift: bool,
    pub service_exceeds_max_time: bool,
    pub stop_warnings: Vec<StopDiagnostic>,
}

impl ConstraintDiagnostics {
    /// True when no route can serve every stop, whatever the order.
    pub fn has_blocking_issues(&self) -> bool {
        self.service_exceeds_shift
            || self.service_exceeds_max_time
            || self
                .stop_warnings
                .iter()
                .any(|diagnostic| matches!(diagnostic.warning, StopWarning::UnreachableFromDepot { .. }))
    }

    pub fn log(&self) {
        info!(
            "Shift length {:#}, total service time {:#}",
            self.shift_length, self.total_service_time
        );

        if self.service_exceeds_shift {
            warn!("Total service time alone exceeds the shift");
        }
        if self.service_exceeds_max_time {
            warn!("Total service time alone exceeds the maximum route time");
        }

        for diagnostic in &self.stop_warnings {
            match diagnostic.warning {
                StopWarning::WindowOutsideShift => {
                    warn!("{}: time window ends after the shift", diagnostic.stop_id)
                }
                StopWarning::WindowShorterThanService { window, service } => info!(
                    "{}: window of {:#} is shorter than the service of {:#}",
                    diagnostic.stop_id, window, service
                ),
                StopWarning::UnreachableFromDepot { direct_travel } => warn!(
                    "{}: unreachable, direct travel from the depot takes {:#}",
                    diagnostic.stop_id, direct_travel
                ),
            }
        }
    }
}

pub fn diagnose(problem: &RoutingProblem) -> ConstraintDiagnostics {
    let shift_length = problem.shift().length();
    let total_service_time = problem
        .stop_nodes()
        .map(|node| problem.node(node).service_duration())
        .fold(SignedDuration::ZERO, |total, service| total + service);

    let mut stop_warnings = Vec::new();
    for node in problem.stop_nodes() {
        let stop = problem.node(node);
        let window = stop.time_window();
        let mut push = |warning| {
            stop_warnings.push(StopDiagnostic {
                stop_id: stop.external_id().to_owned(),
                warning,
            })
        };

        if window.latest() > shift_length {
            push(StopWarning::WindowOutsideShift);
        }

        if window.duration() < stop.service_duration() {
            push(StopWarning::WindowShorterThanService {
                window: window.duration(),
                service: stop.service_duration(),
            });
        }

        let direct_travel = problem.travel_time(NodeIdx::DEPOT, node);
        if direct_travel > window.latest() {
            push(StopWarning::UnreachableFromDepot { direct_travel });
        }
    }

    ConstraintDiagnostics {
        shift_length,
        time_horizon: problem.time_horizon(),
        total_service_time,
        service_exceeds_shift: total_service_time > shift_length,
        service_exceeds_max_time: total_service_time > problem.limits().max_time,
        stop_warnings,
    }
}
