use serde::Serialize;
use tracing::{Level, error, info, instrument, warn};

use crate::{
    problem::routing_problem::RoutingProblem,
    solver::{
        construction::{
            cheapest_insertion::cheapest_insertion,
            infeasibility::{InfeasibilityReport, UnscheduledStop, classify_unscheduled},
        },
        diagnostics,
        feasibility::Violation,
        gls::guided_local_search::GuidedLocalSearch,
        ls::local_search::LocalSearch,
        objective::DistanceObjective,
        solution::{route::Route, solution::Solution},
        solver_params::SolverParams,
        statistics::SearchStatistics,
    },
    timer_debug,
    utils::deadline::Deadline,
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveOutcome {
    Feasible(Solution),
    Infeasible(InfeasibilityReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    pub outcome: SolveOutcome,

    /// Set when the travel matrix comes from the great-circle fallback
    pub degraded: bool,
    pub statistics: SearchStatistics,
}

impl SolveResult {
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            SolveOutcome::Feasible(solution) => Some(solution),
            SolveOutcome::Infeasible(_) => None,
        }
    }

    pub fn infeasibility_report(&self) -> Option<&InfeasibilityReport> {
        match &self.outcome {
            SolveOutcome::Feasible(_) => None,
            SolveOutcome::Infeasible(report) => Some(report),
        }
    }
}

/// Construction, then local search, then guided local search until the deadline.
pub struct Solver {
    problem: RoutingProblem,
    params: SolverParams,
}

impl Solver {
    pub fn new(problem: RoutingProblem, params: SolverParams) -> Self {
        Solver { problem, params }
    }

    pub fn problem(&self) -> &RoutingProblem {
        &self.problem
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn solve(&self) -> SolveResult {
        let problem = &self.problem;
        let deadline = Deadline::start(self.params.deadline);
        let degraded = problem.is_matrix_degraded();

        if degraded {
            warn!("Solving with estimated travel distances");
        }

        diagnostics::diagnose(problem).log();

        let mut statistics = SearchStatistics::default();

        let construction = timer_debug!("Construction", cheapest_insertion(problem));
        statistics.initial_distance = construction.route.distance();

        if !construction.is_complete() {
            let report =
                InfeasibilityReport::new(problem, &construction.route, construction.unscheduled);
            warn!(
                "No feasible route: {} stops unscheduled, mostly {:?}",
                report.unscheduled.len(),
                report.dominant_reason
            );

            statistics.final_distance = statistics.initial_distance;
            return SolveResult {
                outcome: SolveOutcome::Infeasible(report),
                degraded,
                statistics,
            };
        }

        let mut route = construction.route;
        let constructed = route.clone();
        info!("Constructed route of {}", route.distance());
        statistics.record_best_distance(deadline.elapsed(), route.distance());

        if self.params.run_local_search {
            let mut local_search =
                LocalSearch::new(problem, deadline, self.params.deadline_check_interval);

            timer_debug!(
                "Local search",
                local_search.run(&mut route, &DistanceObjective, |route, local_search_move| {
                    statistics.record_accepted_move(local_search_move);
                    statistics.record_best_distance(deadline.elapsed(), route.distance());
                })
            );

            statistics.evaluations += local_search.evaluations();
            info!("Local search improved the route to {}", route.distance());
        }

        if self.params.run_guided_local_search {
            let mut guided_local_search = GuidedLocalSearch::new(problem, &self.params, deadline);
            route = timer_debug!(
                "Guided local search",
                guided_local_search.run(route, &mut statistics)
            );
        }

        let outcome = match checked_route(problem, route, constructed) {
            Ok(route) => {
                statistics.final_distance = route.distance();
                SolveOutcome::Feasible(Solution::from_route(problem, &route))
            }
            Err(violation) => {
                error!("No feasible route left to return, first violation {violation:?}");
                statistics.final_distance = statistics.initial_distance;
                SolveOutcome::Infeasible(unscheduled_report(problem))
            }
        };

        SolveResult {
            outcome,
            degraded,
            statistics,
        }
    }
}

/// Full check of the route the search hands back.
///
/// Moves are accepted on incremental checks only, a violation found here falls back to the
/// constructed route.
fn checked_route(
    problem: &RoutingProblem,
    searched: Route,
    constructed: Route,
) -> Result<Route, Violation> {
    let Some(violation) = searched.first_violation(problem) else {
        return Ok(searched);
    };

    error!("Search returned an infeasible route ({violation:?}), keeping the constructed one");
    match constructed.first_violation(problem) {
        None => Ok(constructed),
        Some(violation) => Err(violation),
    }
}

fn unscheduled_report(problem: &RoutingProblem) -> InfeasibilityReport {
    let route = Route::empty(problem);
    let unscheduled = problem
        .stop_nodes()
        .map(|node| UnscheduledStop {
            stop_id: problem.node(node).external_id().to_owned(),
            node,
            reason: classify_unscheduled(problem, &route, node),
        })
        .collect();

    InfeasibilityReport::new(problem, &route, unscheduled)
}
