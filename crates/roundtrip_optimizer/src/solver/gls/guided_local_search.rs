use tracing::{Level, debug, info, instrument};

use crate::{
    problem::{meters::Meters, routing_problem::RoutingProblem},
    solver::{
        gls::penalties::EdgePenalties,
        ls::local_search::{LocalSearch, LocalSearchOutcome},
        objective::AugmentedObjective,
        solution::route::Route,
        solver_params::SolverParams,
        statistics::SearchStatistics,
    },
    utils::deadline::Deadline,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlsPhase {
    /// Descending under the augmented objective
    Searching,
    /// Stuck in a local optimum, penalising the costliest edge
    Perturbing,
}

/// Escapes local optima by penalising long edges of the current route.
///
/// ```text
///            local optimum
///  Searching ─────────────► Perturbing
///      ▲                        │
///      └────────────────────────┘
///          penalty incremented
/// ```
///
/// Only the deadline stops the loop, except for routes where no penalty can change anything.
/// The best route under true distance is tracked on the side and returned.
pub struct GuidedLocalSearch<'a> {
    problem: &'a RoutingProblem,
    deadline: Deadline,
    lambda_coefficient: f64,
    deadline_check_interval: usize,
    penalties: EdgePenalties,
    phase: GlsPhase,
}

impl<'a> GuidedLocalSearch<'a> {
    pub(crate) fn new(problem: &'a RoutingProblem, params: &SolverParams, deadline: Deadline) -> Self {
        Self {
            problem,
            deadline,
            lambda_coefficient: params.lambda_coefficient,
            deadline_check_interval: params.deadline_check_interval,
            penalties: EdgePenalties::default(),
            phase: GlsPhase::Searching,
        }
    }

    pub fn phase(&self) -> GlsPhase {
        self.phase
    }

    /// `lambda_coefficient` times the average edge length of `route`, at least one meter.
    pub fn compute_lambda(lambda_coefficient: f64, route: &Route) -> Meters {
        let num_edges = route.len() - 1;
        let average_edge = route.distance().value() as f64 / num_edges as f64;

        Meters::new(((lambda_coefficient * average_edge).round() as i64).max(1))
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn run(&mut self, initial: Route, statistics: &mut SearchStatistics) -> Route {
        if initial.num_stops() < 2 {
            debug!("GLS: nothing to perturb with {} stops", initial.num_stops());
            return initial;
        }

        let problem = self.problem;
        let deadline = self.deadline;
        let lambda = Self::compute_lambda(self.lambda_coefficient, &initial);

        debug!("GLS: lambda {lambda}, starting distance {}", initial.distance());

        self.penalties.clear();
        self.phase = GlsPhase::Searching;

        let mut local_search = LocalSearch::new(problem, deadline, self.deadline_check_interval);
        let mut current = initial.clone();
        let mut best = initial;

        loop {
            if deadline.is_reached() {
                break;
            }

            match self.phase {
                GlsPhase::Searching => {
                    statistics.gls_iterations += 1;

                    let objective = AugmentedObjective::new(&self.penalties, lambda);
                    let outcome = local_search.run(&mut current, &objective, |route, local_search_move| {
                        statistics.record_accepted_move(local_search_move);

                        if route.distance() < best.distance() {
                            debug_assert!(route.is_feasible(problem));
                            best = route.clone();
                            statistics.record_best_distance(deadline.elapsed(), best.distance());
                        }
                    });

                    match outcome {
                        LocalSearchOutcome::DeadlineReached => break,
                        LocalSearchOutcome::LocalOptimum => {
                            statistics.local_optima += 1;
                            self.phase = GlsPhase::Perturbing;
                        }
                    }
                }
                GlsPhase::Perturbing => match self.penalties.max_utility_edge(problem, &current) {
                    Some((from, to)) => {
                        self.penalties.increment(from, to);
                        statistics.penalty_updates += 1;
                        self.phase = GlsPhase::Searching;
                    }
                    None => {
                        debug!("GLS: every edge has zero length, stopping");
                        break;
                    }
                },
            }
        }

        statistics.evaluations += local_search.evaluations();

        info!(
            "GLS: {} iterations, {} penalty updates, best distance {}",
            statistics.gls_iterations,
            statistics.penalty_updates,
            best.distance()
        );

        best
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::{
        solver::{construction::cheapest_insertion::cheapest_insertion, objective::DistanceObjective},
        test_utils::{self, TestStop},
    };

    fn params() -> SolverParams {
        SolverParams {
            deadline: SignedDuration::from_millis(200),
            ..SolverParams::default()
        }
    }

    #[test]
    fn test_compute_lambda() {
        let problem = test_utils::create_line_problem(vec![
            TestStop::new(1, 0, 600),
            TestStop::new(3, 0, 600),
        ]);
        let route = Route::from_stops(&problem, &test_utils::nodes(&[1, 2]));

        // 6 km over 3 edges
        assert_eq!(GuidedLocalSearch::compute_lambda(0.1, &route), Meters::new(200));
        assert_eq!(GuidedLocalSearch::compute_lambda(0.0, &route), Meters::new(1));
    }

    #[test]
    fn test_gls_never_worse_than_start() {
        let problem = test_utils::create_grid_problem(16);
        let initial = cheapest_insertion(&problem).route;
        let initial_distance = initial.distance();

        let params = params();
        let mut statistics = SearchStatistics::default();
        let mut gls =
            GuidedLocalSearch::new(&problem, &params, Deadline::start(params.deadline));
        let best = gls.run(initial, &mut statistics);

        assert!(best.distance() <= initial_distance);
        assert!(best.is_feasible(&problem));
        assert_eq!(best.num_stops(), 16);
        assert!(statistics.gls_iterations > 0);
        assert!(statistics.local_optima > 0);
        assert!(statistics.penalty_updates > 0);
        assert!(
            statistics
                .best_distance_evolution
                .windows(2)
                .all(|rows| rows[1].distance < rows[0].distance)
        );
    }

    #[test]
    fn test_gls_improves_on_local_optimum_or_matches_it() {
        let problem = test_utils::create_asymmetric_grid_problem(12);
        let mut route = cheapest_insertion(&problem).route;

        let mut local_search =
            LocalSearch::new(&problem, Deadline::start(SignedDuration::from_secs(60)), 1024);
        local_search.run(&mut route, &DistanceObjective, |_, _| {});
        let local_optimum = route.distance();

        let params = params();
        let mut gls =
            GuidedLocalSearch::new(&problem, &params, Deadline::start(params.deadline));
        let best = gls.run(route, &mut SearchStatistics::default());

        assert!(best.distance() <= local_optimum);
        assert!(best.is_feasible(&problem));
    }

    #[test]
    fn test_gls_respects_deadline() {
        let problem = test_utils::create_grid_problem(30);
        let initial = cheapest_insertion(&problem).route;

        let params = SolverParams {
            deadline: SignedDuration::from_millis(100),
            ..SolverParams::default()
        };
        let deadline = Deadline::start(params.deadline);
        let mut gls = GuidedLocalSearch::new(&problem, &params, deadline);
        gls.run(initial, &mut SearchStatistics::default());

        assert!(deadline.elapsed() < SignedDuration::from_secs(2));
    }

    #[test]
    fn test_gls_single_stop() {
        let problem = test_utils::create_line_problem(vec![TestStop::new(3, 0, 600)]);
        let initial = Route::from_stops(&problem, &test_utils::nodes(&[1]));

        let params = SolverParams::default();
        let deadline = Deadline::start(params.deadline);
        let mut statistics = SearchStatistics::default();
        let best = GuidedLocalSearch::new(&problem, &params, deadline).run(initial, &mut statistics);

        assert_eq!(best.stops(), test_utils::nodes(&[1]).as_slice());
        assert_eq!(statistics.gls_iterations, 0);
        assert!(deadline.elapsed() < SignedDuration::from_secs(1));
    }
}
