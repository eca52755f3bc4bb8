use jiff::SignedDuration;
use serde::Serialize;

use crate::{
    problem::{
        meters::Meters,
        routing_problem::{NodeIdx, RoutingProblem},
    },
    solver::{feasibility::FeasibilityReport, solution::route::Route},
};

/// One position of the final tour. Offsets are relative to the shift start.
#[derive(Debug, Clone, Serialize)]
pub struct Visit {
    #[serde(skip)]
    pub node: NodeIdx,
    pub stop_id: String,
    pub arrival: SignedDuration,
    pub waiting: SignedDuration,
    pub departure: SignedDuration,
    pub cumulative_distance: Meters,
}

/// A complete, feasible tour starting and ending at the depot.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    visits: Vec<Visit>,
    total_distance: Meters,
    total_time: SignedDuration,
    feasibility: FeasibilityReport,
}

impl Solution {
    pub fn from_route(problem: &RoutingProblem, route: &Route) -> Self {
        let visits = route
            .nodes()
            .iter()
            .enumerate()
            .map(|(position, &node)| Visit {
                node,
                stop_id: problem.node(node).external_id().to_owned(),
                arrival: route.arrival_time(position),
                waiting: route.waiting_duration(position),
                departure: route.departure_time(position),
                cumulative_distance: route.cumulative_distance(position),
            })
            .collect();

        Solution {
            visits,
            total_distance: route.distance(),
            total_time: route.duration(),
            feasibility: route.feasibility_report(problem),
        }
    }

    /// Every position, both depot visits included.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn stop_ids(&self) -> impl Iterator<Item = &str> {
        self.visits[1..self.visits.len() - 1]
            .iter()
            .map(|visit| visit.stop_id.as_str())
    }

    pub fn stop_nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.visits[1..self.visits.len() - 1]
            .iter()
            .map(|visit| visit.node)
    }

    pub fn total_distance(&self) -> Meters {
        self.total_distance
    }

    pub fn total_time(&self) -> SignedDuration {
        self.total_time
    }

    pub fn feasibility(&self) -> &FeasibilityReport {
        &self.feasibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, TestStop};

    #[test]
    fn test_solution_from_route() {
        let problem = test_utils::create_line_problem(vec![
            TestStop::new(2, 10, 600).with_service(5),
            TestStop::new(4, 0, 600),
        ]);
        let route = Route::from_stops(&problem, &test_utils::nodes(&[1, 2]));
        let solution = Solution::from_route(&problem, &route);

        assert_eq!(solution.visits().len(), 4);
        assert_eq!(solution.stop_ids().collect::<Vec<_>>(), vec!["stop-1", "stop-2"]);
        assert_eq!(solution.visits()[0].stop_id, "depot");
        assert_eq!(solution.visits()[3].stop_id, "depot");

        let first = &solution.visits()[1];
        assert_eq!(first.arrival, SignedDuration::from_mins(2));
        assert_eq!(first.waiting, SignedDuration::from_mins(8));
        assert_eq!(first.departure, SignedDuration::from_mins(15));

        assert_eq!(solution.total_distance(), Meters::new(8000));
        assert_eq!(solution.total_time(), SignedDuration::from_mins(21));
        assert!(solution.feasibility().is_feasible());
    }
}
