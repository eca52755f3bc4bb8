use crate::{
    problem::{
        meters::Meters,
        routing_problem::{NodeIdx, RoutingProblem},
    },
    solver::{gls::penalties::EdgePenalties, solution::route::Route},
};

pub type Cost = i64;

/// Cost model minimised by local search, expressed per directed edge.
pub trait Objective {
    fn arc_cost(&self, problem: &RoutingProblem, from: NodeIdx, to: NodeIdx) -> Cost;

    /// Cost of the edges between positions `from..=to`, walked forward.
    fn segment_cost(&self, problem: &RoutingProblem, route: &Route, from: usize, to: usize) -> Cost {
        (from..to)
            .map(|position| self.arc_cost(problem, route.node(position), route.node(position + 1)))
            .sum()
    }

    /// Cost of the edges between positions `from..=to` once the segment is reversed.
    fn reversed_segment_cost(
        &self,
        problem: &RoutingProblem,
        route: &Route,
        from: usize,
        to: usize,
    ) -> Cost {
        (from..to)
            .map(|position| self.arc_cost(problem, route.node(position + 1), route.node(position)))
            .sum()
    }

    fn route_cost(&self, problem: &RoutingProblem, route: &Route) -> Cost {
        self.segment_cost(problem, route, 0, route.last_position())
    }
}

/// True travelled distance in meters.
#[derive(Debug, Default, Clone, Copy)]
pub struct DistanceObjective;

impl Objective for DistanceObjective {
    #[inline(always)]
    fn arc_cost(&self, problem: &RoutingProblem, from: NodeIdx, to: NodeIdx) -> Cost {
        problem.travel_distance(from, to).value()
    }

    fn segment_cost(&self, _problem: &RoutingProblem, route: &Route, from: usize, to: usize) -> Cost {
        route.segment_distance(from, to).value()
    }

    fn reversed_segment_cost(
        &self,
        _problem: &RoutingProblem,
        route: &Route,
        from: usize,
        to: usize,
    ) -> Cost {
        route.reversed_segment_distance(from, to).value()
    }
}

/// Distance plus `lambda` times the penalty count of every traversed edge.
pub struct AugmentedObjective<'a> {
    penalties: &'a EdgePenalties,
    lambda: Meters,
}

impl<'a> AugmentedObjective<'a> {
    pub fn new(penalties: &'a EdgePenalties, lambda: Meters) -> Self {
        Self { penalties, lambda }
    }

    fn penalty_cost(&self, from: NodeIdx, to: NodeIdx) -> Cost {
        self.lambda.value() * self.penalties.get(from, to) as Cost
    }
}

impl Objective for AugmentedObjective<'_> {
    #[inline(always)]
    fn arc_cost(&self, problem: &RoutingProblem, from: NodeIdx, to: NodeIdx) -> Cost {
        problem.travel_distance(from, to).value() + self.penalty_cost(from, to)
    }

    fn segment_cost(&self, _problem: &RoutingProblem, route: &Route, from: usize, to: usize) -> Cost {
        let distance = route.segment_distance(from, to).value();
        if self.penalties.is_empty() {
            return distance;
        }

        distance
            + (from..to)
                .map(|position| self.penalty_cost(route.node(position), route.node(position + 1)))
                .sum::<Cost>()
    }

    fn reversed_segment_cost(
        &self,
        _problem: &RoutingProblem,
        route: &Route,
        from: usize,
        to: usize,
    ) -> Cost {
        let distance = route.reversed_segment_distance(from, to).value();
        if self.penalties.is_empty() {
            return distance;
        }

        distance
            + (from..to)
                .map(|position| self.penalty_cost(route.node(position + 1), route.node(position)))
                .sum::<Cost>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_augmented_objective() {
        let problem = test_utils::create_grid_problem(4);
        let route = Route::from_stops(&problem, &test_utils::nodes(&[1, 2, 3, 4]));

        let mut penalties = EdgePenalties::default();
        let plain = DistanceObjective.route_cost(&problem, &route);
        assert_eq!(plain, route.distance().value());
        assert_eq!(
            AugmentedObjective::new(&penalties, Meters::new(50)).route_cost(&problem, &route),
            plain
        );

        penalties.increment(NodeIdx::new(1), NodeIdx::new(2));
        penalties.increment(NodeIdx::new(1), NodeIdx::new(2));
        penalties.increment(NodeIdx::new(2), NodeIdx::new(1));

        let augmented = AugmentedObjective::new(&penalties, Meters::new(50));
        assert_eq!(augmented.route_cost(&problem, &route), plain + 100);
        assert_eq!(
            augmented.reversed_segment_cost(&problem, &route, 1, 2),
            problem.travel_distance(NodeIdx::new(2), NodeIdx::new(1)).value() + 50
        );
    }
}
