use jiff::SignedDuration;

use crate::{
    problem::{
        meters::Meters,
        routing_problem::{NodeIdx, RoutingProblem},
    },
    solver::feasibility::{self, FeasibilityReport, Violation},
};

/// A closed tour stored as a flat node sequence, `[depot, stops.., depot]`.
///
/// Positions index into the sequence, so stops live at `1..=num_stops()`. The buffers hold,
/// per position, the cumulative distance from the depot, the cumulative distance of the
/// sequence walked backwards (used to price reversed segments), and the arrival, waiting and
/// departure offsets from the start of the shift. They are recomputed after every mutation.
#[derive(Debug, Clone)]
pub struct Route {
    nodes: Vec<NodeIdx>,
    cumulative_distances: Vec<Meters>,
    reverse_cumulative_distances: Vec<Meters>,
    arrival_times: Vec<SignedDuration>,
    waiting_durations: Vec<SignedDuration>,
    departure_times: Vec<SignedDuration>,
}

impl Route {
    pub fn empty(problem: &RoutingProblem) -> Self {
        Self::from_stops(problem, &[])
    }

    pub fn from_stops(problem: &RoutingProblem, stops: &[NodeIdx]) -> Self {
        let mut nodes = Vec::with_capacity(stops.len() + 2);
        nodes.push(NodeIdx::DEPOT);
        nodes.extend_from_slice(stops);
        nodes.push(NodeIdx::DEPOT);

        let mut route = Route {
            nodes,
            cumulative_distances: Vec::new(),
            reverse_cumulative_distances: Vec::new(),
            arrival_times: Vec::new(),
            waiting_durations: Vec::new(),
            departure_times: Vec::new(),
        };
        route.update_data(problem);
        route
    }

    /// Number of positions, both depot visits included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_stops() == 0
    }

    pub fn num_stops(&self) -> usize {
        self.nodes.len() - 2
    }

    pub fn last_position(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    pub fn stops(&self) -> &[NodeIdx] {
        &self.nodes[1..self.nodes.len() - 1]
    }

    #[inline(always)]
    pub fn node(&self, position: usize) -> NodeIdx {
        self.nodes[position]
    }

    pub fn nodes_iter(
        &self,
        start: usize,
        end: usize,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> + Clone + '_ {
        self.nodes[start..end].iter().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeIdx, NodeIdx)> + '_ {
        self.nodes.windows(2).map(|edge| (edge[0], edge[1]))
    }

    pub fn contains(&self, node: NodeIdx) -> bool {
        self.stops().contains(&node)
    }

    pub fn distance(&self) -> Meters {
        self.cumulative_distances[self.last_position()]
    }

    /// Elapsed time from the start of the shift until the vehicle is back at the depot.
    pub fn duration(&self) -> SignedDuration {
        self.arrival_times[self.last_position()]
    }

    pub fn cumulative_distance(&self, position: usize) -> Meters {
        self.cumulative_distances[position]
    }

    pub fn arrival_time(&self, position: usize) -> SignedDuration {
        self.arrival_times[position]
    }

    pub fn waiting_duration(&self, position: usize) -> SignedDuration {
        self.waiting_durations[position]
    }

    pub fn departure_time(&self, position: usize) -> SignedDuration {
        self.departure_times[position]
    }

    pub fn total_waiting_duration(&self) -> SignedDuration {
        self.waiting_durations
            .iter()
            .fold(SignedDuration::ZERO, |acc, &waiting| acc + waiting)
    }

    /// Distance of the edges between positions `from..=to` walked forward.
    #[inline(always)]
    pub fn segment_distance(&self, from: usize, to: usize) -> Meters {
        self.cumulative_distances[to] - self.cumulative_distances[from]
    }

    /// Distance of the edges between positions `from..=to` walked from `to` back to `from`.
    #[inline(always)]
    pub fn reversed_segment_distance(&self, from: usize, to: usize) -> Meters {
        self.reverse_cumulative_distances[to] - self.reverse_cumulative_distances[from]
    }

    pub fn insert(&mut self, problem: &RoutingProblem, node: NodeIdx, position: usize) {
        debug_assert!(position >= 1 && position <= self.last_position());
        self.nodes.insert(position, node);
        self.update_data(problem);
    }

    /// Replaces the nodes at positions `[start, end)` with `nodes`.
    pub fn replace_nodes(
        &mut self,
        problem: &RoutingProblem,
        nodes: &[NodeIdx],
        start: usize,
        end: usize,
    ) {
        debug_assert!(start >= 1 && end <= self.last_position());
        self.nodes.splice(start..end, nodes.iter().copied());
        self.update_data(problem);
    }

    /// Checks that replacing positions `[start, end)` with `nodes` keeps the route feasible.
    ///
    /// Both dimensions are recomputed forward from `start`. The route itself must be feasible:
    /// once an unchanged successor is left no later than before, every later position is
    /// implied and only the final distance remains to be checked. Under a waiting cap an
    /// earlier departure lengthens the waits further down, so only an identical departure
    /// settles the rest of the route.
    pub fn is_valid_change(
        &self,
        problem: &RoutingProblem,
        nodes: impl Iterator<Item = NodeIdx>,
        start: usize,
        end: usize,
    ) -> Result<(), Violation> {
        debug_assert!(start >= 1 && start <= end && end <= self.last_position());

        let mut nodes = nodes.peekable();
        let mut previous = self.nodes[start - 1];
        let mut distance = self.cumulative_distances[start - 1];
        let mut departure = if start == 1 {
            let first = nodes.peek().copied().unwrap_or(self.nodes[end]);
            feasibility::depot_departure(problem, first)
        } else {
            self.departure_times[start - 1]
        };
        let waiting_capped = problem.max_waiting_duration().is_some();

        for node in nodes {
            distance += problem.travel_distance(previous, node);
            let times = feasibility::visit_times(problem, previous, departure, node);
            feasibility::check_visit(problem, node, &times, distance)?;

            previous = node;
            departure = times.departure;
        }

        for position in end..self.nodes.len() {
            let node = self.nodes[position];
            distance += problem.travel_distance(previous, node);
            let times = feasibility::visit_times(problem, previous, departure, node);
            feasibility::check_visit(problem, node, &times, distance)?;

            let settled = if waiting_capped {
                times.departure == self.departure_times[position]
            } else {
                times.departure <= self.departure_times[position]
            };

            if settled {
                let remaining = self.distance() - self.cumulative_distances[position];
                if distance + remaining > problem.max_distance() {
                    return Err(Violation::DistanceCap);
                }
                return Ok(());
            }

            previous = node;
            departure = times.departure;
        }

        Ok(())
    }

    /// Full check of the stored buffers, independent of how the route was built.
    pub fn first_violation(&self, problem: &RoutingProblem) -> Option<Violation> {
        (1..self.nodes.len()).find_map(|position| {
            let times = feasibility::VisitTimes {
                arrival: self.arrival_times[position],
                waiting: self.waiting_durations[position],
                departure: self.departure_times[position],
            };

            feasibility::check_visit(
                problem,
                self.nodes[position],
                &times,
                self.cumulative_distances[position],
            )
            .err()
        })
    }

    pub fn is_feasible(&self, problem: &RoutingProblem) -> bool {
        self.first_violation(problem).is_none()
    }

    pub fn feasibility_report(&self, problem: &RoutingProblem) -> FeasibilityReport {
        let windows_satisfied = (1..self.last_position()).all(|position| {
            let stop = problem.node(self.nodes[position]);
            stop.time_window().is_satisfied(self.arrival_times[position])
                && problem
                    .max_waiting_duration()
                    .is_none_or(|max_waiting| self.waiting_durations[position] <= max_waiting)
        });

        FeasibilityReport {
            distance_within_cap: self.distance() <= problem.max_distance(),
            time_within_cap: self.duration() <= problem.time_horizon(),
            windows_satisfied,
        }
    }

    fn update_data(&mut self, problem: &RoutingProblem) {
        let len = self.nodes.len();

        self.cumulative_distances.clear();
        self.reverse_cumulative_distances.clear();
        self.arrival_times.clear();
        self.waiting_durations.clear();
        self.departure_times.clear();

        self.cumulative_distances.reserve(len);
        self.reverse_cumulative_distances.reserve(len);
        self.arrival_times.reserve(len);
        self.waiting_durations.reserve(len);
        self.departure_times.reserve(len);

        let start = feasibility::depot_departure(problem, self.nodes[1]);
        self.cumulative_distances.push(Meters::ZERO);
        self.reverse_cumulative_distances.push(Meters::ZERO);
        self.arrival_times.push(start);
        self.waiting_durations.push(SignedDuration::ZERO);
        self.departure_times.push(start);

        for position in 1..len {
            let previous = self.nodes[position - 1];
            let node = self.nodes[position];

            self.cumulative_distances.push(
                self.cumulative_distances[position - 1] + problem.travel_distance(previous, node),
            );
            self.reverse_cumulative_distances.push(
                self.reverse_cumulative_distances[position - 1]
                    + problem.travel_distance(node, previous),
            );

            let times = feasibility::visit_times(
                problem,
                previous,
                self.departure_times[position - 1],
                node,
            );
            self.arrival_times.push(times.arrival);
            self.waiting_durations.push(times.waiting);
            self.departure_times.push(times.departure);
        }
    }
}
