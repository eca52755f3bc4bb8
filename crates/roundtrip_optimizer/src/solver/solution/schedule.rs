use jiff::{SignedDuration, civil::DateTime};
use serde::Serialize;

use crate::{
    problem::{
        meters::Meters,
        routing_problem::RoutingProblem,
        stop::Priority,
    },
    solver::solution::solution::Solution,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Depart,
    Visit,
    Return,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub stop_id: String,
    pub name: Option<String>,
    pub activity: ActivityKind,
    pub priority: Priority,

    pub arrival: DateTime,
    pub waiting: SignedDuration,
    pub service_start: DateTime,
    pub service_end: DateTime,

    /// From the previous entry
    pub distance_delta: Meters,
    pub travel_time_delta: SignedDuration,
    pub cumulative_distance: Meters,
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub total_distance: Meters,
    pub total_travel_time: SignedDuration,
    pub total_service_time: SignedDuration,
    pub total_waiting_time: SignedDuration,
    pub day_start: DateTime,
    pub day_end: DateTime,
}

/// Turns offsets from the shift start into wall-clock times.
pub struct ScheduleBuilder;

impl ScheduleBuilder {
    pub fn build(problem: &RoutingProblem, solution: &Solution) -> Schedule {
        let shift = problem.shift();
        let visits = solution.visits();
        let last = visits.len() - 1;

        let mut entries = Vec::with_capacity(visits.len());
        let mut total_travel_time = SignedDuration::ZERO;
        let mut total_service_time = SignedDuration::ZERO;
        let mut total_waiting_time = SignedDuration::ZERO;

        for (position, visit) in visits.iter().enumerate() {
            let stop = problem.node(visit.node);

            let activity = match position {
                0 => ActivityKind::Depart,
                position if position == last => ActivityKind::Return,
                _ => ActivityKind::Visit,
            };

            let (distance_delta, travel_time_delta) = if position == 0 {
                (Meters::ZERO, SignedDuration::ZERO)
            } else {
                let previous = visits[position - 1].node;
                (
                    problem.travel_distance(previous, visit.node),
                    problem.travel_time(previous, visit.node),
                )
            };

            let service_duration = if activity == ActivityKind::Visit {
                stop.service_duration()
            } else {
                SignedDuration::ZERO
            };

            // The route leaves the depot at the shift start
            let (arrival, waiting) = if activity == ActivityKind::Depart {
                (visit.departure, SignedDuration::ZERO)
            } else {
                (visit.arrival, visit.waiting)
            };
            let service_start = arrival + waiting;

            total_travel_time += travel_time_delta;
            total_service_time += service_duration;
            total_waiting_time += waiting;

            entries.push(ScheduleEntry {
                stop_id: visit.stop_id.clone(),
                name: stop.name().map(str::to_owned),
                activity,
                priority: stop.priority(),
                arrival: shift.clock_time(arrival),
                waiting,
                service_start: shift.clock_time(service_start),
                service_end: shift.clock_time(service_start + service_duration),
                distance_delta,
                travel_time_delta,
                cumulative_distance: visit.cumulative_distance,
            });
        }

        let day_start = entries.first().map_or(shift.start(), |entry| entry.service_end);
        let day_end = entries.last().map_or(shift.start(), |entry| entry.arrival);

        Schedule {
            entries,
            total_distance: solution.total_distance(),
            total_travel_time,
            total_service_time,
            total_waiting_time,
            day_start,
            day_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::{
        solver::solution::route::Route,
        test_utils::{self, TestStop},
    };

    #[test]
    fn test_schedule_builder() {
        let problem = test_utils::create_line_problem(vec![
            TestStop::new(2, 10, 600).with_service(5),
            TestStop::new(4, 0, 600).with_service(15),
        ]);
        let route = Route::from_stops(&problem, &test_utils::nodes(&[1, 2]));
        let schedule = ScheduleBuilder::build(&problem, &Solution::from_route(&problem, &route));

        let day = date(2025, 6, 10);
        assert_eq!(schedule.entries.len(), 4);

        let depart = &schedule.entries[0];
        assert_eq!(depart.activity, ActivityKind::Depart);
        assert_eq!(depart.arrival, day.at(8, 0, 0, 0));
        assert_eq!(depart.service_end, day.at(8, 0, 0, 0));

        let first = &schedule.entries[1];
        assert_eq!(first.activity, ActivityKind::Visit);
        assert_eq!(first.arrival, day.at(8, 2, 0, 0));
        assert_eq!(first.waiting, SignedDuration::from_mins(8));
        assert_eq!(first.service_start, day.at(8, 10, 0, 0));
        assert_eq!(first.service_end, day.at(8, 15, 0, 0));
        assert_eq!(first.distance_delta, Meters::new(2000));
        assert_eq!(first.travel_time_delta, SignedDuration::from_mins(2));

        let second = &schedule.entries[2];
        assert_eq!(second.arrival, day.at(8, 17, 0, 0));
        assert_eq!(second.service_end, day.at(8, 32, 0, 0));
        assert_eq!(second.cumulative_distance, Meters::new(4000));

        let back = &schedule.entries[3];
        assert_eq!(back.activity, ActivityKind::Return);
        assert_eq!(back.arrival, day.at(8, 36, 0, 0));
        assert_eq!(back.service_end, back.arrival);

        assert_eq!(schedule.total_distance, Meters::new(8000));
        assert_eq!(schedule.total_travel_time, SignedDuration::from_mins(8));
        assert_eq!(schedule.total_service_time, SignedDuration::from_mins(20));
        assert_eq!(schedule.total_waiting_time, SignedDuration::from_mins(8));
        assert_eq!(schedule.day_start, day.at(8, 0, 0, 0));
        assert_eq!(schedule.day_end, day.at(8, 36, 0, 0));
    }
}
