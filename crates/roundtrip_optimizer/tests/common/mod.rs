#![allow(dead_code)]

use jiff::{SignedDuration, civil::date};
use roundtrip_optimizer::{
    problem::{
        location::Location,
        meters::Meters,
        routing_problem::{RoutingProblem, RoutingProblemBuilder},
        shift::{RouteLimits, Shift},
        stop::StopBuilder,
        time_window::TimeWindow,
        travel_cost_matrix::TravelCostMatrix,
    },
    solver::solver_params::SolverParams,
};

/// Stop on a plane in kilometers, driven at 60 km/h. Minutes for everything else.
#[derive(Debug, Clone)]
pub struct PlaneStop {
    pub id: String,
    pub x_km: f64,
    pub y_km: f64,
    pub earliest: i64,
    pub latest: i64,
    pub service: i64,
}

impl PlaneStop {
    pub fn new(id: &str, x_km: f64, y_km: f64) -> Self {
        PlaneStop {
            id: id.to_owned(),
            x_km,
            y_km,
            earliest: 0,
            latest: 600,
            service: 0,
        }
    }

    pub fn window(mut self, earliest: i64, latest: i64) -> Self {
        self.earliest = earliest;
        self.latest = latest;
        self
    }

    pub fn service(mut self, service: i64) -> Self {
        self.service = service;
        self
    }
}

/// One minute per kilometer.
pub fn plane_matrix(stops: &[PlaneStop]) -> TravelCostMatrix {
    let points: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
        .chain(stops.iter().map(|stop| (stop.x_km, stop.y_km)))
        .collect();

    let mut distances = Vec::with_capacity(points.len() * points.len());
    for &(x1, y1) in &points {
        for &(x2, y2) in &points {
            let km = ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt();
            distances.push((km * 1000.0).round() as i64);
        }
    }
    let times = distances.iter().map(|meters| meters * 60 / 1000).collect();

    TravelCostMatrix::from_flat(distances, times)
}

/// Shift from 06:00 to `shift_minutes` later on a fixed day.
pub fn plane_problem(
    stops: &[PlaneStop],
    shift_minutes: i64,
    max_distance: Meters,
) -> RoutingProblem {
    plane_problem_with_limits(
        stops,
        shift_minutes,
        RouteLimits {
            max_distance,
            max_time: SignedDuration::from_hours(24),
            max_waiting_duration: None,
        },
    )
}

pub fn plane_problem_with_limits(
    stops: &[PlaneStop],
    shift_minutes: i64,
    limits: RouteLimits,
) -> RoutingProblem {
    let start = date(2025, 6, 10).at(6, 0, 0, 0);
    let end = start.saturating_add(SignedDuration::from_mins(shift_minutes));

    let mut builder = RoutingProblemBuilder::default();
    builder
        .set_depot("depot", Location::from_lat_lon(50.85, 4.35))
        .set_matrix(plane_matrix(stops))
        .set_shift(Shift::new(start, end).unwrap())
        .set_limits(limits);

    for stop in stops {
        let mut stop_builder = StopBuilder::default();
        stop_builder
            .set_external_id(stop.id.clone())
            .set_location(Location::from_lat_lon(
                50.85 + stop.y_km / 111.0,
                4.35 + stop.x_km / 70.0,
            ))
            .set_time_window(TimeWindow::from_minutes(stop.earliest, stop.latest))
            .set_service_duration(SignedDuration::from_mins(stop.service));
        builder.add_stop(stop_builder.build().unwrap());
    }

    builder.build().unwrap()
}

pub fn grid_stops(num_stops: usize, width: usize) -> Vec<PlaneStop> {
    (0..num_stops)
        .map(|index| {
            PlaneStop::new(
                &format!("s{index}"),
                (index % width) as f64 * 2.0 + 1.0,
                (index / width) as f64 * 2.0,
            )
        })
        .collect()
}

pub fn params_with_deadline(millis: i64) -> SolverParams {
    SolverParams {
        deadline: SignedDuration::from_millis(millis),
        ..SolverParams::default()
    }
}
