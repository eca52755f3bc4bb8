use jiff::{SignedDuration, civil::date};

use crate::problem::{
    location::Location,
    meters::Meters,
    routing_problem::{NodeIdx, RoutingProblem, RoutingProblemBuilder},
    shift::{RouteLimits, Shift},
    stop::StopBuilder,
    time_window::TimeWindow,
    travel_cost_matrix::TravelCostMatrix,
};

/// A stop on a plane measured in kilometers, travelled at 60 km/h (one minute per km).
/// Windows and service are in minutes.
#[derive(Clone)]
pub struct TestStop {
    pub x_km: f64,
    pub y_km: f64,
    pub earliest: i64,
    pub latest: i64,
    pub service: i64,
}

impl TestStop {
    pub fn new(x_km: i64, earliest: i64, latest: i64) -> Self {
        TestStop {
            x_km: x_km as f64,
            y_km: 0.0,
            earliest,
            latest,
            service: 0,
        }
    }

    pub fn at(x_km: f64, y_km: f64) -> Self {
        TestStop {
            x_km,
            y_km,
            earliest: 0,
            latest: 600,
            service: 0,
        }
    }

    pub fn with_service(mut self, service: i64) -> Self {
        self.service = service;
        self
    }

    pub fn with_window(mut self, earliest: i64, latest: i64) -> Self {
        self.earliest = earliest;
        self.latest = latest;
        self
    }
}

pub fn default_limits() -> RouteLimits {
    RouteLimits {
        max_distance: Meters::new(1_000_000),
        max_time: SignedDuration::from_hours(24),
        max_waiting_duration: None,
    }
}

fn euclidean_meters(from: (f64, f64), to: (f64, f64)) -> i64 {
    let dx = from.0 - to.0;
    let dy = from.1 - to.1;
    ((dx * dx + dy * dy).sqrt() * 1000.0).round() as i64
}

pub fn create_problem_with_matrix(
    stops: &[TestStop],
    matrix: TravelCostMatrix,
    limits: RouteLimits,
) -> RoutingProblem {
    let day = date(2025, 6, 10);
    let mut builder = RoutingProblemBuilder::default();

    builder
        .set_depot("depot", Location::from_lat_lon(50.85, 4.35))
        .set_matrix(matrix)
        .set_shift(Shift::new(day.at(8, 0, 0, 0), day.at(18, 0, 0, 0)).unwrap())
        .set_limits(limits);

    for (index, stop) in stops.iter().enumerate() {
        let mut stop_builder = StopBuilder::default();
        stop_builder
            .set_external_id(format!("stop-{}", index + 1))
            .set_location(Location::from_lat_lon(50.85 + stop.y_km / 111.0, 4.35 + stop.x_km / 70.0))
            .set_time_window(TimeWindow::from_minutes(stop.earliest, stop.latest))
            .set_service_duration(SignedDuration::from_mins(stop.service));
        builder.add_stop(stop_builder.build().unwrap());
    }

    builder.build().unwrap()
}

pub fn euclidean_matrix(points: &[(f64, f64)]) -> TravelCostMatrix {
    let mut distances = Vec::with_capacity(points.len() * points.len());
    for &from in points {
        for &to in points {
            distances.push(euclidean_meters(from, to));
        }
    }

    let times = distances.iter().map(|meters| meters * 60 / 1000).collect();
    TravelCostMatrix::from_flat(distances, times)
}

fn points(stops: &[TestStop]) -> Vec<(f64, f64)> {
    std::iter::once((0.0, 0.0))
        .chain(stops.iter().map(|stop| (stop.x_km, stop.y_km)))
        .collect()
}

pub fn create_problem(stops: Vec<TestStop>, limits: RouteLimits) -> RoutingProblem {
    let matrix = euclidean_matrix(&points(&stops));
    create_problem_with_matrix(&stops, matrix, limits)
}

/// Depot at the origin, stops placed by their coordinates.
pub fn create_line_problem(stops: Vec<TestStop>) -> RoutingProblem {
    create_problem(stops, default_limits())
}

pub fn create_line_problem_with_max_distance(
    stops: Vec<TestStop>,
    max_distance: Meters,
) -> RoutingProblem {
    create_problem(
        stops,
        RouteLimits {
            max_distance,
            ..default_limits()
        },
    )
}

pub fn create_line_problem_with_max_waiting(
    stops: Vec<TestStop>,
    max_waiting_minutes: i64,
) -> RoutingProblem {
    create_problem(
        stops,
        RouteLimits {
            max_waiting_duration: Some(SignedDuration::from_mins(max_waiting_minutes)),
            ..default_limits()
        },
    )
}

/// Stops on a grid with 1 km spacing and loose windows, `width` stops per row.
pub fn create_grid_stops(num_stops: usize, width: usize) -> Vec<TestStop> {
    (0..num_stops)
        .map(|index| TestStop::at((index % width) as f64 + 1.0, (index / width) as f64))
        .collect()
}

pub fn create_grid_problem(num_stops: usize) -> RoutingProblem {
    create_problem(create_grid_stops(num_stops, 4), default_limits())
}

/// Like the grid problem but leaving a node costs an extra 7 m per node index.
pub fn create_asymmetric_grid_problem(num_stops: usize) -> RoutingProblem {
    let stops = create_grid_stops(num_stops, 4);
    let points = points(&stops);
    let n = points.len();

    let mut distances = Vec::with_capacity(n * n);
    for (i, &from) in points.iter().enumerate() {
        for (j, &to) in points.iter().enumerate() {
            distances.push(if i == j {
                0
            } else {
                euclidean_meters(from, to) + 7 * i as i64
            });
        }
    }
    let times = distances.iter().map(|meters| meters * 60 / 1000).collect();

    create_problem_with_matrix(
        &stops,
        TravelCostMatrix::from_flat(distances, times),
        default_limits(),
    )
}

pub fn nodes(indices: &[usize]) -> Vec<NodeIdx> {
    indices.iter().copied().map(NodeIdx::new).collect()
}
