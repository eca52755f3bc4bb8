use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
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
    solver::{
        construction::cheapest_insertion::cheapest_insertion,
        solver::Solver,
        solver_params::SolverParams,
    },
};

/// Stops scattered on a 30 km square, one minute per kilometer.
fn create_problem(num_stops: usize) -> RoutingProblem {
    let points: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
        .chain((0..num_stops).map(|index| {
            (
                ((index * 7919) % 300) as f64 / 10.0,
                ((index * 104_729) % 300) as f64 / 10.0,
            )
        }))
        .collect();

    let mut distances = Vec::with_capacity(points.len() * points.len());
    for &(x1, y1) in &points {
        for &(x2, y2) in &points {
            distances.push(((x1 - x2).hypot(y1 - y2) * 1000.0).round() as i64);
        }
    }
    let times = distances.iter().map(|meters| meters * 60 / 1000).collect();

    let day = date(2025, 6, 10);
    let mut builder = RoutingProblemBuilder::default();
    builder
        .set_depot("depot", Location::from_lat_lon(50.85, 4.35))
        .set_matrix(TravelCostMatrix::from_flat(distances, times))
        .set_shift(Shift::new(day.at(6, 0, 0, 0), day.at(22, 0, 0, 0)).unwrap())
        .set_limits(RouteLimits {
            max_distance: Meters::new(2_000_000),
            max_time: SignedDuration::from_hours(16),
            max_waiting_duration: None,
        });

    for (index, &(x, y)) in points.iter().skip(1).enumerate() {
        let mut stop = StopBuilder::default();
        stop.set_external_id(format!("s{index}"))
            .set_location(Location::from_lat_lon(50.85 + y / 111.0, 4.35 + x / 70.0))
            .set_time_window(TimeWindow::from_minutes(0, 960))
            .set_service_duration(SignedDuration::from_mins(3));
        builder.add_stop(stop.build().unwrap());
    }

    builder.build().unwrap()
}

fn construction_benchmark(c: &mut Criterion) {
    let problem = create_problem(60);

    c.bench_function("cheapest insertion (60 stops)", |b| {
        b.iter(|| cheapest_insertion(black_box(&problem)))
    });
}

fn local_search_benchmark(c: &mut Criterion) {
    c.bench_function("construction + local search (60 stops)", |b| {
        b.iter_batched(
            || {
                Solver::new(
                    create_problem(60),
                    SolverParams {
                        deadline: SignedDuration::from_secs(10),
                        run_guided_local_search: false,
                        ..SolverParams::default()
                    },
                )
            },
            |solver| solver.solve(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, construction_benchmark, local_search_benchmark);
criterion_main!(benches);
