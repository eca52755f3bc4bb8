mod common;

use std::time::{Duration, Instant};

use common::{PlaneStop, grid_stops, params_with_deadline, plane_problem};
use jiff::SignedDuration;
use roundtrip_optimizer::{
    problem::meters::Meters,
    solver::{
        construction::infeasibility::InfeasibilityReason,
        solution::schedule::{ActivityKind, ScheduleBuilder},
        solver::{SolveOutcome, Solver},
        solver_params::SolverParams,
    },
};

#[test]
fn test_square_follows_perimeter() {
    let stops = vec![
        PlaneStop::new("A", 0.0, 10.0).window(0, 1000).service(10),
        PlaneStop::new("B", 10.0, 10.0).window(0, 1000).service(10),
        PlaneStop::new("C", 10.0, 0.0).window(0, 1000).service(10),
    ];
    let problem = plane_problem(&stops, 1020, Meters::new(100_000));

    let result = Solver::new(problem, params_with_deadline(200)).solve();
    let SolveOutcome::Feasible(solution) = &result.outcome else {
        panic!("square scenario should be feasible");
    };

    let order: Vec<&str> = solution.stop_ids().collect();
    assert!(
        order == ["A", "B", "C"] || order == ["C", "B", "A"],
        "unexpected order {order:?}"
    );
    assert_eq!(solution.total_distance(), Meters::new(40_000));
    // 40 minutes of driving and 30 of service
    assert_eq!(solution.total_time(), SignedDuration::from_mins(70));
    assert!(solution.feasibility().is_feasible());
}

#[test]
fn test_tight_window_is_reported_unreachable() {
    let stops = vec![
        PlaneStop::new("near", 2.0, 0.0),
        PlaneStop::new("tight", 20.0, 0.0).window(5, 6),
    ];
    let problem = plane_problem(&stops, 600, Meters::new(100_000));

    let result = Solver::new(problem, params_with_deadline(100)).solve();

    let SolveOutcome::Infeasible(report) = &result.outcome else {
        panic!("a stop 20 minutes away cannot be reached by minute 6");
    };
    assert_eq!(report.dominant_reason, InfeasibilityReason::UnreachableStop);
    assert_eq!(report.unscheduled.len(), 1);
    assert_eq!(report.unscheduled[0].stop_id, "tight");
    assert_eq!(report.scheduled_stop_ids, vec!["near".to_owned()]);
}

#[test]
fn test_distance_cap_is_reported() {
    let stops = vec![
        PlaneStop::new("a", 5.0, 0.0),
        PlaneStop::new("far", 40.0, 0.0),
    ];
    let problem = plane_problem(&stops, 600, Meters::new(50_000));

    let result = Solver::new(problem, params_with_deadline(100)).solve();
    let report = result.infeasibility_report().unwrap();

    assert_eq!(report.dominant_reason, InfeasibilityReason::DistanceCapExceeded);
    assert_eq!(report.unscheduled[0].stop_id, "far");
}

#[test]
fn test_solver_respects_deadline() {
    let problem = plane_problem(&grid_stops(40, 8), 600, Meters::new(1_000_000));

    let started = Instant::now();
    let result = Solver::new(problem, params_with_deadline(300)).solve();
    let elapsed = started.elapsed();

    assert!(result.solution().is_some());
    assert!(elapsed < Duration::from_millis(300) + Duration::from_secs(2), "{elapsed:?}");
}

#[test]
fn test_search_never_worse_than_construction() {
    let stops: Vec<PlaneStop> = (0..25)
        .map(|index| {
            // Scattered, deterministic coordinates
            let x = ((index * 37) % 23) as f64;
            let y = ((index * 53) % 19) as f64;
            PlaneStop::new(&format!("s{index}"), x, y)
        })
        .collect();

    let construction_only = Solver::new(
        plane_problem(&stops, 600, Meters::new(1_000_000)),
        SolverParams {
            run_local_search: false,
            run_guided_local_search: false,
            ..params_with_deadline(200)
        },
    )
    .solve();

    let full = Solver::new(
        plane_problem(&stops, 600, Meters::new(1_000_000)),
        params_with_deadline(200),
    )
    .solve();

    let constructed = construction_only.solution().unwrap().total_distance();
    let searched = full.solution().unwrap().total_distance();

    assert_eq!(full.statistics.initial_distance, constructed);
    assert!(searched <= constructed);
}

#[test]
fn test_schedule_of_solution() {
    let stops = vec![
        PlaneStop::new("a", 3.0, 0.0).window(30, 60).service(15),
        PlaneStop::new("b", 3.0, 4.0).service(5),
    ];
    let solver = Solver::new(
        plane_problem(&stops, 600, Meters::new(100_000)),
        params_with_deadline(100),
    );
    let result = solver.solve();
    let solution = result.solution().unwrap();

    let schedule = ScheduleBuilder::build(solver.problem(), solution);

    assert_eq!(schedule.entries.len(), 4);
    assert_eq!(schedule.entries[0].activity, ActivityKind::Depart);
    assert_eq!(schedule.entries[3].activity, ActivityKind::Return);
    assert_eq!(schedule.total_distance, Meters::new(12_000));
    assert_eq!(schedule.total_service_time, SignedDuration::from_mins(20));

    for entry in &schedule.entries[1..3] {
        assert_eq!(entry.activity, ActivityKind::Visit);
        assert!(entry.service_start >= entry.arrival);
    }
}
