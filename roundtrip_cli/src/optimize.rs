use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use roundtrip_matrix::travel_matrix_client::TravelMatrixClient;
use roundtrip_optimizer::solver::{
    solution::schedule::{Schedule, ScheduleBuilder},
    solver::{SolveOutcome, SolveResult, Solver},
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    file_utils::{read_problem, write_json},
    parsers,
};

#[derive(Args)]
pub struct OptimizeArgs {
    /// The problem file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Overrides the time limit of the problem file
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Writes the result and the schedule as JSON
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct OptimizeOutput<'a> {
    result: &'a SolveResult,
    schedule: Option<Schedule>,
}

fn schedule_table(schedule: &Schedule) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "Stop", "Arrival", "Wait", "Service", "Leg", "Total",
    ]);

    for entry in &schedule.entries {
        table.add_row(vec![
            entry.stop_id.clone(),
            entry.arrival.time().strftime("%H:%M").to_string(),
            format!("{:#}", entry.waiting),
            format!(
                "{}-{}",
                entry.service_start.time().strftime("%H:%M"),
                entry.service_end.time().strftime("%H:%M")
            ),
            format!("{:.1} km", entry.distance_delta.as_km()),
            format!("{:.1} km", entry.cumulative_distance.as_km()),
        ]);
    }

    table
}

pub async fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let input = read_problem(&args.input)?;
    let mut params = input.solver_params()?;
    if let Some(timeout) = args.timeout {
        params.deadline = timeout;
    }

    let client = TravelMatrixClient::default();
    let problem = input.build_problem(&client).await?;

    info!(
        "Optimizing {} stops within {:#}",
        problem.num_stops(),
        params.deadline
    );

    let solver = Solver::new(problem, params);
    let result = solver.solve();

    if result.degraded {
        warn!("Distances are great-circle estimates, the routing service was unavailable");
    }

    let schedule = match &result.outcome {
        SolveOutcome::Feasible(solution) => {
            let schedule = ScheduleBuilder::build(solver.problem(), solution);
            info!(
                "Route of {:.1} km, back at {}, {:#} waiting\n{}",
                schedule.total_distance.as_km(),
                schedule.day_end.time().strftime("%H:%M"),
                schedule.total_waiting_time,
                schedule_table(&schedule)
            );
            Some(schedule)
        }
        SolveOutcome::Infeasible(report) => {
            warn!(
                "No feasible route, mostly because of {:?}",
                report.dominant_reason
            );
            for stop in &report.unscheduled {
                warn!("{}: {:?}", stop.stop_id, stop.reason);
            }
            None
        }
    };

    info!(
        "{} GLS iterations, {} accepted moves, {} -> {}",
        result.statistics.gls_iterations,
        result.statistics.total_accepted_moves(),
        result.statistics.initial_distance,
        result.statistics.final_distance
    );

    if let Some(out) = args.out {
        write_json(
            &out,
            &OptimizeOutput {
                result: &result,
                schedule,
            },
        )?;
        info!("Wrote {}", out.display());
    }

    Ok(())
}
