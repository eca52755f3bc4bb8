use std::path::PathBuf;

use clap::Subcommand;
use jiff::civil::{date, time};
use roundtrip_matrix::travel_matrix_provider::TravelMatrixProvider;
use roundtrip_optimizer::{
    json::types::{
        JsonDepot, JsonRoutingProblem, JsonShift, JsonSolverSettings, JsonStop, JsonTimeWindow,
    },
    problem::stop::Priority,
};

use crate::file_utils::write_json;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    JsonSchema {
        /// Path of the schema file
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// Writes a small problem file to start from
    Example {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = roundtrip_optimizer::json::schema::generate_json_schema()?;
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, schema)?;
        }
        GenerateSubcommands::Example { out } => write_json(&out, &example_problem())?,
    }

    Ok(())
}

fn example_stop(id: &str, lat: f64, lon: f64, window: Option<(i8, i8)>) -> JsonStop {
    JsonStop {
        id: id.to_owned(),
        name: None,
        lat,
        lon,
        time_window: window.map(|(start, end)| JsonTimeWindow {
            start: time(start, 0, 0, 0),
            end: time(end, 0, 0, 0),
        }),
        service_duration: Some(20),
        priority: None,
    }
}

fn example_problem() -> JsonRoutingProblem {
    let mut stops = vec![
        example_stop("grand-place", 50.8467, 4.3525, Some((9, 12))),
        example_stop("atomium", 50.8949, 4.3415, None),
        example_stop("cinquantenaire", 50.8404, 4.3931, Some((13, 16))),
        example_stop("flagey", 50.8275, 4.3722, None),
    ];
    stops[0].priority = Some(Priority::High);

    JsonRoutingProblem {
        depot: JsonDepot {
            id: Some("warehouse".to_owned()),
            lat: 50.8590,
            lon: 4.3601,
        },
        stops,
        shift: JsonShift {
            date: date(2025, 6, 10),
            start: time(8, 0, 0, 0),
            end: time(17, 0, 0, 0),
            max_distance_km: 150.0,
            max_time_minutes: 540,
            max_waiting_minutes: None,
        },
        matrix_provider: TravelMatrixProvider::default(),
        solver: Some(JsonSolverSettings {
            time_limit_seconds: Some(10.0),
            lambda_coefficient: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_problem_round_trips() {
        let folder = tempfile::tempdir().unwrap();
        let path = folder.path().join("example.json");

        run(GenerateSubcommands::Example { out: path.clone() }).unwrap();

        let problem = crate::file_utils::read_problem(&path).unwrap();
        assert_eq!(problem.stops.len(), 4);
        assert_eq!(problem.solver_params().unwrap().deadline.as_secs(), 10);
    }
}
