use std::path::PathBuf;

use clap::Args;
use roundtrip_matrix::travel_matrix_client::TravelMatrixClient;
use roundtrip_optimizer::solver::diagnostics;
use tracing::info;

use crate::file_utils::{read_problem, write_json};

#[derive(Args)]
pub struct CheckArgs {
    /// The problem file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Writes the diagnostics as JSON
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let input = read_problem(&args.input)?;
    let client = TravelMatrixClient::default();
    let problem = input.build_problem(&client).await?;

    let diagnostics = diagnostics::diagnose(&problem);
    diagnostics.log();

    if diagnostics.has_blocking_issues() {
        info!("Some stops cannot be served whatever the order");
    } else {
        info!("No blocking issue found");
    }

    if let Some(out) = args.out {
        write_json(&out, &diagnostics)?;
    }

    Ok(())
}
