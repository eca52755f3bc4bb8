use std::path::PathBuf;

use clap::Args;
use roundtrip_matrix::travel_matrix_client::TravelMatrixClient;
use tracing::{info, warn};

use crate::file_utils::read_problem;

#[derive(Args)]
pub struct GetMatrixArgs {
    /// The problem file
    #[arg(short = 'i', long)]
    input: PathBuf,
}

pub async fn run(args: GetMatrixArgs) -> anyhow::Result<()> {
    let problem = read_problem(&args.input)?;
    let client = TravelMatrixClient::default();

    let locations = problem.locations();
    let fetched = client
        .fetch_matrix(&locations, &problem.matrix_provider)
        .await?;

    if fetched.degraded {
        warn!("Routing service unavailable, great-circle estimates are not cached");
    }

    info!(
        "Matrix ready for {} locations",
        fetched.matrices.num_locations()
    );

    Ok(())
}
