use clap::{Parser, Subcommand};

use crate::{
    check::CheckArgs, generate::GenerateSubcommands, get_matrix::GetMatrixArgs,
    optimize::OptimizeArgs,
};

mod check;
mod file_utils;
mod generate;
mod get_matrix;
mod optimize;
mod parsers;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds the best route for a problem file
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Fetches the travel matrix of a problem file into the cache
    GetMatrix {
        #[command(flatten)]
        args: GetMatrixArgs,
    },
    /// Reports constraints that cannot hold before solving
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Optimize { args } => optimize::run(args).await?,
        Commands::GetMatrix { args } => get_matrix::run(args).await?,
        Commands::Check { args } => check::run(args).await?,
        Commands::Generate { commands } => generate::run(commands)?,
    }

    Ok(())
}
