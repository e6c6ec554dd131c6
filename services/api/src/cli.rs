use crate::demo::{run_demo, run_overview, DemoArgs, OverviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rentbook::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rentbook",
    about = "Run and inspect the rental portfolio service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect a rental portfolio from the command line
    Rentals {
        #[command(subcommand)]
        command: RentalsCommand,
    },
    /// Run a seeded end-to-end walkthrough of the rental lifecycle
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RentalsCommand {
    /// Print the rentals overview for a seeded sample portfolio
    Overview(OverviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rentals {
            command: RentalsCommand::Overview(args),
        } => run_overview(args),
        Command::Demo(args) => run_demo(args),
    }
}
