use crate::console::{run_questions, run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use portal_familia::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Portal da Família",
    about = "Serve the Dignômetro API or score questionnaires from the command line",
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
    /// Print the Dignômetro questionnaire in step order
    Questions,
    /// Score a set of answers without storing them
    Score(ScoreArgs),
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
        Command::Questions => {
            run_questions();
            Ok(())
        }
        Command::Score(args) => run_score(args),
    }
}
