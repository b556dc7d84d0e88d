use crate::commands::{run_refresh_articles, run_send_reminders};
use crate::seed::{run_seed, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tinysteps::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TinySteps",
    about = "Run the TinySteps API and its maintenance jobs from the command line",
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
    /// Turn tomorrow's calendar events into reminder notifications
    SendReminders(ReminderArgs),
    /// Pull fresh parenting and nutrition articles from the news source
    RefreshArticles(RefreshArgs),
    /// Fill the store with demo parents, children and forum threads
    Seed(SeedArgs),
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

#[derive(Args, Debug)]
pub(crate) struct ReminderArgs {
    /// Number of days in advance to remind about (at most 3650)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(0..=3650))]
    pub(crate) days: u32,
    /// Count the reminders without writing any notification
    #[arg(long)]
    pub(crate) dry_run: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RefreshArgs {
    /// Single topic keyword (sleep, solids, safety, ...); both default feeds when omitted
    #[arg(long)]
    pub(crate) topic: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::SendReminders(args) => run_send_reminders(args),
        Command::RefreshArticles(args) => run_refresh_articles(args).await,
        Command::Seed(args) => run_seed(args),
    }
}
