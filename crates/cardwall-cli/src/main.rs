#![forbid(unsafe_code)]

mod cmd;
mod output;
mod session;

use cardwall_core::config::Overrides;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use session::Session;
use std::env;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cw: Kanban boards for tracker services",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (pretty, text, json). Overrides --json and FORMAT.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Tracker API base URL (overrides CARDWALL_API_URL and config).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Bearer token (overrides CARDWALL_TOKEN and config).
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Show a service's board",
        long_about = "Show the cards of a service grouped into Backlog, In Progress and Done, with completion stats.",
        after_help = "EXAMPLES:\n    # Show the whole board\n    cw board svc-123\n\n    # Only the in-progress column\n    cw board svc-123 --column work\n\n    # Emit machine-readable output\n    cw board svc-123 --json"
    )]
    Board(cmd::board::BoardArgs),

    #[command(
        next_help_heading = "Cards",
        about = "Create a card",
        long_about = "Create a card at the bottom of a column. Requires chief, manager, resource or admin.",
        after_help = "EXAMPLES:\n    # Create in the backlog\n    cw create svc-123 --title \"Fix login timeout\"\n\n    # Tagged, high priority, straight into progress\n    cw create svc-123 -t \"Ship v2\" --column work --tag release --priority high"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Cards",
        about = "Edit a card",
        long_about = "Change a card's fields. Changing --column moves it to the bottom of that column. Requires chief or admin.",
        after_help = "EXAMPLES:\n    # Rename\n    cw edit svc-123 t-9 --title \"Fix login timeout\"\n\n    # Replace tags and reassign\n    cw edit svc-123 t-9 --tag backend,auth --assign u-4"
    )]
    Edit(cmd::edit::EditArgs),

    #[command(
        name = "move",
        next_help_heading = "Cards",
        about = "Move a card to another column",
        long_about = "Move a card to the bottom of another column and renumber both columns.",
        after_help = "EXAMPLES:\n    # Start work\n    cw move svc-123 t-9 work\n\n    # Finish\n    cw move svc-123 t-9 done"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(
        next_help_heading = "Cards",
        about = "Delete a card",
        long_about = "Delete a card and close the gap in its column. Requires chief or admin.",
        after_help = "EXAMPLES:\n    cw delete svc-123 t-9"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Read",
        about = "Completion stats for services",
        long_about = "Per-service card counts and completion rate, plus a rollup across all given services.",
        after_help = "EXAMPLES:\n    # One service\n    cw stats svc-123\n\n    # A whole project\n    cw stats svc-1 svc-2 svc-3 --at-risk-below 60"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the identity behind the token",
        after_help = "EXAMPLES:\n    cw whoami\n\n    # Include your tier on a service\n    cw whoami --service svc-123"
    )]
    Whoami(cmd::whoami::WhoamiArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    cw completions zsh > ~/.zfunc/_cw"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CARDWALL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cardwall=debug,info"
        } else {
            "cardwall=info,warn"
        })
    });

    let format = env::var("CARDWALL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if output::is_rendered(&err) => {
            debug!(error = %format!("{err:#}"), "command failed");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return cmd::completions::run_completions(args.shell, &mut Cli::command());
    }

    let project_root = env::current_dir()?;
    let settings = match session::load_settings(&project_root, &cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            let mode = resolve_output_mode(cli.format, cli.json, None);
            render_error(mode, &CliError::new(format!("{e:#}")))?;
            return Err(output::rendered(e));
        }
    };
    let output = resolve_output_mode(cli.format, cli.json, settings.output.as_deref());
    debug!(?output, base_url = ?settings.base_url, "resolved settings");

    let session = Session::new(settings, output);
    match &cli.command {
        Commands::Board(args) => cmd::board::run_board(args, &session),
        Commands::Create(args) => cmd::create::run_create(args, &session),
        Commands::Edit(args) => cmd::edit::run_edit(args, &session),
        Commands::Move(args) => cmd::move_cmd::run_move(args, &session),
        Commands::Delete(args) => cmd::delete::run_delete(args, &session),
        Commands::Stats(args) => cmd::stats::run_stats(args, &session),
        Commands::Whoami(args) => cmd::whoami::run_whoami(args, &session),
        Commands::Completions(_) => Ok(()),
    }
}
