use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inbox_cli::cli::{
    handle_connectors, handle_feed, handle_senders, handle_show, load_state, CliConfig, FilterArgs, ReplSession,
};
use inbox_core::tracing_setup::init_tracing_with_default;

#[derive(Parser)]
#[command(name = "inbox-cli")]
#[command(about = "Unified mentions inbox for chat, email and issue trackers")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    /// Path to JSON config file (fixturesPath, archiveSnoozeHours, defaultFilters, ...)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// JSON fixture file to load instead of the built-in sample inbox
    #[arg(long, short = 'f', global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the filtered, sorted and thread-grouped feed
    Feed {
        /// Only these sources (chat, email, issue_tracker); repeatable
        #[arg(long = "source", short = 's')]
        sources: Vec<String>,
        /// Only these kinds (mention, assignment, thread_response); repeatable
        #[arg(long = "kind", short = 'k')]
        kinds: Vec<String>,
        /// Only these sender names; repeatable
        #[arg(long = "user", short = 'u')]
        users: Vec<String>,
        /// today, week, month or all
        #[arg(long)]
        time_range: Option<String>,
        /// recency, priority or manual
        #[arg(long)]
        sort_by: Option<String>,
        /// Hide items whose connector is disabled
        #[arg(long)]
        hide_disabled: bool,
        /// Print the feed as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show one mention in detail
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// List unique sender names
    Senders {
        #[arg(long)]
        json: bool,
    },

    /// List connectors and their priorities
    Connectors {
        #[arg(long)]
        json: bool,
    },

    /// Interactive triage session (changes are kept in memory only)
    Repl,
}

fn main() {
    init_tracing_with_default("warn");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        eprintln!("No command specified. Use --help for usage.");
        std::process::exit(1);
    };

    let config = CliConfig::resolve(cli.config.as_deref())?;
    let mut state = load_state(&config, cli.fixtures.as_deref())?;

    let lines = match command {
        Commands::Feed {
            sources,
            kinds,
            users,
            time_range,
            sort_by,
            hide_disabled,
            json,
        } => {
            let args = FilterArgs {
                sources,
                kinds,
                users,
                time_range,
                sort_by,
                hide_disabled,
            };
            handle_feed(&mut state, &args, json, cli.pretty)?
        }
        Commands::Show { id, json } => handle_show(&state, &id, json, cli.pretty)?,
        Commands::Senders { json } => handle_senders(&state, json, cli.pretty)?,
        Commands::Connectors { json } => handle_connectors(&state, json, cli.pretty)?,
        Commands::Repl => {
            let stdin = io::stdin();
            return ReplSession::new(state).run(stdin.lock(), io::stdout());
        }
    };

    let mut out = BufWriter::new(io::stdout().lock());
    for line in lines {
        writeln!(out, "{}", line).context("Failed to write output")?;
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}
