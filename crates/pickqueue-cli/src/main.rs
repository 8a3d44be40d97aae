//! pickqueue CLI
//!
//! Command-line front end for a turn-taking pick queue

use clap::{Parser, Subcommand, ValueEnum};
use pickqueue_core::logging_facility::{self, Profile};
use pickqueue_engine::commands::engine_command::{EngineOptions, RemovalHandoff};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pickqueue")]
#[command(about = "pickqueue - take turns picking, one member at a time", long_about = None)]
struct Cli {
    /// Queue database file (created on first use)
    #[arg(
        long,
        global = true,
        env = "PICKQUEUE_DB",
        default_value = ".pickqueue/queue.db"
    )]
    db: PathBuf,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    /// Do not stamp the member who moves up when the current picker is removed
    #[arg(long, global = true)]
    legacy_handoff: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a member to the end of the queue
    Add(commands::queue::NameArgs),
    /// Remove a member and close the gap
    Remove(commands::queue::NameArgs),
    /// Current picker finished; advance the queue
    Next,
    /// Current picker passes their turn
    Defer(commands::queue::NameArgs),
    /// Show the queue
    Queue,
    /// Show queue statistics, or one member's
    Stats(commands::query::StatsArgs),
    /// Show recent activity
    History(commands::query::HistoryArgs),
    /// Read chat-style commands (`!add Sarah`) from stdin
    Session(commands::session::SessionArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Human => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let options = EngineOptions {
        removal_handoff: if cli.legacy_handoff {
            RemovalHandoff::LeaveUnstamped
        } else {
            RemovalHandoff::StampSuccessor
        },
    };

    let mut ctx = match commands::Context::open(&cli.db, options) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", commands::render::error(&e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Add(args) => commands::queue::add(&mut ctx, args),
        Commands::Remove(args) => commands::queue::remove(&mut ctx, args),
        Commands::Next => commands::queue::next(&mut ctx),
        Commands::Defer(args) => commands::queue::defer(&mut ctx, args),
        Commands::Queue => commands::query::queue(&ctx),
        Commands::Stats(args) => commands::query::stats(&ctx, args),
        Commands::History(args) => commands::query::history(&ctx, args),
        Commands::Session(args) => commands::session::execute(&mut ctx, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
