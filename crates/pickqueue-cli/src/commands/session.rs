//! Chat-style session
//!
//! Reads one message per line from stdin. Lines that start with the prefix
//! (`!` by default) are commands; everything else is chatter and ignored, as
//! are unknown commands. Replies go to stdout, separated by a blank line.

use clap::Args;
use pickqueue_engine::commands::engine_command::EngineCommand;
use pickqueue_engine::commands::engine_query::EngineQuery;
use std::io::{self, BufRead, Write};

use super::{render, CliResult, Context};

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Command prefix
    #[arg(long, default_value = "!")]
    pub prefix: String,
}

/// A recognised command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Add(String),
    Remove(String),
    Next,
    Defer(String),
    Queue,
    Stats(Option<String>),
    History(Option<i64>),
    Help(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Request(Request),
    /// Known command, bad or missing argument
    Hint(String),
    Ignored,
}

struct HelpEntry {
    name: &'static str,
    usage: &'static str,
    description: &'static str,
    examples: &'static [&'static str],
}

const HELP: &[HelpEntry] = &[
    HelpEntry {
        name: "add",
        usage: "add [member name]",
        description: "Add a new member to the end of the queue",
        examples: &["add Sarah Johnson", "add Bob"],
    },
    HelpEntry {
        name: "remove",
        usage: "remove [member name]",
        description: "Remove a member from the queue and adjust positions",
        examples: &["remove Sarah Johnson", "remove Bob"],
    },
    HelpEntry {
        name: "queue",
        usage: "queue",
        description: "Display the current queue",
        examples: &["queue"],
    },
    HelpEntry {
        name: "next",
        usage: "next",
        description: "Advance the queue - current picker moves to end, next person becomes current picker",
        examples: &["next"],
    },
    HelpEntry {
        name: "defer",
        usage: "defer [current picker name]",
        description: "Let the current picker pass their turn. With 2 members they swap, with 3 they move to the end, otherwise they move back one position",
        examples: &["defer Alice", "defer Bob Johnson"],
    },
    HelpEntry {
        name: "history",
        usage: "history [limit]",
        description: "Show recent queue activity (default: 10 entries, max: 50)",
        examples: &["history", "history 20"],
    },
    HelpEntry {
        name: "stats",
        usage: "stats [member name]",
        description: "Show queue statistics or specific member information",
        examples: &["stats", "stats Sarah Johnson"],
    },
];

/// Classify one input line
pub fn parse_line(line: &str, prefix: &str) -> Parsed {
    let Some(body) = line.trim().strip_prefix(prefix) else {
        return Parsed::Ignored;
    };
    let (word, rest) = match body.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (body, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());
    let needs_name = |hint: &str, build: fn(String) -> Request| match &arg {
        Some(name) => Parsed::Request(build(name.clone())),
        None => Parsed::Hint(hint.replace("{p}", prefix)),
    };

    match word.to_lowercase().as_str() {
        "add" => needs_name(
            "I need a name to add to the queue!\nUsage: {p}add [member name]\nExample: {p}add Sarah Johnson",
            Request::Add,
        ),
        "remove" => needs_name(
            "I need a name to remove from the queue!\nUsage: {p}remove [member name]\nExample: {p}remove David",
            Request::Remove,
        ),
        "defer" => needs_name(
            "I need to know who is deferring their turn!\nUsage: {p}defer [current picker name]\nExample: {p}defer Alice\nNote: Only the current picker can defer their turn.",
            Request::Defer,
        ),
        "next" => Parsed::Request(Request::Next),
        "queue" => Parsed::Request(Request::Queue),
        "stats" => Parsed::Request(Request::Stats(arg)),
        "history" => match arg.as_deref().map(str::parse::<i64>) {
            None => Parsed::Request(Request::History(None)),
            Some(Ok(n)) => Parsed::Request(Request::History(Some(n))),
            Some(Err(_)) => Parsed::Hint(format!(
                "Please provide a valid number for history limit.\nExample: {}history 15",
                prefix
            )),
        },
        "help" => Parsed::Request(Request::Help(arg.map(|a| a.to_lowercase()))),
        _ => Parsed::Ignored,
    }
}

/// Help text for all commands, or one
pub fn help_text(command: Option<&str>, prefix: &str) -> String {
    match command {
        None => {
            let mut lines = vec!["Commands:".to_string()];
            for entry in HELP {
                lines.push(format!("  {}{} - {}", prefix, entry.usage, entry.description));
            }
            lines.push(format!(
                "  {}help [command] - Get detailed help for one command",
                prefix
            ));
            lines.join("\n")
        }
        Some(name) => match HELP.iter().find(|e| e.name == name) {
            Some(entry) => {
                let mut lines = vec![
                    format!("Help: {}", entry.name),
                    format!("Usage: {}{}", prefix, entry.usage),
                    entry.description.to_string(),
                    "Examples:".to_string(),
                ];
                lines.extend(entry.examples.iter().map(|ex| format!("  {}{}", prefix, ex)));
                lines.join("\n")
            }
            None => format!(
                "I don't have help information for `{}`.\nUse `{}help` to see all available commands.",
                name, prefix
            ),
        },
    }
}

fn respond(ctx: &mut Context, request: Request, prefix: &str) -> String {
    let reply = match request {
        Request::Add(name) => ctx.command(EngineCommand::AddMember { name }),
        Request::Remove(name) => ctx.command(EngineCommand::RemoveMember { name }),
        Request::Next => ctx.command(EngineCommand::AdvanceQueue),
        Request::Defer(name) => ctx.command(EngineCommand::DeferTurn { name }),
        Request::Queue => ctx.query(EngineQuery::Queue),
        Request::Stats(name) => ctx.query(EngineQuery::Stats { name }),
        Request::History(limit) => ctx.query(EngineQuery::History { limit }),
        Request::Help(command) => Ok(help_text(command.as_deref(), prefix)),
    };
    reply.unwrap_or_else(|e| render::error(&e))
}

/// Run a session over arbitrary input and output
///
/// # Errors
///
/// Only I/O errors on `input` or `out`; engine failures become replies.
pub fn run<R: BufRead, W: Write>(
    ctx: &mut Context,
    prefix: &str,
    input: R,
    mut out: W,
) -> io::Result<()> {
    let details = format!("prefix {:?}", prefix);
    match ctx.command(EngineCommand::RecordStartup {
        details: Some(details),
    }) {
        Ok(_) => writeln!(
            out,
            "pickqueue session ready. Type {}help for commands.\n",
            prefix
        )?,
        Err(e) => writeln!(out, "{}\n", render::error(&e))?,
    }

    for line in input.lines() {
        let line = line?;
        let reply = match parse_line(&line, prefix) {
            Parsed::Ignored => continue,
            Parsed::Hint(hint) => hint,
            Parsed::Request(request) => {
                tracing::debug!(?request, "session command");
                respond(ctx, request, prefix)
            }
        };
        writeln!(out, "{}\n", reply)?;
        out.flush()?;
    }
    Ok(())
}

pub fn execute(ctx: &mut Context, args: SessionArgs) -> CliResult {
    let stdin = io::stdin();
    run(ctx, &args.prefix, stdin.lock(), io::stdout().lock())?;
    Ok(())
}
