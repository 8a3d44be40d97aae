//! Subcommand handlers and the shared engine context

pub mod query;
pub mod queue;
pub mod render;
pub mod session;

use pickqueue_core::errors::ExError;
use pickqueue_core::SystemClock;
use pickqueue_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineOptions,
};
use pickqueue_engine::commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
use rusqlite::Connection;
use std::path::Path;

/// Result type for subcommand handlers
pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// An open queue database plus the engine settings for this invocation
pub struct Context {
    conn: Connection,
    clock: SystemClock,
    options: EngineOptions,
}

impl Context {
    pub fn open(db: &Path, options: EngineOptions) -> Result<Self, ExError> {
        Ok(Self {
            conn: pickqueue_store::db::open(db)?,
            clock: SystemClock,
            options,
        })
    }

    /// Apply a command and render its reply.
    ///
    /// Commands that move members are followed by the updated queue. Once
    /// the command has committed its reply is always returned, even if the
    /// queue cannot be re-read.
    pub fn command(&mut self, cmd: EngineCommand) -> Result<String, ExError> {
        let shows_queue = !matches!(cmd, EngineCommand::RecordStartup { .. });
        let result = apply_engine_command(cmd, &mut self.conn, &self.clock, self.options)?;

        let text = render::command_result(&result);
        if !shows_queue {
            return Ok(text);
        }
        Ok(with_queue(text, self.query(EngineQuery::Queue)))
    }

    /// Run a query and render the result
    pub fn query(&self, query: EngineQuery) -> Result<String, ExError> {
        Ok(match apply_engine_query(query, &self.conn, &self.clock)? {
            EngineQueryResult::Queue(entries) => render::queue_view(&entries),
            EngineQueryResult::MemberStats(stats) => render::member_stats(&stats),
            EngineQueryResult::GlobalStats(stats) => render::global_stats(&stats),
            EngineQueryResult::History(entries) => render::history(&entries),
        })
    }
}

/// Append the rendered queue to a committed command's reply
fn with_queue(mut text: String, queue: Result<String, ExError>) -> String {
    match queue {
        Ok(view) => {
            text.push_str("\n\n");
            text.push_str(&view);
        }
        Err(e) => tracing::warn!(err_code = e.code(), "queue view after command failed: {}", e),
    }
    text
}

/// Print a rendered reply, or turn an engine error into the CLI error
pub(crate) fn emit(reply: Result<String, ExError>) -> CliResult {
    match reply {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => Err(render::error(&e).into()),
    }
}
