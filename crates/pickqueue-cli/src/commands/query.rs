//! Read-only subcommands: queue, stats, history

use clap::Args;
use pickqueue_engine::commands::engine_query::EngineQuery;

use super::{emit, CliResult, Context};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Member name; omit for queue-wide stats
    pub name: Vec<String>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of entries (clamped to 1..=50)
    #[arg(long, short, allow_hyphen_values = true)]
    pub limit: Option<i64>,
}

pub fn queue(ctx: &Context) -> CliResult {
    emit(ctx.query(EngineQuery::Queue))
}

pub fn stats(ctx: &Context, args: StatsArgs) -> CliResult {
    let name = (!args.name.is_empty()).then(|| args.name.join(" "));
    emit(ctx.query(EngineQuery::Stats { name }))
}

pub fn history(ctx: &Context, args: HistoryArgs) -> CliResult {
    emit(ctx.query(EngineQuery::History { limit: args.limit }))
}
