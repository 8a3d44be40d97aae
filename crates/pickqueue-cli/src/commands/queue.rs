//! Queue mutation subcommands: add, remove, next, defer

use clap::Args;
use pickqueue_engine::commands::engine_command::EngineCommand;

use super::{emit, CliResult, Context};

#[derive(Debug, Args)]
pub struct NameArgs {
    /// Member name; several words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

impl NameArgs {
    fn joined(&self) -> String {
        self.name.join(" ")
    }
}

pub fn add(ctx: &mut Context, args: NameArgs) -> CliResult {
    emit(ctx.command(EngineCommand::AddMember {
        name: args.joined(),
    }))
}

pub fn remove(ctx: &mut Context, args: NameArgs) -> CliResult {
    emit(ctx.command(EngineCommand::RemoveMember {
        name: args.joined(),
    }))
}

pub fn next(ctx: &mut Context) -> CliResult {
    emit(ctx.command(EngineCommand::AdvanceQueue))
}

pub fn defer(ctx: &mut Context, args: NameArgs) -> CliResult {
    emit(ctx.command(EngineCommand::DeferTurn {
        name: args.joined(),
    }))
}
