pub mod engine_command;
pub mod engine_query;
pub mod queue_ops;
pub mod read_tools;
