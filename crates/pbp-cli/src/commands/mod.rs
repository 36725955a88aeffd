//! CLI subcommand implementations.

pub mod halfgames;
pub mod parse;
pub mod status;
