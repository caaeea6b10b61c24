//! CLI subcommand implementations.

pub mod contents;
pub mod embeds;
pub mod events;
pub mod schemas;
pub mod translate;
