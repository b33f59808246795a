pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, DetectArgs, SmokeArgs, StructureArgs, TagsArgs, TestArgs};
pub use output::{OutputFormat, OutputFormatter};
