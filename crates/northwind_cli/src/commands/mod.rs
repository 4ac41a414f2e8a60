//! CLI command implementations.

pub mod create;
pub mod delete;
pub mod groups;
pub mod read;
pub mod update;

use crate::error::CliResult;
use crate::model::TestClass;
use northwind_core::OperationResult;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable lines.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Prints an operation result.
pub fn print_result(result: &OperationResult<TestClass>, format: Format) -> CliResult<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(result)?),
        Format::Text => {
            println!("{}: {}", result.status_code, result.message);
            if let Some(entity) = &result.new_data {
                println!("  Id={} Name={}", entity.id, entity.name);
            }
        }
    }
    Ok(())
}
