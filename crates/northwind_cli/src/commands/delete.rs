//! Delete command implementation.

use crate::error::CliResult;
use crate::model::TestClass;
use northwind_core::{OperationResult, Service};

/// Runs the delete command.
pub fn run(service: &Service<TestClass>, id: i64) -> CliResult<OperationResult<TestClass>> {
    Ok(service.delete_by_id(id)?)
}
