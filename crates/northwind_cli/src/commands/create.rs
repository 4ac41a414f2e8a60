//! Create command implementation.

use crate::error::CliResult;
use crate::model::TestClass;
use northwind_core::{OperationResult, Service};

/// Runs the create command.
pub fn run(
    service: &Service<TestClass>,
    id: i64,
    name: String,
) -> CliResult<OperationResult<TestClass>> {
    Ok(service.create(&TestClass { id, name })?)
}
