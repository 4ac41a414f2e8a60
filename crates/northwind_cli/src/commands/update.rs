//! Update command implementation.

use crate::error::CliResult;
use crate::model::{name_field, TestClass};
use northwind_core::{OperationResult, Service};

/// Runs the update command: renames the record with the given id.
pub fn run(
    service: &Service<TestClass>,
    id: i64,
    new_name: String,
) -> CliResult<OperationResult<TestClass>> {
    Ok(service
        .update_query()
        .filter(move |t: &TestClass| t.id == id)
        .set(name_field(), new_name)
        .execute()?)
}
