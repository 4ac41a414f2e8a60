//! Read command implementation.

use crate::error::CliResult;
use crate::model::TestClass;
use northwind_core::Service;

/// Runs the read command: every record matching all given conditions.
///
/// With no conditions every record is returned. Conditions see decrypted
/// values; records that do not decrypt under the given password are skipped.
pub fn run(
    service: &Service<TestClass>,
    id: Option<i64>,
    name: Option<String>,
) -> CliResult<Vec<TestClass>> {
    let mut query = service.query();
    if let Some(id) = id {
        query = query.filter(move |t: &TestClass| t.id == id);
    }
    if let Some(name) = name {
        query = query.filter(move |t: &TestClass| t.name == name);
    }
    Ok(query.to_list()?)
}
