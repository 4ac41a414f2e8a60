//! Groups command implementation.

use super::Format;
use crate::error::CliResult;
use crate::model::TestClass;
use northwind_core::Service;
use serde::Serialize;

/// Description of one registered group.
#[derive(Debug, Serialize)]
pub struct GroupInfo {
    /// Group name.
    pub name: String,
    /// Entity type.
    pub entity: String,
    /// Backing collection.
    pub collection: String,
    /// Declared index names.
    pub indexes: Vec<String>,
    /// Whether field encryption is on.
    pub encrypted: bool,
}

/// Collects the registered groups.
pub fn collect(service: &Service<TestClass>) -> CliResult<Vec<GroupInfo>> {
    let encrypted = service.group()?.encryption().is_enabled();
    Ok(service
        .registry()
        .all()
        .into_iter()
        .map(|g| GroupInfo {
            name: g.name().to_string(),
            entity: g.entity_type().to_string(),
            collection: g.collection_name().to_string(),
            indexes: g.index_names(),
            encrypted,
        })
        .collect())
}

/// Runs the groups command.
pub fn run(service: &Service<TestClass>, format: Format) -> CliResult<()> {
    let groups = collect(service)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
        Format::Text => {
            for g in &groups {
                println!("{} ({}) -> {}", g.name, g.entity, g.collection);
                println!("  indexes:   {}", g.indexes.join(", "));
                println!("  encrypted: {}", g.encrypted);
            }
        }
    }
    Ok(())
}
