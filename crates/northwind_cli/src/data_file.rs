//! JSON-file persistence for the in-memory store.

use crate::error::CliResult;
use northwind_codec::Document;
use northwind_store::InMemoryStore;
use std::fs;
use std::path::Path;

/// Loads a store from `path`; a missing file yields an empty store.
pub fn load(path: &Path, collection: &str) -> CliResult<InMemoryStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "data file missing; starting empty");
        return Ok(InMemoryStore::new(collection));
    }
    let text = fs::read_to_string(path)?;
    let documents: Vec<Document> = if text.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&text)?
    };
    tracing::debug!(path = %path.display(), count = documents.len(), "data file loaded");
    Ok(InMemoryStore::with_documents(collection, documents))
}

/// Writes every document of `store` to `path`, replacing it atomically.
pub fn save(path: &Path, store: &InMemoryStore) -> CliResult<()> {
    let json = serde_json::to_string_pretty(&store.documents())?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), count = store.len(), "data file saved");
    Ok(())
}
