//! In-memory document store.

use crate::backend::Store;
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::index::IndexModel;
use crate::session::Session;
use crate::update::UpdateSpec;
use northwind_codec::{Document, Value};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use uuid::Uuid;

/// An in-memory document collection.
///
/// This store is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral data that doesn't need a database server
///
/// Unique indexes are enforced on every write, and transactional inserts are
/// staged per session until commit, so it behaves like a real collection for
/// the operations Northwind issues.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use northwind_codec::Document;
/// use northwind_store::{Filter, InMemoryStore, Store};
///
/// let store = InMemoryStore::new("people");
/// store.insert_one(Document::new().with("Name", "x"), None).unwrap();
/// assert!(store.find_one(&Filter::eq("Name", "x")).unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    name: String,
    documents: RwLock<Vec<Document>>,
    indexes: RwLock<Vec<IndexModel>>,
    sessions: Mutex<HashMap<Uuid, Vec<Document>>>,
}

impl InMemoryStore {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a collection with pre-existing documents.
    ///
    /// No indexes exist yet, so the documents are not checked for uniqueness
    /// until an index is created over them.
    #[must_use]
    pub fn with_documents(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(documents),
            ..Self::default()
        }
    }

    /// Returns a copy of all committed documents.
    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.documents.read().clone()
    }

    /// Returns the index models created so far.
    #[must_use]
    pub fn indexes(&self) -> Vec<IndexModel> {
        self.indexes.read().clone()
    }

    /// Number of committed documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if no documents are committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Number of sessions that are still open.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.sessions.lock().len()
    }
}

fn key_of<'a>(doc: &'a Document, key: &str) -> &'a Value {
    doc.get(key).unwrap_or(&Value::Null)
}

/// Fails if `candidate` collides with any document in `existing` (other than
/// the one at `skip`) on a unique index.
fn check_unique(
    indexes: &[IndexModel],
    candidate: &Document,
    existing: &[Document],
    skip: Option<usize>,
) -> StoreResult<()> {
    for index in indexes.iter().filter(|i| i.unique) {
        let value = key_of(candidate, &index.key);
        let clash = existing
            .iter()
            .enumerate()
            .filter(|(pos, _)| Some(*pos) != skip)
            .any(|(_, doc)| key_of(doc, &index.key) == value);
        if clash {
            return Err(StoreError::duplicate_key(
                &index.name,
                format!("{}: {:?}", index.key, value),
            ));
        }
    }
    Ok(())
}

impl InMemoryStore {
    fn update_at(
        &self,
        filter: &Filter,
        update: &UpdateSpec,
    ) -> StoreResult<Option<(Document, Document)>> {
        let indexes = self.indexes.read();
        let mut docs = self.documents.write();

        let Some(pos) = docs.iter().position(|d| filter.matches(d)) else {
            return Ok(None);
        };

        let before = docs[pos].clone();
        let mut after = before.clone();
        update.apply(&mut after);
        check_unique(&indexes, &after, &docs, Some(pos))?;

        docs[pos] = after.clone();
        Ok(Some((before, after)))
    }
}

impl Store for InMemoryStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self
            .documents
            .read()
            .iter()
            .find(|d| filter.matches(d))
            .cloned())
    }

    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        Ok(self
            .documents
            .read()
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    fn insert_one(&self, doc: Document, session: Option<&Session>) -> StoreResult<()> {
        let indexes = self.indexes.read();

        match session {
            Some(session) => {
                let mut sessions = self.sessions.lock();
                let staged = sessions
                    .get_mut(&session.id())
                    .ok_or(StoreError::SessionNotFound(session.id()))?;
                check_unique(&indexes, &doc, &self.documents.read(), None)?;
                check_unique(&indexes, &doc, staged, None)?;
                staged.push(doc);
            }
            None => {
                let mut docs = self.documents.write();
                check_unique(&indexes, &doc, &docs, None)?;
                docs.push(doc);
            }
        }
        Ok(())
    }

    fn update_one(&self, filter: &Filter, update: &UpdateSpec) -> StoreResult<u64> {
        Ok(u64::from(self.update_at(filter, update)?.is_some()))
    }

    fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &UpdateSpec,
        return_after: bool,
    ) -> StoreResult<Option<Document>> {
        Ok(self
            .update_at(filter, update)?
            .map(|(before, after)| if return_after { after } else { before }))
    }

    fn delete_one(&self, filter: &Filter) -> StoreResult<u64> {
        let mut docs = self.documents.write();
        match docs.iter().position(|d| filter.matches(d)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn list_indexes(&self) -> StoreResult<Vec<String>> {
        Ok(self.indexes.read().iter().map(|i| i.name.clone()).collect())
    }

    fn create_indexes(&self, models: &[IndexModel]) -> StoreResult<()> {
        let mut indexes = self.indexes.write();
        let docs = self.documents.read();

        // Validate everything before adding anything.
        for model in models.iter().filter(|m| m.unique) {
            for (pos, doc) in docs.iter().enumerate() {
                check_unique(std::slice::from_ref(model), doc, &docs[..pos], None)?;
            }
        }

        for model in models {
            if !indexes.iter().any(|i| i.name == model.name) {
                indexes.push(model.clone());
            }
        }
        Ok(())
    }

    fn start_session(&self) -> StoreResult<Session> {
        let session = Session::new();
        self.sessions.lock().insert(session.id(), Vec::new());
        Ok(session)
    }

    fn commit_transaction(&self, session: Session) -> StoreResult<()> {
        let staged = self
            .sessions
            .lock()
            .remove(&session.id())
            .ok_or(StoreError::SessionNotFound(session.id()))?;

        let indexes = self.indexes.read();
        let mut docs = self.documents.write();

        // Another writer may have committed a colliding key since staging.
        for (pos, doc) in staged.iter().enumerate() {
            check_unique(&indexes, doc, &docs, None)?;
            check_unique(&indexes, doc, &staged[..pos], None)?;
        }

        docs.extend(staged);
        Ok(())
    }

    fn abort_transaction(&self, session: Session) -> StoreResult<()> {
        self.sessions
            .lock()
            .remove(&session.id())
            .map(|_| ())
            .ok_or(StoreError::SessionNotFound(session.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: i64, name: &str) -> Document {
        Document::new().with("Id", id).with("Name", name)
    }

    fn unique_name_store() -> InMemoryStore {
        let store = InMemoryStore::new("people");
        store
            .create_indexes(&[IndexModel::new("Name_1", "Name").unique(true)])
            .unwrap();
        store
    }

    #[test]
    fn memory_new_is_empty() {
        let store = InMemoryStore::new("people");
        assert!(store.is_empty());
        assert_eq!(store.collection_name(), "people");
        assert!(store.list_indexes().unwrap().is_empty());
    }

    #[test]
    fn insert_and_find() {
        let store = InMemoryStore::new("people");
        store.insert_one(person(1, "x"), None).unwrap();
        store.insert_one(person(2, "y"), None).unwrap();

        let found = store.find_one(&Filter::eq("Id", 2i64)).unwrap();
        assert_eq!(found, Some(person(2, "y")));
        assert_eq!(store.find(&Filter::new(|_| true)).unwrap().len(), 2);
    }

    #[test]
    fn unique_index_rejects_duplicate_insert() {
        let store = unique_name_store();
        store.insert_one(person(1, "x"), None).unwrap();

        let err = store.insert_one(person(2, "x"), None).unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn non_unique_index_allows_duplicates() {
        let store = InMemoryStore::new("people");
        store
            .create_indexes(&[IndexModel::new("Name_1", "Name")])
            .unwrap();
        store.insert_one(person(1, "x"), None).unwrap();
        store.insert_one(person(2, "x"), None).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn create_unique_index_over_duplicates_fails() {
        let store = InMemoryStore::with_documents("people", vec![person(1, "x"), person(2, "x")]);
        let result = store.create_indexes(&[IndexModel::new("Name_1", "Name").unique(true)]);
        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
        assert!(store.list_indexes().unwrap().is_empty());
    }

    #[test]
    fn create_indexes_is_idempotent_by_name() {
        let store = InMemoryStore::new("people");
        let model = IndexModel::new("Name_1", "Name");
        store.create_indexes(&[model.clone()]).unwrap();
        store.create_indexes(&[model]).unwrap();
        assert_eq!(store.list_indexes().unwrap(), vec!["Name_1".to_string()]);
    }

    #[test]
    fn update_one_reports_matched_count() {
        let store = InMemoryStore::new("people");
        store.insert_one(person(1, "x"), None).unwrap();

        let update = UpdateSpec::new().set("Name", "y");
        assert_eq!(store.update_one(&Filter::eq("Id", 1i64), &update).unwrap(), 1);
        assert_eq!(store.update_one(&Filter::eq("Id", 9i64), &update).unwrap(), 0);
        assert_eq!(
            store.find_one(&Filter::eq("Id", 1i64)).unwrap(),
            Some(person(1, "y"))
        );
    }

    #[test]
    fn update_into_unique_collision_fails() {
        let store = unique_name_store();
        store.insert_one(person(1, "x"), None).unwrap();
        store.insert_one(person(2, "y"), None).unwrap();

        let update = UpdateSpec::new().set("Name", "x");
        let err = store.update_one(&Filter::eq("Id", 2i64), &update).unwrap_err();
        assert!(err.is_duplicate_key());

        // Re-setting a document's own value is not a collision.
        assert_eq!(store.update_one(&Filter::eq("Id", 1i64), &update).unwrap(), 1);
    }

    #[test]
    fn find_one_and_update_returns_requested_image() {
        let store = InMemoryStore::new("people");
        store.insert_one(person(1, "x"), None).unwrap();

        let before = store
            .find_one_and_update(&Filter::eq("Id", 1i64), &UpdateSpec::new().set("Name", "y"), false)
            .unwrap();
        assert_eq!(before, Some(person(1, "x")));

        let after = store
            .find_one_and_update(&Filter::eq("Id", 1i64), &UpdateSpec::new().set("Name", "z"), true)
            .unwrap();
        assert_eq!(after, Some(person(1, "z")));

        let none = store
            .find_one_and_update(&Filter::eq("Id", 5i64), &UpdateSpec::new(), true)
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn delete_one_removes_first_match_only() {
        let store = InMemoryStore::new("people");
        store.insert_one(person(1, "x"), None).unwrap();
        store.insert_one(person(2, "x"), None).unwrap();

        assert_eq!(store.delete_one(&Filter::eq("Name", "x")).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.delete_one(&Filter::eq("Name", "nope")).unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn session_writes_invisible_until_commit() {
        let store = InMemoryStore::new("people");
        let session = store.start_session().unwrap();

        store.insert_one(person(1, "x"), Some(&session)).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.open_sessions(), 1);

        store.commit_transaction(session).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.open_sessions(), 0);
    }

    #[test]
    fn abort_discards_staged_writes() {
        let store = InMemoryStore::new("people");
        let session = store.start_session().unwrap();
        store.insert_one(person(1, "x"), Some(&session)).unwrap();

        store.abort_transaction(session).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.open_sessions(), 0);
    }

    #[test]
    fn unknown_session_is_rejected() {
        let store = InMemoryStore::new("people");
        let stray = Session::new();
        let err = store.insert_one(person(1, "x"), Some(&stray)).unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound(_)));
    }

    #[test]
    fn commit_rechecks_uniqueness() {
        let store = unique_name_store();
        let session = store.start_session().unwrap();
        store.insert_one(person(1, "x"), Some(&session)).unwrap();

        // A concurrent writer takes the key first.
        store.insert_one(person(2, "x"), None).unwrap();

        let err = store.commit_transaction(session).unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn staged_duplicate_rejected_within_session() {
        let store = unique_name_store();
        let session = store.start_session().unwrap();
        store.insert_one(person(1, "x"), Some(&session)).unwrap();
        let err = store.insert_one(person(2, "x"), Some(&session)).unwrap_err();
        assert!(err.is_duplicate_key());
        store.abort_transaction(session).unwrap();
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn unique_index_never_admits_duplicates(names in proptest::collection::vec("[a-c]", 1..20)) {
                let store = unique_name_store();
                for (i, name) in names.iter().enumerate() {
                    let _ = store.insert_one(person(i as i64, name), None);
                }

                let mut seen: Vec<Value> = Vec::new();
                for doc in store.documents() {
                    let name = doc.get("Name").cloned().unwrap();
                    prop_assert!(!seen.contains(&name));
                    seen.push(name);
                }
            }
        }
    }
}
