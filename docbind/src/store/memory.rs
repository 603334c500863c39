use crate::document::{Document, ModelId};
use crate::errors::{DocbindError, DocbindResult, ErrorKind};
use dashmap::DashMap;
use std::sync::Arc;

/// An in-memory document collection keyed by `_id`.
///
/// # Thread safety
/// Backed by a concurrent map; clones share the same underlying data and the
/// collection can be used from multiple threads without external locking.
#[derive(Clone)]
pub struct InMemoryCollection {
    name: String,
    data: Arc<DashMap<ModelId, Document>>,
}

impl InMemoryCollection {
    pub fn new(name: &str) -> Self {
        InMemoryCollection {
            name: name.to_string(),
            data: Arc::new(DashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upserts a document by its `_id`, assigning a fresh id when the
    /// document has none. Returns the id the document is stored under.
    pub fn save(&self, document: &mut Document) -> DocbindResult<ModelId> {
        let id = document.id()?;
        self.data.insert(id, document.clone());
        Ok(id)
    }

    /// Finds a document by id.
    pub fn find_by_id(&self, id: &ModelId) -> Option<Document> {
        self.data.get(id).map(|entry| entry.value().clone())
    }

    /// Merges the given fields into an existing document.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or `Err(DocbindError)` with [ErrorKind::NotFound] if no
    /// document with that id exists.
    pub fn update(&self, id: &ModelId, patch: &Document) -> DocbindResult<()> {
        match self.data.get_mut(id) {
            Some(mut entry) => {
                let document = entry.value_mut();
                for (key, value) in patch.iter() {
                    document.put(key, value)?;
                }
                Ok(())
            }
            None => {
                log::error!("No document with id {} in collection {}", id, self.name);
                Err(DocbindError::new(
                    &format!("no document with id {} in collection {}", id, self.name),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    /// Removes a document by id. Removing a missing id succeeds.
    pub fn remove(&self, id: &ModelId) {
        self.data.remove(id);
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn clear(&self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::doc;

    #[test]
    fn test_save_assigns_id_when_missing() {
        let collection = InMemoryCollection::new("people");
        let mut document = doc!("title": "sir");
        let id = collection.save(&mut document).unwrap();

        assert!(document.has_id());
        assert_eq!(collection.size(), 1);
        assert_eq!(
            collection.find_by_id(&id).unwrap().get("title"),
            Value::from("sir")
        );
    }

    #[test]
    fn test_save_upserts_by_id() {
        let collection = InMemoryCollection::new("people");
        let mut document = doc!("title": "sir");
        let id = collection.save(&mut document).unwrap();

        document.put("title", "madam").unwrap();
        let second_id = collection.save(&mut document).unwrap();

        assert_eq!(id, second_id);
        assert_eq!(collection.size(), 1);
        assert_eq!(
            collection.find_by_id(&id).unwrap().get("title"),
            Value::from("madam")
        );
    }

    #[test]
    fn test_update_merges_fields() {
        let collection = InMemoryCollection::new("people");
        let mut document = doc!("title": "sir");
        let id = collection.save(&mut document).unwrap();

        collection.update(&id, &doc!("banned": true)).unwrap();
        let stored = collection.find_by_id(&id).unwrap();
        assert_eq!(stored.get("title"), Value::from("sir"));
        assert_eq!(stored.get("banned"), Value::Bool(true));
    }

    #[test]
    fn test_update_missing_document() {
        let collection = InMemoryCollection::new("people");
        let result = collection.update(&ModelId::new(), &doc!("banned": true));
        assert!(result.is_err());
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_and_clear() {
        let collection = InMemoryCollection::new("people");
        let mut document = doc!("title": "sir");
        let id = collection.save(&mut document).unwrap();

        collection.remove(&id);
        assert!(collection.find_by_id(&id).is_none());

        collection.save(&mut doc!("title": "madam")).unwrap();
        collection.clear();
        assert_eq!(collection.size(), 0);
    }
}
