use crate::document::ModelId;
use crate::errors::DocbindResult;
use crate::mapping::{from_document, to_document};
use crate::model::Model;
use crate::schema::{ModelType, TypeRegistry};
use crate::store::InMemoryCollection;
use std::sync::Arc;

/// A typed repository over a document collection.
///
/// Binds a hierarchy root [ModelType] and its [TypeRegistry] to a backing
/// collection, mapping models to documents on the way in and resolving the
/// stored subtype on the way out. The collection stores the root type and
/// all of its registered subtypes.
#[derive(Clone)]
pub struct ModelRepository {
    registry: TypeRegistry,
    model_type: Arc<ModelType>,
    collection: InMemoryCollection,
}

impl ModelRepository {
    /// Creates a repository for the named root type, backed by a collection
    /// of the same name.
    pub fn new(registry: &TypeRegistry, type_name: &str) -> DocbindResult<Self> {
        let model_type = registry.get(type_name)?;
        Ok(ModelRepository {
            registry: registry.clone(),
            collection: InMemoryCollection::new(model_type.name()),
            model_type,
        })
    }

    pub fn model_type(&self) -> &Arc<ModelType> {
        &self.model_type
    }

    /// Direct access to the backing collection, for raw document patches.
    pub fn collection(&self) -> &InMemoryCollection {
        &self.collection
    }

    /// Persists a model graph, settling its lifecycle state on success.
    pub fn save(&self, model: &mut Model) -> DocbindResult<ModelId> {
        let mut document = to_document(model)?;
        let id = self.collection.save(&mut document)?;
        model.mark_persisted();
        Ok(id)
    }

    /// Loads a model by id, resolving the concrete stored subtype.
    pub fn find(&self, id: &ModelId) -> DocbindResult<Option<Model>> {
        match self.collection.find_by_id(id) {
            Some(document) => Ok(Some(from_document(
                &self.registry,
                &self.model_type,
                &document,
            )?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::doc;
    use crate::schema::ModelType;

    fn set_up() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(
                ModelType::builder("Person")
                    .field("title")
                    .dynamic_attributes(true),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_save_and_find_round_trip() {
        let registry = set_up();
        let repository = ModelRepository::new(&registry, "Person").unwrap();
        let person = registry.get("Person").unwrap();

        let mut model = Model::new(person, doc!("title": "sir")).unwrap();
        let id = repository.save(&mut model).unwrap();
        assert!(!model.is_new());
        assert!(!model.is_changed());
        assert_eq!(id, model.id());

        let loaded = repository.find(&id).unwrap().unwrap();
        assert_eq!(loaded.id(), model.id());
        assert_eq!(loaded, model);
        assert_eq!(loaded.get("title"), Value::from("sir"));
    }

    #[test]
    fn test_find_missing_model() {
        let registry = set_up();
        let repository = ModelRepository::new(&registry, "Person").unwrap();
        let result = repository.find(&ModelId::new()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unknown_type() {
        let registry = set_up();
        let result = ModelRepository::new(&registry, "Alien");
        assert!(result.is_err());
    }
}
