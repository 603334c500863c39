use crate::common::{Value, DOC_ID};
use crate::document::Document;
use crate::errors::{DocbindError, DocbindResult, ErrorKind};
use crate::model::{Model, RelationData};
use crate::schema::{ModelType, Relation, TypeRegistry};
use std::sync::Arc;

/// Serializes a model graph into its stored document form.
///
/// The document carries the `_id`, the discriminator value when the type
/// stores one (leaf subtypes do, hierarchy roots do not), every attribute
/// including explicit nulls, an embedded one child as a sub-document and a
/// non-empty embedded many as an ordered array of sub-documents. Referenced
/// relations are not serialized into the parent.
pub fn to_document(model: &Model) -> DocbindResult<Document> {
    let mut document = Document::new();
    document.put(DOC_ID, Value::Id(model.id()))?;

    let model_type = model.model_type();
    if let Some(value) = model_type.discriminator_value() {
        document.put(model_type.discriminator_key(), value)?;
    }

    for (name, attribute) in model.attributes() {
        document.put(name.as_str(), attribute.value().clone())?;
    }

    for (name, relation) in model_type.relations() {
        match relation {
            Relation::EmbedsOne { .. } => {
                if let Some(child) = model.embedded_one(name)? {
                    document.put(name.as_str(), Value::Document(to_document(child)?))?;
                }
            }
            Relation::EmbedsMany { .. } => {
                let children = model.embedded_many(name)?;
                if !children.is_empty() {
                    let elements = children
                        .iter()
                        .map(to_document)
                        .collect::<DocbindResult<Vec<_>>>()?
                        .into_iter()
                        .map(Value::Document)
                        .collect::<Vec<_>>();
                    document.put(name.as_str(), Value::Array(elements))?;
                }
            }
            // referenced documents live in their own collections
            Relation::ReferencesOne { .. } | Relation::ReferencesMany { .. } => {}
        }
    }

    Ok(document)
}

/// Materializes a model instance from its stored document form.
///
/// The concrete type is resolved per document through the registry's
/// discriminator mapping, for the root document and again for every embedded
/// element. Declared keys become declared attributes; any other stored key is
/// kept verbatim as a dynamic attribute regardless of the type's capability
/// flag, since loading never rejects what an earlier schema wrote. The
/// resulting instance is persisted state: not new, no changes.
pub fn from_document(
    registry: &TypeRegistry,
    requested: &Arc<ModelType>,
    document: &Document,
) -> DocbindResult<Model> {
    let model_type = registry.resolve_variant(requested, document);

    let mut declared = Document::new();
    let mut dynamic: Vec<(String, Value)> = Vec::new();
    for (key, value) in document.iter() {
        if key == DOC_ID || key == model_type.discriminator_key() {
            continue;
        }
        if model_type.relation(&key).is_some() {
            continue;
        }
        if model_type.has_field(&key) {
            declared.put(key, value)?;
        } else {
            dynamic.push((key, value));
        }
    }

    let mut model = Model::new(model_type.clone(), declared)?;
    for (key, value) in dynamic {
        model.insert_dynamic(&key, value);
    }

    for (name, relation) in model_type.relations() {
        match relation {
            Relation::EmbedsOne { target } => {
                if let Value::Document(sub_document) = document.get(name) {
                    let child_root = registry.get(target)?;
                    let child = from_document(registry, &child_root, &sub_document)?;
                    model.set_embedded_one(name, Some(child))?;
                }
            }
            Relation::EmbedsMany { target } => {
                if let Value::Array(elements) = document.get(name) {
                    let child_root = registry.get(target)?;
                    for element in elements {
                        let Value::Document(sub_document) = element else {
                            log::error!(
                                "Embedded element of {} is not a document: {:?}",
                                name,
                                element
                            );
                            return Err(DocbindError::new(
                                &format!("embedded element of {} is not a document", name),
                                ErrorKind::ObjectMappingError,
                            ));
                        };
                        let child = from_document(registry, &child_root, &sub_document)?;
                        model.push_embedded(name, child)?;
                    }
                }
            }
            Relation::ReferencesOne { .. } | Relation::ReferencesMany { .. } => {}
        }
    }

    let mut with_id = document.clone();
    model.set_id(with_id.id()?);
    model.mark_persisted();
    Ok(model)
}

/// Checks that serializing a model never leaks referenced ids into the
/// document. Used by tests and debug assertions.
pub fn carries_reference_data(model: &Model) -> bool {
    model.relations().values().any(|data| match data {
        RelationData::ReferencesOne(id) => id.is_some(),
        RelationData::ReferencesMany(ids) => !ids.is_empty(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::document::ModelId;
    use crate::schema::TypeRegistry;

    fn set_up() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(
                ModelType::builder("Person")
                    .field("title")
                    .localized_field("desc")
                    .embeds_one("name", "Name")
                    .embeds_many("addresses", "Address")
                    .references_many("posts", "Post")
                    .dynamic_attributes(true),
            )
            .unwrap();
        registry
            .register(ModelType::builder("Name").field("first_name"))
            .unwrap();
        registry
            .register(ModelType::builder("Address").field("street"))
            .unwrap();
        registry
            .register(
                ModelType::builder("ShipmentAddress")
                    .extends("Address")
                    .field("shipping_name"),
            )
            .unwrap();
        registry
            .register(ModelType::builder("Post").field("text"))
            .unwrap();
        registry
            .register(ModelType::builder("Reg").field("title"))
            .unwrap();
        registry
    }

    #[test]
    fn test_round_trip_plain_attributes() {
        let registry = set_up();
        let person = registry.get("Person").unwrap();
        let model = Model::new(person.clone(), doc!("title": "sir")).unwrap();

        let document = to_document(&model).unwrap();
        assert_eq!(document.get("title"), Value::from("sir"));
        assert!(document.has_id());

        let loaded = from_document(&registry, &person, &document).unwrap();
        assert!(!loaded.is_new());
        assert!(!loaded.is_changed());
        assert_eq!(loaded.id(), model.id());
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_explicit_null_survives_round_trip() {
        let registry = set_up();
        let person = registry.get("Person").unwrap();
        let mut model = Model::new(person.clone(), doc!()).unwrap();
        model.set("pet", Value::Null).unwrap();

        let document = to_document(&model).unwrap();
        assert!(document.contains_key("pet"));

        let loaded = from_document(&registry, &person, &document).unwrap();
        assert!(loaded.attribute("pet").is_some());
        assert_eq!(loaded.get("pet"), Value::Null);
    }

    #[test]
    fn test_root_type_stores_no_discriminator() {
        let registry = set_up();
        let address = registry.get("Address").unwrap();
        let model = Model::new(address, doc!("street": "high")).unwrap();
        let document = to_document(&model).unwrap();
        assert!(!document.contains_key("_type"));
    }

    #[test]
    fn test_leaf_type_stores_discriminator() {
        let registry = set_up();
        let shipment = registry.get("ShipmentAddress").unwrap();
        let model = Model::new(shipment, doc!("street": "high")).unwrap();
        let document = to_document(&model).unwrap();
        assert_eq!(document.get("_type"), Value::from("ShipmentAddress"));
    }

    #[test]
    fn test_embedded_elements_resolve_their_own_subtype() {
        let registry = set_up();
        let person = registry.get("Person").unwrap();
        let address = registry.get("Address").unwrap();
        let shipment = registry.get("ShipmentAddress").unwrap();

        let mut model = Model::new(person.clone(), doc!()).unwrap();
        model
            .push_embedded(
                "addresses",
                Model::new(address, doc!("street": "plain")).unwrap(),
            )
            .unwrap();
        model
            .push_embedded(
                "addresses",
                Model::new(shipment, doc!("street": "fancy")).unwrap(),
            )
            .unwrap();

        let document = to_document(&model).unwrap();
        let loaded = from_document(&registry, &person, &document).unwrap();
        let children = loaded.embedded_many("addresses").unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].model_type().name(), "Address");
        assert_eq!(children[1].model_type().name(), "ShipmentAddress");
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_references_are_not_serialized() {
        let registry = set_up();
        let person = registry.get("Person").unwrap();
        let mut model = Model::new(person, doc!()).unwrap();
        model.push_reference("posts", ModelId::new()).unwrap();
        assert!(carries_reference_data(&model));

        let document = to_document(&model).unwrap();
        assert!(!document.contains_key("posts"));
    }

    #[test]
    fn test_legacy_keys_load_as_dynamic_without_capability() {
        let registry = set_up();
        let reg = registry.get("Reg").unwrap();
        let document = doc!("title": "sir", "banned": true);
        let loaded = from_document(&registry, &reg, &document).unwrap();

        assert_eq!(loaded.get("banned"), Value::Bool(true));
        assert!(loaded.attribute("banned").unwrap().is_dynamic());
    }

    #[test]
    fn test_embeds_one_round_trip() {
        let registry = set_up();
        let person = registry.get("Person").unwrap();
        let name = registry.get("Name").unwrap();

        let mut model = Model::new(person.clone(), doc!()).unwrap();
        model
            .set_embedded_one(
                "name",
                Some(Model::new(name, doc!("first_name": "Ada")).unwrap()),
            )
            .unwrap();

        let document = to_document(&model).unwrap();
        let loaded = from_document(&registry, &person, &document).unwrap();
        let child = loaded.embedded_one("name").unwrap().unwrap();
        assert_eq!(child.get("first_name"), Value::from("Ada"));
        assert_eq!(loaded, model);
    }
}
