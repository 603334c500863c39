use crate::document::Document;
use crate::errors::DocbindResult;
use crate::model::{Attribute, Model};
use crate::schema::Relation;

impl Model {
    /// Produces a structurally independent copy of this model graph.
    ///
    /// # Contract
    ///
    /// - The copy receives a fresh id and is a new, changed record with its
    ///   declared fields dirty against a null baseline.
    /// - Declared attributes are carried forward, localized fields with
    ///   their full locale→value map.
    /// - Dynamic attributes, explicit nulls included, are carried forward
    ///   only when the type supports dynamic attribute storage; the
    ///   constructor always receives exactly the declared subset.
    /// - Embedded one/many children are recursively copied with fresh ids,
    ///   preserving element order and each element's runtime subtype.
    /// - Referenced relations are empty on the copy regardless of source.
    /// - The source is never mutated; a frozen source stays frozen and its
    ///   copy is mutable.
    ///
    /// Any model that can be materialized from the store can be copied.
    pub fn dup(&self) -> DocbindResult<Model> {
        copy_model(self)
    }

    /// Alias of [Model::dup]; both carry the same contract.
    pub fn deep_clone(&self) -> DocbindResult<Model> {
        self.dup()
    }
}

fn copy_model(source: &Model) -> DocbindResult<Model> {
    let model_type = source.model_type().clone();

    let mut declared = Document::new();
    let mut dynamic = Vec::new();
    for (name, attribute) in source.attributes() {
        match attribute {
            Attribute::Declared(value) => declared.put(name.as_str(), value.clone())?,
            Attribute::Dynamic(value) => dynamic.push((name.clone(), value.clone())),
        }
    }

    let mut copy = Model::new(model_type.clone(), declared)?;
    if model_type.dynamic_attributes() {
        for (name, value) in dynamic {
            copy.set(&name, value)?;
        }
    }

    for (name, relation) in model_type.relations() {
        match relation {
            Relation::EmbedsOne { .. } => {
                if let Some(child) = source.embedded_one(name)? {
                    copy.set_embedded_one(name, Some(copy_model(child)?))?;
                }
            }
            Relation::EmbedsMany { .. } => {
                for child in source.embedded_many(name)? {
                    copy.push_embedded(name, copy_model(child)?)?;
                }
            }
            // references never follow a copy
            Relation::ReferencesOne { .. } | Relation::ReferencesMany { .. } => {}
        }
    }

    Ok(copy)
}
