use crate::common::{LocaleContext, Value, DOC_ID};
use crate::document::{Document, ModelId};
use crate::errors::{DocbindError, DocbindResult, ErrorKind};
use crate::model::{Attribute, ModelState};
use crate::schema::{ModelType, Relation};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Relation data held by a model instance, one entry per declared relation.
///
/// Embedded children are owned model instances; referenced relations hold
/// only the ids of independently stored documents.
#[derive(PartialEq, Clone, Debug)]
pub enum RelationData {
    EmbedsOne(Option<Box<Model>>),
    EmbedsMany(Vec<Model>),
    ReferencesOne(Option<ModelId>),
    ReferencesMany(Vec<ModelId>),
}

impl RelationData {
    fn empty_for(relation: &Relation) -> RelationData {
        match relation {
            Relation::EmbedsOne { .. } => RelationData::EmbedsOne(None),
            Relation::EmbedsMany { .. } => RelationData::EmbedsMany(Vec::new()),
            Relation::ReferencesOne { .. } => RelationData::ReferencesOne(None),
            Relation::ReferencesMany { .. } => RelationData::ReferencesMany(Vec::new()),
        }
    }
}

/// A live model instance bound to its [ModelType].
///
/// # Overview
/// A `Model` holds a primary key, an ordered attribute map tagged by
/// provenance ([Attribute]), per-relation child data and a lifecycle state.
/// Instances are constructed with [Model::new], materialized from stored
/// documents by the mapper, or produced by the deep-copy engine.
///
/// # Construction contract
/// The constructor receives attribute values only. Every supplied declared
/// field is stored as [Attribute::Declared] and marked changed against a
/// [Value::Null] baseline; declared fields with a default value are filled in
/// when absent. Undeclared keys are stored as [Attribute::Dynamic] when the
/// type supports dynamic attributes and rejected with
/// [ErrorKind::UnknownField] otherwise. Relation-named keys are dropped.
///
/// # Mutation
/// All mutating operations check the frozen flag first and fail with
/// [ErrorKind::InvalidOperation] on a frozen instance. Reads never check it.
///
/// # Examples
///
/// ```rust,ignore
/// let person = registry.get("Person")?;
/// let mut model = Model::new(person, doc!("title": "sir"))?;
/// model.set("version", 2)?;
/// assert!(model.is_new());
/// assert!(model.is_changed());
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    model_type: Arc<ModelType>,
    id: ModelId,
    attributes: IndexMap<String, Attribute>,
    relations: BTreeMap<String, RelationData>,
    state: ModelState,
}

impl Model {
    /// Constructs a new unpersisted instance from the given attributes.
    pub fn new(model_type: Arc<ModelType>, attrs: Document) -> DocbindResult<Model> {
        let mut attributes = IndexMap::new();
        let mut state = ModelState::new_record();

        let relations: BTreeMap<String, RelationData> = model_type
            .relations()
            .iter()
            .map(|(name, relation)| (name.clone(), RelationData::empty_for(relation)))
            .collect();

        for (key, value) in attrs.iter() {
            if key == DOC_ID || key == model_type.discriminator_key() {
                continue;
            }
            if model_type.relation(&key).is_some() {
                log::debug!(
                    "Dropping relation-named key {} from attributes of {}",
                    key,
                    model_type.name()
                );
                continue;
            }

            if model_type.has_field(&key) {
                state.record_change(&key, Value::Null, value.clone());
                attributes.insert(key, Attribute::Declared(value));
            } else if model_type.dynamic_attributes() {
                state.record_change(&key, Value::Null, value.clone());
                attributes.insert(key, Attribute::Dynamic(value));
            } else {
                log::error!(
                    "Field {} is not declared on {} and the type does not \
                     support dynamic attributes",
                    key,
                    model_type.name()
                );
                return Err(DocbindError::new(
                    &format!("unknown field {} on {}", key, model_type.name()),
                    ErrorKind::UnknownField,
                ));
            }
        }

        for (name, field) in model_type.fields() {
            if attributes.contains_key(name) {
                continue;
            }
            if let Some(default) = field.default_value() {
                state.record_change(name, Value::Null, default.clone());
                attributes.insert(name.clone(), Attribute::Declared(default.clone()));
            }
        }

        Ok(Model {
            model_type,
            id: ModelId::new(),
            attributes,
            relations,
            state,
        })
    }

    pub fn model_type(&self) -> &Arc<ModelType> {
        &self.model_type
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Gets an attribute value. Missing attributes read as [Value::Null].
    pub fn get(&self, name: &str) -> Value {
        self.attributes
            .get(name)
            .map(|attribute| attribute.value().clone())
            .unwrap_or(Value::Null)
    }

    /// Gets an attribute with its provenance tag.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Returns the stored attributes in insertion order.
    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    /// Returns the names of the stored attributes in insertion order.
    pub fn attribute_names(&self) -> SmallVec<[String; 8]> {
        self.attributes.keys().cloned().collect()
    }

    /// Sets an attribute value.
    ///
    /// Declared fields stay declared; other names are stored as dynamic
    /// attributes when the type supports them.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or `Err(DocbindError)` if the instance is frozen, the name
    /// is reserved or relation-named, or the field is undeclared on a type
    /// without dynamic attributes.
    pub fn set<T: Into<Value>>(&mut self, name: &str, value: T) -> DocbindResult<()> {
        self.frozen_guard()?;
        if name == DOC_ID {
            log::error!("Field {} cannot be assigned directly", DOC_ID);
            return Err(DocbindError::new(
                "the id field cannot be assigned directly",
                ErrorKind::InvalidOperation,
            ));
        }
        if self.model_type.relation(name).is_some() {
            log::error!(
                "{} names a relation of {}; use the relation accessors",
                name,
                self.model_type.name()
            );
            return Err(DocbindError::new(
                &format!("{} names a relation, not an attribute", name),
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();
        let old = self.get(name);
        if self.model_type.has_field(name) {
            self.state.record_change(name, old, value.clone());
            self.attributes
                .insert(name.to_string(), Attribute::Declared(value));
            Ok(())
        } else if self.model_type.dynamic_attributes() {
            self.state.record_change(name, old, value.clone());
            self.attributes
                .insert(name.to_string(), Attribute::Dynamic(value));
            Ok(())
        } else {
            log::error!(
                "Field {} is not declared on {} and the type does not \
                 support dynamic attributes",
                name,
                self.model_type.name()
            );
            Err(DocbindError::new(
                &format!("unknown field {} on {}", name, self.model_type.name()),
                ErrorKind::UnknownField,
            ))
        }
    }

    /// Removes an attribute, returning its previous value if any.
    pub fn remove(&mut self, name: &str) -> DocbindResult<Option<Value>> {
        self.frozen_guard()?;
        let removed = self.attributes.shift_remove(name);
        if let Some(attribute) = &removed {
            self.state
                .record_change(name, attribute.value().clone(), Value::Null);
        }
        Ok(removed.map(|attribute| attribute.value().clone()))
    }

    /// Stores a dynamic attribute unconditionally. Used when materializing
    /// stored documents, which never reject undeclared keys.
    pub(crate) fn insert_dynamic(&mut self, name: &str, value: Value) {
        self.attributes
            .insert(name.to_string(), Attribute::Dynamic(value));
    }

    /// Reads a localized field under the context's current locale.
    ///
    /// A locale that was never written reads as [Value::Null].
    pub fn get_localized(&self, name: &str, locale: &LocaleContext) -> DocbindResult<Value> {
        self.localized_field_guard(name)?;
        match self.get(name) {
            Value::Document(translations) => Ok(translations.get(&locale.current())),
            _ => Ok(Value::Null),
        }
    }

    /// Writes a localized field under the context's current locale, keeping
    /// the other locales intact.
    pub fn set_localized<T: Into<Value>>(
        &mut self,
        name: &str,
        locale: &LocaleContext,
        value: T,
    ) -> DocbindResult<()> {
        self.frozen_guard()?;
        self.localized_field_guard(name)?;

        let mut translations = match self.get(name) {
            Value::Document(translations) => translations,
            _ => Document::new(),
        };
        translations.put(locale.current(), value.into())?;
        self.set(name, Value::Document(translations))
    }

    /// Returns the full locale→value map of a localized field.
    pub fn localized_translations(&self, name: &str) -> DocbindResult<Document> {
        self.localized_field_guard(name)?;
        match self.get(name) {
            Value::Document(translations) => Ok(translations),
            _ => Ok(Document::new()),
        }
    }

    /// Gets the embedded child of an embeds-one relation.
    pub fn embedded_one(&self, name: &str) -> DocbindResult<Option<&Model>> {
        match self.relation_data(name)? {
            RelationData::EmbedsOne(child) => Ok(child.as_deref()),
            _ => Err(self.relation_kind_error(name, "embeds-one")),
        }
    }

    /// Sets or clears the embedded child of an embeds-one relation.
    pub fn set_embedded_one(&mut self, name: &str, child: Option<Model>) -> DocbindResult<()> {
        self.frozen_guard()?;
        let relation = self.declared_relation(name)?.clone();
        if !matches!(relation, Relation::EmbedsOne { .. }) {
            return Err(self.relation_kind_error(name, "embeds-one"));
        }
        if let Some(child) = &child {
            self.child_type_guard(name, &relation, child)?;
        }
        self.relations.insert(
            name.to_string(),
            RelationData::EmbedsOne(child.map(Box::new)),
        );
        Ok(())
    }

    /// Gets the ordered children of an embeds-many relation.
    pub fn embedded_many(&self, name: &str) -> DocbindResult<&[Model]> {
        match self.relation_data(name)? {
            RelationData::EmbedsMany(children) => Ok(children),
            _ => Err(self.relation_kind_error(name, "embeds-many")),
        }
    }

    /// Appends a child to an embeds-many relation, preserving order.
    pub fn push_embedded(&mut self, name: &str, child: Model) -> DocbindResult<()> {
        self.frozen_guard()?;
        let relation = self.declared_relation(name)?.clone();
        if !matches!(relation, Relation::EmbedsMany { .. }) {
            return Err(self.relation_kind_error(name, "embeds-many"));
        }
        self.child_type_guard(name, &relation, &child)?;
        match self.relations.get_mut(name) {
            Some(RelationData::EmbedsMany(children)) => {
                children.push(child);
                Ok(())
            }
            _ => Err(self.relation_kind_error(name, "embeds-many")),
        }
    }

    /// Gets the linked id of a references-one relation.
    pub fn referenced_one(&self, name: &str) -> DocbindResult<Option<ModelId>> {
        match self.relation_data(name)? {
            RelationData::ReferencesOne(id) => Ok(*id),
            _ => Err(self.relation_kind_error(name, "references-one")),
        }
    }

    /// Sets or clears the linked id of a references-one relation.
    pub fn set_referenced_one(&mut self, name: &str, id: Option<ModelId>) -> DocbindResult<()> {
        self.frozen_guard()?;
        match self.declared_relation(name)? {
            Relation::ReferencesOne { .. } => {
                self.relations
                    .insert(name.to_string(), RelationData::ReferencesOne(id));
                Ok(())
            }
            _ => Err(self.relation_kind_error(name, "references-one")),
        }
    }

    /// Gets the linked ids of a references-many relation.
    pub fn referenced_many(&self, name: &str) -> DocbindResult<&[ModelId]> {
        match self.relation_data(name)? {
            RelationData::ReferencesMany(ids) => Ok(ids),
            _ => Err(self.relation_kind_error(name, "references-many")),
        }
    }

    /// Appends a linked id to a references-many relation.
    pub fn push_reference(&mut self, name: &str, id: ModelId) -> DocbindResult<()> {
        self.frozen_guard()?;
        self.declared_relation(name)?;
        match self.relations.get_mut(name) {
            Some(RelationData::ReferencesMany(ids)) => {
                ids.push(id);
                Ok(())
            }
            _ => Err(self.relation_kind_error(name, "references-many")),
        }
    }

    /// Returns the relation data map, one entry per declared relation.
    pub fn relations(&self) -> &BTreeMap<String, RelationData> {
        &self.relations
    }

    pub fn is_new(&self) -> bool {
        self.state.is_new()
    }

    pub fn is_frozen(&self) -> bool {
        self.state.is_frozen()
    }

    pub fn is_changed(&self) -> bool {
        self.state.is_changed()
    }

    /// Returns the changed fields mapped to their `(old, new)` value pairs.
    pub fn changes(&self) -> &BTreeMap<String, (Value, Value)> {
        self.state.changes()
    }

    /// Marks the instance immutable. Irreversible; reads remain allowed.
    pub fn freeze(&mut self) {
        self.state.freeze();
    }

    pub(crate) fn mark_persisted(&mut self) {
        self.state.mark_persisted();
    }

    pub(crate) fn set_id(&mut self, id: ModelId) {
        self.id = id;
    }

    fn frozen_guard(&self) -> DocbindResult<()> {
        if self.state.is_frozen() {
            log::error!(
                "Cannot mutate frozen instance of {}",
                self.model_type.name()
            );
            return Err(DocbindError::new(
                &format!(
                    "cannot mutate frozen instance of {}",
                    self.model_type.name()
                ),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn localized_field_guard(&self, name: &str) -> DocbindResult<()> {
        match self.model_type.field(name) {
            Some(field) if field.is_localized() => Ok(()),
            Some(_) => {
                log::error!(
                    "Field {} of {} is not localized",
                    name,
                    self.model_type.name()
                );
                Err(DocbindError::new(
                    &format!("field {} is not localized", name),
                    ErrorKind::InvalidOperation,
                ))
            }
            None => {
                log::error!(
                    "Field {} is not declared on {}",
                    name,
                    self.model_type.name()
                );
                Err(DocbindError::new(
                    &format!("unknown field {} on {}", name, self.model_type.name()),
                    ErrorKind::UnknownField,
                ))
            }
        }
    }

    fn declared_relation(&self, name: &str) -> DocbindResult<&Relation> {
        match self.model_type.relation(name) {
            Some(relation) => Ok(relation),
            None => {
                log::error!(
                    "Relation {} is not declared on {}",
                    name,
                    self.model_type.name()
                );
                Err(DocbindError::new(
                    &format!("unknown relation {} on {}", name, self.model_type.name()),
                    ErrorKind::UnknownField,
                ))
            }
        }
    }

    fn relation_data(&self, name: &str) -> DocbindResult<&RelationData> {
        self.declared_relation(name)?;
        match self.relations.get(name) {
            Some(data) => Ok(data),
            None => {
                log::error!("Relation data for {} is missing", name);
                Err(DocbindError::new(
                    &format!("relation data for {} is missing", name),
                    ErrorKind::InternalError,
                ))
            }
        }
    }

    fn relation_kind_error(&self, name: &str, expected: &str) -> DocbindError {
        log::error!(
            "Relation {} of {} is not {}",
            name,
            self.model_type.name(),
            expected
        );
        DocbindError::new(
            &format!("relation {} is not {}", name, expected),
            ErrorKind::InvalidOperation,
        )
    }

    fn child_type_guard(
        &self,
        name: &str,
        relation: &Relation,
        child: &Model,
    ) -> DocbindResult<()> {
        if child.model_type().hierarchy_root() != relation.target() {
            log::error!(
                "Relation {} of {} embeds {} but was given {}",
                name,
                self.model_type.name(),
                relation.target(),
                child.model_type().name()
            );
            return Err(DocbindError::new(
                &format!(
                    "relation {} embeds {}, not {}",
                    name,
                    relation.target(),
                    child.model_type().name()
                ),
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }
}

/// Structural equality: same type, attributes and relation data. Identity
/// and lifecycle state are excluded, so a persisted instance and its reload
/// compare equal, as do an instance and its deep copy.
impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.model_type.name() == other.model_type.name()
            && self.attributes == other.attributes
            && self.relations == other.relations
    }
}
