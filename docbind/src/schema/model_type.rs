use crate::common::{Value, DEFAULT_DISCRIMINATOR_KEY};
use indexmap::IndexMap;

/// Declaration of a single field on a model type.
///
/// # Characteristics
/// - Declared fields are ordered; the declaration order is preserved by the
///   owning [ModelType].
/// - A localized field stores its value as a locale→value document and is
///   read/written through a locale context.
/// - A field may carry a default value, applied and marked dirty when a new
///   instance is constructed without it.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct FieldSpec {
    name: String,
    localized: bool,
    default: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: &str, localized: bool, default: Option<Value>) -> Self {
        FieldSpec {
            name: name.to_string(),
            localized,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_localized(&self) -> bool {
        self.localized
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The embedding kind and target of a relation declared on a model type.
///
/// Embeds-one and embeds-many children are owned by the parent and stored
/// inline within its document. Referenced relations are weak foreign-key
/// links to independently stored documents; they are never serialized into
/// the parent and never duplicated by a deep copy.
///
/// The target names the hierarchy root type of the related model; elements
/// may still be any registered subtype of that root.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Relation {
    /// Single exclusively-owned child stored inline.
    EmbedsOne { target: String },
    /// Ordered sequence of exclusively-owned children stored inline.
    EmbedsMany { target: String },
    /// Weak link to a single independently stored document.
    ReferencesOne { target: String },
    /// Weak link to a set of independently stored documents.
    ReferencesMany { target: String },
}

impl Relation {
    pub fn target(&self) -> &str {
        match self {
            Relation::EmbedsOne { target }
            | Relation::EmbedsMany { target }
            | Relation::ReferencesOne { target }
            | Relation::ReferencesMany { target } => target,
        }
    }

    /// Checks if this relation owns its children (embeds-one or embeds-many).
    pub fn is_embedded(&self) -> bool {
        matches!(self, Relation::EmbedsOne { .. } | Relation::EmbedsMany { .. })
    }
}

/// Runtime metadata for a model class: its declared fields, relations,
/// dynamic-attribute capability and discriminator configuration.
///
/// # Purpose
/// `ModelType` is the field/relation registry entry consulted by the
/// constructor, the document mapper, the selector builder and the deep-copy
/// engine. Instances are immutable once registered and shared via `Arc`.
///
/// # Inheritance
/// An embedded hierarchy is declared by registering subtypes with
/// [ModelTypeBuilder::extends]. A subtype inherits the parent's fields and
/// relations and belongs to the parent's hierarchy root. Leaf subtypes store
/// a discriminator value (the type name unless customized); the hierarchy
/// root stores none.
///
/// # Usage
/// ```ignore
/// let registry = TypeRegistry::new();
/// registry.register(
///     ModelType::builder("Address")
///         .field("street")
///         .localized_field("name"),
/// )?;
/// registry.register(
///     ModelType::builder("ShipmentAddress")
///         .extends("Address")
///         .localized_field("shipping_name"),
/// )?;
/// ```
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ModelType {
    name: String,
    fields: IndexMap<String, FieldSpec>,
    relations: IndexMap<String, Relation>,
    dynamic_attributes: bool,
    discriminator_key: String,
    discriminator_value: Option<String>,
    parent: Option<String>,
    hierarchy_root: String,
}

impl ModelType {
    /// Starts building a model type with the given name.
    pub fn builder(name: &str) -> ModelTypeBuilder {
        ModelTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields in declaration order.
    pub fn fields(&self) -> &IndexMap<String, FieldSpec> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the declared relations in declaration order.
    pub fn relations(&self) -> &IndexMap<String, Relation> {
        &self.relations
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// Whether undeclared attributes are retained across the copy/construct
    /// boundary.
    pub fn dynamic_attributes(&self) -> bool {
        self.dynamic_attributes
    }

    /// The stored field name identifying the concrete subtype at a
    /// polymorphic embedding point.
    pub fn discriminator_key(&self) -> &str {
        &self.discriminator_key
    }

    /// The stored discriminator value of this type. Hierarchy roots have
    /// none; leaf subtypes default to their type name.
    pub fn discriminator_value(&self) -> Option<&str> {
        self.discriminator_value.as_deref()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The name of this type's hierarchy root (its own name when it is the
    /// root).
    pub fn hierarchy_root(&self) -> &str {
        &self.hierarchy_root
    }

    /// Checks if this type is the root of its hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Builder for [ModelType] declarations; finalized by
/// [crate::schema::TypeRegistry::register], which resolves inheritance.
#[derive(Clone, Debug)]
pub struct ModelTypeBuilder {
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, FieldSpec>,
    pub(crate) relations: IndexMap<String, Relation>,
    pub(crate) dynamic_attributes: bool,
    pub(crate) discriminator_key: Option<String>,
    pub(crate) discriminator_value: Option<String>,
    pub(crate) parent: Option<String>,
}

impl ModelTypeBuilder {
    fn new(name: &str) -> Self {
        ModelTypeBuilder {
            name: name.to_string(),
            fields: IndexMap::new(),
            relations: IndexMap::new(),
            dynamic_attributes: false,
            discriminator_key: None,
            discriminator_value: None,
            parent: None,
        }
    }

    /// Declares a plain field.
    pub fn field(mut self, name: &str) -> Self {
        self.fields
            .insert(name.to_string(), FieldSpec::new(name, false, None));
        self
    }

    /// Declares a plain field with a default value.
    pub fn field_with_default(mut self, name: &str, default: Value) -> Self {
        self.fields
            .insert(name.to_string(), FieldSpec::new(name, false, Some(default)));
        self
    }

    /// Declares a localized field, stored as a locale→value document.
    pub fn localized_field(mut self, name: &str) -> Self {
        self.fields
            .insert(name.to_string(), FieldSpec::new(name, true, None));
        self
    }

    /// Declares an embeds-one relation to the given target type.
    pub fn embeds_one(mut self, name: &str, target: &str) -> Self {
        self.relations.insert(
            name.to_string(),
            Relation::EmbedsOne {
                target: target.to_string(),
            },
        );
        self
    }

    /// Declares an embeds-many relation to the given target type.
    pub fn embeds_many(mut self, name: &str, target: &str) -> Self {
        self.relations.insert(
            name.to_string(),
            Relation::EmbedsMany {
                target: target.to_string(),
            },
        );
        self
    }

    /// Declares a references-one relation to the given target type.
    pub fn references_one(mut self, name: &str, target: &str) -> Self {
        self.relations.insert(
            name.to_string(),
            Relation::ReferencesOne {
                target: target.to_string(),
            },
        );
        self
    }

    /// Declares a references-many relation to the given target type.
    pub fn references_many(mut self, name: &str, target: &str) -> Self {
        self.relations.insert(
            name.to_string(),
            Relation::ReferencesMany {
                target: target.to_string(),
            },
        );
        self
    }

    /// Enables schema-less attribute storage for this type.
    pub fn dynamic_attributes(mut self, enabled: bool) -> Self {
        self.dynamic_attributes = enabled;
        self
    }

    /// Overrides the discriminator field name for this hierarchy. Only
    /// meaningful on a hierarchy root.
    pub fn discriminator_key(mut self, key: &str) -> Self {
        self.discriminator_key = Some(key.to_string());
        self
    }

    /// Overrides the stored discriminator value for this subtype.
    pub fn discriminator_value(mut self, value: &str) -> Self {
        self.discriminator_value = Some(value.to_string());
        self
    }

    /// Declares this type as a subtype of the given parent.
    pub fn extends(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Finalizes the builder against its resolved parent. Called by the
    /// registry during registration.
    pub(crate) fn finish(self, parent: Option<&ModelType>) -> ModelType {
        match parent {
            Some(parent_type) => {
                // subtype inherits the parent's fields and relations, then
                // adds its own on top
                let mut fields = parent_type.fields.clone();
                fields.extend(self.fields);
                let mut relations = parent_type.relations.clone();
                relations.extend(self.relations);

                let discriminator_value = self
                    .discriminator_value
                    .unwrap_or_else(|| self.name.clone());

                ModelType {
                    name: self.name,
                    fields,
                    relations,
                    dynamic_attributes: self.dynamic_attributes
                        || parent_type.dynamic_attributes,
                    discriminator_key: parent_type.discriminator_key.clone(),
                    discriminator_value: Some(discriminator_value),
                    parent: Some(parent_type.name.clone()),
                    hierarchy_root: parent_type.hierarchy_root.clone(),
                }
            }
            None => ModelType {
                hierarchy_root: self.name.clone(),
                discriminator_key: self
                    .discriminator_key
                    .unwrap_or_else(|| DEFAULT_DISCRIMINATOR_KEY.to_string()),
                // hierarchy roots carry no stored discriminator unless one
                // is configured explicitly
                discriminator_value: self.discriminator_value,
                name: self.name,
                fields: self.fields,
                relations: self.relations,
                dynamic_attributes: self.dynamic_attributes,
                parent: None,
            },
        }
    }
}
