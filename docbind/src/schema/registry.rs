use crate::common::{atomic, Atomic, ReadExecutor, Value, WriteExecutor};
use crate::document::Document;
use crate::errors::{DocbindError, DocbindResult, ErrorKind};
use crate::schema::{ModelType, ModelTypeBuilder};
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Default)]
struct RegistryInner {
    types: HashMap<String, Arc<ModelType>>,
    // hierarchy root name -> (discriminator value -> subtype name)
    hierarchies: HashMap<String, BTreeMap<String, String>>,
}

/// A thread-safe registry of [ModelType] declarations.
///
/// # Purpose
/// The registry resolves inheritance at registration time and is the single
/// lookup point for model metadata. During document materialization it maps
/// a stored discriminator value back to the concrete subtype of a hierarchy.
///
/// # Thread safety
/// `TypeRegistry` is cheap to clone; clones share the same underlying state.
#[derive(Clone)]
pub struct TypeRegistry {
    inner: Atomic<RegistryInner>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        TypeRegistry {
            inner: atomic(RegistryInner::default()),
        }
    }

    /// Registers a model type, resolving its parent if it extends one.
    ///
    /// A subtype inherits the parent's fields, relations, discriminator key
    /// and dynamic-attribute capability, and is indexed under its hierarchy
    /// root by discriminator value.
    ///
    /// # Returns
    ///
    /// The finalized, shared [ModelType], or `Err(DocbindError)` if the name
    /// is already registered or the parent is unknown.
    pub fn register(&self, builder: ModelTypeBuilder) -> DocbindResult<Arc<ModelType>> {
        let parent_name = builder.parent.clone();
        let parent = match &parent_name {
            Some(name) => Some(self.get(name)?),
            None => None,
        };

        self.inner.write_with(|inner| {
            let name = builder.name.clone();
            if inner.types.contains_key(&name) {
                log::error!("Model type {} is already registered", name);
                return Err(DocbindError::new(
                    &format!("model type {} is already registered", name),
                    ErrorKind::InvalidOperation,
                ));
            }

            let model_type = Arc::new(builder.finish(parent.as_deref()));

            if let Some(value) = model_type.discriminator_value() {
                inner
                    .hierarchies
                    .entry(model_type.hierarchy_root().to_string())
                    .or_default()
                    .insert(value.to_string(), name.clone());
            } else {
                inner
                    .hierarchies
                    .entry(model_type.hierarchy_root().to_string())
                    .or_default();
            }

            inner.types.insert(name, model_type.clone());
            Ok(model_type)
        })
    }

    /// Looks up a registered model type by name.
    ///
    /// # Returns
    ///
    /// The shared [ModelType], or `Err(DocbindError)` with
    /// [ErrorKind::UnknownType] if no type with that name is registered.
    pub fn get(&self, name: &str) -> DocbindResult<Arc<ModelType>> {
        self.inner.read_with(|inner| match inner.types.get(name) {
            Some(model_type) => Ok(model_type.clone()),
            None => {
                log::error!(
                    "Unknown model type {}; registered types are [{}]",
                    name,
                    inner.types.keys().sorted().join(", ")
                );
                Err(DocbindError::new(
                    &format!("unknown model type {}", name),
                    ErrorKind::UnknownType,
                ))
            }
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read_with(|inner| inner.types.contains_key(name))
    }

    /// Resolves the concrete subtype for a stored document within the
    /// hierarchy rooted at `root`.
    ///
    /// Reads the hierarchy's discriminator field from the document and maps
    /// its value to the registered subtype. Falls back to `root` when the
    /// field is absent, non-textual, or names no registered subtype.
    pub fn resolve_variant(
        &self,
        root: &Arc<ModelType>,
        document: &Document,
    ) -> Arc<ModelType> {
        let discriminator = document.get(root.discriminator_key());
        let Value::String(value) = discriminator else {
            return root.clone();
        };

        self.inner.read_with(|inner| {
            inner
                .hierarchies
                .get(root.hierarchy_root())
                .and_then(|mapping| mapping.get(&value))
                .and_then(|name| inner.types.get(name))
                .cloned()
                .unwrap_or_else(|| root.clone())
        })
    }

    /// Returns the discriminator value → subtype name mapping for the
    /// hierarchy rooted at `root`.
    pub fn discriminator_mapping(&self, root: &str) -> BTreeMap<String, String> {
        self.inner.read_with(|inner| {
            inner.hierarchies.get(root).cloned().unwrap_or_default()
        })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn set_up() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(ModelType::builder("Influencer").field("handle"))
            .unwrap();
        registry
            .register(
                ModelType::builder("Youtuber")
                    .extends("Influencer")
                    .field("channel"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = set_up();
        let root = registry.get("Influencer").unwrap();
        assert_eq!(root.name(), "Influencer");
        assert!(root.is_root());

        let leaf = registry.get("Youtuber").unwrap();
        assert_eq!(leaf.parent(), Some("Influencer"));
        assert!(leaf.has_field("handle"));
        assert!(leaf.has_field("channel"));
    }

    #[test]
    fn test_get_unknown_type() {
        let registry = set_up();
        let result = registry.get("Blogger");
        assert!(result.is_err());
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::UnknownType);
    }

    #[test]
    fn test_duplicate_registration() {
        let registry = set_up();
        let result = registry.register(ModelType::builder("Influencer"));
        assert!(result.is_err());
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_register_with_unknown_parent() {
        let registry = TypeRegistry::new();
        let result = registry.register(ModelType::builder("Youtuber").extends("Influencer"));
        assert!(result.is_err());
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::UnknownType);
    }

    #[test]
    fn test_resolve_variant_to_leaf() {
        let registry = set_up();
        let root = registry.get("Influencer").unwrap();
        let document = doc!("_type": "Youtuber", "handle": "tester");
        let resolved = registry.resolve_variant(&root, &document);
        assert_eq!(resolved.name(), "Youtuber");
    }

    #[test]
    fn test_resolve_variant_without_discriminator() {
        let registry = set_up();
        let root = registry.get("Influencer").unwrap();
        let document = doc!("handle": "tester");
        let resolved = registry.resolve_variant(&root, &document);
        assert_eq!(resolved.name(), "Influencer");
    }

    #[test]
    fn test_resolve_variant_with_unknown_value() {
        let registry = set_up();
        let root = registry.get("Influencer").unwrap();
        let document = doc!("_type": "Blogger");
        let resolved = registry.resolve_variant(&root, &document);
        assert_eq!(resolved.name(), "Influencer");
    }

    #[test]
    fn test_resolve_variant_with_custom_key() {
        let registry = TypeRegistry::new();
        registry
            .register(ModelType::builder("Shape").discriminator_key("dkey"))
            .unwrap();
        registry
            .register(
                ModelType::builder("Circle")
                    .extends("Shape")
                    .discriminator_value("dvalue"),
            )
            .unwrap();

        let root = registry.get("Shape").unwrap();
        let document = doc!("dkey": "dvalue");
        let resolved = registry.resolve_variant(&root, &document);
        assert_eq!(resolved.name(), "Circle");

        // the default key is not consulted for this hierarchy
        let document = doc!("_type": "Circle");
        let resolved = registry.resolve_variant(&root, &document);
        assert_eq!(resolved.name(), "Shape");
    }

    #[test]
    fn test_discriminator_mapping() {
        let registry = set_up();
        let mapping = registry.discriminator_mapping("Influencer");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("Youtuber"), Some(&"Youtuber".to_string()));
    }
}
