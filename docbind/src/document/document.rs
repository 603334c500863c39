use im::OrdMap;
use smallvec::SmallVec;

use crate::common::{Value, DOC_ID, RESERVED_FIELDS};
use crate::document::ModelId;
use crate::errors::{DocbindError, DocbindResult, ErrorKind};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// A raw document: the storage representation of a model.
///
/// Documents are flat key-value maps from field name to [Value]. Embedded
/// models are stored as nested [Value::Document] entries and embedded
/// sequences as [Value::Array] entries of documents; localized fields store a
/// locale→value document. Explicit [Value::Null] entries are kept, not
/// elided, so legacy nil attributes survive round-trips.
///
/// The `_id` field is reserved for the document's [ModelId] and cannot hold
/// any other value type.
///
/// Uses `im::OrdMap` (a persistent ordered map) internally: cloning is O(1)
/// via structural sharing and each mutated document is completely
/// independent, which keeps frozen sources safe while copies are built.
#[derive(Clone, Eq, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Associates the specified [Value] with the specified key in this
    /// document. If the key already exists, its value is updated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The key is empty
    /// * The key is the reserved field `_id` and the value is not a [ModelId]
    pub fn put<'a, T: Into<Value>>(
        &mut self,
        key: impl Into<Cow<'a, str>>,
        value: T,
    ) -> DocbindResult<()> {
        let key = key.into();
        // key cannot be empty
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocbindError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();

        // validate the _id field
        if key == DOC_ID && !value.is_id() {
            log::error!("Document id must be a ModelId value");
            return Err(DocbindError::new(
                "Document id must be a ModelId value",
                ErrorKind::InvalidOperation,
            ));
        }

        self.data = self.data.update(key.to_string(), value);
        Ok(())
    }

    /// Returns the [Value] to which the specified key is associated, or
    /// [Value::Null] if this document contains no mapping for the key.
    pub fn get(&self, key: &str) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => Value::Null,
        }
    }

    /// Return the [ModelId] associated with this document.
    ///
    /// If the document does not have an `_id` field, this method generates a
    /// new [ModelId] and assigns it to the document.
    pub fn id(&mut self) -> DocbindResult<ModelId> {
        if let Some(Value::Id(id)) = self.data.get(DOC_ID) {
            Ok(*id)
        } else {
            // if _id field is not populated already, create a new id
            // and set it in the document
            let model_id = ModelId::new();
            self.data = self
                .data
                .update(DOC_ID.to_string(), Value::Id(model_id));
            Ok(model_id)
        }
    }

    /// Checks if this document has an id.
    pub fn has_id(&self) -> bool {
        self.data.contains_key(DOC_ID)
    }

    /// Removes the key and its value from the document. Removing a missing
    /// key succeeds without error.
    pub fn remove(&mut self, key: &str) {
        self.data = self.data.without(key);
    }

    /// Returns the number of entries in the document.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Checks if a key exists in the document. An explicit null entry counts
    /// as present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Retrieves all non-reserved field names of this document.
    pub fn fields(&self) -> FieldVec {
        let mut fields = FieldVec::new();
        for key in self.data.keys() {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            fields.push(key.clone());
        }
        fields
    }

    /// Converts this document to a [BTreeMap].
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Gets an iterator over the key-value pairs of this document.
    pub fn iter(&self) -> DocumentIter {
        DocumentIter {
            keys: self.data.keys().cloned().collect(),
            data: self.clone(),
            index: 0,
        }
    }

    /// Returns a copy of this document without its `_id` entry.
    pub fn without_id(&self) -> Document {
        Document {
            data: self.data.without(DOC_ID),
        }
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let mut json_string = String::new();
        json_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            json_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                key,
                value.to_pretty_json(indent + 2)
            ));
        }

        json_string.pop();
        json_string.pop();
        json_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        json_string
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let mut debug_string = String::new();
        debug_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            debug_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                key,
                value.to_debug_string(indent + 2)
            ));
        }

        debug_string.pop();
        debug_string.pop();
        debug_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        debug_string
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

pub struct DocumentIter {
    keys: Vec<String>,
    data: Document,
    index: usize,
}

impl Iterator for DocumentIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.keys.len() {
            let key = &self.keys[self.index];
            self.index += 1;
            if let Some(value) = self.data.data.get(key) {
                return Some((key.clone(), value.clone()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.keys.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates an empty document.
pub fn empty_document() -> Document {
    Document::new()
}

/// Creates a document from a [BTreeMap], validating keys as it goes.
pub fn document_from_map(map: &BTreeMap<String, Value>) -> DocbindResult<Document> {
    let mut doc = Document::new();
    for (key, value) in map.iter() {
        doc.put(key, value.clone())?;
    }
    Ok(doc)
}

/// Creates a [Document] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use docbind::doc;
///
/// // Empty document
/// let empty = doc! {};
///
/// // Simple key-value pairs
/// let simple = doc! {
///     name: "Alice",
///     age: 30
/// };
///
/// // Nested documents and arrays
/// let complex = doc! {
///     name: {
///         first_name: "Charlie"
///     },
///     scores: [1, 2, 3]
/// };
/// ```
#[macro_export]
macro_rules! doc {
    // match an empty document (with braces)
    ({}) => {
        $crate::document::Document::new()
    };

    // match an empty document
    () => {
        $crate::document::Document::new()
    };

    // match a document with key value pairs (outer braces)
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    // match a document with key value pairs
    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::document::Document::new();
            $(
                doc.put(&$crate::document::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    // match an expression (variable, function call, literals, etc.)
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
