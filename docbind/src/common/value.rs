use crate::document::Document;
use crate::document::ModelId;
use std::fmt::{Debug, Display, Formatter};

/// Compare two floats for equality with proper NaN handling.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// Represents a [Document] field value. It can be a simple value like
/// [Value::I64] or [Value::String], or a complex value like [Value::Document]
/// or [Value::Array].
///
/// # Purpose
/// Provides a unified representation for all value types the mapper stores in
/// documents: JSON-compatible scalars, nested documents (used for embedded
/// models and locale→value maps of localized fields), ordered arrays (used
/// for embedded sequences), primary keys and raw bytes.
///
/// # Characteristics
/// - **Type-safe**: Each variant explicitly represents its type
/// - **Comparable**: NaN-aware equality so stored floats round-trip
/// - **Serializable**: Can be serialized/deserialized with serde
/// - **Default**: Defaults to Null
///
/// # Usage
/// Create values using the `From` trait or the `doc!` macro:
/// ```text
/// let v1: Value = 42.into();           // From i32
/// let v2 = Value::from("hello");       // From &str
/// let doc = doc! { age: 42, name: "Alice" };
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
pub enum Value {
    /// Represents an explicit null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a primary-key value.
    Id(ModelId),
    /// Represents a nested document value.
    Document(Document),
    /// Represents an ordered array value.
    Array(Vec<Value>),
    /// Represents a byte array value. It cannot be localized or used as a
    /// discriminator.
    Bytes(Vec<u8>),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        // integers of different widths compare by numeric value
        if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64()) {
            return a == b;
        }

        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => *a == *b,
            (Value::F64(a), Value::F64(b)) => num_eq_float(*a, *b),
            (Value::String(a), Value::String(b)) => *a == *b,
            (Value::Id(a), Value::Id(b)) => *a == *b,
            (Value::Document(a), Value::Document(b)) => *a == *b,
            (Value::Array(a), Value::Array(b)) => *a == *b,
            (Value::Bytes(a), Value::Bytes(b)) => *a == *b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Checks if this value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks if this value is a nested [Document].
    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    /// Checks if this value is a primary-key id.
    pub fn is_id(&self) -> bool {
        matches!(self, Value::Id(_))
    }

    /// Checks if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric value widened to i64 for any integer variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I32(i) => Some(*i as i64),
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<&ModelId> {
        match self {
            Value::Id(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::I32(i) => i.to_string(),
            Value::I64(i) => i.to_string(),
            Value::F64(f) => f.to_string(),
            Value::String(s) => format!("\"{}\"", s),
            Value::Id(id) => format!("\"{}\"", id),
            Value::Document(doc) => doc.to_pretty_json(indent),
            Value::Array(arr) => {
                let items: Vec<String> =
                    arr.iter().map(|v| v.to_pretty_json(indent)).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("bool({})", b),
            Value::I32(i) => format!("i32({})", i),
            Value::I64(i) => format!("i64({})", i),
            Value::F64(f) => format!("f64({})", f),
            Value::String(s) => format!("string(\"{}\")", s),
            Value::Id(id) => format!("id({})", id),
            Value::Document(doc) => doc.to_debug_string(indent),
            Value::Array(arr) => {
                let items: Vec<String> =
                    arr.iter().map(|v| v.to_debug_string(indent)).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Bytes(bytes) => format!("bytes({})", bytes.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<ModelId> for Value {
    fn from(value: ModelId) -> Self {
        Value::Id(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_default_is_null() {
        let value = Value::default();
        assert!(value.is_null());
    }

    #[test]
    fn test_integer_widening_eq() {
        assert_eq!(Value::I32(42), Value::I64(42));
        assert_ne!(Value::I32(42), Value::I64(43));
    }

    #[test]
    fn test_float_nan_eq() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert_ne!(Value::F64(f64::NAN), Value::F64(1.0));
        assert_eq!(Value::F64(1.5), Value::F64(1.5));
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::I32(42));
        assert_eq!(Value::from(42i64), Value::I64(42));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(
            Value::from("hello".to_string()),
            Value::String("hello".to_string())
        );
    }

    #[test]
    fn test_as_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::I32(1).as_i64(), Some(1));
        assert_eq!(Value::I64(1).as_i64(), Some(1));
        assert_eq!(Value::F64(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::String("a".to_string()).as_str(), Some("a"));
        assert_eq!(Value::Null.as_str(), None);
    }

    #[test]
    fn test_is_document() {
        let value = Value::Document(doc! { key: 1 });
        assert!(value.is_document());
        assert!(!Value::Null.is_document());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", Value::I32(2)), "2");
        assert_eq!(
            format!("{}", Value::String("value".to_string())),
            "\"value\""
        );
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Value::I32(2)), "i32(2)");
        assert_eq!(
            format!("{:?}", Value::String("value".to_string())),
            "string(\"value\")"
        );
    }

    #[test]
    fn test_array_eq() {
        let a = Value::Array(vec![Value::I32(1), Value::I32(2)]);
        let b = Value::Array(vec![Value::I64(1), Value::I64(2)]);
        assert_eq!(a, b);
    }
}
