use crate::common::Value;

/// A stored attribute of a model instance.
///
/// Every attribute is tagged with its provenance: `Declared` values belong to
/// a field declared on the model type; `Dynamic` values are schema-less
/// extras held outside the declared field set. The distinction drives the
/// deep-copy engine, which always carries declared values and carries dynamic
/// ones only when the type supports dynamic attribute storage.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Attribute {
    /// Value of a field declared on the model type.
    Declared(Value),
    /// Schema-less value stored outside the declared field set.
    Dynamic(Value),
}

impl Attribute {
    /// Gets the stored value regardless of provenance.
    pub fn value(&self) -> &Value {
        match self {
            Attribute::Declared(value) | Attribute::Dynamic(value) => value,
        }
    }

    /// Checks if this attribute lives outside the declared field set.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Attribute::Dynamic(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessor() {
        let attribute = Attribute::Declared(Value::I32(7));
        assert_eq!(attribute.value(), &Value::I32(7));
        assert!(!attribute.is_dynamic());

        let attribute = Attribute::Dynamic(Value::Null);
        assert_eq!(attribute.value(), &Value::Null);
        assert!(attribute.is_dynamic());
    }
}
