use crate::errors::{DocbindResult, ErrorKind};
use once_cell::sync::Lazy;
use std::fmt::{Debug, Display};
use uuid::Uuid;

static NIL_ID_ERROR: Lazy<crate::errors::DocbindError> = Lazy::new(|| {
    crate::errors::DocbindError::new(
        "ModelId validation error: id value must not be the nil uuid",
        ErrorKind::InvalidId,
    )
});

/// A unique identifier for model documents.
///
/// Every stored document is identified by a `ModelId` kept in its `_id`
/// field. A fresh id is generated when a model is constructed and whenever a
/// model graph is deep-copied, so a copy never shares identity with its
/// source.
///
/// # ID generation
///
/// Ids are random version-4 UUIDs: unique without coordination and safe to
/// generate on any thread.
///
/// # Examples
///
/// ```rust,ignore
/// use docbind::document::ModelId;
///
/// // Auto-generate an id
/// let id = ModelId::new();
///
/// // Parse a stored id
/// let id = ModelId::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8")?;
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy, serde::Deserialize, serde::Serialize)]
pub struct ModelId {
    id_value: Uuid,
}

impl ModelId {
    /// Generates a new unique `ModelId`.
    pub fn new() -> Self {
        ModelId {
            id_value: Uuid::new_v4(),
        }
    }

    /// Parses a `ModelId` from its string form.
    ///
    /// # Returns
    ///
    /// `Ok(ModelId)` if the string is a valid, non-nil UUID, or
    /// `Err(DocbindError)` with [ErrorKind::InvalidId] otherwise.
    pub fn parse_str(value: &str) -> DocbindResult<ModelId> {
        let id_value = Uuid::parse_str(value)?;
        ModelId::valid_id(&id_value)?;
        Ok(ModelId { id_value })
    }

    /// Gets the underlying UUID value of this id.
    pub fn id_value(&self) -> Uuid {
        self.id_value
    }

    pub(crate) fn valid_id(id_value: &Uuid) -> DocbindResult<bool> {
        if id_value.is_nil() {
            log::error!("Id value is the nil uuid");
            return Err(NIL_ID_ERROR.clone());
        }
        Ok(true)
    }
}

impl Default for ModelId {
    fn default() -> Self {
        ModelId::new()
    }
}

impl Debug for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.id_value)
    }
}

impl Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.id_value)
    }
}
