use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, ReadExecutor};

/// Error kinds for docbind operations.
///
/// Each error kind describes a specific category of failure in the mapping
/// layer, enabling precise error handling.
///
/// # Examples
///
/// ```rust,ignore
/// use docbind::errors::{DocbindError, ErrorKind, DocbindResult};
///
/// fn example() -> DocbindResult<()> {
///     Err(DocbindError::new("Model type not registered", ErrorKind::UnknownType))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The operation is not valid in the current context (frozen model,
    /// reserved field, malformed key).
    InvalidOperation,
    /// Generic validation error
    ValidationError,
    /// Error mapping a model to/from a document
    ObjectMappingError,
    /// Model type is not registered in the type registry
    UnknownType,
    /// The field is not declared on the model type and the type does not
    /// support dynamic attributes
    UnknownField,
    /// The provided ID is invalid
    InvalidId,
    /// The requested resource was not found
    NotFound,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::UnknownType => write!(f, "Unknown type"),
            ErrorKind::UnknownField => write!(f, "Unknown field"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom docbind error type.
///
/// `DocbindError` encapsulates error information including the error message,
/// kind, and optional cause. It supports error chaining and backtraces for
/// debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use docbind::errors::{DocbindError, ErrorKind};
///
/// // Create a simple error
/// let err = DocbindError::new("Unknown field", ErrorKind::UnknownField);
///
/// // Create an error with a cause
/// let cause = DocbindError::new("Bad id string", ErrorKind::InvalidId);
/// let err = DocbindError::new_with_cause("Load failed", ErrorKind::ObjectMappingError, cause);
/// ```
///
/// # Type alias
///
/// The `DocbindResult<T>` type alias is equivalent to `Result<T, DocbindError>`
/// and is used throughout the codebase for operations that can fail.
#[derive(Clone)]
pub struct DocbindError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocbindError>>,
    backtrace: Atomic<Backtrace>,
}

impl DocbindError {
    /// Creates a new `DocbindError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocbindError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `DocbindError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocbindError) -> Self {
        DocbindError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<DocbindError>> {
        self.cause.as_ref()
    }
}

impl Display for DocbindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocbindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => self.backtrace.read_with(|bt| write!(f, "{}\n{:?}", self.message, bt)),
        }
    }
}

impl Error for DocbindError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docbind operations.
///
/// `DocbindResult<T>` is shorthand for `Result<T, DocbindError>`.
/// All fallible docbind operations return this type.
pub type DocbindResult<T> = Result<T, DocbindError>;

impl From<uuid::Error> for DocbindError {
    fn from(err: uuid::Error) -> Self {
        DocbindError::new(&format!("Invalid id string: {}", err), ErrorKind::InvalidId)
    }
}

impl From<String> for DocbindError {
    fn from(msg: String) -> Self {
        DocbindError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for DocbindError {
    fn from(msg: &str) -> Self {
        DocbindError::new(msg, ErrorKind::InternalError)
    }
}
