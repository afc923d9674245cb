use thiserror::Error;

/// Errors raised by the attribute codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A set mixed incompatible element kinds, e.g. text and numbers.
    #[error("Set must contain a single element kind, found: {0}")]
    HeterogeneousSet(String),
    /// A set was uniform but of a kind the wire format has no set encoding
    /// for, e.g. a set of booleans or maps.
    #[error("Unsupported set element kind: {0}")]
    UnsupportedSetElement(&'static str),
    /// NaN and infinities have no decimal-string encoding.
    #[error("Cannot encode non-finite number: {0}")]
    NonFiniteNumber(String),
    /// A wire number field held something that is not a decimal string.
    #[error("Invalid decimal number from store: {0}")]
    InvalidNumber(String),
    /// A tagged wire value with nothing populated.
    #[error("Unexpected value type from store")]
    UnexpectedWireValue,
}

/// Errors raised while decoding an opaque primary-key identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyDecodeError {
    #[error("Invalid base64 in primary key: {0}")]
    Base64(String),
    #[error("Invalid primary key payload: {0}")]
    Payload(String),
    #[error("Expected 3 primary key components, found {0}")]
    Shape(usize),
}

/// A remote store call failed.
///
/// Store clients normalize their own error types into this one; by the time
/// an error crosses the `StoreClient` seam it is a message, not a foreign
/// type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Store call failed: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A strict save/delete found that its underlying soft call did not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Failed to save item")]
    SaveFailed,
    #[error("Failed to delete item")]
    DeleteFailed,
}
