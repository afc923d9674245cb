use dynamap_core::error::{FormatError, KeyDecodeError, PersistenceError, StoreError};
use thiserror::Error;

/// Errors surfaced by the dynamap engine.
///
/// The leaf enums live in `dynamap_core::error`; this type aggregates them so
/// a batch scope has a single error channel. Arbitrary caller errors ride in
/// the `Other` variant and cross the scope with their message intact.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    KeyDecode(#[from] KeyDecodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    /// Control-flow marker that discards the current batch without an error.
    /// Consumed by `BatchCoordinator::in_batch`, never surfaced to its caller.
    #[error("Batch rollback requested")]
    Rollback,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
