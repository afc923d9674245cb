//! Core types for the dynamap persistence layer.
//!
//! This crate defines the dynamic value model, the tagged wire encoding the
//! remote store understands, the error taxonomy, and the narrow `StoreClient`
//! seam the engine crate drives. It contains no I/O of its own.

pub mod error;
pub mod store;
pub mod value;
pub mod wire;

pub use error::{FormatError, KeyDecodeError, PersistenceError, StoreError};
pub use store::{GetItemOutput, StoreClient};
pub use value::Value;
pub use wire::{CapacityReport, Item, TableCapacity, WireValue, WriteRequest};
