//! Value marshaling and batched writes for a schemaless key-value store.
//!
//! `dynamap` sits between dynamic application values and a remote store that
//! speaks a strict, tagged attribute encoding. It provides:
//!
//! - [`codec`]: bidirectional conversion between [`Value`] field maps and the
//!   store's tagged wire format.
//! - [`primary_key`]: a reversible, URL-safe opaque identifier for a model's
//!   type name and key components.
//! - [`persistence`]: a write executor that groups operations into
//!   protocol-limited batches and tracks consumed capacity.
//! - [`batch`]: a scoped coordinator that queues save/delete calls and commits
//!   them in as few physical calls as possible.
//!
//! A batch is a call-count optimization, not a transaction: there is no
//! atomicity or cross-item consistency. The remote store itself is reached
//! only through the [`StoreClient`] seam; this crate never implements one.

pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod persistence;
pub mod primary_key;

#[cfg(test)]
pub(crate) mod test_util;

pub use batch::{Batch, BatchCoordinator};
pub use config::Config;
pub use error::{Error, Result};
pub use persistence::{ExecutionResult, GetResult, Operation, PersistenceExecutor, GROUP_SIZE};
pub use primary_key::PrimaryKey;

pub use dynamap_core::{
    CapacityReport, FormatError, GetItemOutput, Item, KeyDecodeError, PersistenceError,
    StoreClient, StoreError, TableCapacity, Value, WireValue, WriteRequest,
};
