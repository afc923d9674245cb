//! The narrow seam to the remote store's client.
//!
//! This layer never implements a store client; it only drives one through
//! `StoreClient`. Connection handling, auth, retries, and timeouts all belong
//! to the implementation behind this trait.

use crate::error::StoreError;
use crate::wire::{CapacityReport, Item, WriteRequest};

/// Result of a single-item read.
#[derive(Clone, Debug, PartialEq)]
pub struct GetItemOutput {
    /// The raw item, absent when no item matched the key.
    pub item: Option<Item>,
    /// Capacity consumed by the call.
    pub consumed_capacity: CapacityReport,
}

/// A client for the remote schemaless key-value store.
///
/// Calls are synchronous and block until the store responds. Implementations
/// must be safe to share across threads; this layer adds no locking of its
/// own.
pub trait StoreClient: Send + Sync {
    /// Write a group of put/delete requests against one table in a single
    /// physical call.
    fn batch_write(
        &self,
        table_name: &str,
        requests: &[WriteRequest],
    ) -> Result<CapacityReport, StoreError>;

    /// Read a single item by its full key.
    fn get_item(&self, table_name: &str, key: &Item) -> Result<GetItemOutput, StoreError>;
}

impl<T: StoreClient + ?Sized> StoreClient for &T {
    fn batch_write(
        &self,
        table_name: &str,
        requests: &[WriteRequest],
    ) -> Result<CapacityReport, StoreError> {
        (**self).batch_write(table_name, requests)
    }

    fn get_item(&self, table_name: &str, key: &Item) -> Result<GetItemOutput, StoreError> {
        (**self).get_item(table_name, key)
    }
}

impl<T: StoreClient + ?Sized> StoreClient for std::sync::Arc<T> {
    fn batch_write(
        &self,
        table_name: &str,
        requests: &[WriteRequest],
    ) -> Result<CapacityReport, StoreError> {
        (**self).batch_write(table_name, requests)
    }

    fn get_item(&self, table_name: &str, key: &Item) -> Result<GetItemOutput, StoreError> {
        (**self).get_item(table_name, key)
    }
}
