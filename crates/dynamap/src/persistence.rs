//! Write execution against the remote store.
//!
//! `PersistenceExecutor` turns an ordered list of operations into as few
//! physical store calls as the protocol allows, strictly in input order, and
//! folds each call's consumed-capacity report into one aggregate result.
//! Grouping saves calls, nothing more: there is no atomicity across a group.

use dynamap_core::error::{PersistenceError, StoreError};
use dynamap_core::store::StoreClient;
use dynamap_core::wire::{CapacityReport, Item, WriteRequest};
use tracing::{debug, warn};

use crate::codec;
use crate::config::Config;
use crate::error::Error;

/// Hard upper bound on operations per physical batch-write call.
///
/// This is the remote store's protocol limit, not a performance knob.
pub const GROUP_SIZE: usize = 10;

/// A single queued or dispatched write operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Overwrite the full item.
    Save(Item),
    /// Delete the item addressed by this key.
    Delete(Item),
}

impl Operation {
    /// The remote protocol's request shape for this operation.
    pub fn to_request(&self) -> WriteRequest {
        match self {
            Operation::Save(item) => WriteRequest::Put { item: item.clone() },
            Operation::Delete(key) => WriteRequest::Delete { key: key.clone() },
        }
    }
}

/// Aggregate outcome of one `perform_requests` invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExecutionResult {
    /// Total capacity units consumed across all calls, for this table.
    pub consumed_capacity: f64,
    /// Number of physical store calls issued (not number of operations).
    pub call_count: usize,
}

/// Outcome of a single-item read: the flattened fields plus what it cost.
#[derive(Clone, Debug, PartialEq)]
pub struct GetResult {
    pub fields: codec::FieldMap,
    pub consumed_capacity: f64,
}

/// Executes write operations against one table of the remote store.
pub struct PersistenceExecutor<C> {
    client: C,
    table_name: String,
}

impl<C: StoreClient> PersistenceExecutor<C> {
    pub fn new(client: C, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build an executor with the table name from [`Config::from_env`].
    pub fn from_env(client: C) -> Self {
        let config = Config::from_env();
        Self::new(client, config.table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Execute `operations` in groups of at most [`GROUP_SIZE`].
    pub fn perform_requests(&self, operations: &[Operation]) -> Result<ExecutionResult, StoreError> {
        self.perform_requests_grouped(operations, GROUP_SIZE)
    }

    /// Execute `operations` in consecutive groups of at most `group_size`,
    /// one physical call per group, strictly sequential and in input order.
    pub fn perform_requests_grouped(
        &self,
        operations: &[Operation],
        group_size: usize,
    ) -> Result<ExecutionResult, StoreError> {
        let mut result = ExecutionResult::default();
        for group in operations.chunks(group_size.max(1)) {
            let requests: Vec<WriteRequest> = group.iter().map(Operation::to_request).collect();
            let report = self.client.batch_write(&self.table_name, &requests)?;
            result.consumed_capacity += sum_consumed_capacity(&report, &self.table_name);
            result.call_count += 1;
            debug!(
                table = %self.table_name,
                operations = group.len(),
                call = result.call_count,
                "dispatched write group"
            );
        }
        Ok(result)
    }

    /// Save one item. Soft: a store failure is logged and reported as `false`,
    /// never raised.
    pub fn save_model(&self, item: Item) -> bool {
        self.perform_single(Operation::Save(item))
    }

    /// Save one item, failing if the underlying soft save did not succeed.
    pub fn save_model_strict(&self, item: Item) -> Result<(), PersistenceError> {
        if self.save_model(item) {
            Ok(())
        } else {
            Err(PersistenceError::SaveFailed)
        }
    }

    /// Delete one item by key. Soft, like [`save_model`](Self::save_model).
    pub fn delete_model(&self, key: Item) -> bool {
        self.perform_single(Operation::Delete(key))
    }

    /// Delete one item by key, failing if the soft delete did not succeed.
    pub fn delete_model_strict(&self, key: Item) -> Result<(), PersistenceError> {
        if self.delete_model(key) {
            Ok(())
        } else {
            Err(PersistenceError::DeleteFailed)
        }
    }

    /// Read one item by its full key, flattening every attribute into a
    /// dynamic field map. Absent items are `Ok(None)`.
    pub fn get_model(&self, key: &Item) -> Result<Option<GetResult>, Error> {
        let output = self.client.get_item(&self.table_name, key)?;
        let Some(item) = output.item else {
            return Ok(None);
        };
        let fields = codec::flatten_item(&item)?;
        Ok(Some(GetResult {
            fields,
            consumed_capacity: sum_consumed_capacity(&output.consumed_capacity, &self.table_name),
        }))
    }

    fn perform_single(&self, operation: Operation) -> bool {
        match self.perform_requests(std::slice::from_ref(&operation)) {
            Ok(_) => true,
            Err(err) => {
                warn!(table = %self.table_name, error = %err, "store write failed");
                false
            }
        }
    }
}

/// Sum the capacity units a report attributes to `table_name`.
///
/// The report is normalized to a list first; entries for other tables are
/// ignored.
pub fn sum_consumed_capacity(report: &CapacityReport, table_name: &str) -> f64 {
    report
        .entries()
        .iter()
        .filter(|entry| entry.table_name == table_name)
        .map(|entry| entry.capacity_units)
        .sum()
}
