//! Scoped write batching.
//!
//! A `BatchCoordinator` owns a stack of pending batches for one execution
//! context. While a batch scope is open, save/delete calls queue onto the
//! innermost batch instead of reaching the store; closing the scope resolves
//! to exactly one of three transitions:
//!
//! - the closure returns `Ok`: the batch commits through the executor;
//! - the closure returns `Err(Error::Rollback)`: the queued operations are
//!   discarded and the scope exits cleanly;
//! - the closure returns any other error: the queued operations are discarded
//!   and the error propagates unchanged.
//!
//! Batching reduces call count only. It is not a transaction: a committed
//! batch can partially succeed at the store, and nothing queued is validated
//! until commit.
//!
//! The coordinator is an explicit context value. Create one per thread or
//! task and thread it through calls; it is never shared between concurrent
//! contexts and so needs no locking.

use dynamap_core::error::PersistenceError;
use dynamap_core::store::StoreClient;
use dynamap_core::wire::Item;
use tracing::debug;
use uuid::Uuid;

use crate::error::Error;
use crate::persistence::{ExecutionResult, Operation, PersistenceExecutor};

/// An ordered queue of deferred write operations.
#[derive(Clone, Debug)]
pub struct Batch {
    id: Uuid,
    operations: Vec<Operation>,
}

impl Batch {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            operations: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn add(&mut self, operation: Operation) {
        self.operations.push(operation);
    }
}

impl Default for Batch {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes save/delete calls into the current batch, or straight to the
/// executor when no batch scope is open.
pub struct BatchCoordinator<C> {
    executor: PersistenceExecutor<C>,
    stack: Vec<Batch>,
}

impl<C: StoreClient> BatchCoordinator<C> {
    pub fn new(executor: PersistenceExecutor<C>) -> Self {
        Self {
            executor,
            stack: Vec::new(),
        }
    }

    pub fn executor(&self) -> &PersistenceExecutor<C> {
        &self.executor
    }

    /// Number of currently open batch scopes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Run `body` inside a fresh batch scope.
    ///
    /// Returns `Ok(Some(value))` when the body completed and the batch
    /// committed, and `Ok(None)` when the body rolled the batch back with
    /// [`Error::Rollback`]. Any other error discards the queued operations
    /// and propagates unchanged.
    ///
    /// Scopes nest: an inner `in_batch` gets its own queue and commits or
    /// aborts independently of the outer one.
    pub fn in_batch<T, F>(&mut self, body: F) -> Result<Option<T>, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
    {
        self.begin_batch();
        match body(self) {
            Ok(value) => {
                let batch = self.pop_current();
                self.commit(batch)?;
                Ok(Some(value))
            }
            Err(Error::Rollback) => {
                let batch = self.pop_current();
                debug!(batch_id = %batch.id, operations = batch.operations.len(), "batch rolled back");
                Ok(None)
            }
            Err(err) => {
                let batch = self.pop_current();
                debug!(batch_id = %batch.id, operations = batch.operations.len(), "batch aborted");
                Err(err)
            }
        }
    }

    /// Save an item: queued when a batch is open, otherwise dispatched
    /// immediately. Soft; a queued save reports success optimistically.
    pub fn save(&mut self, item: Item) -> bool {
        match self.stack.last_mut() {
            Some(batch) => {
                batch.add(Operation::Save(item));
                true
            }
            None => self.executor.save_model(item),
        }
    }

    /// Strict save: queued without validation when a batch is open (execution
    /// is deferred), otherwise dispatched immediately with failure raised.
    pub fn save_strict(&mut self, item: Item) -> Result<(), PersistenceError> {
        match self.stack.last_mut() {
            Some(batch) => {
                batch.add(Operation::Save(item));
                Ok(())
            }
            None => self.executor.save_model_strict(item),
        }
    }

    /// Delete an item by key: queued when a batch is open, otherwise
    /// dispatched immediately. Soft.
    pub fn delete(&mut self, key: Item) -> bool {
        match self.stack.last_mut() {
            Some(batch) => {
                batch.add(Operation::Delete(key));
                true
            }
            None => self.executor.delete_model(key),
        }
    }

    /// Strict delete: queued when a batch is open, otherwise dispatched
    /// immediately with failure raised.
    pub fn delete_strict(&mut self, key: Item) -> Result<(), PersistenceError> {
        match self.stack.last_mut() {
            Some(batch) => {
                batch.add(Operation::Delete(key));
                Ok(())
            }
            None => self.executor.delete_model_strict(key),
        }
    }

    fn begin_batch(&mut self) {
        let batch = Batch::new();
        debug!(batch_id = %batch.id, depth = self.stack.len() + 1, "entering batch scope");
        self.stack.push(batch);
    }

    fn pop_current(&mut self) -> Batch {
        // in_batch pushes on entry and the stack is private, so the pop is
        // always balanced.
        debug_assert!(!self.stack.is_empty(), "batch stack underflow");
        self.stack.pop().unwrap_or_default()
    }

    fn commit(&self, batch: Batch) -> Result<ExecutionResult, Error> {
        debug!(batch_id = %batch.id, operations = batch.operations.len(), "committing batch");
        Ok(self.executor.perform_requests(&batch.operations)?)
    }
}
