//! Shared mock store client for executor and coordinator tests.

use std::sync::Mutex;

use dynamap_core::error::StoreError;
use dynamap_core::store::{GetItemOutput, StoreClient};
use dynamap_core::wire::{CapacityReport, Item, WireValue, WriteRequest};

/// A `StoreClient` that records every batch-write call it receives.
pub struct RecordingClient {
    /// The requests of each batch-write call, in call order.
    pub calls: Mutex<Vec<Vec<WriteRequest>>>,
    report: CapacityReport,
    item: Option<Item>,
    fail: bool,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            report: CapacityReport::empty(),
            item: None,
            fail: false,
        }
    }

    /// Return `report` from every call.
    pub fn with_report(mut self, report: CapacityReport) -> Self {
        self.report = report;
        self
    }

    /// Return `item` from every get-item call.
    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    /// Fail every store call.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Request count of each recorded batch-write call, in call order.
    pub fn call_sizes(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(Vec::len).collect()
    }
}

impl StoreClient for RecordingClient {
    fn batch_write(
        &self,
        _table_name: &str,
        requests: &[WriteRequest],
    ) -> Result<CapacityReport, StoreError> {
        if self.fail {
            return Err(StoreError::new("simulated write failure"));
        }
        self.calls.lock().unwrap().push(requests.to_vec());
        Ok(self.report.clone())
    }

    fn get_item(&self, _table_name: &str, _key: &Item) -> Result<GetItemOutput, StoreError> {
        if self.fail {
            return Err(StoreError::new("simulated read failure"));
        }
        Ok(GetItemOutput {
            item: self.item.clone(),
            consumed_capacity: self.report.clone(),
        })
    }
}

/// An item with a single `id` string attribute.
pub fn item_with_id(id: &str) -> Item {
    let mut item = Item::new();
    item.insert("id".to_string(), WireValue::S(id.to_string()));
    item
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with `DYNAMAP_TABLE_NAME` removed, restoring any previous value.
/// Serializes callers so concurrent tests never race on the process
/// environment.
pub fn without_table_name_var<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = std::env::var("DYNAMAP_TABLE_NAME").ok();
    std::env::remove_var("DYNAMAP_TABLE_NAME");
    let result = f();
    if let Some(value) = previous {
        std::env::set_var("DYNAMAP_TABLE_NAME", value);
    }
    result
}

/// Run `f` with `DYNAMAP_TABLE_NAME` set to `value`, restoring the previous
/// state afterwards.
pub fn with_table_name_var<T>(value: &str, f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = std::env::var("DYNAMAP_TABLE_NAME").ok();
    std::env::set_var("DYNAMAP_TABLE_NAME", value);
    let result = f();
    match previous {
        Some(original) => std::env::set_var("DYNAMAP_TABLE_NAME", original),
        None => std::env::remove_var("DYNAMAP_TABLE_NAME"),
    }
    result
}
