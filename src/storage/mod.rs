pub mod json_backend;

use std::collections::HashMap;

use crate::{domain::TransactionRecord, errors::Result};

/// Supplies the raw transaction records of a user.
///
/// A user without records yields an empty list; that is a no-data report, not an error.
pub trait RecordSource: Send + Sync {
    fn records_for(&self, user_id: &str) -> Result<Vec<TransactionRecord>>;
}

/// Records held in memory, keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    records: HashMap<String, Vec<TransactionRecord>>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, record: TransactionRecord) {
        self.records.entry(user_id.into()).or_default().push(record);
    }

    pub fn with_records(
        user_id: impl Into<String>,
        records: impl IntoIterator<Item = TransactionRecord>,
    ) -> Self {
        let mut source = Self::new();
        source
            .records
            .insert(user_id.into(), records.into_iter().collect());
        source
    }
}

impl RecordSource for InMemoryRecordSource {
    fn records_for(&self, user_id: &str) -> Result<Vec<TransactionRecord>> {
        Ok(self.records.get(user_id).cloned().unwrap_or_default())
    }
}

pub use json_backend::JsonRecordSource;
