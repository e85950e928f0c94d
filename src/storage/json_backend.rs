use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    domain::TransactionRecord,
    errors::{AnalyticsError, Result},
};

use super::RecordSource;

/// Reads records from a JSON export.
///
/// The file holds either a bare array of records (a single-user export, served
/// for any user id) or an object mapping user ids to record arrays. The file is
/// re-read on every call so edits show up without a restart.
///
/// Elements are decoded one by one. An element that is not a record object
/// (a `null`, a number, a nested array) becomes a blank record, which
/// validation then skips and counts, so one bad entry never fails the file.
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    SingleUser(Vec<Value>),
    PerUser(HashMap<String, Vec<Value>>),
}

impl JsonRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RecordFile> {
        let data = fs::read_to_string(&self.path).map_err(|err| {
            AnalyticsError::Storage(format!("cannot read {}: {err}", self.path.display()))
        })?;
        serde_json::from_str(&data).map_err(|err| {
            AnalyticsError::Storage(format!(
                "{} is neither a record array nor a map of user records: {err}",
                self.path.display()
            ))
        })
    }

    fn decode(&self, elements: Vec<Value>) -> Vec<TransactionRecord> {
        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                serde_json::from_value(element).unwrap_or_else(|err| {
                    warn!(path = %self.path.display(), index, %err, "unreadable record element");
                    TransactionRecord::default()
                })
            })
            .collect()
    }
}

impl RecordSource for JsonRecordSource {
    fn records_for(&self, user_id: &str) -> Result<Vec<TransactionRecord>> {
        let elements = match self.read()? {
            RecordFile::SingleUser(elements) => elements,
            RecordFile::PerUser(mut users) => {
                let elements = users.remove(user_id).unwrap_or_default();
                if elements.is_empty() {
                    debug!(user_id, path = %self.path.display(), "no records for user");
                }
                elements
            }
        };
        Ok(self.decode(elements))
    }
}
