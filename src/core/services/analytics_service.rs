use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    analytics::{AnalyticsEngine, AnalyticsReport, ReportQuery},
    core::time::Clock,
    errors::Result,
    storage::RecordSource,
};

/// A report request as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub query: ReportQuery,
}

impl AnalyticsRequest {
    pub fn new(user_id: impl Into<String>, query: ReportQuery) -> Self {
        Self {
            user_id: user_id.into(),
            query,
        }
    }
}

/// Wires a record source and a clock to the engine.
pub struct AnalyticsService<S, C> {
    source: S,
    clock: C,
    engine: AnalyticsEngine,
}

impl<S: RecordSource, C: Clock> AnalyticsService<S, C> {
    pub fn new(source: S, clock: C, engine: AnalyticsEngine) -> Self {
        Self {
            source,
            clock,
            engine,
        }
    }

    /// Builds the report for `request`.
    ///
    /// The reporting range is resolved before the source is queried, so an
    /// invalid range never costs a round-trip.
    pub fn report(&self, request: &AnalyticsRequest) -> Result<AnalyticsReport> {
        let period = self.engine.resolve(&request.query, self.clock.now())?;
        let records = self.source.records_for(&request.user_id)?;
        debug!(
            user_id = %request.user_id,
            records = records.len(),
            "loaded records for analytics"
        );
        Ok(self.engine.report_for_period(&records, &period))
    }
}
