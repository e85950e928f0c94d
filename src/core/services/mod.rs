pub mod analytics_service;

pub use analytics_service::{AnalyticsRequest, AnalyticsService};
