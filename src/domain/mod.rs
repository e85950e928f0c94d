pub mod record;
pub mod timeframe;
pub mod window;

pub use record::{Expense, SkipReason, TransactionRecord};
pub use timeframe::Timeframe;
pub use window::{BucketGranularity, DateRange};
