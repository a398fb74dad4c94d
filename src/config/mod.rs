#[allow(clippy::module_inception)]
mod config;

pub use config::{FeedSettings, ReportFormat, ReportSettings, Settings, ValuationSettings};
