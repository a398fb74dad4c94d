pub mod config;
pub mod feeds;
pub mod models;
pub mod pricing;
pub mod report;
pub mod utils;

pub use config::Settings;
pub use feeds::{Blocklist, FeedClient};
pub use pricing::{MarketPipeline, MarketSnapshot};
pub use report::Report;
