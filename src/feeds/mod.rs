//! Upstream collaborators: HTTP market feeds and the static blocklist.

pub mod blocklist;
pub mod client;

pub use blocklist::{Blocklist, BlocklistError};
pub use client::{FeedClient, FeedError};
