mod identity;
mod pool;
mod token;
mod valued;

pub use identity::TokenIdentity;
pub use pool::{DexKind, Pool, PoolLeg};
pub use token::{PeerQuote, RateBucket, ReferenceQuote, TokenQuote};
pub use valued::{EnrichedToken, HistoricalToken, RankedToken, ValuedPool, ValuedToken};
