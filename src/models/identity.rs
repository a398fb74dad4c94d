use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::deserialize;

/// Composite key of a tradable asset: contract address plus optional sub-id.
///
/// FA2 contracts host many tokens under one address, so the address alone
/// is not unique. Equality is structural on both components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentity {
    #[serde(rename = "tokenAddress")]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize::opt_id")]
    pub token_id: Option<String>,
}

impl TokenIdentity {
    pub fn new(address: impl Into<String>, token_id: Option<&str>) -> Self {
        Self {
            address: address.into(),
            token_id: token_id.map(str::to_string),
        }
    }

    /// Composite key string: `address_tokenId`, or just `address` without a sub-id.
    ///
    /// This is the format used by the blocklist and the historical index.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TokenIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token_id {
            Some(id) => write!(f, "{}_{}", self.address, id),
            None => write!(f, "{}", self.address),
        }
    }
}
