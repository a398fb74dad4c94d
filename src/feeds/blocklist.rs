use std::{fs, path::Path};

use log::info;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::models::TokenIdentity;

const LEGACY_EMPTY_IDS: [&str; 2] = ["null", "undefined"];

#[derive(Debug, Error)]
pub enum BlocklistError {
    #[error("failed to read blocklist {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("blocklist {path} is not a JSON array of strings: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Tokens excluded from pricing, keyed by composite identity (`address_tokenId`).
///
/// A blocked token always prices at zero, whatever its quotes say.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    keys: FxHashSet<String>,
}

impl Blocklist {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a JSON array of composite identity strings.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BlocklistError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = fs::read_to_string(path).map_err(|source| BlocklistError::Io {
            path: display.clone(),
            source,
        })?;
        let keys: Vec<String> = serde_json::from_str(&raw).map_err(|source| BlocklistError::Parse {
            path: display.clone(),
            source,
        })?;

        info!("Loaded {} blocked tokens from {}", keys.len(), display);
        Ok(Self::new(keys))
    }

    /// Tokens without a sub-id also match entries written as `address_null`
    /// or `address_undefined`, the form older blocklist files use.
    pub fn is_blocked(&self, identity: &TokenIdentity) -> bool {
        if self.keys.contains(&identity.key()) {
            return true;
        }
        identity.token_id.is_none()
            && LEGACY_EMPTY_IDS
                .iter()
                .any(|id| self.keys.contains(&format!("{}_{}", identity.address, id)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
