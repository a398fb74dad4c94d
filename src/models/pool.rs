use bigdecimal::BigDecimal;
use serde::Deserialize;

use super::TokenIdentity;
use crate::utils::deserialize;

/// Exchange family of a pool. Determines how raw reserves are normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DexKind {
    /// Fee-bearing pools whose raw reserves carry a fee-scaling factor.
    Alien,
    /// Every other exchange type, keyed by its upstream tag.
    Standard(String),
}

impl DexKind {
    pub fn from_tag(tag: &str) -> Self {
        if tag == "alien" {
            DexKind::Alien
        } else {
            DexKind::Standard(tag.to_string())
        }
    }
}

/// One side of a liquidity pool.
#[derive(Debug, Clone)]
pub struct PoolLeg {
    pub token: TokenIdentity,
    pub decimals: u8,
    /// Raw on-chain reserve (not scaled by decimals)
    pub reserves: BigDecimal,
}

/// Liquidity pool as listed by the pool service.
///
/// Wire format: `{ "dex": { "type": "..." }, "tokens": [ { "token": {...}, "reserves": "..." } ] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "PoolWire")]
pub struct Pool {
    pub dex: DexKind,
    pub legs: Vec<PoolLeg>,
}

impl Pool {
    pub fn new(dex: DexKind, legs: Vec<PoolLeg>) -> Self {
        Self { dex, legs }
    }

    /// The leg holding `identity`, if the pool contains it.
    pub fn leg_for(&self, identity: &TokenIdentity) -> Option<&PoolLeg> {
        self.legs.iter().find(|leg| &leg.token == identity)
    }

    pub fn contains(&self, identity: &TokenIdentity) -> bool {
        self.leg_for(identity).is_some()
    }
}

#[derive(Deserialize)]
struct PoolWire {
    dex: DexWire,
    tokens: Vec<LegWire>,
}

#[derive(Deserialize)]
struct DexWire {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct LegWire {
    token: LegTokenWire,
    #[serde(deserialize_with = "deserialize::decimal")]
    reserves: BigDecimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegTokenWire {
    token_address: String,
    #[serde(default, deserialize_with = "deserialize::opt_id")]
    token_id: Option<String>,
    decimals: u8,
}

impl From<PoolWire> for Pool {
    fn from(wire: PoolWire) -> Self {
        let legs = wire
            .tokens
            .into_iter()
            .map(|leg| PoolLeg {
                token: TokenIdentity {
                    address: leg.token.token_address,
                    token_id: leg.token.token_id,
                },
                decimals: leg.token.decimals,
                reserves: leg.reserves,
            })
            .collect();

        Self {
            dex: DexKind::from_tag(&wire.dex.kind),
            legs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL_JSON: &str = r#"{
        "dex": { "type": "quipuswap", "address": "KT1dex" },
        "tokens": [
            { "token": { "tokenAddress": "tez", "tokenId": null, "decimals": 6 }, "reserves": "250000000" },
            { "token": { "tokenAddress": "KT1abc", "tokenId": "0", "decimals": 8 }, "reserves": 1200000000 }
        ]
    }"#;

    #[test]
    fn test_pool_decodes_legs() {
        let pool: Pool = serde_json::from_str(POOL_JSON).unwrap();
        assert_eq!(pool.dex, DexKind::Standard("quipuswap".to_string()));
        assert_eq!(pool.legs.len(), 2);

        let leg = pool.leg_for(&TokenIdentity::new("KT1abc", Some("0"))).unwrap();
        assert_eq!(leg.decimals, 8);
        assert_eq!(leg.reserves, BigDecimal::from(1_200_000_000));
    }

    #[test]
    fn test_alien_tag_matches_exactly() {
        assert_eq!(DexKind::from_tag("alien"), DexKind::Alien);
        assert_eq!(
            DexKind::from_tag("Alien"),
            DexKind::Standard("Alien".to_string())
        );
        assert_eq!(
            DexKind::from_tag("vortex"),
            DexKind::Standard("vortex".to_string())
        );
    }

    #[test]
    fn test_contains_requires_matching_token_id() {
        let pool: Pool = serde_json::from_str(POOL_JSON).unwrap();
        assert!(pool.contains(&TokenIdentity::new("tez", None)));
        assert!(!pool.contains(&TokenIdentity::new("KT1abc", Some("1"))));
    }

    #[test]
    fn test_unquoted_reserve_keeps_full_precision() {
        let json = r#"{
            "dex": { "type": "alien" },
            "tokens": [
                { "token": { "tokenAddress": "KT1abc", "tokenId": "0", "decimals": 18 },
                  "reserves": 123456789012345678901234567 }
            ]
        }"#;

        let pool: Pool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.dex, DexKind::Alien);
        assert_eq!(
            pool.legs[0].reserves,
            crate::utils::parse_decimal("123456789012345678901234567").unwrap()
        );
    }

    #[test]
    fn test_leg_without_reserves_is_rejected() {
        let json = r#"{
            "dex": { "type": "quipuswap" },
            "tokens": [ { "token": { "tokenAddress": "tez", "decimals": 6 } } ]
        }"#;
        assert!(serde_json::from_str::<Pool>(json).is_err());
    }

    #[test]
    fn test_pool_without_dex_type_is_rejected() {
        let json = r#"{ "dex": {}, "tokens": [] }"#;
        assert!(serde_json::from_str::<Pool>(json).is_err());
    }
}
