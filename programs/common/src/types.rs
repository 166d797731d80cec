//! Core value types

pub use alloy_primitives::{Address, U256};

/// Token and base-currency amount, fixed-point at 1e18 ("wei" scale)
pub type Amount = U256;

/// Decimals of both the launched token and the base currency
pub const DECIMALS: u8 = 18;

/// One whole unit at 1e18 scale
pub const WAD: Amount = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Trade direction relative to the launched token
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Base currency in, tokens out
    Buy,
    /// Tokens in, base currency out
    Sell,
}

/// Whole units scaled to 1e18
pub fn units(n: u64) -> Amount {
    U256::from(n) * WAD
}

/// Serde adapter writing amounts as decimal ether strings ("25", "0.5").
///
/// Use with `#[serde(with = "fairlaunch_common::ether")]`.
pub mod ether {
    use super::Amount;
    use alloy_primitives::utils::{format_ether, parse_ether};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_ether(*amount))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_ether(raw.trim()).map_err(|e| D::Error::custom(format!("invalid amount {raw:?}: {e}")))
    }

    /// Same encoding for optional amounts
    pub mod option {
        use super::Amount;
        use alloy_primitives::utils::{format_ether, parse_ether};
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            amount: &Option<Amount>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match amount {
                Some(a) => serializer.serialize_some(&format_ether(*a)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Amount>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| {
                parse_ether(s.trim())
                    .map_err(|e| D::Error::custom(format!("invalid amount {s:?}: {e}")))
            })
            .transpose()
        }
    }
}
