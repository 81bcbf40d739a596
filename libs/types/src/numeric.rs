//! Price arithmetic on exact decimals.
//!
//! Prices are `rust_decimal` values wrapped in a newtype so they cannot be
//! confused with quantities or notionals. Quantities in this exchange are
//! whole shares and stay plain `u64`.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A price in currency units.
///
/// Prices are never negative. Zero is a valid value: market orders carry a
/// zero price that the matching algorithm ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Wrap a decimal, panicking on negative values.
    pub fn new(value: Decimal) -> Self {
        assert!(value >= Decimal::ZERO, "price cannot be negative");
        Self(value)
    }

    /// Wrap a decimal, returning `None` for negative values.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn from_int(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)?;
        if value < Decimal::ZERO {
            return Err(rust_decimal::Error::LessThanMinimumPossibleValue);
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Serialized as a decimal string so JSON consumers never lose precision.
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Accepts both string and number forms on the way in; order-entry clients
// tend to send whichever their JSON library produces.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PriceVisitor;

        impl serde::de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative decimal price")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Price, E> {
                Price::from_str(v).map_err(E::custom)
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Price, E> {
                let value = Decimal::from_f64(v)
                    .ok_or_else(|| E::custom(format!("unrepresentable price: {v}")))?;
                Price::try_new(value).ok_or_else(|| E::custom("price cannot be negative"))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price::from_int(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Price, E> {
                u64::try_from(v)
                    .map(Price::from_int)
                    .map_err(|_| E::custom("price cannot be negative"))
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Quantity-weighted average price over `(price, quantity)` pairs.
///
/// Returns zero when the total quantity is zero, matching the execution
/// report convention for orders with no fills.
pub fn weighted_average(fills: impl IntoIterator<Item = (Price, u64)>) -> Decimal {
    let mut total_value = Decimal::ZERO;
    let mut total_quantity: u64 = 0;
    for (price, quantity) in fills {
        total_value += price.as_decimal() * Decimal::from(quantity);
        total_quantity += quantity;
    }
    if total_quantity == 0 {
        Decimal::ZERO
    } else {
        total_value / Decimal::from(total_quantity)
    }
}
