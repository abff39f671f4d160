use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::parse::parse_grams;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// A quantity as storage records carry it: sometimes a JSON number, sometimes a
/// label such as `"3.5g"` or `"15"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(Decimal),
    Text(String),
}

impl LooseNumber {
    /// Numeric values pass through untouched; labels go through [`parse_grams`].
    pub fn to_decimal(&self) -> Decimal {
        match self {
            Self::Number(value) => *value,
            Self::Text(label) => parse_grams(label),
        }
    }

    /// Settings-value reading: a label is tried as a plain decimal first (so a
    /// sign survives), then falls back to [`parse_grams`]. `None` when a label
    /// carries no digits.
    pub fn try_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(label) => {
                let trimmed = label.trim();
                Decimal::from_str(trimmed).ok().or_else(|| {
                    trimmed.chars().any(|ch| ch.is_ascii_digit()).then(|| parse_grams(trimmed))
                })
            }
        }
    }
}

impl From<Decimal> for LooseNumber {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The facts needed to price one item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPricingInput {
    #[serde(default, alias = "weight_grams")]
    pub weight: Option<LooseNumber>,
    #[serde(default)]
    pub custom_price: Option<Decimal>,
    #[serde(default, alias = "metal")]
    pub metal_kind: String,
}

impl ProductPricingInput {
    /// Resolved gram weight, never negative.
    pub fn weight_grams(&self) -> Decimal {
        self.weight
            .as_ref()
            .map(LooseNumber::to_decimal)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
    }

    pub fn override_price(&self) -> Option<Decimal> {
        self.custom_price.filter(|price| *price > Decimal::ZERO)
    }
}

/// The live gold price record driving repricing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityPrice {
    pub price_per_gram: Decimal,
    /// Stored alongside the price; the markup rule does not read it.
    #[serde(default)]
    pub carat: Option<Decimal>,
}

impl CommodityPrice {
    pub fn per_gram(price_per_gram: Decimal) -> Self {
        Self { price_per_gram, carat: None }
    }

    pub fn is_usable(&self) -> bool {
        self.price_per_gram > Decimal::ZERO
    }
}

/// A catalog row as the admin back-office stores it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: Option<LooseNumber>,
    #[serde(default)]
    pub metal_kind: String,
    #[serde(default)]
    pub custom_price: Option<Decimal>,
    #[serde(default)]
    pub current_price: Decimal,
}

impl ProductRecord {
    pub fn pricing_input(&self) -> ProductPricingInput {
        ProductPricingInput {
            weight: self.weight.clone(),
            custom_price: self.custom_price,
            metal_kind: self.metal_kind.clone(),
        }
    }
}
