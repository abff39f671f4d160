use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::product::{CommodityPrice, ProductPricingInput};

pub const DEFAULT_GOLD_KEYWORDS: [&str; 3] = ["gold", "qızıl", "qizil"];

/// Markup applied on top of raw gold value unless configured otherwise.
pub fn default_markup_factor() -> Decimal {
    Decimal::new(17, 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Override,
    Commodity,
    NotApplicable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appraisal {
    pub amount: Decimal,
    pub source: PriceSource,
}

pub trait RepricingRule: Send + Sync {
    fn appraise(&self, input: &ProductPricingInput, commodity: &CommodityPrice) -> Appraisal;

    fn reprice(&self, input: &ProductPricingInput, commodity: &CommodityPrice) -> Decimal {
        self.appraise(input, commodity).amount
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoldRepricingRule {
    markup_factor: Decimal,
    gold_keywords: Vec<String>,
}

impl Default for GoldRepricingRule {
    fn default() -> Self {
        Self::new(default_markup_factor(), DEFAULT_GOLD_KEYWORDS)
    }
}

impl GoldRepricingRule {
    pub fn new<I, S>(markup_factor: Decimal, gold_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let gold_keywords = gold_keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { markup_factor, gold_keywords }
    }

    pub fn with_markup(markup_factor: Decimal) -> Self {
        Self { markup_factor, ..Self::default() }
    }

    pub fn markup_factor(&self) -> Decimal {
        self.markup_factor
    }

    pub fn is_gold(&self, metal_kind: &str) -> bool {
        let metal_kind = metal_kind.to_lowercase();
        self.gold_keywords.iter().any(|keyword| metal_kind.contains(keyword.as_str()))
    }
}

impl RepricingRule for GoldRepricingRule {
    fn appraise(&self, input: &ProductPricingInput, commodity: &CommodityPrice) -> Appraisal {
        if let Some(amount) = input.override_price() {
            return Appraisal { amount, source: PriceSource::Override };
        }

        if !self.is_gold(&input.metal_kind) {
            return Appraisal { amount: Decimal::ZERO, source: PriceSource::NotApplicable };
        }

        if !commodity.is_usable() {
            debug!(
                event_name = "pricing.repricing.disabled_non_positive_price",
                price_per_gram = %commodity.price_per_gram,
                "commodity price is not positive; repricing disabled"
            );
            return Appraisal { amount: Decimal::ZERO, source: PriceSource::NotApplicable };
        }

        let weight_grams = input.weight_grams();
        let Some(amount) = weight_grams
            .checked_mul(commodity.price_per_gram)
            .and_then(|value| value.checked_mul(self.markup_factor))
        else {
            warn!(
                event_name = "pricing.repricing.overflow",
                weight_grams = %weight_grams,
                price_per_gram = %commodity.price_per_gram,
                markup_factor = %self.markup_factor,
                "commodity price out of decimal range; item left unpriced"
            );
            return Appraisal { amount: Decimal::ZERO, source: PriceSource::NotApplicable };
        };
        Appraisal { amount, source: PriceSource::Commodity }
    }
}

/// Sale price of one item using the default gold keywords.
pub fn reprice(
    input: &ProductPricingInput,
    commodity: &CommodityPrice,
    markup_factor: Decimal,
) -> Decimal {
    GoldRepricingRule::with_markup(markup_factor).reprice(input, commodity)
}
