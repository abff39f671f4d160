pub mod catalog;
pub mod installment;
pub mod parse;
pub mod repricing;
pub mod settings;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::domain::credit::{CreditPolicy, InstallmentQuote, SettingsRepresentation};
use crate::domain::product::{CommodityPrice, ProductPricingInput};
use crate::errors::DomainError;

use self::{
    installment::{FlatInterestCalculator, InstallmentCalculator},
    repricing::{GoldRepricingRule, PriceSource, RepricingRule},
    settings::{CreditPolicyResolver, SettingsResolver},
};

#[derive(Clone, Debug)]
pub struct OfferInput<'a> {
    pub product: &'a ProductPricingInput,
    pub commodity: &'a CommodityPrice,
    pub settings: &'a SettingsRepresentation,
}

/// A priced product together with every installment term it can be offered on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOffer {
    pub price: Decimal,
    pub source: PriceSource,
    pub policy: CreditPolicy,
    pub quotes: Vec<InstallmentQuote>,
}

pub trait PricingRuntime: Send + Sync {
    fn evaluate_product(&self, input: OfferInput<'_>) -> Result<ProductOffer, DomainError>;
}

/// The runtime storefront hosts build from configuration.
pub type DefaultPricingRuntime =
    DeterministicPricingRuntime<GoldRepricingRule, FlatInterestCalculator, SettingsResolver>;

pub struct DeterministicPricingRuntime<R, C, S> {
    repricing_rule: R,
    calculator: C,
    resolver: S,
}

impl<R, C, S> DeterministicPricingRuntime<R, C, S> {
    pub fn new(repricing_rule: R, calculator: C, resolver: S) -> Self {
        Self { repricing_rule, calculator, resolver }
    }

    pub fn repricing_rule(&self) -> &R {
        &self.repricing_rule
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    pub fn resolver(&self) -> &S {
        &self.resolver
    }
}

impl Default for DefaultPricingRuntime {
    fn default() -> Self {
        Self::new(GoldRepricingRule::default(), FlatInterestCalculator, SettingsResolver::default())
    }
}

impl DefaultPricingRuntime {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            GoldRepricingRule::new(config.pricing.markup_factor, &config.pricing.gold_keywords),
            FlatInterestCalculator,
            SettingsResolver::new(
                config.credit.preferred_provider.clone(),
                config.credit.fallback_policy(),
            ),
        )
    }
}

impl<R, C, S> PricingRuntime for DeterministicPricingRuntime<R, C, S>
where
    R: RepricingRule,
    C: InstallmentCalculator,
    S: CreditPolicyResolver,
{
    fn evaluate_product(&self, input: OfferInput<'_>) -> Result<ProductOffer, DomainError> {
        let policy = self.resolver.resolve(input.settings)?;
        let appraisal = self.repricing_rule.appraise(input.product, input.commodity);
        let quotes = self.calculator.quote_all(appraisal.amount, &policy);

        Ok(ProductOffer { price: appraisal.amount, source: appraisal.source, policy, quotes })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::{
        config::AppConfig,
        domain::{
            credit::{CreditPolicy, InstallmentQuote, SettingRow, SettingsRepresentation},
            product::{CommodityPrice, LooseNumber, ProductPricingInput},
        },
        errors::DomainError,
        pricing::{
            installment::InstallmentCalculator,
            repricing::PriceSource,
            DefaultPricingRuntime, DeterministicPricingRuntime, OfferInput, PricingRuntime,
        },
    };

    fn gold_chain() -> ProductPricingInput {
        ProductPricingInput {
            weight: Some(LooseNumber::from("3.5g")),
            custom_price: None,
            metal_kind: "Qızıl".to_string(),
        }
    }

    #[test]
    fn default_runtime_prices_and_quotes_in_one_pass() {
        let runtime = DefaultPricingRuntime::default();
        let product = gold_chain();
        let commodity = CommodityPrice::per_gram(Decimal::new(60, 0));
        let settings = SettingsRepresentation::default();

        let offer = runtime
            .evaluate_product(OfferInput {
                product: &product,
                commodity: &commodity,
                settings: &settings,
            })
            .expect("offer");

        assert_eq!(offer.price, Decimal::new(357, 0));
        assert_eq!(offer.source, PriceSource::Commodity);
        assert_eq!(offer.policy, CreditPolicy::default());
        assert_eq!(offer.quotes.len(), 5);
        assert!(offer.quotes.iter().all(|quote| quote.eligible));
    }

    #[test]
    fn runtime_uses_configured_markup() {
        let mut config = AppConfig::default();
        config.pricing.markup_factor = Decimal::new(2, 0);
        let runtime = DefaultPricingRuntime::from_config(&config);
        let product = gold_chain();
        let commodity = CommodityPrice::per_gram(Decimal::new(60, 0));
        let settings = SettingsRepresentation::default();

        let offer = runtime
            .evaluate_product(OfferInput {
                product: &product,
                commodity: &commodity,
                settings: &settings,
            })
            .expect("offer");

        assert_eq!(offer.price, Decimal::new(420, 0));
    }

    #[test]
    fn unusable_settings_surface_as_configuration_error() {
        let runtime = DefaultPricingRuntime::default();
        let product = gold_chain();
        let commodity = CommodityPrice::per_gram(Decimal::new(60, 0));
        let settings = SettingsRepresentation::Rows(vec![
            SettingRow {
                key: "credit_min_price".to_string(),
                value: Some(LooseNumber::from("900")),
            },
            SettingRow { key: "credit_max_price".to_string(), value: Some(LooseNumber::from("50")) },
        ]);

        let error = runtime
            .evaluate_product(OfferInput {
                product: &product,
                commodity: &commodity,
                settings: &settings,
            })
            .expect_err("inverted principal bounds");
        assert!(matches!(error, DomainError::Configuration(_)));
    }

    #[test]
    fn runtime_supports_explicit_engine_interfaces() {
        struct NoCreditCalculator;

        impl InstallmentCalculator for NoCreditCalculator {
            fn quote(
                &self,
                _principal: Decimal,
                _policy: &CreditPolicy,
                term_months: u32,
            ) -> InstallmentQuote {
                InstallmentQuote::ineligible(term_months)
            }
        }

        let defaults = DefaultPricingRuntime::default();
        let runtime = DeterministicPricingRuntime::new(
            defaults.repricing_rule().clone(),
            NoCreditCalculator,
            defaults.resolver().clone(),
        );
        let product = gold_chain();
        let commodity = CommodityPrice::per_gram(Decimal::new(60, 0));
        let settings = SettingsRepresentation::default();

        let offer = runtime
            .evaluate_product(OfferInput {
                product: &product,
                commodity: &commodity,
                settings: &settings,
            })
            .expect("offer");

        assert_eq!(offer.price, Decimal::new(357, 0));
        assert!(offer.quotes.iter().all(|quote| !quote.eligible));
    }
}
