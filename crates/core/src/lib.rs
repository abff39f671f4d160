pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use domain::credit::{
    CreditOption, CreditPolicy, InstallmentQuote, SettingRow, SettingsRepresentation,
    CANDIDATE_TERMS,
};
pub use domain::product::{CommodityPrice, LooseNumber, ProductId, ProductPricingInput, ProductRecord};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use pricing::catalog::{reprice_catalog, CatalogRepricing, RepricedProduct};
pub use pricing::installment::{quote, quote_all, FlatInterestCalculator, InstallmentCalculator};
pub use pricing::parse::parse_grams;
pub use pricing::repricing::{reprice, Appraisal, GoldRepricingRule, PriceSource, RepricingRule};
pub use pricing::settings::{resolve_credit_policy, CreditPolicyResolver, SettingsResolver};
pub use pricing::{
    DefaultPricingRuntime, DeterministicPricingRuntime, OfferInput, PricingRuntime, ProductOffer,
};
