use std::path::Path;

use karat_core::config::ConfigOverrides;
use karat_core::{
    ApplicationError, CommodityPrice, GoldRepricingRule, PriceSource, ProductPricingInput,
    RepricingRule,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::{load_config, money, read_json, CommandResult};

#[derive(Debug, Serialize)]
struct RepriceOutput {
    amount: String,
    source: PriceSource,
    markup_factor: Decimal,
}

pub fn run(product: &Path, commodity: &Path, markup: Option<Decimal>) -> CommandResult {
    match execute(product, commodity, markup) {
        Ok(output) => CommandResult::with_data(
            "reprice",
            format!("priced at {} ({:?})", output.amount, output.source),
            Some(output),
        ),
        Err(error) => CommandResult::from_error("reprice", error),
    }
}

fn execute(
    product: &Path,
    commodity: &Path,
    markup: Option<Decimal>,
) -> Result<RepriceOutput, ApplicationError> {
    let config = load_config(ConfigOverrides { markup_factor: markup, ..ConfigOverrides::default() })?;
    let product = read_json::<ProductPricingInput>(product)?;
    let commodity = read_json::<CommodityPrice>(commodity)?;

    let rule = GoldRepricingRule::new(config.pricing.markup_factor, &config.pricing.gold_keywords);
    let appraisal = rule.appraise(&product, &commodity);

    Ok(RepriceOutput {
        amount: money(appraisal.amount),
        source: appraisal.source,
        markup_factor: rule.markup_factor(),
    })
}
