use std::path::Path;

use karat_core::config::ConfigOverrides;
use karat_core::{
    ApplicationError, CommodityPrice, CreditPolicy, DefaultPricingRuntime, OfferInput,
    PriceSource, PricingRuntime, ProductPricingInput, SettingsRepresentation,
};
use serde::Serialize;

use crate::commands::{load_config, money, read_json, CommandResult, QuoteView};

#[derive(Debug, Serialize)]
struct OfferOutput {
    price: String,
    source: PriceSource,
    policy: CreditPolicy,
    quotes: Vec<QuoteView>,
}

pub fn run(product: &Path, commodity: &Path, settings: Option<&Path>) -> CommandResult {
    match execute(product, commodity, settings) {
        Ok(output) => CommandResult::with_data(
            "offer",
            format!("priced at {} with {} installment terms", output.price, output.quotes.len()),
            Some(output),
        ),
        Err(error) => CommandResult::from_error("offer", error),
    }
}

fn execute(
    product: &Path,
    commodity: &Path,
    settings: Option<&Path>,
) -> Result<OfferOutput, ApplicationError> {
    let config = load_config(ConfigOverrides::default())?;
    let product = read_json::<ProductPricingInput>(product)?;
    let commodity = read_json::<CommodityPrice>(commodity)?;
    let settings = match settings {
        Some(path) => read_json::<SettingsRepresentation>(path)?,
        None => SettingsRepresentation::default(),
    };

    let runtime = DefaultPricingRuntime::from_config(&config);
    let offer = runtime.evaluate_product(OfferInput {
        product: &product,
        commodity: &commodity,
        settings: &settings,
    })?;

    Ok(OfferOutput {
        price: money(offer.price),
        source: offer.source,
        policy: offer.policy,
        quotes: offer.quotes.iter().map(QuoteView::from).collect(),
    })
}
