use std::path::Path;

use karat_core::config::ConfigOverrides;
use karat_core::{
    reprice_catalog, ApplicationError, CommodityPrice, GoldRepricingRule, PriceSource,
    ProductId, ProductRecord,
};
use serde::Serialize;

use crate::commands::{load_config, money, read_json, CommandResult};

#[derive(Debug, Serialize)]
struct CatalogItemView {
    id: ProductId,
    name: String,
    previous_price: String,
    new_price: String,
    source: PriceSource,
    changed: bool,
}

#[derive(Debug, Serialize)]
struct CatalogOutput {
    repriced: usize,
    overridden: usize,
    skipped: usize,
    changed: usize,
    items: Vec<CatalogItemView>,
}

pub fn run(products: &Path, commodity: &Path) -> CommandResult {
    match execute(products, commodity) {
        Ok(output) => CommandResult::with_data(
            "catalog",
            format!("{} of {} products need a price update", output.changed, output.items.len()),
            Some(output),
        ),
        Err(error) => CommandResult::from_error("catalog", error),
    }
}

fn execute(products: &Path, commodity: &Path) -> Result<CatalogOutput, ApplicationError> {
    let config = load_config(ConfigOverrides::default())?;
    let products = read_json::<Vec<ProductRecord>>(products)?;
    let commodity = read_json::<CommodityPrice>(commodity)?;

    let rule = GoldRepricingRule::new(config.pricing.markup_factor, &config.pricing.gold_keywords);
    let report = reprice_catalog(&rule, &products, &commodity);

    Ok(CatalogOutput {
        repriced: report.repriced,
        overridden: report.overridden,
        skipped: report.skipped,
        changed: report.changed().count(),
        items: report
            .items
            .into_iter()
            .map(|item| CatalogItemView {
                id: item.id,
                name: item.name,
                previous_price: money(item.previous_price),
                new_price: money(item.new_price),
                source: item.source,
                changed: item.changed,
            })
            .collect(),
    })
}
