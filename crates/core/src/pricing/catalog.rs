use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::product::{CommodityPrice, ProductId, ProductRecord};
use crate::pricing::repricing::{PriceSource, RepricingRule};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepricedProduct {
    pub id: ProductId,
    pub name: String,
    pub previous_price: Decimal,
    pub new_price: Decimal,
    pub source: PriceSource,
    pub changed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRepricing {
    pub items: Vec<RepricedProduct>,
    pub repriced: usize,
    pub overridden: usize,
    pub skipped: usize,
}

impl CatalogRepricing {
    /// Items whose stored price needs updating.
    pub fn changed(&self) -> impl Iterator<Item = &RepricedProduct> {
        self.items.iter().filter(|item| item.changed)
    }
}

/// Applies the repricing rule to every catalog row after a gold price update.
///
/// Rows the rule does not price (non-gold metal, unusable commodity price) keep
/// their current price.
pub fn reprice_catalog<R>(
    rule: &R,
    products: &[ProductRecord],
    commodity: &CommodityPrice,
) -> CatalogRepricing
where
    R: RepricingRule + ?Sized,
{
    let mut report = CatalogRepricing::default();

    for product in products {
        let appraisal = rule.appraise(&product.pricing_input(), commodity);
        let new_price = match appraisal.source {
            PriceSource::Override => {
                report.overridden += 1;
                appraisal.amount
            }
            PriceSource::Commodity => {
                report.repriced += 1;
                appraisal.amount
            }
            PriceSource::NotApplicable => {
                report.skipped += 1;
                product.current_price
            }
        };

        debug!(
            event_name = "pricing.catalog.item",
            product_id = product.id.0.as_str(),
            source = ?appraisal.source,
            previous_price = %product.current_price,
            new_price = %new_price,
            "catalog item appraised"
        );

        report.items.push(RepricedProduct {
            id: product.id.clone(),
            name: product.name.clone(),
            previous_price: product.current_price,
            new_price,
            source: appraisal.source,
            changed: new_price != product.current_price,
        });
    }

    info!(
        event_name = "pricing.catalog.completed",
        price_per_gram = %commodity.price_per_gram,
        repriced = report.repriced,
        overridden = report.overridden,
        skipped = report.skipped,
        changed = report.changed().count(),
        "catalog repricing completed"
    );

    report
}
