use std::path::Path;

use karat_core::config::ConfigOverrides;
use karat_core::pricing::settings::{CreditPolicyResolver, SettingsResolver};
use karat_core::{
    ApplicationError, CreditPolicy, FlatInterestCalculator, InstallmentCalculator,
    SettingsRepresentation,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::{load_config, money, read_json, CommandResult, QuoteView};

#[derive(Debug, Serialize)]
struct QuoteOutput {
    principal: String,
    policy: CreditPolicy,
    quotes: Vec<QuoteView>,
}

pub fn run(principal: Decimal, settings: Option<&Path>, term_months: Option<u32>) -> CommandResult {
    match execute(principal, settings, term_months) {
        Ok(output) => {
            let eligible = output.quotes.iter().filter(|quote| quote.eligible).count();
            CommandResult::with_data(
                "quote",
                format!("{eligible} of {} terms available", output.quotes.len()),
                Some(output),
            )
        }
        Err(error) => CommandResult::from_error("quote", error),
    }
}

fn execute(
    principal: Decimal,
    settings: Option<&Path>,
    term_months: Option<u32>,
) -> Result<QuoteOutput, ApplicationError> {
    let config = load_config(ConfigOverrides::default())?;
    let raw = match settings {
        Some(path) => read_json::<SettingsRepresentation>(path)?,
        None => SettingsRepresentation::default(),
    };

    let resolver = SettingsResolver::new(
        config.credit.preferred_provider.clone(),
        config.credit.fallback_policy(),
    );
    let policy = resolver.resolve(&raw)?;

    let calculator = FlatInterestCalculator;
    let quotes = match term_months {
        Some(term) => vec![calculator.quote(principal, &policy, term)],
        None => calculator.quote_all(principal, &policy),
    };

    Ok(QuoteOutput {
        principal: money(principal),
        policy,
        quotes: quotes.iter().map(QuoteView::from).collect(),
    })
}
