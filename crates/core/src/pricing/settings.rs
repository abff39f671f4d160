
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::credit::{CreditOption, CreditPolicy, SettingRow, SettingsRepresentation};
use crate::domain::product::LooseNumber;
use crate::errors::DomainError;

pub trait CreditPolicyResolver: Send + Sync {
    fn resolve(&self, raw: &SettingsRepresentation) -> Result<CreditPolicy, DomainError>;
}

/// Normalizes stored credit settings into a [`CreditPolicy`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsResolver {
    preferred_provider: Option<String>,
    fallback: CreditPolicy,
}

impl SettingsResolver {
    pub fn new(preferred_provider: Option<String>, fallback: CreditPolicy) -> Self {
        let preferred_provider = preferred_provider
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        Self { preferred_provider, fallback }
    }

    fn select_option<'a>(&self, options: &'a [CreditOption]) -> Option<&'a CreditOption> {
        let Some(wanted) = self.preferred_provider.as_deref() else {
            return options.first();
        };

        let wanted_lower = wanted.to_lowercase();
        let preferred =
            options.iter().find(|option| option.name.trim().to_lowercase() == wanted_lower);
        if preferred.is_some() {
            return preferred;
        }

        let first = options.first();
        if let Some(first) = first {
            debug!(
                event_name = "pricing.settings.provider_fallback",
                preferred_provider = wanted,
                selected_provider = first.name.as_str(),
                "preferred credit provider not listed; using first option"
            );
        }
        first
    }
}

impl CreditPolicyResolver for SettingsResolver {
    fn resolve(&self, raw: &SettingsRepresentation) -> Result<CreditPolicy, DomainError> {
        let mut policy = self.fallback.clone();

        match raw {
            SettingsRepresentation::Rows(rows) => {
                for row in rows {
                    apply_row(&mut policy, row);
                }
            }
            SettingsRepresentation::Options(options) => {
                if let Some(option) = self.select_option(options) {
                    apply_option(&mut policy, option);
                }
            }
        }

        validate_policy(&policy)?;
        Ok(policy)
    }
}

/// Resolves settings against the built-in defaults with no preferred provider.
pub fn resolve_credit_policy(raw: &SettingsRepresentation) -> Result<CreditPolicy, DomainError> {
    SettingsResolver::default().resolve(raw)
}

fn apply_row(policy: &mut CreditPolicy, row: &SettingRow) {
    let key = row.key.trim().to_ascii_lowercase();
    let value = row.value.as_ref();

    match key.as_str() {
        "credit_interest_rate" => set_decimal(&mut policy.interest_percent_annual, &key, value),
        "credit_min_months" | "months_min" => set_months(&mut policy.min_term_months, &key, value),
        "credit_max_months" | "months_max" => set_months(&mut policy.max_term_months, &key, value),
        "credit_min_price" => set_decimal(&mut policy.min_principal, &key, value),
        "credit_max_price" => set_decimal(&mut policy.max_principal, &key, value),
        _ => {}
    }
}

fn apply_option(policy: &mut CreditPolicy, option: &CreditOption) {
    if option.percent.is_some() {
        set_decimal(&mut policy.interest_percent_annual, "percent", option.percent.as_ref());
    }
    if option.min_months.is_some() {
        set_months(&mut policy.min_term_months, "min_months", option.min_months.as_ref());
    }
    if option.max_months.is_some() {
        set_months(&mut policy.max_term_months, "max_months", option.max_months.as_ref());
    }
    if option.min_price.is_some() {
        set_decimal(&mut policy.min_principal, "min_price", option.min_price.as_ref());
    }
    if option.max_price.is_some() {
        set_decimal(&mut policy.max_principal, "max_price", option.max_price.as_ref());
    }
}

fn set_decimal(target: &mut Decimal, field: &str, value: Option<&LooseNumber>) {
    match value.and_then(LooseNumber::try_decimal) {
        Some(parsed) => *target = parsed,
        None => report_invalid(field, value),
    }
}

fn set_months(target: &mut u32, field: &str, value: Option<&LooseNumber>) {
    let months = value
        .and_then(LooseNumber::try_decimal)
        .filter(|parsed| parsed.fract().is_zero())
        .and_then(|parsed| parsed.to_u32());
    match months {
        Some(months) => *target = months,
        None => report_invalid(field, value),
    }
}

fn report_invalid(field: &str, value: Option<&LooseNumber>) {
    warn!(
        event_name = "pricing.settings.invalid_value",
        field,
        value = ?value,
        "credit setting is not a usable number; keeping default"
    );
}

/// Plain decimals parse strictly so a sign survives; labels such as `"15%"`
/// fall back to the first number they contain.
fn validate_policy(policy: &CreditPolicy) -> Result<(), DomainError> {
    if policy.interest_percent_annual < Decimal::ZERO {
        return Err(DomainError::Configuration(format!(
            "interest rate must not be negative (got {})",
            policy.interest_percent_annual
        )));
    }

    if policy.min_principal > policy.max_principal {
        return Err(DomainError::Configuration(format!(
            "minimum principal {} exceeds maximum principal {}",
            policy.min_principal, policy.max_principal
        )));
    }

    if policy.min_term_months > policy.max_term_months {
        return Err(DomainError::Configuration(format!(
            "minimum term {} exceeds maximum term {} months",
            policy.min_term_months, policy.max_term_months
        )));
    }

    Ok(())
}
