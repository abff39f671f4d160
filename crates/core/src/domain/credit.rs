use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::LooseNumber;

/// Installment terms a storefront may offer, before policy bounds are applied.
pub const CANDIDATE_TERMS: [u32; 5] = [3, 6, 9, 12, 18];

/// Eligibility and rate envelope for installment offers. All bounds are inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPolicy {
    pub interest_percent_annual: Decimal,
    pub min_principal: Decimal,
    pub max_principal: Decimal,
    pub min_term_months: u32,
    pub max_term_months: u32,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            interest_percent_annual: Decimal::new(15, 0),
            min_principal: Decimal::new(100, 0),
            max_principal: Decimal::new(10_000, 0),
            min_term_months: 3,
            max_term_months: 18,
        }
    }
}

impl CreditPolicy {
    pub fn covers_principal(&self, principal: Decimal) -> bool {
        principal >= self.min_principal && principal <= self.max_principal
    }

    pub fn covers_term(&self, term_months: u32) -> bool {
        term_months >= self.min_term_months && term_months <= self.max_term_months
    }

    /// Candidate terms inside the policy's term bounds, ascending.
    pub fn offered_terms(&self) -> impl Iterator<Item = u32> + '_ {
        CANDIDATE_TERMS.into_iter().filter(|term| self.covers_term(*term))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentQuote {
    pub term_months: u32,
    pub monthly_payment: Decimal,
    pub total_payment: Decimal,
    pub eligible: bool,
}

impl InstallmentQuote {
    pub fn ineligible(term_months: u32) -> Self {
        Self {
            term_months,
            monthly_payment: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            eligible: false,
        }
    }
}

/// One row of a key/value settings table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRow {
    pub key: String,
    pub value: Option<LooseNumber>,
}

/// A named credit provider option; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditOption {
    pub name: String,
    #[serde(default)]
    pub percent: Option<LooseNumber>,
    #[serde(default)]
    pub min_months: Option<LooseNumber>,
    #[serde(default)]
    pub max_months: Option<LooseNumber>,
    #[serde(default)]
    pub min_price: Option<LooseNumber>,
    #[serde(default)]
    pub max_price: Option<LooseNumber>,
}

/// Credit configuration in whichever shape the backend stored it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsRepresentation {
    Rows(Vec<SettingRow>),
    Options(Vec<CreditOption>),
}

impl Default for SettingsRepresentation {
    fn default() -> Self {
        Self::Rows(Vec::new())
    }
}
