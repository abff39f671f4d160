//! Flat-interest installment quotes.
//!
//! Interest is charged once on the full principal for the whole term and spread
//! evenly, so every month's payment is identical:
//!
//! ```text
//! total   = principal * (1 + interest_percent_annual / 100 * term_months / 12)
//! monthly = total / term_months
//! ```
//!
//! There is no declining-balance amortization.

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::credit::{CreditPolicy, InstallmentQuote};

const MONTHS_PER_YEAR_PERCENT: u32 = 1_200;

pub trait InstallmentCalculator: Send + Sync {
    fn quote(&self, principal: Decimal, policy: &CreditPolicy, term_months: u32)
        -> InstallmentQuote;

    /// One quote per offered term, ascending by term.
    fn quote_all(&self, principal: Decimal, policy: &CreditPolicy) -> Vec<InstallmentQuote> {
        policy.offered_terms().map(|term| self.quote(principal, policy, term)).collect()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FlatInterestCalculator;

impl InstallmentCalculator for FlatInterestCalculator {
    fn quote(
        &self,
        principal: Decimal,
        policy: &CreditPolicy,
        term_months: u32,
    ) -> InstallmentQuote {
        quote(principal, policy, term_months)
    }
}

pub fn is_eligible(principal: Decimal, policy: &CreditPolicy, term_months: u32) -> bool {
    principal > Decimal::ZERO
        && term_months > 0
        && policy.covers_principal(principal)
        && policy.covers_term(term_months)
}

pub fn quote(principal: Decimal, policy: &CreditPolicy, term_months: u32) -> InstallmentQuote {
    if !is_eligible(principal, policy, term_months) {
        return InstallmentQuote::ineligible(term_months);
    }

    match flat_totals(principal, policy.interest_percent_annual, term_months) {
        Some((monthly_payment, total_payment)) => {
            InstallmentQuote { term_months, monthly_payment, total_payment, eligible: true }
        }
        None => {
            warn!(
                event_name = "pricing.installment.overflow",
                principal = %principal,
                term_months,
                "installment total out of decimal range; term not offered"
            );
            InstallmentQuote::ineligible(term_months)
        }
    }
}

fn flat_totals(
    principal: Decimal,
    interest_percent_annual: Decimal,
    term_months: u32,
) -> Option<(Decimal, Decimal)> {
    let term = Decimal::from(term_months);
    let interest = principal
        .checked_mul(interest_percent_annual)?
        .checked_mul(term)?
        .checked_div(Decimal::from(MONTHS_PER_YEAR_PERCENT))?;
    let total_payment = principal.checked_add(interest)?;
    Some((total_payment.checked_div(term)?, total_payment))
}

pub fn quote_all(principal: Decimal, policy: &CreditPolicy) -> Vec<InstallmentQuote> {
    FlatInterestCalculator.quote_all(principal, policy)
}
