pub mod catalog;
pub mod config;
pub mod offer;
pub mod quote;
pub mod reprice;

use std::fs;
use std::path::Path;

use karat_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use karat_core::{ApplicationError, InstallmentQuote, InterfaceError};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn with_data<T: Serialize>(
        command: &str,
        message: impl Into<String>,
        data: Option<T>,
    ) -> Self {
        let data = match data.map(serde_json::to_value).transpose() {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: ApplicationError) -> Self {
        let interface = InterfaceError::from(error);
        tracing::warn!(
            event_name = "cli.command.failed",
            command,
            error_class = interface.error_class(),
            "{interface}"
        );
        Self::failure(
            command,
            interface.error_class(),
            format!("{} ({})", interface.user_message(), interface.message()),
            interface.exit_code(),
        )
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(overrides: ConfigOverrides) -> Result<AppConfig, ApplicationError> {
    Ok(AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() })?)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ApplicationError> {
    let raw = fs::read_to_string(path)
        .map_err(|error| ApplicationError::Input(format!("{}: {error}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|error| ApplicationError::Input(format!("{}: {error}", path.display())))
}

/// Display amount with two decimals; the engine itself never rounds.
pub(crate) fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteView {
    term_months: u32,
    monthly_payment: String,
    total_payment: String,
    eligible: bool,
}

impl From<&InstallmentQuote> for QuoteView {
    fn from(quote: &InstallmentQuote) -> Self {
        let (monthly_payment, total_payment) = if quote.eligible {
            (money(quote.monthly_payment), money(quote.total_payment))
        } else {
            ("---".to_string(), "---".to_string())
        };
        Self {
            term_months: quote.term_months,
            monthly_payment,
            total_payment,
            eligible: quote.eligible,
        }
    }
}

#[cfg(test)]
mod tests {
    use karat_core::{ApplicationError, DomainError, InstallmentQuote};
    use rust_decimal::Decimal;

    use super::{money, CommandResult, QuoteView};

    #[test]
    fn money_pads_to_two_decimals() {
        assert_eq!(money(Decimal::new(357, 0)), "357.00");
        assert_eq!(money(Decimal::new(958_333, 4)), "95.83");
    }

    #[test]
    fn ineligible_quotes_render_as_unavailable() {
        let view = QuoteView::from(&InstallmentQuote::ineligible(6));
        assert_eq!(view.monthly_payment, "---");
        assert!(!view.eligible);
    }

    #[test]
    fn domain_failure_carries_error_class_and_exit_code() {
        let result = CommandResult::from_error(
            "quote",
            ApplicationError::from(DomainError::Configuration("bad bounds".to_string())),
        );
        assert_eq!(result.exit_code, 2);

        let payload: serde_json::Value =
            serde_json::from_str(&result.output).expect("failure payload is JSON");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "credit_configuration");
    }
}
