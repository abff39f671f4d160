use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use karat_core::config::{AppConfig, LoadOptions};
use karat_core::ApplicationError;
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

struct Field<'a> {
    key_path: &'a str,
    env_keys: &'a [&'a str],
    value: String,
}

#[derive(Debug, Serialize)]
struct FieldView {
    key: String,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", ApplicationError::from(error)),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        Field {
            key_path: "pricing.markup_factor",
            env_keys: &["KARAT_PRICING_MARKUP_FACTOR"],
            value: config.pricing.markup_factor.to_string(),
        },
        Field {
            key_path: "pricing.gold_keywords",
            env_keys: &["KARAT_PRICING_GOLD_KEYWORDS"],
            value: config.pricing.gold_keywords.join(", "),
        },
        Field {
            key_path: "credit.preferred_provider",
            env_keys: &["KARAT_CREDIT_PREFERRED_PROVIDER"],
            value: config
                .credit
                .preferred_provider
                .clone()
                .unwrap_or_else(|| "<first listed>".to_string()),
        },
        Field {
            key_path: "credit.interest_percent_annual",
            env_keys: &["KARAT_CREDIT_INTEREST_PERCENT_ANNUAL"],
            value: config.credit.interest_percent_annual.to_string(),
        },
        Field {
            key_path: "credit.min_term_months",
            env_keys: &["KARAT_CREDIT_MIN_TERM_MONTHS"],
            value: config.credit.min_term_months.to_string(),
        },
        Field {
            key_path: "credit.max_term_months",
            env_keys: &["KARAT_CREDIT_MAX_TERM_MONTHS"],
            value: config.credit.max_term_months.to_string(),
        },
        Field {
            key_path: "credit.min_principal",
            env_keys: &["KARAT_CREDIT_MIN_PRINCIPAL"],
            value: config.credit.min_principal.to_string(),
        },
        Field {
            key_path: "credit.max_principal",
            env_keys: &["KARAT_CREDIT_MAX_PRINCIPAL"],
            value: config.credit.max_principal.to_string(),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["KARAT_LOGGING_LEVEL", "KARAT_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["KARAT_LOGGING_FORMAT", "KARAT_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ];

    let views = fields
        .into_iter()
        .map(|field| FieldView {
            source: field_source(
                field.key_path,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
            key: field.key_path.to_string(),
            value: field.value,
        })
        .collect::<Vec<_>>();

    CommandResult::with_data(
        "config",
        format!("{} keys resolved (source precedence: env > file > default)", views.len()),
        Some(views),
    )
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("karat.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/karat.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
