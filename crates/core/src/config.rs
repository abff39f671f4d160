use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::credit::CreditPolicy;
use crate::pricing::repricing::{default_markup_factor, DEFAULT_GOLD_KEYWORDS};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    pub credit: CreditConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub markup_factor: Decimal,
    pub gold_keywords: Vec<String>,
}

/// Preferred provider plus the policy used for any field stored settings omit.
#[derive(Clone, Debug)]
pub struct CreditConfig {
    pub preferred_provider: Option<String>,
    pub interest_percent_annual: Decimal,
    pub min_term_months: u32,
    pub max_term_months: u32,
    pub min_principal: Decimal,
    pub max_principal: Decimal,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub markup_factor: Option<Decimal>,
    pub preferred_provider: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        let policy = CreditPolicy::default();
        Self {
            pricing: PricingConfig {
                markup_factor: default_markup_factor(),
                gold_keywords: DEFAULT_GOLD_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            },
            credit: CreditConfig {
                preferred_provider: None,
                interest_percent_annual: policy.interest_percent_annual,
                min_term_months: policy.min_term_months,
                max_term_months: policy.max_term_months,
                min_principal: policy.min_principal,
                max_principal: policy.max_principal,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl CreditConfig {
    pub fn fallback_policy(&self) -> CreditPolicy {
        CreditPolicy {
            interest_percent_annual: self.interest_percent_annual,
            min_principal: self.min_principal,
            max_principal: self.max_principal,
            min_term_months: self.min_term_months,
            max_term_months: self.max_term_months,
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("karat.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(pricing) = patch.pricing {
            if let Some(markup_factor) = pricing.markup_factor {
                self.pricing.markup_factor = markup_factor;
            }
            if let Some(gold_keywords) = pricing.gold_keywords {
                self.pricing.gold_keywords = gold_keywords;
            }
        }

        if let Some(credit) = patch.credit {
            if let Some(preferred_provider) = credit.preferred_provider {
                self.credit.preferred_provider = Some(preferred_provider);
            }
            if let Some(interest_percent_annual) = credit.interest_percent_annual {
                self.credit.interest_percent_annual = interest_percent_annual;
            }
            if let Some(min_term_months) = credit.min_term_months {
                self.credit.min_term_months = min_term_months;
            }
            if let Some(max_term_months) = credit.max_term_months {
                self.credit.max_term_months = max_term_months;
            }
            if let Some(min_principal) = credit.min_principal {
                self.credit.min_principal = min_principal;
            }
            if let Some(max_principal) = credit.max_principal {
                self.credit.max_principal = max_principal;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("KARAT_PRICING_MARKUP_FACTOR") {
            self.pricing.markup_factor = parse_decimal("KARAT_PRICING_MARKUP_FACTOR", &value)?;
        }
        if let Some(value) = read_env("KARAT_PRICING_GOLD_KEYWORDS") {
            self.pricing.gold_keywords = value
                .split(',')
                .map(|keyword| keyword.trim().to_string())
                .filter(|keyword| !keyword.is_empty())
                .collect();
        }

        if let Some(value) = read_env("KARAT_CREDIT_PREFERRED_PROVIDER") {
            self.credit.preferred_provider = Some(value);
        }
        if let Some(value) = read_env("KARAT_CREDIT_INTEREST_PERCENT_ANNUAL") {
            self.credit.interest_percent_annual =
                parse_decimal("KARAT_CREDIT_INTEREST_PERCENT_ANNUAL", &value)?;
        }
        if let Some(value) = read_env("KARAT_CREDIT_MIN_TERM_MONTHS") {
            self.credit.min_term_months = parse_u32("KARAT_CREDIT_MIN_TERM_MONTHS", &value)?;
        }
        if let Some(value) = read_env("KARAT_CREDIT_MAX_TERM_MONTHS") {
            self.credit.max_term_months = parse_u32("KARAT_CREDIT_MAX_TERM_MONTHS", &value)?;
        }
        if let Some(value) = read_env("KARAT_CREDIT_MIN_PRINCIPAL") {
            self.credit.min_principal = parse_decimal("KARAT_CREDIT_MIN_PRINCIPAL", &value)?;
        }
        if let Some(value) = read_env("KARAT_CREDIT_MAX_PRINCIPAL") {
            self.credit.max_principal = parse_decimal("KARAT_CREDIT_MAX_PRINCIPAL", &value)?;
        }

        let log_level = read_env("KARAT_LOGGING_LEVEL").or_else(|| read_env("KARAT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("KARAT_LOGGING_FORMAT").or_else(|| read_env("KARAT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(markup_factor) = overrides.markup_factor {
            self.pricing.markup_factor = markup_factor;
        }
        if let Some(preferred_provider) = overrides.preferred_provider {
            self.credit.preferred_provider = Some(preferred_provider);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pricing(&self.pricing)?;
        validate_credit(&self.credit)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("karat.toml"), PathBuf::from("config/karat.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    if pricing.markup_factor <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "pricing.markup_factor must be greater than zero".to_string(),
        ));
    }

    if pricing.gold_keywords.iter().all(|keyword| keyword.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "pricing.gold_keywords must contain at least one non-blank keyword".to_string(),
        ));
    }

    Ok(())
}

fn validate_credit(credit: &CreditConfig) -> Result<(), ConfigError> {
    if credit.interest_percent_annual < Decimal::ZERO {
        return Err(ConfigError::Validation(
            "credit.interest_percent_annual must not be negative".to_string(),
        ));
    }

    if credit.min_principal > credit.max_principal {
        return Err(ConfigError::Validation(
            "credit.min_principal must not exceed credit.max_principal".to_string(),
        ));
    }

    if credit.min_term_months > credit.max_term_months {
        return Err(ConfigError::Validation(
            "credit.min_term_months must not exceed credit.max_term_months".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    pricing: Option<PricingPatch>,
    credit: Option<CreditPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    markup_factor: Option<Decimal>,
    gold_keywords: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct CreditPatch {
    preferred_provider: Option<String>,
    interest_percent_annual: Option<Decimal>,
    min_term_months: Option<u32>,
    max_term_months: Option<u32>,
    min_principal: Option<Decimal>,
    max_principal: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::domain::credit::CreditPolicy;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.pricing.markup_factor == Decimal::new(17, 1), "default markup is 1.7")?;
        ensure(
            config.pricing.gold_keywords.iter().any(|keyword| keyword == "qızıl"),
            "default keywords include the local gold term",
        )?;
        ensure(
            config.credit.fallback_policy() == CreditPolicy::default(),
            "fallback policy should match storefront defaults",
        )?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "default format is compact")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_KARAT_PROVIDER", "BirKart");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("karat.toml");
            fs::write(
                &path,
                r#"
[pricing]
markup_factor = 1.85
gold_keywords = ["gold", "altın"]

[credit]
preferred_provider = "${TEST_KARAT_PROVIDER}"
min_term_months = 6
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.credit.preferred_provider.as_deref() == Some("BirKart"),
                "preferred provider should be interpolated from environment",
            )?;
            ensure(
                config.pricing.markup_factor == Decimal::new(185, 2),
                "markup should be read from file",
            )?;
            ensure(config.pricing.gold_keywords.len() == 2, "keywords should be replaced by file")?;
            ensure(config.credit.min_term_months == 6, "min term should be read from file")?;
            ensure(config.credit.max_term_months == 18, "max term should keep its default")?;
            Ok(())
        })();

        clear_vars(&["TEST_KARAT_PROVIDER"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("KARAT_LOG_LEVEL", "warn");
        env::set_var("KARAT_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["KARAT_LOG_LEVEL", "KARAT_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("KARAT_PRICING_MARKUP_FACTOR", "1.9");
        env::set_var("KARAT_CREDIT_MAX_PRINCIPAL", "20000");
        env::set_var("KARAT_PRICING_GOLD_KEYWORDS", "gold, zolotoy ,");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("karat.toml");
            fs::write(
                &path,
                r#"
[pricing]
markup_factor = "1.6"

[credit]
max_principal = 15000
interest_percent_annual = 12

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    markup_factor: Some(Decimal::new(2, 0)),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.pricing.markup_factor == Decimal::new(2, 0), "override markup should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.credit.max_principal == Decimal::new(20_000, 0),
                "env max principal should win over file",
            )?;
            ensure(
                config.credit.interest_percent_annual == Decimal::new(12, 0),
                "file interest should win over default",
            )?;
            ensure(
                config.pricing.gold_keywords == vec!["gold".to_string(), "zolotoy".to_string()],
                "env keyword list should be split on commas",
            )?;
            Ok(())
        })();

        clear_vars(&[
            "KARAT_PRICING_MARKUP_FACTOR",
            "KARAT_CREDIT_MAX_PRINCIPAL",
            "KARAT_PRICING_GOLD_KEYWORDS",
        ]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("KARAT_CREDIT_MIN_TERM_MONTHS", "24");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("credit.min_term_months")
            );
            ensure(has_message, "validation failure should mention credit.min_term_months")
        })();

        clear_vars(&["KARAT_CREDIT_MIN_TERM_MONTHS"]);
        result
    }

    #[test]
    fn malformed_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("KARAT_PRICING_MARKUP_FACTOR", "one point seven");

        let result = (|| -> Result<(), String> {
            let outcome = AppConfig::load(LoadOptions::default());
            ensure(
                matches!(
                    outcome,
                    Err(ConfigError::InvalidEnvOverride { ref key, .. })
                        if key == "KARAT_PRICING_MARKUP_FACTOR"
                ),
                "malformed markup should be an env override error",
            )
        })();

        clear_vars(&["KARAT_PRICING_MARKUP_FACTOR"]);
        result
    }

    #[test]
    fn non_positive_markup_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let outcome = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                markup_factor: Some(Decimal::ZERO),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        ensure(
            matches!(
                outcome,
                Err(ConfigError::Validation(ref message)) if message.contains("markup_factor")
            ),
            "zero markup should fail validation",
        )
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let outcome = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("missing.toml")),
            require_file: true,
            ..LoadOptions::default()
        });
        ensure(
            matches!(outcome, Err(ConfigError::MissingConfigFile(_))),
            "missing required file should be reported",
        )
    }
}
