use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("credit configuration unusable: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("calculator unavailable: {message}")]
    Unavailable { message: String },
    #[error("configuration invalid: {message}")]
    Misconfigured { message: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "The input could not be read. Check the records and try again.",
            Self::Unavailable { .. } => {
                "Installment calculator is unavailable. Refresh credit settings and retry."
            }
            Self::Misconfigured { .. } => {
                "Karat configuration could not be loaded. Check karat.toml and KARAT_* variables."
            }
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "invalid_input",
            Self::Unavailable { .. } => "credit_configuration",
            Self::Misconfigured { .. } => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::BadRequest { .. } => 3,
            Self::Unavailable { .. } | Self::Misconfigured { .. } => 2,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::Unavailable { message }
            | Self::Misconfigured { message } => message,
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(DomainError::Configuration(message)) => {
                Self::Unavailable { message }
            }
            ApplicationError::Input(message) => Self::BadRequest { message },
            ApplicationError::Configuration(message) => Self::Misconfigured { message },
        }
    }
}
