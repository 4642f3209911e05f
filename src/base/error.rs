// SPDX-License-Identifier: MIT

//! Typed error handling for weather-herald
//!
//! Every failure that can reach an HTTP response carries a `kind()` so the
//! server can report `{"type": kind, "message": text}` without string matching.

use thiserror::Error;

/// Top-level error type for weather-herald
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Condition document failed to build or evaluate
    #[error(transparent)]
    Condition(#[from] ConditionError),

    /// Task request or scheduling failure
    #[error(transparent)]
    Task(#[from] TaskError),

    /// API errors from external services (OpenWeather, Telegram, Viber)
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Why a value did not match the shape its operator expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeViolation {
    /// Comparison operator given something other than an array
    NotList,
    /// Comparison operator given an array of the wrong length
    WrongArity(usize),
    /// Combinator operator given something other than an object
    NotDictionary,
}

/// Failures while building or evaluating a condition document
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConditionError {
    #[error("Invalid condition. Operator \"{operator}\" is not supported.")]
    UnsupportedOperator { operator: String },

    #[error("Invalid condition. Value for \"{operator}\" operator {}.", describe_shape(.violation))]
    Shape {
        operator: String,
        violation: ShapeViolation,
    },

    #[error("Invalid condition. Operator \"{operator}\" cannot compare {left} with {right}.")]
    ComparisonType {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Invalid condition. No root operator.")]
    EmptyDocument,
}

fn describe_shape(violation: &ShapeViolation) -> String {
    match violation {
        ShapeViolation::NotList => "must be list".to_string(),
        ShapeViolation::WrongArity(found) => {
            format!("must contain two values, got {}", found)
        }
        ShapeViolation::NotDictionary => "must be dictionary".to_string(),
    }
}

/// Task request validation and scheduling errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskError {
    #[error("Invalid request data. Field \"{0}\" is required.")]
    MissingField(&'static str),

    #[error("Invalid request data. Field \"{field}\" {reason}.")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid messenger \"{0}\"")]
    InvalidMessenger(String),

    #[error("Invalid units \"{0}\"")]
    InvalidUnits(String),

    #[error("No job by the id of {0} was found")]
    NotFound(String),

    #[error("Job identifier ({0}) conflicts with an existing job")]
    Conflict(String),
}

impl ConditionError {
    /// Create an unsupported operator error
    pub fn unsupported(operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
        }
    }

    /// Create a shape error
    pub fn shape(operator: impl Into<String>, violation: ShapeViolation) -> Self {
        Self::Shape {
            operator: operator.into(),
            violation,
        }
    }

    /// Name of the error class as reported to API clients
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedOperator { .. } => "UnsupportedOperatorError",
            Self::Shape { .. } => "ShapeError",
            Self::ComparisonType { .. } => "ComparisonTypeError",
            Self::EmptyDocument => "EmptyDocumentError",
        }
    }
}

impl TaskError {
    /// Create an invalid field error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::InvalidField { .. } => "ValidationError",
            Self::InvalidMessenger(_) => "InvalidMessengerError",
            Self::InvalidUnits(_) => "InvalidUnitsError",
            Self::NotFound(_) => "JobLookupError",
            Self::Conflict(_) => "ConflictingIdError",
        }
    }
}

impl HeraldError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Condition(e) => e.kind(),
            Self::Task(e) => e.kind(),
            Self::Api { .. } => "ApiError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Yaml(_) => "YamlError",
            Self::Http(_) => "HttpError",
        }
    }
}
