// SPDX-License-Identifier: MIT

//! Service configuration
//!
//! Values come from an optional YAML file and are then overridden by
//! environment variables (after `.env` has been loaded by `main`).

use crate::base::error::{HeraldError, TaskError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";
pub const DEFAULT_VIBER_URL: &str = "https://chatapi.viber.com";

/// Runtime settings for the HTTP service and its API clients
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub openweather_api_key: Option<String>,
    #[serde(default)]
    pub telegram_bot_token: Option<String>,
    #[serde(default)]
    pub viber_auth_token: Option<String>,
    #[serde(default = "default_openweather_url")]
    pub openweather_base_url: String,
    #[serde(default = "default_telegram_url")]
    pub telegram_base_url: String,
    #[serde(default = "default_viber_url")]
    pub viber_base_url: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_openweather_url() -> String {
    DEFAULT_OPENWEATHER_URL.to_string()
}

fn default_telegram_url() -> String {
    DEFAULT_TELEGRAM_URL.to_string()
}

fn default_viber_url() -> String {
    DEFAULT_VIBER_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            openweather_api_key: None,
            telegram_bot_token: None,
            viber_auth_token: None,
            openweather_base_url: default_openweather_url(),
            telegram_base_url: default_telegram_url(),
            viber_base_url: default_viber_url(),
        }
    }
}

impl Settings {
    /// Load settings from an optional YAML file, then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self, HeraldError> {
        let mut settings = match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::parse_yaml(&fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn parse_yaml(content: &str) -> Result<Self, HeraldError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override fields with values found through `lookup` (keyed by env var name)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), HeraldError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(port) = lookup("HERALD_PORT") {
            self.port = port
                .parse()
                .map_err(|_| HeraldError::config(format!("HERALD_PORT is not a port: {}", port)))?;
        }
        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.openweather_api_key = Some(key);
        }
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram_bot_token = Some(token);
        }
        if let Some(token) = lookup("VIBER_AUTH_TOKEN") {
            self.viber_auth_token = Some(token);
        }
        if let Some(url) = lookup("OPENWEATHER_BASE_URL") {
            self.openweather_base_url = url;
        }
        if let Some(url) = lookup("TELEGRAM_BASE_URL") {
            self.telegram_base_url = url;
        }
        if let Some(url) = lookup("VIBER_BASE_URL") {
            self.viber_base_url = url;
        }
        Ok(())
    }

    /// Check that all base URLs parse
    pub fn validate(&self) -> Result<(), HeraldError> {
        for (name, value) in [
            ("openweather_base_url", &self.openweather_base_url),
            ("telegram_base_url", &self.telegram_base_url),
            ("viber_base_url", &self.viber_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| HeraldError::config(format!("{} is invalid ({}): {}", name, e, value)))?;
        }
        Ok(())
    }

    pub fn openweather_api_key(&self) -> Result<&str, HeraldError> {
        self.openweather_api_key
            .as_deref()
            .ok_or_else(|| HeraldError::config("OPENWEATHER_API_KEY must be set"))
    }
}

/// Measurement system requested from OpenWeather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed(&self) -> &'static str {
        match self {
            Units::Standard | Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl FromStr for Units {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(TaskError::InvalidUnits(s.to_lowercase())),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
