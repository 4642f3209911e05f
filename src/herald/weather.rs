// SPDX-License-Identifier: MIT

//! OpenWeather current-weather client

use crate::base::error::HeraldError;
use crate::herald::config::{Settings, Units};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

const PROVIDER: &str = "OpenWeather";

/// Current weather for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Comma separated headline conditions, e.g. "Clouds, Rain"
    pub conditions: String,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

// --- Wire format ---

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    weather: Vec<WeatherEntry>,
    main: MainBlock,
    wind: WindBlock,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    main: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

impl From<WeatherResponse> for Weather {
    fn from(resp: WeatherResponse) -> Self {
        Self {
            conditions: resp
                .weather
                .into_iter()
                .map(|w| w.main)
                .collect::<Vec<_>>()
                .join(", "),
            temperature: resp.main.temp,
            pressure: resp.main.pressure,
            humidity: resp.main.humidity,
            wind_speed: resp.wind.speed,
        }
    }
}

impl Weather {
    /// Render the report message sent to messengers
    pub fn report(&self, city: &str, units: Units) -> String {
        format!(
            "Weather in {}:\n\nTemperature: {} {}\nPressure: {} hPa\nHumidity: {} %\nWind Speed: {} {}",
            title_case(city),
            self.temperature,
            units.temperature(),
            self.pressure,
            self.humidity,
            self.wind_speed,
            units.wind_speed(),
        )
    }
}

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl WeatherClient {
    pub fn new(settings: &Settings) -> Result<Self, HeraldError> {
        Self::with_base_url(
            &settings.openweather_base_url,
            settings.openweather_api_key()?,
        )
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, HeraldError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HeraldError::config(format!("Invalid OpenWeather URL: {}", e)))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Fetch the current weather for `city`
    pub async fn current(&self, city: &str, units: Units) -> Result<Weather, HeraldError> {
        let mut url = self
            .base_url
            .join("data/2.5/weather")
            .map_err(|e| HeraldError::config(format!("Invalid OpenWeather URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("q", &city.to_lowercase())
            .append_pair("appid", &self.api_key)
            .append_pair("units", units.as_str());

        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => {
                let body: WeatherResponse = resp.json().await?;
                Ok(body.into())
            }
            StatusCode::UNAUTHORIZED => Err(HeraldError::api(
                PROVIDER,
                "Invalid API key for OpenWeather",
            )),
            StatusCode::NOT_FOUND => Err(HeraldError::api(
                PROVIDER,
                format!("Invalid city name \"{}\"", title_case(city)),
            )),
            status => {
                log::debug!("OpenWeather answered {}", status);
                Err(HeraldError::api(PROVIDER, "unknown error"))
            }
        }
    }
}

/// Uppercase the first letter of every word, lowercase the rest
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start_of_word = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}
