use crate::error::CredentialError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "flight-checker.toml";
pub const CONFIG_PATH_ENV: &str = "FLIGHT_CHECKER_CONFIG";
pub const API_KEY_ENV: &str = "RAPIDAPI_KEY";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub flights: FlightsConfig,
    pub ui: UiConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,       // Scheme + host, no trailing slash needed
    pub host: String,           // Sent as x-rapidapi-host
    pub timeout_seconds: u64,   // Applied to every request
    pub search_limit: u32,      // Max airports per free-text search
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://aerodatabox.p.rapidapi.com".to_string(),
            host: "aerodatabox.p.rapidapi.com".to_string(),
            timeout_seconds: 15,
            search_limit: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FlightsConfig {
    pub with_leg: bool,
    pub with_cancelled: bool,
    pub with_codeshared: bool,
    pub with_cargo: bool,
    pub with_private: bool,
    pub departure_window_minutes: u32, // Span of the "departures from now" query
    pub departures_shown: usize,
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            with_leg: true,
            with_cancelled: true,
            with_codeshared: true,
            with_cargo: false,
            with_private: false,
            departure_window_minutes: 720,
            departures_shown: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Loads the config file named by `FLIGHT_CHECKER_CONFIG`, or
    /// `flight-checker.toml` in the working directory.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Reads `path`. A missing file is created from the defaults, an unreadable
    /// or invalid one is reported and replaced by the defaults in memory only.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        info!("Loaded configuration from {}", path.display());
                        return config;
                    }
                    Err(problem) => {
                        warn!("Invalid {}: {}. Using defaults.", path.display(), problem)
                    }
                },
                Err(e) => warn!("Failed to parse {}: {}. Using defaults.", path.display(), e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let default_config = Config::default();
                // Save default config to disk for the user to edit later
                match toml::to_string_pretty(&default_config) {
                    Ok(toml_string) => {
                        if fs::write(path, toml_string).is_err() {
                            warn!("Could not write default {} to disk.", path.display());
                        }
                    }
                    Err(e) => warn!("Could not serialize default configuration: {}", e),
                }
                info!("Loaded default configuration.");
                return default_config;
            }
            Err(e) => warn!("Failed to read {}: {}. Using defaults.", path.display(), e),
        }
        Config::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("api.base_url is empty".to_string());
        }
        if self.api.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be positive".to_string());
        }
        if !(1..=100).contains(&self.api.search_limit) {
            return Err(format!("api.search_limit {} is outside 1..=100", self.api.search_limit));
        }
        if !(1..=720).contains(&self.flights.departure_window_minutes) {
            return Err(format!(
                "flights.departure_window_minutes {} is outside 1..=720",
                self.flights.departure_window_minutes
            ));
        }
        if self.flights.departures_shown == 0 {
            return Err("flights.departures_shown must be positive".to_string());
        }
        Ok(())
    }
}

/// The RapidAPI key. Never logged or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn from_env() -> Result<Self, CredentialError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialError> {
        match lookup(API_KEY_ENV) {
            None => Err(CredentialError::Missing(API_KEY_ENV)),
            Some(value) if value.trim().is_empty() => Err(CredentialError::Blank(API_KEY_ENV)),
            Some(value) => Ok(Self(value.trim().to_string())),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
