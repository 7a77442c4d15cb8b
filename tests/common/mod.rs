#![allow(dead_code)]

use flight_checker::api::FlightProvider;
use flight_checker::config::{ApiConfig, ApiKey, Config, FlightsConfig, UiConfig};
use serde_json::{json, Value};

pub const TEST_KEY: &str = "test-key";
pub const TEST_HOST: &str = "aerodatabox.p.rapidapi.com";

pub fn config(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 2,
            ..ApiConfig::default()
        },
        flights: FlightsConfig::default(),
        ui: UiConfig { color: false },
    }
}

pub fn provider_with(config: &Config) -> FlightProvider {
    let key = ApiKey::from_lookup(|_| Some(TEST_KEY.to_string())).expect("test key");
    FlightProvider::new(&config.api, &config.flights, key).expect("provider")
}

pub fn provider(base_url: &str) -> FlightProvider {
    provider_with(&config(base_url))
}

/// One entry of a flight listing in the provider's current schema.
pub fn departure(number: &str, to_iata: &str, to_name: &str, local: &str) -> Value {
    json!({
        "number": number,
        "status": "Expected",
        "departure": {
            "scheduledTime": { "utc": "2024-05-01 12:00Z", "local": local },
            "terminal": "B"
        },
        "arrival": { "airport": { "iata": to_iata, "name": to_name } },
        "airline": { "name": "Test Air" }
    })
}

pub fn listing(entries: Vec<Value>) -> String {
    json!({ "departures": entries }).to_string()
}
