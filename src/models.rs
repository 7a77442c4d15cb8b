use crate::error::InputError;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Which naming scheme an airport code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeScheme {
    Iata,
    Icao,
}

impl CodeScheme {
    /// Both schemes, in the order a lookup tries them.
    pub const LOOKUP_ORDER: [CodeScheme; 2] = [CodeScheme::Iata, CodeScheme::Icao];

    /// Picks the scheme implied by a code's length: 3 is IATA, 4 is ICAO.
    pub fn for_code(code: &str) -> Option<Self> {
        match code.chars().count() {
            3 => Some(CodeScheme::Iata),
            4 => Some(CodeScheme::Icao),
            _ => None,
        }
    }

    /// Path segment used by the provider.
    pub fn path_segment(self) -> &'static str {
        match self {
            CodeScheme::Iata => "iata",
            CodeScheme::Icao => "icao",
        }
    }
}

impl std::fmt::Display for CodeScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeScheme::Iata => f.write_str("IATA"),
            CodeScheme::Icao => f.write_str("ICAO"),
        }
    }
}

/// A validated airport code, upper-cased, with the scheme its length implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportCode {
    code: String,
    scheme: CodeScheme,
}

impl AirportCode {
    /// Accepts 3 or 4 ASCII letters or digits, surrounding blanks ignored.
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let code = input.trim().to_ascii_uppercase();
        if code.chars().count() < 3 {
            return Err(InputError::TooShort {
                what: "Airport code",
                min: 3,
            });
        }
        match CodeScheme::for_code(&code) {
            Some(scheme) if code.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Ok(Self { code, scheme })
            }
            _ => Err(InputError::BadCode(code)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn scheme(&self) -> CodeScheme {
        self.scheme
    }
}

impl std::fmt::Display for AirportCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

// The provider sends `null` for codes some airports lack.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One hit of the free-text airport search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub iata: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub icao: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country_code: String,
    #[serde(default, rename = "municipalityName")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportSearchResponse {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub items: Vec<AirportRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Country {
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportUrls {
    pub web_site: Option<String>,
    pub wikipedia: Option<String>,
}

/// The record returned by the by-code airport endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirportDetail {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub full_name: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub country: Option<Country>,
    pub municipality_name: Option<String>,
    pub time_zone: Option<String>,
    pub urls: Option<AirportUrls>,
}

impl AirportDetail {
    /// Full name, else plain name, else short name; blanks don't count.
    pub fn display_name(&self) -> Option<&str> {
        [&self.full_name, &self.name, &self.short_name]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .map(str::trim)
            .find(|n| !n.is_empty())
    }

    pub fn country_label(&self) -> Option<&str> {
        let country = self.country.as_ref()?;
        non_blank(&country.name).or_else(|| non_blank(&country.code))
    }

    pub fn website(&self) -> Option<&str> {
        self.urls.as_ref().and_then(|u| non_blank(&u.web_site))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightListResponse {
    #[serde(default)]
    pub departures: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFlight {
    number: Option<String>,
    status: Option<String>,
    departure: Option<RawMovement>,
    arrival: Option<RawMovement>,
    airline: Option<RawAirline>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMovement {
    airport: Option<RawAirport>,
    scheduled_time: Option<RawTime>,
    // Older schema versions flatten the local time.
    scheduled_time_local: Option<String>,
    terminal: Option<String>,
    gate: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAirport {
    iata: Option<String>,
    icao: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTime {
    local: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAirline {
    name: Option<String>,
}

/// A departure as listed by the provider. Every field past
/// `departure_code` may be missing; consumers decide what they need.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlightRecord {
    pub departure_code: String,
    pub number: Option<String>,
    pub arrival_iata: Option<String>,
    pub arrival_icao: Option<String>,
    pub arrival_name: Option<String>,
    pub scheduled_local: Option<String>,
    pub terminal: Option<String>,
    pub gate: Option<String>,
    pub status: Option<String>,
    pub airline: Option<String>,
}

impl FlightRecord {
    /// Decodes one listing entry. Entries whose shape doesn't match at all
    /// (wrong types, not an object) yield `None`.
    pub fn from_value(value: serde_json::Value, departure_code: &str) -> Option<Self> {
        let raw: RawFlight = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping malformed flight entry from {}: {}", departure_code, e);
                return None;
            }
        };

        let departure = raw.departure.unwrap_or_default();
        let arrival_airport = raw.arrival.and_then(|a| a.airport).unwrap_or_default();
        let scheduled_local = departure
            .scheduled_time
            .and_then(|t| t.local)
            .or(departure.scheduled_time_local);

        let clean = |value: Option<String>| {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        Some(Self {
            departure_code: departure_code.to_string(),
            number: clean(raw.number),
            arrival_iata: clean(arrival_airport.iata),
            arrival_icao: clean(arrival_airport.icao),
            arrival_name: clean(arrival_airport.name),
            scheduled_local: clean(scheduled_local),
            terminal: clean(departure.terminal),
            gate: clean(departure.gate),
            status: clean(raw.status),
            airline: clean(raw.airline.and_then(|a| a.name)),
        })
    }

    /// Whether the flight lands at `code`, compared case-insensitively against
    /// both the IATA and ICAO code of its arrival airport.
    pub fn arrives_at(&self, code: &str) -> bool {
        let code = code.trim();
        [&self.arrival_iata, &self.arrival_icao]
            .into_iter()
            .flatten()
            .any(|c| c.eq_ignore_ascii_case(code))
    }

    pub fn arrival_code(&self) -> Option<&str> {
        self.arrival_iata.as_deref().or(self.arrival_icao.as_deref())
    }
}
