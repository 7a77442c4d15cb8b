//! Error kinds surfaced by the flight checker.
//!
//! Three families are kept apart because the session treats them differently:
//! [`InputError`] re-prompts without touching the network, [`ApiError`] is
//! reported and followed by a retry decision, and [`CredentialError`] is the
//! only condition that ends the process.

use thiserror::Error;

/// Longest slice of a response body kept in [`ApiError::Status`].
pub const BODY_SNIPPET_LEN: usize = 200;

/// Rejected user input. Never leaves the prompt loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{what} must be at least {min} characters long")]
    TooShort { what: &'static str, min: usize },
    #[error("Airport code must be 3 (IATA) or 4 (ICAO) letters or digits, got '{0}'")]
    BadCode(String),
    #[error("'{0}' is not a valid date, expected MM/DD/YYYY")]
    BadDate(String),
    #[error("You did not enter a valid number")]
    NotANumber,
    #[error("There is no option {0} in the menu")]
    UnknownOption(u32),
}

/// Failure of a single request to the flight-data provider.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} timed out after {seconds}s")]
    Timeout { endpoint: String, seconds: u64 },
    #[error("network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with HTTP {status}: {snippet}")]
    Status {
        endpoint: String,
        status: u16,
        snippet: String,
    },
    #[error("could not read the response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl ApiError {
    /// Classifies a reqwest failure, keeping timeouts separate.
    pub fn from_reqwest(endpoint: &str, seconds: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                endpoint: endpoint.to_string(),
                seconds,
            }
        } else if err.is_decode() {
            ApiError::Decode {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        } else {
            ApiError::Network {
                endpoint: endpoint.to_string(),
                source: err,
            }
        }
    }

    pub fn status(endpoint: &str, status: u16, body: &str) -> Self {
        ApiError::Status {
            endpoint: endpoint.to_string(),
            status,
            snippet: snippet(body),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("{0} is not set. Export your RapidAPI key before starting flight-checker.")]
    Missing(&'static str),
    #[error("{0} is blank. Export your RapidAPI key before starting flight-checker.")]
    Blank(&'static str),
}

fn snippet(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None if body.is_empty() => "<empty body>".to_string(),
        None => body.to_string(),
    }
}
