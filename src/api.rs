use crate::config::{ApiConfig, ApiKey, FlightsConfig};
use crate::error::ApiError;
use crate::models::{AirportDetail, AirportSearchResponse, CodeScheme, FlightListResponse};
use crate::schedule::SearchWindow;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Thin wrapper over the AeroDataBox endpoints used by the checker.
///
/// Requests are issued one at a time by the callers; every request carries
/// the RapidAPI header pair and the configured timeout.
pub struct FlightProvider {
    client: Client,
    base_url: String,
    host: String,
    key: ApiKey,
    timeout_seconds: u64,
    flights: FlightsConfig,
}

impl FlightProvider {
    pub fn new(api: &ApiConfig, flights: &FlightsConfig, key: ApiKey) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()
            .map_err(|e| ApiError::from_reqwest("client setup", api.timeout_seconds, e))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            host: api.host.clone(),
            key,
            timeout_seconds: api.timeout_seconds,
            flights: flights.clone(),
        })
    }

    /// `GET /airports/search/term?q=..&limit=..`
    pub async fn search_airports(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<AirportSearchResponse, ApiError> {
        let path = "/airports/search/term";
        let limit = limit.to_string();
        match self.get(path, &[("q", term), ("limit", limit.as_str())]).await? {
            Some(body) => self.decode(path, &body),
            None => Ok(AirportSearchResponse::default()),
        }
    }

    /// `GET /airports/{iata|icao}/{code}`. `Ok(None)` means the provider has
    /// no such airport under that scheme (204, 404 or an empty body); any
    /// other failing status is an error.
    pub async fn airport_by_code(
        &self,
        scheme: CodeScheme,
        code: &str,
    ) -> Result<Option<AirportDetail>, ApiError> {
        let path = format!("/airports/{}/{}", scheme.path_segment(), code);
        let response = self.send(&path, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} answered 404, treating as no match", path);
            return Ok(None);
        }
        match self.body_of(&path, response).await? {
            Some(body) => self.decode(&path, &body).map(Some),
            None => Ok(None),
        }
    }

    /// Departures from `code` inside an absolute local window.
    pub async fn departures_between(
        &self,
        scheme: CodeScheme,
        code: &str,
        window: &SearchWindow,
    ) -> Result<FlightListResponse, ApiError> {
        let path = format!(
            "/flights/airports/{}/{}/{}/{}",
            scheme.path_segment(),
            code,
            window.start_param(),
            window.end_param()
        );
        self.flight_listing(&path, Vec::new()).await
    }

    /// Departures from `code` starting now at the airport, spanning the
    /// configured number of minutes.
    pub async fn departures_from_now(
        &self,
        scheme: CodeScheme,
        code: &str,
    ) -> Result<FlightListResponse, ApiError> {
        let path = format!("/flights/airports/{}/{}", scheme.path_segment(), code);
        let duration = self.flights.departure_window_minutes.to_string();
        let params = vec![
            ("offsetMinutes", "0".to_string()),
            ("durationMinutes", duration),
        ];
        self.flight_listing(&path, params).await
    }

    async fn flight_listing(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<FlightListResponse, ApiError> {
        let toggle = |on: bool| on.to_string();
        params.extend([
            ("direction", "Departure".to_string()),
            ("withLeg", toggle(self.flights.with_leg)),
            ("withCancelled", toggle(self.flights.with_cancelled)),
            ("withCodeshared", toggle(self.flights.with_codeshared)),
            ("withCargo", toggle(self.flights.with_cargo)),
            ("withPrivate", toggle(self.flights.with_private)),
            ("withLocation", "false".to_string()),
        ]);
        let params: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();

        match self.get(path, &params).await? {
            Some(body) => self.decode(path, &body),
            None => Ok(FlightListResponse::default()),
        }
    }

    /// Sends a request and insists on a success status. `Ok(None)` for an
    /// empty body (the provider answers 204 when nothing matches).
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Option<String>, ApiError> {
        let response = self.send(path, params).await?;
        self.body_of(path, response).await
    }

    async fn body_of(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Option<String>, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(path, self.timeout_seconds, e))?;

        if status == StatusCode::NO_CONTENT || (status.is_success() && body.trim().is_empty()) {
            return Ok(None);
        }
        if status != StatusCode::OK {
            warn!("{} answered {}", path, status);
            return Err(ApiError::status(path, status.as_u16(), &body));
        }
        Ok(Some(body))
    }

    async fn send(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<reqwest::Response, ApiError> {
        info!("GET {}", path);
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("x-rapidapi-key", self.key.expose())
            .header("x-rapidapi-host", &self.host)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                let err = ApiError::from_reqwest(path, self.timeout_seconds, e);
                warn!("{}", err);
                err
            })
    }

    fn decode<T: DeserializeOwned>(&self, path: &str, body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}
