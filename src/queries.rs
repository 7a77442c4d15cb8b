//! The four lookups offered by the checker, from validated input to records
//! ready for display.
//!
//! Each lookup issues its requests sequentially through [`FlightProvider`]
//! and separates "nothing matched" (an ordinary, possibly empty result) from
//! transport failures ([`ApiError`]).

use crate::api::FlightProvider;
use crate::error::{ApiError, InputError};
use crate::models::{AirportCode, AirportDetail, AirportRecord, CodeScheme, FlightRecord};
use crate::schedule::{twelve_hour, SearchWindow};
use chrono::NaiveDate;
use tracing::{info, warn};

pub const MIN_SEARCH_LEN: usize = 3;

/// Trims a free-text airport search term and checks its length.
pub fn search_term(input: &str) -> Result<String, InputError> {
    let term = input.trim();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Err(InputError::TooShort {
            what: "Search term",
            min: MIN_SEARCH_LEN,
        });
    }
    Ok(term.to_string())
}

/// Orders airports by name, ignoring case. Stable, so equal names keep the
/// provider's order.
pub fn sort_by_name(airports: &mut [AirportRecord]) {
    airports.sort_by_cached_key(|a| a.name.to_lowercase());
}

/// Free-text airport search, sorted by name.
pub async fn search_airports(
    provider: &FlightProvider,
    term: &str,
    limit: u32,
) -> Result<Vec<AirportRecord>, ApiError> {
    let response = provider.search_airports(term, limit).await?;
    let mut airports = response.items;
    sort_by_name(&mut airports);
    info!(
        "Airport search '{}' returned {} results (provider count {:?})",
        term,
        airports.len(),
        response.count
    );
    Ok(airports)
}

/// Outcome of resolving one code under both schemes.
#[derive(Debug, Default)]
pub struct Resolution {
    pub found: Option<(CodeScheme, AirportDetail)>,
    /// Schemes whose request failed outright; the other scheme was still tried.
    pub failures: Vec<(CodeScheme, ApiError)>,
}

/// Looks `code` up as IATA, then as ICAO. The first named result wins and
/// later schemes are not contacted.
pub async fn resolve_airport(provider: &FlightProvider, code: &AirportCode) -> Resolution {
    let mut resolution = Resolution::default();
    for scheme in CodeScheme::LOOKUP_ORDER {
        match provider.airport_by_code(scheme, code.as_str()).await {
            Ok(Some(detail)) if detail.display_name().is_some() => {
                info!("Resolved {} as {}", code, scheme);
                resolution.found = Some((scheme, detail));
                break;
            }
            Ok(_) => info!("{} is not a known {} code", code, scheme),
            Err(e) => {
                warn!("{} lookup for {} failed: {}", scheme, code, e);
                resolution.failures.push((scheme, e));
            }
        }
    }
    resolution
}

/// One flight matching a route search.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub window: SearchWindow,
    pub flight: FlightRecord,
    /// 12-hour departure time, or the invalid-time marker.
    pub departs: String,
}

#[derive(Debug, Default)]
pub struct RouteReport {
    pub matches: Vec<RouteMatch>,
    pub failures: Vec<(SearchWindow, ApiError)>,
    pub windows_searched: usize,
}

impl RouteReport {
    /// True when every window failed, so "no match" says nothing.
    pub fn all_failed(&self) -> bool {
        self.windows_searched > 0 && self.failures.len() == self.windows_searched
    }
}

/// Keeps the flights landing at `target`, in source order.
pub fn flights_to<'a, I>(flights: I, target: &'a str) -> impl Iterator<Item = FlightRecord> + 'a
where
    I: IntoIterator<Item = FlightRecord>,
    I::IntoIter: 'a,
{
    flights.into_iter().filter(move |f| f.arrives_at(target))
}

/// Flights from `from` to `to` on `date`, searched one half-day at a time.
/// A failing half is recorded and the other half is still searched.
pub async fn search_route(
    provider: &FlightProvider,
    from: &AirportCode,
    date: NaiveDate,
    to: &AirportCode,
) -> RouteReport {
    let mut report = RouteReport::default();

    for window in SearchWindow::halves_of(date) {
        report.windows_searched += 1;
        let listing = provider
            .departures_between(from.scheme(), from.as_str(), &window)
            .await;
        let listing = match listing {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Route search {}->{} window {} failed: {}", from, to, window.label(), e);
                report.failures.push((window, e));
                continue;
            }
        };
        let records = listing
            .departures
            .into_iter()
            .filter_map(|v| FlightRecord::from_value(v, from.as_str()));
        report.matches.extend(flights_to(records, to.as_str()).map(|flight| RouteMatch {
            window,
            departs: twelve_hour(flight.scheduled_local.as_deref().unwrap_or_default()),
            flight,
        }));
    }
    info!("Route search {}->{} on {} found {} flights", from, to, date, report.matches.len());
    report
}

/// A departure complete enough to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub number: String,
    pub destination: String,
    pub scheduled: String,
}

impl Departure {
    pub fn from_record(record: &FlightRecord) -> Option<Self> {
        Some(Self {
            number: record.number.clone()?,
            destination: record.arrival_name.clone()?,
            scheduled: twelve_hour(record.scheduled_local.as_deref()?),
        })
    }
}

/// The first `shown` complete departures, in the order received. Incomplete
/// entries are skipped one by one.
pub fn first_departures(
    entries: Vec<serde_json::Value>,
    code: &str,
    shown: usize,
) -> Vec<Departure> {
    entries
        .into_iter()
        .filter_map(|v| FlightRecord::from_value(v, code))
        .filter_map(|record| {
            let departure = Departure::from_record(&record);
            if departure.is_none() {
                warn!("Skipping incomplete departure from {}: {:?}", code, record.number);
            }
            departure
        })
        .take(shown)
        .collect()
}

/// Upcoming departures from `code`, starting now.
pub async fn list_departures(
    provider: &FlightProvider,
    code: &AirportCode,
    shown: usize,
) -> Result<Vec<Departure>, ApiError> {
    let listing = provider.departures_from_now(code.scheme(), code.as_str()).await?;
    let departures = first_departures(listing.departures, code.as_str(), shown);
    info!("Listed {} departures from {}", departures.len(), code);
    Ok(departures)
}
