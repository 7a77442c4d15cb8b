//! Rendering for the flight checker.
//!
//! Every lookup result is turned into a list of [`Line`]s here; the
//! [`Console`](crate::console::Console) decides how a line's [`Tone`] looks.
//! Nothing in this module does I/O, so the exact wording is unit tested.

use crate::error::ApiError;
use crate::models::{AirportCode, AirportDetail, AirportRecord, CodeScheme};
use crate::queries::{Departure, Resolution, RouteReport};
use chrono::NaiveDate;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Notice,
    Error,
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Plain }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Heading }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Notice }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Error }
    }
}

/// Transport failures, worded so a timeout reads differently from the rest.
pub fn api_error(err: &ApiError) -> Line {
    if err.is_timeout() {
        Line::error(format!("The flight data service did not answer in time ({err})."))
    } else {
        Line::error(format!("Could not get data from the flight data service: {err}"))
    }
}

/// Search results as `N. IATA/ICAO - Name, CC (City)`, numbered from 1.
pub fn airport_list(term: &str, airports: &[AirportRecord]) -> Vec<Line> {
    if airports.is_empty() {
        return vec![Line::notice("No airports were found for your search term.")];
    }

    let heading = format!("Found {} airports for '{}':", airports.len(), term);
    let mut lines = vec![Line::heading(heading)];
    lines.extend(airports.iter().enumerate().map(|(i, airport)| {
        let code = |c: &str| if c.is_empty() { "-".to_string() } else { c.to_string() };
        let mut text = format!(
            "{}. {}/{} - {}, {}",
            i + 1,
            code(&airport.iata),
            code(&airport.icao),
            airport.name,
            airport.country_code
        );
        if let Some(city) = airport.location.as_deref().filter(|c| !c.trim().is_empty()) {
            text.push_str(&format!(" ({})", city.trim()));
        }
        Line::plain(text)
    }));
    lines
}

/// Field-by-field details of one airport.
pub fn airport_detail(scheme: CodeScheme, detail: &AirportDetail) -> Vec<Line> {
    let or_na = |value: Option<&str>| value.unwrap_or(NOT_AVAILABLE).to_string();
    let field = |value: &Option<String>| or_na(value.as_deref().filter(|v| !v.trim().is_empty()));

    vec![
        Line::heading(format!("Airport Details (matched as {scheme} code):")),
        Line::plain(format!("Name: {}", or_na(detail.display_name()))),
        Line::plain(format!("IATA: {}", field(&detail.iata))),
        Line::plain(format!("ICAO: {}", field(&detail.icao))),
        Line::plain(format!("Country: {}", or_na(detail.country_label()))),
        Line::plain(format!("City: {}", field(&detail.municipality_name))),
        Line::plain(format!("Time zone: {}", field(&detail.time_zone))),
        Line::plain(format!("Website: {}", or_na(detail.website()))),
    ]
}

pub fn airport_resolution(code: &AirportCode, resolution: &Resolution) -> Vec<Line> {
    let mut lines: Vec<Line> = resolution
        .failures
        .iter()
        .map(|(scheme, err)| {
            let Line { text, tone } = api_error(err);
            Line {
                text: format!("{scheme} lookup failed. {text}"),
                tone,
            }
        })
        .collect();

    match &resolution.found {
        Some((scheme, detail)) => lines.extend(airport_detail(*scheme, detail)),
        None => lines.push(Line::notice(format!(
            "Could not find an airport with code {code}. Please check the code and try again."
        ))),
    }
    lines
}

fn travel_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

pub fn route(
    from: &AirportCode,
    to: &AirportCode,
    date: NaiveDate,
    report: &RouteReport,
) -> Vec<Line> {
    let mut lines: Vec<Line> = report
        .failures
        .iter()
        .map(|(window, err)| {
            let Line { text, tone } = api_error(err);
            Line {
                text: format!(
                    "Departures between {} could not be searched. {}",
                    window.label(),
                    text
                ),
                tone,
            }
        })
        .collect();

    if report.all_failed() {
        lines.push(Line::error(format!(
            "Route search from {from} to {to} on {} could not be completed.",
            travel_date(date)
        )));
        return lines;
    }

    if report.matches.is_empty() {
        lines.push(Line::notice(format!(
            "No route available from {from} to {to} on {} (0 flights found).",
            travel_date(date)
        )));
        return lines;
    }

    lines.push(Line::heading(format!(
        "Found {} flights from {from} to {to} on {}:",
        report.matches.len(),
        travel_date(date)
    )));
    lines.extend(report.matches.iter().enumerate().map(|(i, m)| {
        let flight = &m.flight;
        let mut text = format!(
            "{}. {} departs {}",
            i + 1,
            flight.number.as_deref().unwrap_or("Unknown flight"),
            m.departs
        );
        if let Some(airline) = &flight.airline {
            text.push_str(&format!(" ({airline})"));
        }
        if let Some(status) = &flight.status {
            text.push_str(&format!(" - {status}"));
        }
        let place: Vec<String> = [("Terminal", &flight.terminal), ("Gate", &flight.gate)]
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label} {v}")))
            .collect();
        if !place.is_empty() {
            text.push_str(&format!(" [{}]", place.join(", ")));
        }
        Line::plain(text)
    }));
    lines
}

pub fn departures(code: &AirportCode, departures: &[Departure]) -> Vec<Line> {
    if departures.is_empty() {
        return vec![Line::notice(format!("No upcoming departures found for {code}."))];
    }

    let mut lines = vec![Line::heading(format!("Next departures from {code}:"))];
    lines.extend(departures.iter().enumerate().map(|(i, d)| {
        Line::plain(format!("{}. {} to {} at {}", i + 1, d.number, d.destination, d.scheduled))
    }));
    lines
}
