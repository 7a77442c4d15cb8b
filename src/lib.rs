//! Terminal client for the AeroDataBox flight-data API.
//!
//! [`app::App`] drives the menu; [`queries`] holds the four lookups and
//! [`ui`] turns their results into console lines.

pub mod api;
pub mod app;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod models;
pub mod queries;
pub mod schedule;
pub mod ui;
