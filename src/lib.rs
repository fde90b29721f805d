//! Trip recommendation service.
//!
//! Accepts a traveler's stated preferences, pulls matching upcoming
//! departures from the catalog, scores them with a transparent additive
//! point system, and widens the search automatically when the strict
//! matches would make a uselessly short list.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
