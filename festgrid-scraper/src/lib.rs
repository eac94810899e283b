//! Scraper for a festival live-music grid site: fetches the schedule pages,
//! parses the venue-by-date table into [`festgrid_core::Show`] records, and
//! hands them to the import reconciler.

pub mod common;
pub mod config;
pub mod fetch;
pub mod observability;
pub mod parser;
