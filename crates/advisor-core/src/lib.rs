//! Core domain + application logic for the advisory relay.
//!
//! This crate is framework-agnostic. Telegram, the HTTP server and the AI
//! provider live behind ports (traits) implemented in adapter crates.

pub mod advisory;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod notifier;
pub mod photo;
pub mod report;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{Error, Result};
