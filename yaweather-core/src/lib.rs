//! Core library for the `yaweather` CLI.
//!
//! This crate defines:
//! - Parsing of the single-dash command-line parameters
//! - A client for the Yandex forecast endpoint and temperature extraction
//! - Configuration file handling
//!
//! It is used by `yaweather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod params;

pub use client::WeatherClient;
pub use config::Config;
pub use error::{ParamError, WeatherError};
pub use model::{Coordinates, ForecastSummary};
pub use params::{Flag, Params};
