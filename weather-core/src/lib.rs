//! Core library for the `cityweather` client.
//!
//! This crate defines:
//! - The typed model of a WeatherAPI.com `current.json` response
//! - The [`WeatherClient`] abstraction and its HTTP implementation
//! - The [`WeatherCoordinator`], which owns the view state a renderer observes
//! - Configuration & credentials handling
//!
//! It is used by `cityweather-cli`, but any other front end can drive the
//! coordinator the same way.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;

pub use config::Config;
pub use coordinator::{FetchHandle, WeatherCoordinator};
pub use error::{ErrorKind, WeatherError};
pub use model::{Condition, CurrentConditions, Location, WeatherReport};
pub use provider::{WeatherClient, client_from_config, weatherapi::WeatherApiClient};
pub use state::{Phase, ViewState};
