//! Futura Common - Shared configuration and logging for the Futura support backend.
//!
//! This crate provides:
//! - Configuration types and loading (file + environment overrides)
//! - Logging setup with noise filtering

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod logging;

pub use config::{Config, GeminiConfig, ObservabilityConfig, ServerConfig};
pub use logging::init_logging;
