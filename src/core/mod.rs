//! Core module - credentials, configuration, errors and logging

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;

pub use config::Config;
pub use credentials::{Credential, Mode};
pub use error::CliError;
