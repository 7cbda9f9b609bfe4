//! Error kinds surfaced to the user
//!
//! Every command returns [`CliError`]. The entry point prints it as a single
//! line and exits with [`CliError::exit_code`].

use miette::Diagnostic;
use thiserror::Error;

use crate::api::{ApiError, ResourceError};
use crate::cli::table::TableError;

/// A failure of one CLI invocation
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// Missing or malformed credential, or the API rejected it
    #[error("authentication failed: {0}")]
    #[diagnostic(
        code(mollie::auth),
        help("pass --key, set MOLLIE_API_KEY, or add api_key to the config file")
    )]
    Auth(String),

    /// The requested resource does not exist upstream
    #[error("not found: {0}")]
    #[diagnostic(code(mollie::not_found))]
    NotFound(String),

    /// Bad command-line input
    #[error("invalid input: {0}")]
    #[diagnostic(code(mollie::validation))]
    Validation(String),

    /// Any other failure talking to the API or handling its response
    #[error("the Mollie API returned an error: {0}")]
    #[diagnostic(code(mollie::upstream))]
    Upstream(String),
}

impl CliError {
    pub fn auth(msg: impl Into<String>) -> Self {
        CliError::Auth(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CliError::Validation(msg.into())
    }

    /// Process exit code for this failure class
    ///
    /// Validation failures share clap's usage-error code.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Validation(_) => 2,
            CliError::Auth(_) | CliError::NotFound(_) | CliError::Upstream(_) => 1,
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { detail } => CliError::Auth(detail),
            ApiError::NotFound { detail } => CliError::NotFound(detail),
            other => CliError::Upstream(other.to_string()),
        }
    }
}

impl From<ResourceError> for CliError {
    fn from(err: ResourceError) -> Self {
        CliError::Validation(err.to_string())
    }
}

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        CliError::Upstream(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Upstream(format!("writing output: {err}"))
    }
}
