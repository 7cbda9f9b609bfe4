//! Payments API boundary
//!
//! Everything outside this module talks to Mollie through [`PaymentsClient`].
//! [`HttpClient`] is the real implementation; `MockClient` serves canned
//! records to unit tests and is only compiled for them.

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod resource;
pub mod types;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::core::error::CliError;

pub use http::HttpClient;
#[cfg(test)]
pub use mock::MockClient;
pub use resource::{Resource, ResourceError};
pub use types::{Amount, Method, Payment, PaymentStatus, Refund};

/// Largest page the API serves
pub const MAX_LIMIT: u32 = 250;

/// Page size used when none is given
pub const DEFAULT_LIMIT: u32 = 10;

/// Errors at the client boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{detail}")]
    Unauthorized { detail: String },

    #[error("{detail}")]
    NotFound { detail: String },

    #[error("{status} {title}: {detail}")]
    Status {
        status: u16,
        title: String,
        detail: String,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Cursor pagination forwarded verbatim to a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    /// ID of the first record to return
    pub from: Option<String>,
}

impl Page {
    pub fn new(limit: u32, from: Option<String>) -> Result<Self, CliError> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(CliError::validation(format!(
                "--limit must be between 1 and {MAX_LIMIT}, got {limit}"
            )));
        }
        if let Some(ref cursor) = from {
            check_id(cursor, None)?;
        }
        Ok(Self { limit, from })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            from: None,
        }
    }
}

/// Optional narrowing of the method list, applied by the API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodFilter {
    /// Only methods that can process this amount
    pub amount: Option<Amount>,
    /// Locale for the method descriptions, e.g. `nl_NL`
    pub locale: Option<String>,
}

/// The capabilities this CLI needs from a payments backend
pub trait PaymentsClient {
    /// List one page of any top-level resource as raw records
    fn list_resource(&self, resource: Resource, page: &Page) -> Result<Vec<Value>, ApiError>;

    /// Fetch one record of a top-level resource
    fn get_resource(&self, resource: Resource, id: &str) -> Result<Value, ApiError>;

    /// List refunds of a single payment
    fn list_payment_refunds(&self, payment_id: &str, page: &Page)
        -> Result<Vec<Refund>, ApiError>;

    /// List payment methods enabled on the profile
    fn list_methods(&self, filter: &MethodFilter) -> Result<Vec<Method>, ApiError>;

    fn list_payments(&self, page: &Page) -> Result<Vec<Payment>, ApiError> {
        self.list_resource(Resource::Payments, page)?
            .into_iter()
            .map(decode)
            .collect()
    }

    fn get_payment(&self, id: &str) -> Result<Payment, ApiError> {
        decode(self.get_resource(Resource::Payments, id)?)
    }
}

/// Reject IDs that would not survive as a single URL path segment
///
/// With `prefix`, the ID must also start with it (e.g. `tr_` for payments).
pub fn check_id(id: &str, prefix: Option<&str>) -> Result<(), CliError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CliError::validation(format!("'{id}' is not a valid ID")));
    }
    if let Some(prefix) = prefix {
        if !id.starts_with(prefix) {
            return Err(CliError::validation(format!(
                "'{id}' is not a valid ID, expected it to start with '{prefix}'"
            )));
        }
    }
    Ok(())
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull the record array out of a list response (`_embedded.<key>`)
pub(crate) fn embedded(mut body: Value, key: &str) -> Result<Vec<Value>, ApiError> {
    match body
        .get_mut("_embedded")
        .and_then(|e| e.get_mut(key))
        .map(Value::take)
    {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(ApiError::Decode(format!("'_embedded.{key}' is not a list"))),
        // An empty page may omit the array entirely
        None if body.get("count").and_then(Value::as_u64) == Some(0) => Ok(Vec::new()),
        None => Err(ApiError::Decode(format!("missing '_embedded.{key}'"))),
    }
}
