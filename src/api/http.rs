//! Blocking HTTP client for the Mollie v2 REST API
//!
//! One request per call, no retries. Non-2xx responses are turned into
//! [`ApiError`] from the `{status, title, detail}` error body.

use serde_json::Value;
use std::time::Duration;

use super::types::ErrorBody;
use super::{decode, embedded, ApiError, MethodFilter, Page, PaymentsClient, Resource};
use super::{Method, Refund};
use crate::core::credentials::Credential;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Payments client backed by the live API
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
    credential: Credential,
}

impl HttpClient {
    /// Create a client for `base_url` (e.g. `https://api.mollie.com/v2`)
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .user_agent(concat!("mollie-cli/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    /// GET `url` with `query`, returning the decoded JSON body
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let mut request = self
            .agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.credential.bearer()))
            .set("Accept", "application/json");

        for (name, value) in query {
            request = request.query(name, value);
        }
        if self.credential.testmode_param() {
            request = request.query("testmode", "true");
        }

        log::debug!("GET {url} {query:?}");

        match request.call() {
            Ok(response) => {
                log::debug!("{} {}", response.status(), url);
                response
                    .into_json::<Value>()
                    .map_err(|e| ApiError::Decode(e.to_string()))
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                log::debug!("{status} {url}: {body}");
                Err(status_error(status, &body))
            }
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport(transport.to_string())),
        }
    }
}

fn page_query(page: &Page) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", page.limit.to_string())];
    if let Some(ref from) = page.from {
        query.push(("from", from.clone()));
    }
    query
}

/// Map an error response onto the matching [`ApiError`]
fn status_error(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let title = if parsed.title.is_empty() {
        "HTTP error".to_string()
    } else {
        parsed.title
    };
    let detail = if parsed.detail.is_empty() {
        title.clone()
    } else {
        parsed.detail
    };

    match status {
        401 | 403 => ApiError::Unauthorized { detail },
        404 => ApiError::NotFound { detail },
        _ => ApiError::Status {
            status,
            title,
            detail,
        },
    }
}

impl PaymentsClient for HttpClient {
    fn list_resource(&self, resource: Resource, page: &Page) -> Result<Vec<Value>, ApiError> {
        let body = self.get(&self.url(&[resource.name()]), &page_query(page))?;
        embedded(body, resource.embedded_key())
    }

    fn get_resource(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        self.get(&self.url(&[resource.name(), id]), &[])
    }

    fn list_payment_refunds(
        &self,
        payment_id: &str,
        page: &Page,
    ) -> Result<Vec<Refund>, ApiError> {
        let url = self.url(&[Resource::Payments.name(), payment_id, Resource::Refunds.name()]);
        let body = self.get(&url, &page_query(page))?;
        embedded(body, Resource::Refunds.embedded_key())?
            .into_iter()
            .map(decode)
            .collect()
    }

    fn list_methods(&self, filter: &MethodFilter) -> Result<Vec<Method>, ApiError> {
        let mut query = Vec::new();
        if let Some(ref amount) = filter.amount {
            query.push(("amount[value]", amount.value.clone()));
            query.push(("amount[currency]", amount.currency.clone()));
        }
        if let Some(ref locale) = filter.locale {
            query.push(("locale", locale.clone()));
        }

        let body = self.get(&self.url(&[Resource::Methods.name()]), &query)?;
        embedded(body, Resource::Methods.embedded_key())?
            .into_iter()
            .map(decode)
            .collect()
    }
}
