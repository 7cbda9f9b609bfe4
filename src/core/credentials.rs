//! API key / access token resolution

use std::fmt;

use crate::core::error::CliError;

const API_KEY_PREFIXES: [&str; 2] = ["test_", "live_"];
const ACCESS_TOKEN_PREFIX: &str = "access_";

/// Which environment an API key talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Test,
    Live,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Test => write!(f, "test"),
            Mode::Live => write!(f, "live"),
        }
    }
}

/// An authenticated credential for the Mollie API
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Profile API key (`test_...` / `live_...`)
    ApiKey { key: String, mode: Mode },
    /// Organization access token (`access_...`)
    AccessToken { token: String, testmode: bool },
}

impl Credential {
    /// Validate a raw key and build a credential from it
    ///
    /// `testmode` only applies to access tokens; API keys carry their own mode.
    pub fn resolve(key: Option<&str>, testmode: bool) -> Result<Self, CliError> {
        let key = key.map(str::trim).filter(|k| !k.is_empty()).ok_or_else(|| {
            CliError::auth("no API key given; use --key or set MOLLIE_API_KEY")
        })?;

        let (prefix, secret) = split_prefix(key).ok_or_else(|| {
            CliError::auth(format!(
                "the key should start with one of: {}, {}",
                API_KEY_PREFIXES.join(", "),
                ACCESS_TOKEN_PREFIX
            ))
        })?;

        if secret.is_empty() || !secret.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(CliError::auth(format!("malformed {prefix} key")));
        }

        let credential = match prefix {
            "test_" => Credential::ApiKey {
                key: key.to_string(),
                mode: Mode::Test,
            },
            "live_" => Credential::ApiKey {
                key: key.to_string(),
                mode: Mode::Live,
            },
            _ => Credential::AccessToken {
                token: key.to_string(),
                testmode,
            },
        };

        if testmode {
            if let Credential::ApiKey { mode, .. } = &credential {
                log::warn!("--testmode has no effect with an API key; using {mode} mode from the key");
            }
        }

        Ok(credential)
    }

    /// Value for the `Authorization: Bearer` header
    pub fn bearer(&self) -> &str {
        match self {
            Credential::ApiKey { key, .. } => key,
            Credential::AccessToken { token, .. } => token,
        }
    }

    /// Whether requests must carry `testmode=true`
    pub fn testmode_param(&self) -> bool {
        matches!(self, Credential::AccessToken { testmode: true, .. })
    }
}

// Never print the secret itself.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::ApiKey { mode, .. } => {
                f.debug_struct("ApiKey").field("mode", mode).finish_non_exhaustive()
            }
            Credential::AccessToken { testmode, .. } => f
                .debug_struct("AccessToken")
                .field("testmode", testmode)
                .finish_non_exhaustive(),
        }
    }
}

fn split_prefix(key: &str) -> Option<(&'static str, &str)> {
    API_KEY_PREFIXES
        .iter()
        .chain(std::iter::once(&ACCESS_TOKEN_PREFIX))
        .find_map(|prefix| key.strip_prefix(prefix).map(|rest| (*prefix, rest)))
}
