//! Catalogue of API resources reachable by the generic `list` / `get` commands

use std::fmt;
use thiserror::Error;

/// A top-level collection of the Mollie v2 API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Payments,
    Refunds,
    Chargebacks,
    Customers,
    Orders,
    Profiles,
    Settlements,
    Invoices,
    PaymentLinks,
    Subscriptions,
    Methods,
}

/// Failure to map user input onto a [`Resource`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("no resource found for name '{hint}', use one of: {}", Resource::names().join(", "))]
    Unknown { hint: String },

    #[error("hint '{hint}' matches multiple resources: {}", .matches.join(", "))]
    Ambiguous { hint: String, matches: Vec<&'static str> },

    #[error("cannot find a resource for id '{id}', pass --hint-resource")]
    UnknownId { id: String },

    #[error("resource '{resource}' doesn't support {operation}")]
    Unsupported {
        resource: Resource,
        operation: &'static str,
    },
}

impl Resource {
    pub const ALL: [Resource; 11] = [
        Resource::Payments,
        Resource::Refunds,
        Resource::Chargebacks,
        Resource::Customers,
        Resource::Orders,
        Resource::Profiles,
        Resource::Settlements,
        Resource::Invoices,
        Resource::PaymentLinks,
        Resource::Subscriptions,
        Resource::Methods,
    ];

    /// Name used on the command line and as the URL path segment
    pub fn name(self) -> &'static str {
        match self {
            Resource::Payments => "payments",
            Resource::Refunds => "refunds",
            Resource::Chargebacks => "chargebacks",
            Resource::Customers => "customers",
            Resource::Orders => "orders",
            Resource::Profiles => "profiles",
            Resource::Settlements => "settlements",
            Resource::Invoices => "invoices",
            Resource::PaymentLinks => "payment-links",
            Resource::Subscriptions => "subscriptions",
            Resource::Methods => "methods",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|r| r.name()).collect()
    }

    /// Key of the record array inside a list response's `_embedded` object
    pub fn embedded_key(self) -> &'static str {
        match self {
            Resource::PaymentLinks => "payment_links",
            other => other.name(),
        }
    }

    /// Prefix of the IDs the API hands out for this resource
    pub fn id_prefix(self) -> Option<&'static str> {
        match self {
            Resource::Payments => Some("tr_"),
            Resource::Refunds => Some("re_"),
            Resource::Chargebacks => Some("chb_"),
            Resource::Customers => Some("cst_"),
            Resource::Orders => Some("ord_"),
            Resource::Profiles => Some("pfl_"),
            Resource::Settlements => Some("stl_"),
            Resource::Invoices => Some("inv_"),
            Resource::PaymentLinks => Some("pl_"),
            Resource::Subscriptions => Some("sub_"),
            Resource::Methods => None,
        }
    }

    /// Whether single records can be fetched at `/{name}/{id}`
    ///
    /// Refunds, chargebacks and subscriptions only exist below their parent.
    pub fn supports_get(self) -> bool {
        !matches!(
            self,
            Resource::Refunds | Resource::Chargebacks | Resource::Subscriptions
        )
    }

    /// Resolve a full or partial resource name
    pub fn find(hint: &str) -> Result<Resource, ResourceError> {
        let hint = hint.trim().to_lowercase();
        if let Some(exact) = Self::ALL.iter().find(|r| r.name() == hint) {
            return Ok(*exact);
        }

        let matches: Vec<Resource> = Self::ALL
            .iter()
            .copied()
            .filter(|r| r.name().contains(hint.as_str()))
            .collect();

        match matches.as_slice() {
            [] => Err(ResourceError::Unknown { hint }),
            [single] => Ok(*single),
            many => Err(ResourceError::Ambiguous {
                hint,
                matches: many.iter().map(|r| r.name()).collect(),
            }),
        }
    }

    /// Pick the resource whose ID prefix `id` starts with
    pub fn from_id(id: &str) -> Result<Resource, ResourceError> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.id_prefix().is_some_and(|p| id.starts_with(p)))
            .ok_or_else(|| ResourceError::UnknownId { id: id.to_string() })
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
