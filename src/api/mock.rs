//! In-memory payments backend
//!
//! Serves canned records with the same paging and not-found behavior as the
//! API, and records every call so tests can check what a command asked for.

use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

use super::{ApiError, MethodFilter, Page, PaymentsClient, Resource};
use super::{Method, Payment, Refund};

#[derive(Default)]
pub struct MockClient {
    records: HashMap<Resource, Vec<Value>>,
    refunds: Vec<Refund>,
    methods: Vec<Method>,
    reject_auth: bool,
    calls: RefCell<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that answers every call with 401
    pub fn rejecting_auth() -> Self {
        Self {
            reject_auth: true,
            ..Self::default()
        }
    }

    pub fn with_payments(self, payments: Vec<Payment>) -> Self {
        self.with_records(Resource::Payments, payments)
    }

    pub fn with_refunds(mut self, refunds: Vec<Refund>) -> Self {
        self.refunds = refunds;
        self
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    /// Store records of any resource, serialized the way the API sends them
    pub fn with_records<T: Serialize>(mut self, resource: Resource, records: Vec<T>) -> Self {
        let values = records
            .into_iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
        self.records.insert(resource, values);
        self
    }

    /// Operations invoked so far, e.g. `list payments limit=2`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);
        if self.reject_auth {
            return Err(ApiError::Unauthorized {
                detail: "Missing authentication, or failed to authenticate".into(),
            });
        }
        Ok(())
    }
}

/// Apply cursor paging: start at the record with ID `from`, take `limit`
fn paged<T: Clone>(items: &[T], page: &Page, id_of: impl Fn(&T) -> Option<&str>) -> Vec<T> {
    let start = page
        .from
        .as_deref()
        .and_then(|from| items.iter().position(|item| id_of(item) == Some(from)))
        .unwrap_or(0);

    items
        .iter()
        .skip(start)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

fn value_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

impl PaymentsClient for MockClient {
    fn list_resource(&self, resource: Resource, page: &Page) -> Result<Vec<Value>, ApiError> {
        self.record(format!("list {} limit={}", resource, page.limit))?;
        let records = self.records.get(&resource).map(Vec::as_slice).unwrap_or(&[]);
        Ok(paged(records, page, value_id))
    }

    fn get_resource(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        self.record(format!("get {resource} {id}"))?;
        self.records
            .get(&resource)
            .and_then(|records| records.iter().find(|r| value_id(r) == Some(id)))
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                detail: format!("No {resource} exists with token {id}."),
            })
    }

    fn list_payment_refunds(
        &self,
        payment_id: &str,
        page: &Page,
    ) -> Result<Vec<Refund>, ApiError> {
        self.record(format!("list refunds of {payment_id} limit={}", page.limit))?;
        let refunds: Vec<Refund> = self
            .refunds
            .iter()
            .filter(|r| r.payment_id == payment_id)
            .cloned()
            .collect();
        Ok(paged(&refunds, page, |r| Some(r.id.as_str())))
    }

    fn list_methods(&self, filter: &MethodFilter) -> Result<Vec<Method>, ApiError> {
        self.record(format!(
            "list methods amount={}",
            filter
                .amount
                .as_ref()
                .map_or_else(|| "-".to_string(), |a| a.to_string())
        ))?;
        Ok(self.methods.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Amount, PaymentStatus};
    use chrono::{TimeZone, Utc};

    fn payment(id: &str) -> Payment {
        Payment {
            id: id.to_string(),
            amount: Amount::new("10.00", "EUR"),
            status: PaymentStatus::Paid,
            description: format!("Order {id}"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            method: Some("ideal".into()),
            mode: Some("test".into()),
            paid_at: None,
        }
    }

    #[test]
    fn test_paging_from_cursor() {
        let mock = MockClient::new().with_payments(vec![
            payment("tr_a"),
            payment("tr_b"),
            payment("tr_c"),
        ]);

        let page = Page::new(2, Some("tr_b".into())).unwrap();
        let ids: Vec<String> = mock
            .list_payments(&page)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["tr_b", "tr_c"]);
        assert_eq!(mock.calls(), vec!["list payments limit=2"]);
    }

    #[test]
    fn test_get_payment_roundtrips_through_json() {
        let mock = MockClient::new().with_payments(vec![payment("tr_a")]);
        assert_eq!(mock.get_payment("tr_a").unwrap(), payment("tr_a"));
        assert!(matches!(
            mock.get_payment("tr_missing"),
            Err(ApiError::NotFound { .. })
        ));
    }

    #[test]
    fn test_rejecting_auth() {
        let mock = MockClient::rejecting_auth();
        assert!(matches!(
            mock.list_methods(&MethodFilter::default()),
            Err(ApiError::Unauthorized { .. })
        ));
        assert_eq!(mock.calls().len(), 1);
    }
}
