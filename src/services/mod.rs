//! Domain service functions for the Rebillia REST API.
//!
//! Each public function performs exactly one transport call: it builds the
//! path and query string, applies the endpoint's body quirks, and returns the
//! upstream JSON untouched (deletes excepted, see [`delete_confirmation`]).
//! Validation lives in the tool handlers, not here.

pub mod bill_runs;
pub mod currencies;
pub mod customers;
pub mod filters;
pub mod gateways;
pub mod integrations;
pub mod invoices;
pub mod products;
pub mod rate_plan_charges;
pub mod rate_plans;
pub mod shipping;
pub mod subscriptions;
pub mod transactions;

use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Paginated list envelope the upstream returns for collection endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub current_page_number: u64,
    pub items_per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub data: Vec<T>,
}

/// Ordered query-string builder. Pairs serialize in push order; absent
/// optionals are never serialized.
#[derive(Default)]
pub(crate) struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: &'static str, value: impl ToString) {
        self.pairs.push((key, value.to_string()));
    }

    pub(crate) fn push_opt(&mut self, key: &'static str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Optional string parameter; empty strings are skipped like absent ones.
    pub(crate) fn push_opt_str(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            if !value.is_empty() {
                self.pairs.push((key, value.to_string()));
            }
        }
    }

    /// `?k=v&...` with percent-encoding, or `""` when no pairs were pushed.
    pub(crate) fn build(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        match serde_urlencoded::to_string(&self.pairs) {
            Ok(encoded) => format!("?{encoded}"),
            Err(_) => String::new(),
        }
    }
}

/// Delete endpoints often answer with an empty object. Substitute a uniform
/// confirmation so callers always see something meaningful.
pub(crate) fn delete_confirmation(result: Value, message: &str) -> Value {
    match &result {
        Value::Object(map) if map.is_empty() => json!({
            "success": true,
            "message": message,
        }),
        _ => result,
    }
}

/// Body for update-style endpoints: `None` when no fields were provided.
pub(crate) fn body_if_nonempty(map: Map<String, Value>) -> Option<Value> {
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_preserves_push_order() {
        let mut q = Query::new();
        q.push_opt("pageNo", Some(2));
        q.push_opt("itemPerPage", Some(50));
        q.push_opt_str("query", Some("smith"));
        q.push_opt_str("status", None);
        assert_eq!(q.build(), "?pageNo=2&itemPerPage=50&query=smith");
    }

    #[test]
    fn query_percent_encodes_values() {
        let mut q = Query::new();
        q.push_opt_str("include", Some("addressbook,subscriptions"));
        assert_eq!(q.build(), "?include=addressbook%2Csubscriptions");
    }

    #[test]
    fn empty_query_builds_empty_string() {
        let mut q = Query::new();
        q.push_opt_str("query", Some(""));
        assert_eq!(q.build(), "");
    }

    #[test]
    fn delete_confirmation_replaces_empty_object() {
        let out = delete_confirmation(json!({}), "Customer deleted");
        assert_eq!(out, json!({"success": true, "message": "Customer deleted"}));
    }

    #[test]
    fn delete_confirmation_passes_through_payload() {
        let payload = json!({"id": 3, "status": "deleted"});
        assert_eq!(delete_confirmation(payload.clone(), "Customer deleted"), payload);
    }

    #[test]
    fn paginated_envelope_deserializes() {
        let value = json!({
            "currentPageNumber": 1,
            "itemsPerPage": 20,
            "totalItems": 2,
            "totalPages": 1,
            "data": [{"id": 1}, {"id": 2}]
        });
        let page: Paginated<Value> = serde_json::from_value(value).unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.data.len(), 2);
    }
}
