//! Tool definitions, grouped by resource area.
//!
//! Each module exposes a `register` function that adds its tools to the
//! registry; `register_all` fixes the listing order.

pub mod bill_runs;
pub mod currencies;
pub mod customers;
pub mod docs;
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

use serde_json::Value;

use crate::core::client::ApiError;
use crate::domains::tools::registry::ToolRegistry;
use crate::domains::tools::result::ToolResult;

/// Register every tool, grouped by resource area.
pub fn register_all(registry: &mut ToolRegistry) {
    customers::register(registry);
    subscriptions::register(registry);
    invoices::register(registry);
    products::register(registry);
    rate_plans::register(registry);
    rate_plan_charges::register(registry);
    transactions::register(registry);
    bill_runs::register(registry);
    gateways::register(registry);
    currencies::register(registry);
    integrations::register(registry);
    shipping::register(registry);
    filters::register(registry);
    docs::register(registry);
}

/// Wrap a service outcome: success pretty-prints the upstream JSON, failure
/// becomes an error result prefixed with `Error:`.
pub(crate) fn run_service(result: Result<Value, ApiError>) -> ToolResult {
    match result {
        Ok(value) => ToolResult::json(&value),
        Err(e) => ToolResult::error(format!("Error: {e}")),
    }
}

/// Insert a field into an update/create body only when the caller provided
/// it. Absent fields never reach the wire.
pub(crate) fn set(
    body: &mut serde_json::Map<String, Value>,
    key: &str,
    value: Option<impl Into<Value>>,
) {
    if let Some(value) = value {
        body.insert(key.to_string(), value.into());
    }
}

// Closed value sets shared across resource areas. Violation messages list
// these verbatim.

pub(crate) const CUSTOMER_STATUSES: &[&str] = &["active", "disabled", "archived"];
pub(crate) const SUBSCRIPTION_STATUSES: &[&str] =
    &["active", "paused", "archived", "requestPayment"];
pub(crate) const CHARGE_TYPES: &[&str] = &["oneTime", "recurring", "usage"];
pub(crate) const CHARGE_MODELS: &[&str] = &[
    "flatFeePricing",
    "perUnitPricing",
    "tieredPricing",
    "volumePricing",
];
pub(crate) const BILLING_PERIODS: &[&str] = &["day", "week", "month", "year"];
pub(crate) const BILLING_TIMINGS: &[&str] = &["inAdvance", "inArrears"];
pub(crate) const BILL_CYCLE_TYPES: &[&str] = &[
    "chargeTriggerDay",
    "defaultFromCustomer",
    "specificDayOfMonth",
    "specificDayOfWeek",
    "specificMonthOfYear",
    "subscriptionStartDay",
    "subscriptionFreeTrial",
];
pub(crate) const END_DATE_CONDITIONS: &[&str] = &["subscriptionEnd", "fixedPeriod"];
pub(crate) const CATEGORIES: &[&str] = &["physical", "digital"];
pub(crate) const PAYMENT_TYPES: &[&str] = &[
    "offlinePaymentProvider",
    "thirdPartyPaymentProvider",
    "walletPaymentProvider",
    "otherPayment",
];
pub(crate) const PAYMENT_METHOD_TYPES: &[&str] = &["card", "ach"];
pub(crate) const CHARGE_CREDIT_TYPES: &[&str] = &["charge", "credit"];
pub(crate) const PRODUCT_STATUSES: &[&str] = &["published", "archived", "disabled"];
pub(crate) const RATE_PLAN_STATUSES: &[&str] =
    &["published", "archived", "disabled", "discontinue"];
pub(crate) const RATE_PLAN_TYPES: &[&str] = &["contract", "ongoing", "prepaid"];
pub(crate) const LIST_PRICE_BASES: &[&str] = &["perMonth", "perBillingPeriod", "perWeek"];
pub(crate) const BILL_RUN_STATUSES: &[&str] = &["completed", "pending", "error"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::ApiError;
    use serde_json::json;

    #[test]
    fn registers_every_area_without_duplicates() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);
        assert!(registry.len() >= 90);
        // A sample across areas, in listing order.
        assert!(registry.contains("list_customers"));
        assert!(registry.contains("add_subscription_rate_plan_charge"));
        assert!(registry.contains("charge_invoice_external"));
        assert!(registry.contains("sync_rate_plan"));
        assert!(registry.contains("refund_transaction"));
        assert!(registry.contains("update_bill_run"));
        assert!(registry.contains("test_gateway"));
        assert!(registry.contains("set_default_currency"));
        assert!(registry.contains("list_order_statuses"));
        assert!(registry.contains("calculate_shipping"));
        assert!(registry.contains("create_filter"));
        assert!(registry.contains("get_api_docs"));
    }

    #[test]
    fn listing_groups_by_resource_area() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.list().iter().map(|t| t.name).collect();
        let first_customer = names.iter().position(|n| *n == "list_customers").unwrap();
        let last_customer = names
            .iter()
            .position(|n| *n == "delete_customer_charge_credit")
            .unwrap();
        let first_subscription = names.iter().position(|n| *n == "list_subscriptions").unwrap();
        assert!(first_customer < last_customer);
        assert!(last_customer < first_subscription);
    }

    #[test]
    fn every_tool_has_object_schema_and_description() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);
        for tool in registry.list() {
            assert_eq!(
                tool.input_schema["type"], "object",
                "schema of {} is not an object",
                tool.name
            );
            assert!(!tool.description.is_empty(), "{} has no description", tool.name);
        }
    }

    #[test]
    fn run_service_wraps_transport_errors() {
        let result = run_service(Err(ApiError::Status {
            status: 404,
            status_text: "Not Found".to_string(),
            body: "{\"error\":\"missing\"}".to_string(),
        }));
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "Error: Rebillia API error (404 Not Found): {\"error\":\"missing\"}"
        );
    }

    #[test]
    fn run_service_pretty_prints_success() {
        let result = run_service(Ok(json!({"id": 1})));
        assert!(!result.is_error());
        assert!(result.first_text().contains("\"id\": 1"));
    }
}
