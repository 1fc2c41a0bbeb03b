//! Subscription tools: the subscription lifecycle, billing previews, and the
//! subscription-level rate plans and charges.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{
    BILL_CYCLE_TYPES, BILLING_PERIODS, BILLING_TIMINGS, CHARGE_TYPES, END_DATE_CONDITIONS,
    RATE_PLAN_TYPES, SUBSCRIPTION_STATUSES, run_service, set,
};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::{Validator, require_charge_tiers};
use crate::services::subscriptions as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_subscriptions",
        description: "List subscriptions. GET /subscriptions. Optional: include, query, orderBy, sortBy, filterId (saved filter), itemPerPage, pageNo.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "include": { "type": "string", "description": "Comma-separated relations, e.g. ratePlan,customer" },
                "query": { "type": "string", "description": "Search text" },
                "orderBy": { "type": "string", "description": "asc or desc" },
                "sortBy": { "type": "string", "description": "Sort field" },
                "filterId": { "type": "number", "description": "Saved filter ID" },
                "itemPerPage": { "type": "number" },
                "pageNo": { "type": "number" }
            }
        }),
        handler: |client, args| list_subscriptions(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription",
        description: "Get a subscription by ID. GET /subscriptions/{id}. Optional: include (comma-separated relations).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "include": { "type": "string", "description": "Comma-separated relations" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| get_subscription(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_subscription",
        description: "Create a subscription. POST /subscriptions. Required: customerId, name, companyCurrencyId, effectiveStartDate, ratePlan (array). Each ratePlan: productRatePlanId (required), optional name, type (contract|ongoing|prepaid), ratePlanCharge (array; each needs quantity, optional productRatePlanChargeId or full definition with chargeTier). Optional: companyGatewayId, customerPaymentMethodId, detail, offlinePaymentId, billingAddressId, shippingAddressId.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "name": { "type": "string", "description": "Subscription name (required)" },
                "companyCurrencyId": { "type": "number", "description": "Company currency ID (required)" },
                "effectiveStartDate": { "type": "string", "description": "Effective start date YYYY-MM-DD (required)" },
                "ratePlan": {
                    "type": "array",
                    "description": "Rate plans: each has productRatePlanId, optional name, type, ratePlanCharge array (each: quantity, optional productRatePlanChargeId or chargeTier)"
                },
                "companyGatewayId": { "type": "number", "description": "Company gateway ID" },
                "customerPaymentMethodId": { "type": "number", "description": "Customer payment method ID" },
                "detail": { "type": "string", "description": "Detail" },
                "offlinePaymentId": { "type": "string", "description": "Offline payment ID" },
                "billingAddressId": { "type": "number", "description": "Billing address ID" },
                "shippingAddressId": { "type": "number", "description": "Shipping address ID" }
            },
            "required": ["customerId", "name", "companyCurrencyId", "effectiveStartDate", "ratePlan"]
        }),
        handler: |client, args| create_subscription(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_subscription",
        description: "Update a subscription. PUT /subscriptions/{id}. Only provided fields are sent. Optional: name, companyCurrencyId, companyGatewayId, customerPaymentMethodId, detail, effectiveStartDate, billingAddressId, shippingAddressId.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "name": { "type": "string" },
                "companyCurrencyId": { "type": "number" },
                "companyGatewayId": { "type": "number" },
                "customerPaymentMethodId": { "type": "number" },
                "detail": { "type": "string" },
                "effectiveStartDate": { "type": "string", "description": "YYYY-MM-DD" },
                "billingAddressId": { "type": "number" },
                "shippingAddressId": { "type": "number" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| update_subscription(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_subscription",
        description: "Delete a subscription. DELETE /subscriptions/{id}. IRREVERSIBLE.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| delete_subscription(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_subscription_status",
        description: "Change a subscription's status. PUT /subscriptions/{id}/status. Required: status (active|paused|archived|requestPayment).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "status": { "type": "string", "description": "active, paused, archived, or requestPayment (required)" }
            },
            "required": ["subscriptionId", "status"]
        }),
        handler: |client, args| update_subscription_status(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription_next_bill",
        description: "Preview the next bill for a subscription. GET /subscriptions/{id}/nextBill. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "include": { "type": "string" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| get_subscription_next_bill(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription_upcoming_charges",
        description: "List upcoming charges for a subscription. GET /subscriptions/{id}/upcoming. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "include": { "type": "string" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| get_subscription_upcoming_charges(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription_invoices",
        description: "List invoices for a subscription. GET /subscriptions/{id}/invoices. Optional: include, pageNo, itemPerPage.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "include": { "type": "string" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| get_subscription_invoices(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription_logs",
        description: "Activity history for a subscription. GET /subscriptions/{id}/logs. Optional: pageNo, itemPerPage.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| get_subscription_logs(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription_external_invoices",
        description: "External (e-commerce) orders linked to a subscription. GET /subscriptions/{id}/external-invoices. Optional: include, pageNo, itemPerPage.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "include": { "type": "string" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| get_subscription_external_invoices(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_subscription_rate_plans",
        description: "List rate plans attached to a subscription. GET /subscriptions/{id}/rateplans. Optional: include, pageNo, itemPerPage, orderBy, sortBy.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "include": { "type": "string" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" },
                "orderBy": { "type": "string" },
                "sortBy": { "type": "string" }
            },
            "required": ["subscriptionId"]
        }),
        handler: |client, args| list_subscription_rate_plans(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription_rate_plan",
        description: "Get one rate plan on a subscription. GET /subscriptions/{id}/rateplans/{ratePlanId}. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "ratePlanId": { "type": "number", "description": "Subscription rate plan ID (required)" },
                "include": { "type": "string" }
            },
            "required": ["subscriptionId", "ratePlanId"]
        }),
        handler: |client, args| get_subscription_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "add_subscription_rate_plan",
        description: "Add a rate plan to a subscription. POST /subscriptions/{id}/rateplans. Required: productRatePlanId (product rate plan to attach). Optional: name, type (contract|ongoing|prepaid), effectiveStartDate, changeStatusBasedOnCharge, ratePlanCharge (array of {quantity, optional productRatePlanChargeId, or full definition with chargeTier}).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "productRatePlanId": { "type": "number", "description": "Product rate plan ID to add (required)" },
                "name": { "type": "string", "description": "Override name" },
                "type": { "type": "string", "description": "contract, ongoing, or prepaid" },
                "effectiveStartDate": { "type": "string", "description": "YYYY-MM-DD" },
                "changeStatusBasedOnCharge": { "type": "boolean" },
                "ratePlanCharge": {
                    "type": "array",
                    "description": "Initial charges: each { quantity, optional productRatePlanChargeId, or full definition with chargeTier }"
                }
            },
            "required": ["subscriptionId", "productRatePlanId"]
        }),
        handler: |client, args| add_subscription_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_subscription_rate_plan",
        description: "Update a rate plan on a subscription. PUT /subscriptions/{id}/rateplans/{ratePlanId}. Optional: name, type (contract|ongoing|prepaid), effectiveStartDate, changeStatusBasedOnCharge.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "ratePlanId": { "type": "number", "description": "Subscription rate plan ID (required)" },
                "name": { "type": "string" },
                "type": { "type": "string", "description": "contract, ongoing, or prepaid" },
                "effectiveStartDate": { "type": "string", "description": "YYYY-MM-DD" },
                "changeStatusBasedOnCharge": { "type": "boolean" }
            },
            "required": ["subscriptionId", "ratePlanId"]
        }),
        handler: |client, args| update_subscription_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "remove_subscription_rate_plan",
        description: "Remove a rate plan from a subscription. DELETE /subscriptions/{id}/rateplans/{ratePlanId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "ratePlanId": { "type": "number", "description": "Subscription rate plan ID (required)" }
            },
            "required": ["subscriptionId", "ratePlanId"]
        }),
        handler: |client, args| remove_subscription_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_subscription_rate_plan_charge",
        description: "Get one rate plan charge on a subscription. GET /subscriptions/{id}/rateplan-charges/{chargeId}. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "chargeId": { "type": "number", "description": "Subscription rate plan charge ID (required)" },
                "include": { "type": "string" }
            },
            "required": ["subscriptionId", "chargeId"]
        }),
        handler: |client, args| get_subscription_rate_plan_charge(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "add_subscription_rate_plan_charge",
        description: "Add a rate plan charge to a subscription rate plan. POST .../rateplan-charges. Required: subscriptionId, ratePlanId, quantity, name, chargeTier (at least one {currency, price in cents}), billCycleType, endDateCondition (subscriptionEnd|fixedPeriod). When chargeType is recurring, billingPeriodAlignment is also required (alignToCharge, alignToSubscriptionStart, alignToTermStart). Optional: productRatePlanChargeId, chargeType, chargeModel, category, taxable, weight, billingPeriod, billingTiming, specificBillingPeriod.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "ratePlanId": { "type": "number", "description": "Subscription rate plan ID (required)" },
                "quantity": { "type": "number", "description": "Quantity (required)" },
                "productRatePlanChargeId": { "type": "number", "description": "Product rate plan charge ID to reference" },
                "name": { "type": "string", "description": "Charge name (required)" },
                "chargeType": { "type": "string", "description": "oneTime, recurring, or usage" },
                "chargeModel": { "type": "string", "description": "flatFeePricing, perUnitPricing, tieredPricing, or volumePricing" },
                "billCycleType": { "type": "string", "description": "Required. E.g. chargeTriggerDay, specificDayOfMonth, subscriptionStartDay" },
                "category": { "type": "string", "description": "physical or digital" },
                "chargeTier": {
                    "type": "array",
                    "description": "Required. At least one {currency, price in cents}. Optional: startingUnit, endingUnit, priceFormat, tier"
                },
                "taxable": { "type": "boolean" },
                "weight": { "type": "number", "description": "Weight (integer)" },
                "endDateCondition": { "type": "string", "description": "Required. subscriptionEnd or fixedPeriod" },
                "billingPeriod": { "type": "string", "description": "day, week, month, year" },
                "billingTiming": { "type": "string", "description": "inAdvance, inArrears" },
                "billingPeriodAlignment": {
                    "type": "string",
                    "description": "Required when chargeType is recurring. E.g. alignToCharge, alignToSubscriptionStart, alignToTermStart"
                },
                "specificBillingPeriod": { "type": "number" }
            },
            "required": ["subscriptionId", "ratePlanId", "quantity"]
        }),
        handler: |client, args| add_subscription_rate_plan_charge(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_subscription_rate_plan_charge",
        description: "Update a rate plan charge on a subscription. PUT /subscriptions/{id}/rateplan-charges/{chargeId}. Optional: quantity, name, billCycleType, chargeType (oneTime|recurring|usage), endDateCondition, taxable, chargeTier, billingPeriod, billingTiming, billingPeriodAlignment, specificBillingPeriod, weight.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "chargeId": { "type": "number", "description": "Subscription rate plan charge ID (required)" },
                "quantity": { "type": "number" },
                "name": { "type": "string" },
                "billCycleType": { "type": "string" },
                "chargeType": { "type": "string", "description": "oneTime, recurring, or usage" },
                "endDateCondition": { "type": "string", "description": "subscriptionEnd or fixedPeriod" },
                "taxable": { "type": "boolean" },
                "chargeTier": {
                    "type": "array",
                    "description": "Array of {currency, price, optional startingUnit, endingUnit, priceFormat, tier}"
                },
                "billingPeriod": { "type": "string", "description": "day, week, month, year" },
                "billingTiming": { "type": "string", "description": "inAdvance, inArrears" },
                "billingPeriodAlignment": { "type": "string" },
                "specificBillingPeriod": { "type": "number" },
                "weight": { "type": "number" }
            },
            "required": ["subscriptionId", "chargeId"]
        }),
        handler: |client, args| update_subscription_rate_plan_charge(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "remove_subscription_rate_plan_charge",
        description: "Remove a rate plan charge from a subscription. DELETE /subscriptions/{id}/rateplan-charges/{chargeId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "subscriptionId": { "type": "number", "description": "Subscription ID (required)" },
                "chargeId": { "type": "number", "description": "Subscription rate plan charge ID (required)" }
            },
            "required": ["subscriptionId", "chargeId"]
        }),
        handler: |client, args| remove_subscription_rate_plan_charge(client, args).boxed(),
    });
}

async fn list_subscriptions(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let include = v.optional_str("include");
    let query = v.optional_str("query");
    let order_by = v.optional_str("orderBy");
    let sort_by = v.optional_str("sortBy");
    let filter_id = v.optional_i64("filterId");
    let item_per_page = v.optional_i64("itemPerPage");
    let page_no = v.optional_i64("pageNo");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_subscriptions(
            client.as_ref(),
            svc::ListSubscriptionsParams {
                include,
                query,
                order_by,
                sort_by,
                filter_id,
                item_per_page,
                page_no,
            },
        )
        .await,
    )
}

async fn get_subscription(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_subscription(client.as_ref(), subscription_id, include).await)
}

/// Minimal shape check on the nested `ratePlanCharge` array: each element
/// needs a non-negative integer `quantity`; everything else passes through.
fn check_rate_plan_charges(v: &mut Validator<'_>, charges: &Value, path: &str) -> bool {
    let Some(list) = charges.as_array() else {
        v.push(format!("{path}: must be an array"));
        return false;
    };
    let mut ok = true;
    for (j, charge) in list.iter().enumerate() {
        match charge.get("quantity").and_then(Value::as_i64) {
            Some(q) if q >= 0 => {}
            _ => {
                v.push(format!("{path}.{j}.quantity: must be a non-negative integer"));
                ok = false;
            }
        }
    }
    ok
}

/// Validate the top-level `ratePlan` array for subscription creation. Items
/// pass through as given once their identifiers and nested charge quantities
/// check out.
fn rate_plan_items(v: &mut Validator<'_>, field: &str) -> Vec<Value> {
    let items = v.require_non_empty_array(field);
    let mut out = Vec::with_capacity(items.len());
    let mut complete = true;
    for (i, item) in items.iter().enumerate() {
        let Some(map) = item.as_object() else {
            v.push(format!("{field}.{i}: must be an object"));
            complete = false;
            continue;
        };
        match map.get("productRatePlanId").and_then(Value::as_i64) {
            Some(n) if n > 0 => {}
            _ => {
                v.push(format!(
                    "{field}.{i}.productRatePlanId: must be a positive integer"
                ));
                complete = false;
            }
        }
        if let Some(charges) = map.get("ratePlanCharge") {
            if !charges.is_null()
                && !check_rate_plan_charges(v, charges, &format!("{field}.{i}.ratePlanCharge"))
            {
                complete = false;
            }
        }
        out.push(item.clone());
    }
    if complete { out } else { Vec::new() }
}

async fn create_subscription(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let name = v.require_str("name");
    let company_currency_id = v.require_positive_i64("companyCurrencyId");
    let effective_start_date = v.require_str("effectiveStartDate");
    let rate_plans = rate_plan_items(&mut v, "ratePlan");
    let mut body = Map::new();
    body.insert("customerId".to_string(), json!(customer_id));
    body.insert("name".to_string(), json!(name));
    body.insert("companyCurrencyId".to_string(), json!(company_currency_id));
    body.insert("effectiveStartDate".to_string(), json!(effective_start_date));
    body.insert("ratePlan".to_string(), Value::Array(rate_plans));
    set(&mut body, "companyGatewayId", v.optional_i64("companyGatewayId"));
    set(
        &mut body,
        "customerPaymentMethodId",
        v.optional_i64("customerPaymentMethodId"),
    );
    set(&mut body, "detail", v.optional_str("detail"));
    set(&mut body, "offlinePaymentId", v.optional_str("offlinePaymentId"));
    set(&mut body, "billingAddressId", v.optional_i64("billingAddressId"));
    set(&mut body, "shippingAddressId", v.optional_i64("shippingAddressId"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::create_subscription(client.as_ref(), body).await)
}

async fn update_subscription(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let mut body = Map::new();
    set(&mut body, "name", v.optional_str("name"));
    set(&mut body, "companyCurrencyId", v.optional_i64("companyCurrencyId"));
    set(&mut body, "companyGatewayId", v.optional_i64("companyGatewayId"));
    set(
        &mut body,
        "customerPaymentMethodId",
        v.optional_i64("customerPaymentMethodId"),
    );
    set(&mut body, "detail", v.optional_str("detail"));
    set(&mut body, "effectiveStartDate", v.optional_str("effectiveStartDate"));
    set(&mut body, "billingAddressId", v.optional_i64("billingAddressId"));
    set(&mut body, "shippingAddressId", v.optional_i64("shippingAddressId"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_subscription(client.as_ref(), subscription_id, body).await)
}

async fn delete_subscription(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_subscription(client.as_ref(), subscription_id).await)
}

async fn update_subscription_status(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let status = v.require_enum("status", SUBSCRIPTION_STATUSES);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_subscription_status(client.as_ref(), subscription_id, status).await)
}

async fn get_subscription_next_bill(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::subscription_next_bill(client.as_ref(), subscription_id, include).await)
}

async fn get_subscription_upcoming_charges(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::subscription_upcoming_charges(client.as_ref(), subscription_id, include).await)
}

async fn get_subscription_invoices(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let include = v.optional_str("include");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::subscription_invoices(
            client.as_ref(),
            subscription_id,
            svc::PageParams {
                include,
                page_no,
                item_per_page,
            },
        )
        .await,
    )
}

async fn get_subscription_logs(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::subscription_logs(client.as_ref(), subscription_id, page_no, item_per_page).await,
    )
}

async fn get_subscription_external_invoices(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let include = v.optional_str("include");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::subscription_external_invoices(
            client.as_ref(),
            subscription_id,
            svc::PageParams {
                include,
                page_no,
                item_per_page,
            },
        )
        .await,
    )
}

async fn list_subscription_rate_plans(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let include = v.optional_str("include");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    let order_by = v.optional_str("orderBy");
    let sort_by = v.optional_str("sortBy");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_subscription_rate_plans(
            client.as_ref(),
            subscription_id,
            svc::ListRatePlansParams {
                include,
                page_no,
                item_per_page,
                order_by,
                sort_by,
            },
        )
        .await,
    )
}

async fn get_subscription_rate_plan(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::get_subscription_rate_plan(client.as_ref(), subscription_id, rate_plan_id, include)
            .await,
    )
}

async fn add_subscription_rate_plan(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let product_rate_plan_id = v.require_positive_i64("productRatePlanId");
    let mut body = Map::new();
    body.insert("productRatePlanId".to_string(), json!(product_rate_plan_id));
    set(&mut body, "name", v.optional_str("name"));
    set(&mut body, "type", v.optional_enum("type", RATE_PLAN_TYPES));
    set(&mut body, "effectiveStartDate", v.optional_str("effectiveStartDate"));
    set(
        &mut body,
        "changeStatusBasedOnCharge",
        v.optional_bool("changeStatusBasedOnCharge"),
    );
    if let Some(charges) = args.get("ratePlanCharge") {
        if !charges.is_null() && check_rate_plan_charges(&mut v, charges, "ratePlanCharge") {
            body.insert("ratePlanCharge".to_string(), charges.clone());
        }
    }
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::add_subscription_rate_plan(client.as_ref(), subscription_id, body).await)
}

async fn update_subscription_rate_plan(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let mut body = Map::new();
    set(&mut body, "name", v.optional_str("name"));
    set(&mut body, "type", v.optional_enum("type", RATE_PLAN_TYPES));
    set(&mut body, "effectiveStartDate", v.optional_str("effectiveStartDate"));
    set(
        &mut body,
        "changeStatusBasedOnCharge",
        v.optional_bool("changeStatusBasedOnCharge"),
    );
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::update_subscription_rate_plan(client.as_ref(), subscription_id, rate_plan_id, body)
            .await,
    )
}

async fn remove_subscription_rate_plan(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::remove_subscription_rate_plan(client.as_ref(), subscription_id, rate_plan_id).await,
    )
}

async fn get_subscription_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let charge_id = v.require_positive_i64("chargeId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::get_subscription_rate_plan_charge(client.as_ref(), subscription_id, charge_id, include)
            .await,
    )
}

/// Fields shared by charge create and update bodies.
fn charge_fields(v: &mut Validator<'_>, body: &mut Map<String, Value>) {
    set(body, "chargeModel", v.optional_enum("chargeModel", super::CHARGE_MODELS));
    set(body, "category", v.optional_enum("category", super::CATEGORIES));
    set(body, "taxable", v.optional_bool("taxable"));
    set(body, "weight", v.optional_i64("weight"));
    set(body, "billingPeriod", v.optional_enum("billingPeriod", BILLING_PERIODS));
    set(body, "billingTiming", v.optional_enum("billingTiming", BILLING_TIMINGS));
    set(
        body,
        "billingPeriodAlignment",
        v.optional_str("billingPeriodAlignment"),
    );
    set(
        body,
        "specificBillingPeriod",
        v.optional_i64("specificBillingPeriod"),
    );
}

async fn add_subscription_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let quantity = v.require_i64("quantity");
    if quantity < 0 {
        v.push("quantity: must be a non-negative integer");
    }
    let name = v.optional_str("name");
    let charge_type = v.optional_enum("chargeType", CHARGE_TYPES);
    let bill_cycle_type = v.optional_enum("billCycleType", BILL_CYCLE_TYPES);
    let end_date_condition = v.optional_enum("endDateCondition", END_DATE_CONDITIONS);
    let tiers = match args.get("chargeTier") {
        None | Some(Value::Null) => Vec::new(),
        Some(_) => require_charge_tiers(&mut v, "chargeTier"),
    };
    // The API rejects partial charge definitions, so surface the full
    // requirement up front.
    if name.is_none() || tiers.is_empty() || bill_cycle_type.is_none() || end_date_condition.is_none()
    {
        v.push(
            "API always requires: name, chargeTier (at least one item), billCycleType, endDateCondition.",
        );
    }
    if charge_type == Some("recurring") && v.optional_str("billingPeriodAlignment").is_none() {
        v.push(
            "When chargeType is 'recurring', billingPeriodAlignment is required (e.g. alignToCharge, alignToSubscriptionStart, alignToTermStart).",
        );
    }

    let mut body = Map::new();
    body.insert("quantity".to_string(), json!(quantity));
    set(&mut body, "name", name);
    set(&mut body, "chargeType", charge_type);
    set(&mut body, "billCycleType", bill_cycle_type);
    set(&mut body, "endDateCondition", end_date_condition);
    body.insert("chargeTier".to_string(), Value::Array(tiers));
    set(
        &mut body,
        "productRatePlanChargeId",
        v.optional_i64("productRatePlanChargeId"),
    );
    charge_fields(&mut v, &mut body);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::add_subscription_rate_plan_charge(
            client.as_ref(),
            subscription_id,
            rate_plan_id,
            body,
        )
        .await,
    )
}

async fn update_subscription_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let charge_id = v.require_positive_i64("chargeId");
    let mut body = Map::new();
    if let Some(quantity) = v.optional_i64("quantity") {
        if quantity < 0 {
            v.push("quantity: must be a non-negative integer");
        } else {
            body.insert("quantity".to_string(), json!(quantity));
        }
    }
    set(&mut body, "name", v.optional_str("name"));
    set(&mut body, "chargeType", v.optional_enum("chargeType", CHARGE_TYPES));
    set(&mut body, "billCycleType", v.optional_enum("billCycleType", BILL_CYCLE_TYPES));
    set(
        &mut body,
        "endDateCondition",
        v.optional_enum("endDateCondition", END_DATE_CONDITIONS),
    );
    if let Some(tiers) = args.get("chargeTier") {
        if !tiers.is_null() {
            let tiers = require_charge_tiers(&mut v, "chargeTier");
            if !tiers.is_empty() {
                body.insert("chargeTier".to_string(), Value::Array(tiers));
            }
        }
    }
    charge_fields(&mut v, &mut body);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::update_subscription_rate_plan_charge(client.as_ref(), subscription_id, charge_id, body)
            .await,
    )
}

async fn remove_subscription_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let subscription_id = v.require_positive_i64("subscriptionId");
    let charge_id = v.require_positive_i64("chargeId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::remove_subscription_rate_plan_charge(client.as_ref(), subscription_id, charge_id)
            .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn status_update_puts_status() {
        let fake = Arc::new(FakeTransport::new());
        let result = update_subscription_status(
            fake.clone(),
            args(json!({"subscriptionId": 31, "status": "archived"})),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.method, "PUT");
        assert_eq!(call.path, "/subscriptions/31/status");
        assert_eq!(call.body, Some(json!({"status": "archived"})));
    }

    #[tokio::test]
    async fn status_update_rejects_unknown_status() {
        let fake = Arc::new(FakeTransport::new());
        let result = update_subscription_status(
            fake.clone(),
            args(json!({"subscriptionId": 31, "status": "cancelled"})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "status: must be one of active, paused, archived, requestPayment"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_subscription_requires_rate_plan_ids() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_subscription(
            fake.clone(),
            args(json!({
                "customerId": 1,
                "name": "Monthly",
                "companyCurrencyId": 1,
                "effectiveStartDate": "2026-01-01",
                "ratePlan": [{"name": "No id"}]
            })),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "ratePlan.0.productRatePlanId: must be a positive integer"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn add_charge_reports_full_requirement() {
        let fake = Arc::new(FakeTransport::new());
        let result = add_subscription_rate_plan_charge(
            fake.clone(),
            args(json!({"subscriptionId": 1, "ratePlanId": 2, "quantity": 1})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "API always requires: name, chargeTier (at least one item), billCycleType, endDateCondition."
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn add_charge_recurring_needs_alignment() {
        let fake = Arc::new(FakeTransport::new());
        let result = add_subscription_rate_plan_charge(
            fake.clone(),
            args(json!({
                "subscriptionId": 1,
                "ratePlanId": 2,
                "quantity": 1,
                "name": "Seats",
                "chargeType": "recurring",
                "billCycleType": "subscriptionStartDay",
                "endDateCondition": "subscriptionEnd",
                "chargeTier": [{"currency": "USD", "price": 1000}]
            })),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "When chargeType is 'recurring', billingPeriodAlignment is required (e.g. alignToCharge, alignToSubscriptionStart, alignToTermStart)."
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn add_charge_happy_path_posts_nested_path() {
        let fake = Arc::new(FakeTransport::new());
        let result = add_subscription_rate_plan_charge(
            fake.clone(),
            args(json!({
                "subscriptionId": 1,
                "ratePlanId": 2,
                "quantity": 3,
                "name": "Seats",
                "chargeType": "recurring",
                "billingPeriodAlignment": "alignToCharge",
                "billCycleType": "subscriptionStartDay",
                "endDateCondition": "subscriptionEnd",
                "chargeTier": [{"currency": "USD", "price": 1000}]
            })),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/subscriptions/1/rateplans/2/rateplan-charges");
        let body = call.body.unwrap();
        assert_eq!(body["quantity"], 3);
        assert_eq!(body["chargeTier"][0]["priceFormat"], "");
    }

    #[tokio::test]
    async fn external_invoices_paginated_path() {
        let fake = Arc::new(FakeTransport::new());
        let result = get_subscription_external_invoices(
            fake.clone(),
            args(json!({"subscriptionId": 8, "pageNo": 2})),
        )
        .await;
        assert!(!result.is_error());
        assert_eq!(
            fake.single_call().path,
            "/subscriptions/8/external-invoices?pageNo=2"
        );
    }
}
