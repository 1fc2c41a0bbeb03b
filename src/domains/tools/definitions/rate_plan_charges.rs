//! Product rate plan charge tools.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{
    BILL_CYCLE_TYPES, BILLING_PERIODS, BILLING_TIMINGS, CATEGORIES, CHARGE_MODELS, CHARGE_TYPES,
    END_DATE_CONDITIONS, LIST_PRICE_BASES, run_service, set,
};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::{Validator, require_charge_tiers};
use crate::services::rate_plan_charges as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_rate_plan_charges",
        description: "List rate plan charges for a rate plan. GET /product-rateplans/{ratePlanId}/product-rateplan-charges. Required: ratePlanId. Optional: include, orderBy, sortBy, pageNo, itemPerPage.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "ratePlanId": { "type": "number", "description": "Rate plan ID (required)" },
                "include": { "type": "string", "description": "Attributes to include" },
                "orderBy": { "type": "string", "description": "Sort column" },
                "sortBy": { "type": "string", "description": "Sort direction" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" }
            },
            "required": ["ratePlanId"]
        }),
        handler: |client, args| list_rate_plan_charges(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_rate_plan_charge",
        description: "Get a rate plan charge by ID. GET /product-rateplan-charges/{id}. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "chargeId": { "type": "number", "description": "Rate plan charge ID (required)" },
                "include": { "type": "string" }
            },
            "required": ["chargeId"]
        }),
        handler: |client, args| get_rate_plan_charge(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_rate_plan_charge",
        description: "Create a rate plan charge. POST /product-rateplan-charges. Required: ratePlanId, name, chargeType (oneTime|recurring|usage), chargeModel (flatFeePricing|perUnitPricing|tieredPricing|volumePricing), billCycleType, category (physical|digital), chargeTier (array of {currency e.g. 'USD', price in cents, optional startingUnit, endingUnit, priceFormat, tier}), taxable, weight, endDateCondition (subscriptionEnd|fixedPeriod). Optional: description, billingPeriod (day|week|month|year, required if chargeType recurring), billingTiming (inAdvance|inArrears), billingPeriodAlignment, specificBillingPeriod, allowChangeQuantity, billCycleDay (1-31), weeklyBillCycleDay, monthlyBillCycleYear (1-12), isFreeShipping, maxQuantity, minQuantity, quantity, listPriceBase (perMonth|perBillingPeriod|perWeek).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "ratePlanId": { "type": "number", "description": "Rate plan ID (required)" },
                "name": { "type": "string", "description": "Charge name (required)" },
                "chargeType": { "type": "string", "description": "oneTime, recurring, or usage" },
                "chargeModel": { "type": "string", "description": "flatFeePricing, perUnitPricing, tieredPricing, or volumePricing" },
                "billCycleType": { "type": "string", "description": "Bill cycle type (e.g. chargeTriggerDay, specificDayOfMonth)" },
                "category": { "type": "string", "description": "physical or digital" },
                "chargeTier": {
                    "type": "array",
                    "description": "Array of {currency, price, optional startingUnit, endingUnit, priceFormat, tier}"
                },
                "taxable": { "type": "boolean", "description": "Whether taxable" },
                "weight": { "type": "number", "description": "Weight (integer)" },
                "endDateCondition": { "type": "string", "description": "subscriptionEnd or fixedPeriod (required)" },
                "description": { "type": "string" },
                "billingPeriod": { "type": "string", "description": "day, week, month, or year (required if chargeType recurring)" },
                "billingTiming": { "type": "string", "description": "inAdvance or inArrears (required if chargeType recurring)" },
                "billingPeriodAlignment": { "type": "string", "description": "alignToCharge, alignToSubscriptionStart, alignToTermStart" },
                "specificBillingPeriod": { "type": "number" },
                "allowChangeQuantity": { "type": "boolean" },
                "billCycleDay": { "type": "number", "description": "1-31 when billCycleType specificDayOfMonth" },
                "weeklyBillCycleDay": { "type": "string", "description": "sunday..saturday when billCycleType specificDayOfWeek" },
                "monthlyBillCycleYear": { "type": "number", "description": "1-12 when billCycleType specificMonthOfYear" },
                "isFreeShipping": { "type": "boolean" },
                "maxQuantity": { "type": "number" },
                "minQuantity": { "type": "number" },
                "quantity": { "type": "number" },
                "listPriceBase": { "type": "string", "description": "perMonth, perBillingPeriod, or perWeek" }
            },
            "required": ["ratePlanId", "name", "chargeType", "chargeModel", "billCycleType", "category", "chargeTier", "taxable", "weight", "endDateCondition"]
        }),
        handler: |client, args| create_rate_plan_charge(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_rate_plan_charge",
        description: "Update a rate plan charge. PUT /product-rateplan-charges/{id}. Optional: name, chargeType (oneTime|recurring|usage), chargeModel (flatFeePricing|perUnitPricing|tieredPricing|volumePricing), category, chargeTier array, taxable, weight, description, billingPeriod (day|week|month|year), billingTiming (inAdvance|inArrears).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "chargeId": { "type": "number", "description": "Rate plan charge ID (required)" },
                "name": { "type": "string" },
                "chargeType": { "type": "string", "description": "oneTime, recurring, or usage" },
                "chargeModel": { "type": "string", "description": "flatFeePricing, perUnitPricing, tieredPricing, or volumePricing" },
                "category": { "type": "string", "description": "physical or digital" },
                "chargeTier": {
                    "type": "array",
                    "description": "Array of {currency, price, optional startingUnit, endingUnit, priceFormat, tier}"
                },
                "taxable": { "type": "boolean" },
                "weight": { "type": "number" },
                "description": { "type": "string" },
                "billingPeriod": { "type": "string", "description": "day, week, month, or year" },
                "billingTiming": { "type": "string", "description": "inAdvance or inArrears" }
            },
            "required": ["chargeId"]
        }),
        handler: |client, args| update_rate_plan_charge(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_rate_plan_charge",
        description: "Delete a rate plan charge. DELETE /product-rateplan-charges/{id}. IRREVERSIBLE.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "chargeId": { "type": "number", "description": "Rate plan charge ID (required)" }
            },
            "required": ["chargeId"]
        }),
        handler: |client, args| delete_rate_plan_charge(client, args).boxed(),
    });
}

async fn list_rate_plan_charges(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let include = v.optional_str("include");
    let order_by = v.optional_str("orderBy");
    let sort_by = v.optional_str("sortBy");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_rate_plan_charges(
            client.as_ref(),
            rate_plan_id,
            svc::ListRatePlanChargesParams {
                include,
                order_by,
                sort_by,
                page_no,
                item_per_page,
            },
        )
        .await,
    )
}

async fn get_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let charge_id = v.require_positive_i64("chargeId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_rate_plan_charge(client.as_ref(), charge_id, include).await)
}

async fn create_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let name = v.require_str("name");
    let charge_type = v.require_enum("chargeType", CHARGE_TYPES);
    let charge_model = v.require_enum("chargeModel", CHARGE_MODELS);
    let bill_cycle_type = v.require_enum("billCycleType", BILL_CYCLE_TYPES);
    let category = v.require_enum("category", CATEGORIES);
    let tiers = require_charge_tiers(&mut v, "chargeTier");
    let taxable = v.require_bool("taxable");
    let weight = v.require_i64("weight");
    if weight < 0 {
        v.push("weight: must be a non-negative integer");
    }
    let end_date_condition = v.require_enum("endDateCondition", END_DATE_CONDITIONS);

    let mut body = Map::new();
    body.insert("ratePlanId".to_string(), json!(rate_plan_id));
    body.insert("name".to_string(), json!(name));
    body.insert("chargeType".to_string(), json!(charge_type));
    body.insert("chargeModel".to_string(), json!(charge_model));
    body.insert("billCycleType".to_string(), json!(bill_cycle_type));
    body.insert("category".to_string(), json!(category));
    body.insert("chargeTier".to_string(), Value::Array(tiers));
    body.insert("taxable".to_string(), json!(taxable));
    body.insert("weight".to_string(), json!(weight));
    body.insert("endDateCondition".to_string(), json!(end_date_condition));
    set(&mut body, "description", v.optional_str("description"));
    set(&mut body, "billingPeriod", v.optional_enum("billingPeriod", BILLING_PERIODS));
    set(&mut body, "billingTiming", v.optional_enum("billingTiming", BILLING_TIMINGS));
    set(
        &mut body,
        "billingPeriodAlignment",
        v.optional_str("billingPeriodAlignment"),
    );
    set(
        &mut body,
        "specificBillingPeriod",
        v.optional_i64("specificBillingPeriod"),
    );
    set(
        &mut body,
        "allowChangeQuantity",
        v.optional_bool("allowChangeQuantity"),
    );
    set(&mut body, "billCycleDay", v.optional_i64_range("billCycleDay", 1, 31));
    set(&mut body, "weeklyBillCycleDay", v.optional_str("weeklyBillCycleDay"));
    set(
        &mut body,
        "monthlyBillCycleYear",
        v.optional_i64_range("monthlyBillCycleYear", 1, 12),
    );
    set(&mut body, "isFreeShipping", v.optional_bool("isFreeShipping"));
    set(&mut body, "maxQuantity", v.optional_i64("maxQuantity"));
    set(&mut body, "minQuantity", v.optional_i64("minQuantity"));
    set(&mut body, "quantity", v.optional_i64("quantity"));
    set(
        &mut body,
        "listPriceBase",
        v.optional_enum("listPriceBase", LIST_PRICE_BASES),
    );
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::create_rate_plan_charge(client.as_ref(), body).await)
}

async fn update_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let charge_id = v.require_positive_i64("chargeId");
    let mut body = Map::new();
    set(&mut body, "name", v.optional_str("name"));
    set(&mut body, "chargeType", v.optional_enum("chargeType", CHARGE_TYPES));
    set(&mut body, "chargeModel", v.optional_enum("chargeModel", CHARGE_MODELS));
    set(&mut body, "category", v.optional_enum("category", CATEGORIES));
    if let Some(tiers) = args.get("chargeTier") {
        if !tiers.is_null() {
            let tiers = require_charge_tiers(&mut v, "chargeTier");
            if !tiers.is_empty() {
                body.insert("chargeTier".to_string(), Value::Array(tiers));
            }
        }
    }
    set(&mut body, "taxable", v.optional_bool("taxable"));
    set(&mut body, "weight", v.optional_i64("weight"));
    set(&mut body, "description", v.optional_str("description"));
    set(&mut body, "billingPeriod", v.optional_enum("billingPeriod", BILLING_PERIODS));
    set(&mut body, "billingTiming", v.optional_enum("billingTiming", BILLING_TIMINGS));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_rate_plan_charge(client.as_ref(), charge_id, body).await)
}

async fn delete_rate_plan_charge(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let charge_id = v.require_positive_i64("chargeId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_rate_plan_charge(client.as_ref(), charge_id).await)
}
