//! Invoice tools, including the charge and void actions.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{PAYMENT_TYPES, run_service, set};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::{Validator, detail_item, optional_address};
use crate::services::invoices as svc;

/// Invoice updates accept a narrower payment type set than creation.
const UPDATE_PAYMENT_TYPES: &[&str] = &[
    "offlinePaymentProvider",
    "thirdPartyPaymentProvider",
    "walletPaymentProvider",
];

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_invoices",
        description: "List invoices. GET /invoices. Optional: include (detail, transactions, billruns, externalInvoices), status, query, orderBy, sortBy, filterId, itemPerPage, pageNo.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "include": { "type": "string", "description": "Comma-separated: detail, transactions, billruns, externalInvoices" },
                "status": { "type": "string", "description": "Filter by status" },
                "query": { "type": "string", "description": "Search query" },
                "orderBy": { "type": "string", "description": "Sort column" },
                "sortBy": { "type": "string", "description": "Sort direction" },
                "filterId": { "type": "number", "description": "Saved filter ID" },
                "itemPerPage": { "type": "number" },
                "pageNo": { "type": "number" }
            }
        }),
        handler: |client, args| list_invoices(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_invoice",
        description: "Get an invoice by ID. GET /invoices/{id}. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "invoiceId": { "type": "number", "description": "Invoice ID (required)" },
                "include": { "type": "string", "description": "Comma-separated relations" }
            },
            "required": ["invoiceId"]
        }),
        handler: |client, args| get_invoice(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_invoice",
        description: "Create an invoice. POST /invoices. Required: companyCurrencyId, companyGatewayId, customerId, paymentMethodId, detail (array, at least one line item). Optional: billingAddress, shippingAddress (when provided: contactName, street1, city, zip, countryId, type residential|commercial), customerEmail (max 45), customerName (max 45), customerPhone (max 45), customerPaymentMethodId, paymentType (offlinePaymentProvider|thirdPartyPaymentProvider|walletPaymentProvider|otherPayment), dateDue, dateFrom, dateTo, shippingAmount (CENTS), terms (max 200), comments (max 200). Detail: amount as string '20.00' or number in cents (3000 = $30), description (max 255), qty. Omit shippingAddress or send full address; empty {} is ignored.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "companyCurrencyId": { "type": "number", "description": "Company currency ID (required)" },
                "companyGatewayId": { "type": "number", "description": "Company gateway ID (required)" },
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "paymentMethodId": { "type": "number", "description": "Payment method ID (required)" },
                "detail": {
                    "type": "array",
                    "description": "Line items (required, at least one). Each: amount as string '20.00' or number in cents (3000 = $30), description (max 255), qty"
                },
                "customerEmail": { "type": "string", "description": "Customer email (max 45)" },
                "customerName": { "type": "string", "description": "Customer name (max 45)" },
                "customerPhone": { "type": "string", "description": "Customer phone (max 45)" },
                "customerPaymentMethodId": { "type": "number" },
                "paymentType": {
                    "type": "string",
                    "description": "offlinePaymentProvider, thirdPartyPaymentProvider, walletPaymentProvider, or otherPayment"
                },
                "dateDue": { "type": "string", "description": "Due date" },
                "dateFrom": { "type": "string", "description": "Period from" },
                "dateTo": { "type": "string", "description": "Period to" },
                "billingAddress": {
                    "type": "object",
                    "description": "Optional. If provided: contactName, street1, city, zip, countryId, type (residential|commercial)"
                },
                "shippingAddress": {
                    "type": "object",
                    "description": "Optional. Same shape as billingAddress"
                },
                "shippingAmount": { "type": "number", "description": "Shipping amount in CENTS" },
                "terms": { "type": "string", "description": "Terms (max 200)" },
                "comments": { "type": "string", "description": "Comments (max 200)" }
            },
            "required": ["companyCurrencyId", "companyGatewayId", "customerId", "paymentMethodId", "detail"]
        }),
        handler: |client, args| create_invoice(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_invoice",
        description: "Update an invoice. PUT /invoices/{id}. Only invoices with status 'posted' or 'requestPayment' can be updated. All body fields optional: companyGatewayId, customerId, customerEmail, customerName, customerPhone (max 45), customerPaymentMethodId, dateDue, dateFrom, dateTo, comments, paymentType (offlinePaymentProvider|thirdPartyPaymentProvider|walletPaymentProvider), paymentMethodId, shippingAddress, shippingAmount (cents), shippingServiceId, detail (line items). billingAddress is not accepted on update.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "invoiceId": { "type": "number", "description": "Invoice ID (required)" },
                "companyGatewayId": { "type": "number" },
                "customerId": { "type": "number" },
                "customerEmail": { "type": "string", "description": "Max 45" },
                "customerName": { "type": "string", "description": "Max 45" },
                "customerPhone": { "type": "string", "description": "Max 45" },
                "customerPaymentMethodId": { "type": "number" },
                "dateDue": { "type": "string" },
                "dateFrom": { "type": "string" },
                "dateTo": { "type": "string" },
                "comments": { "type": "string" },
                "paymentType": {
                    "type": "string",
                    "description": "offlinePaymentProvider, thirdPartyPaymentProvider, or walletPaymentProvider"
                },
                "paymentMethodId": { "type": "number" },
                "shippingAddress": {
                    "type": "object",
                    "description": "When provided: contactName, street1, city, zip, countryId, type (residential|commercial)"
                },
                "shippingAmount": { "type": "number", "description": "Shipping amount in CENTS" },
                "shippingServiceId": { "type": "string" },
                "detail": {
                    "type": "array",
                    "description": "Line items: each { amount: dollar string e.g. '20.00', description?, qty? }"
                }
            },
            "required": ["invoiceId"]
        }),
        handler: |client, args| update_invoice(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_invoice",
        description: "Delete an invoice. DELETE /invoices/{id}. IRREVERSIBLE.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "invoiceId": { "type": "number", "description": "Invoice ID (required)" }
            },
            "required": ["invoiceId"]
        }),
        handler: |client, args| delete_invoice(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "charge_invoice",
        description: "Charge an invoice (card/online payment). POST /invoices/{id}/charge. AMOUNT IN CENTS: e.g. 5500 = $55.00. Required: invoiceId, amount (integer cents), paymentType (offlinePaymentProvider | thirdPartyPaymentProvider | walletPaymentProvider | otherPayment). Use thirdPartyPaymentProvider for card/online.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "invoiceId": { "type": "number", "description": "Invoice ID (required)" },
                "amount": { "type": "number", "description": "Amount in CENTS (e.g. 5500 = $55.00). Integer, required." },
                "paymentType": {
                    "type": "string",
                    "description": "Payment type (required): offlinePaymentProvider, thirdPartyPaymentProvider, walletPaymentProvider, or otherPayment. Use thirdPartyPaymentProvider for card/online."
                }
            },
            "required": ["invoiceId", "amount", "paymentType"]
        }),
        handler: |client, args| charge_invoice(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "charge_invoice_external",
        description: "Charge an invoice via offline payment (cash/check/wire). POST /invoices/{id}/charge with paymentType offlinePaymentProvider. AMOUNT IN CENTS: e.g. 5500 = $55.00. Required: invoiceId, amount (integer cents).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "invoiceId": { "type": "number", "description": "Invoice ID (required)" },
                "amount": { "type": "number", "description": "Amount in CENTS (e.g. 5500 = $55.00). Integer, required." }
            },
            "required": ["invoiceId", "amount"]
        }),
        handler: |client, args| charge_invoice_external(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "void_invoice",
        description: "Void an invoice. PUT /invoices/{id}/void. CRITICAL: This action is IRREVERSIBLE. Use with caution.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "invoiceId": { "type": "number", "description": "Invoice ID (required)" }
            },
            "required": ["invoiceId"]
        }),
        handler: |client, args| void_invoice(client, args).boxed(),
    });
}

async fn list_invoices(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let include = v.optional_str("include");
    let status = v.optional_str("status");
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
        svc::list_invoices(
            client.as_ref(),
            svc::ListInvoicesParams {
                include,
                status,
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

async fn get_invoice(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let invoice_id = v.require_positive_i64("invoiceId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_invoice(client.as_ref(), invoice_id, include).await)
}

/// Validate the `detail` line items; amounts are normalized to dollar
/// strings.
fn detail_items(v: &mut Validator<'_>, field: &str) -> Vec<Value> {
    let items = v.require_non_empty_array(field);
    if items.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if let Some(line) = detail_item(v, item, &format!("{field}.{i}")) {
            out.push(line);
        }
    }
    out
}

async fn create_invoice(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let company_currency_id = v.require_positive_i64("companyCurrencyId");
    let company_gateway_id = v.require_positive_i64("companyGatewayId");
    let customer_id = v.require_positive_i64("customerId");
    let payment_method_id = v.require_positive_i64("paymentMethodId");
    let detail = detail_items(&mut v, "detail");
    let mut body = Map::new();
    body.insert("companyCurrencyId".to_string(), json!(company_currency_id));
    body.insert("companyGatewayId".to_string(), json!(company_gateway_id));
    body.insert("customerId".to_string(), json!(customer_id));
    body.insert("paymentMethodId".to_string(), json!(payment_method_id));
    body.insert("detail".to_string(), Value::Array(detail));
    set(&mut body, "customerEmail", v.optional_str_max("customerEmail", 45));
    set(&mut body, "customerName", v.optional_str_max("customerName", 45));
    set(&mut body, "customerPhone", v.optional_str_max("customerPhone", 45));
    set(
        &mut body,
        "customerPaymentMethodId",
        v.optional_i64("customerPaymentMethodId"),
    );
    set(&mut body, "paymentType", v.optional_enum("paymentType", PAYMENT_TYPES));
    set(&mut body, "dateDue", v.optional_str("dateDue"));
    set(&mut body, "dateFrom", v.optional_str("dateFrom"));
    set(&mut body, "dateTo", v.optional_str("dateTo"));
    set(&mut body, "billingAddress", optional_address(&mut v, "billingAddress"));
    set(&mut body, "shippingAddress", optional_address(&mut v, "shippingAddress"));
    set(&mut body, "shippingAmount", v.optional_cents("shippingAmount"));
    set(&mut body, "terms", v.optional_str_max("terms", 200));
    set(&mut body, "comments", v.optional_str_max("comments", 200));
    if v.has_violations() {
        // Invoice creation joins its violations with a period so long
        // address messages read as sentences.
        return ToolResult::error(v.into_violations().join(". "));
    }
    run_service(svc::create_invoice(client.as_ref(), body).await)
}

async fn update_invoice(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let invoice_id = v.require_positive_i64("invoiceId");
    let mut body = Map::new();
    set(&mut body, "companyGatewayId", v.optional_i64("companyGatewayId"));
    set(&mut body, "customerId", v.optional_i64("customerId"));
    set(&mut body, "customerEmail", v.optional_str_max("customerEmail", 45));
    set(&mut body, "customerName", v.optional_str_max("customerName", 45));
    set(&mut body, "customerPhone", v.optional_str_max("customerPhone", 45));
    set(
        &mut body,
        "customerPaymentMethodId",
        v.optional_i64("customerPaymentMethodId"),
    );
    set(&mut body, "dateDue", v.optional_str("dateDue"));
    set(&mut body, "dateFrom", v.optional_str("dateFrom"));
    set(&mut body, "dateTo", v.optional_str("dateTo"));
    set(&mut body, "comments", v.optional_str("comments"));
    set(
        &mut body,
        "paymentType",
        v.optional_enum("paymentType", UPDATE_PAYMENT_TYPES),
    );
    set(&mut body, "paymentMethodId", v.optional_i64("paymentMethodId"));
    set(&mut body, "shippingAddress", optional_address(&mut v, "shippingAddress"));
    set(&mut body, "shippingAmount", v.optional_cents("shippingAmount"));
    set(&mut body, "shippingServiceId", v.optional_str("shippingServiceId"));
    if let Some(items) = v.optional_array("detail") {
        let items = items.to_vec();
        let mut lines = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if let Some(line) = detail_item(&mut v, item, &format!("detail.{i}")) {
                lines.push(line);
            }
        }
        body.insert("detail".to_string(), Value::Array(lines));
    }
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_invoice(client.as_ref(), invoice_id, body).await)
}

async fn delete_invoice(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let invoice_id = v.require_positive_i64("invoiceId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_invoice(client.as_ref(), invoice_id).await)
}

async fn charge_invoice(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let invoice_id = v.require_positive_i64("invoiceId");
    let amount = v.require_cents("amount");
    let payment_type = v.require_enum("paymentType", PAYMENT_TYPES);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    let mut body = Map::new();
    body.insert("amount".to_string(), json!(amount));
    body.insert("paymentType".to_string(), json!(payment_type));
    run_service(svc::charge_invoice(client.as_ref(), invoice_id, body).await)
}

async fn charge_invoice_external(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let invoice_id = v.require_positive_i64("invoiceId");
    let amount = v.require_cents("amount");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    let mut body = Map::new();
    body.insert("amount".to_string(), json!(amount));
    run_service(svc::charge_invoice_external(client.as_ref(), invoice_id, body).await)
}

async fn void_invoice(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let invoice_id = v.require_positive_i64("invoiceId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::void_invoice(client.as_ref(), invoice_id).await)
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
    async fn create_invoice_joins_violations_with_period() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_invoice(
            fake.clone(),
            args(json!({
                "companyCurrencyId": 1,
                "companyGatewayId": 2,
                "customerId": 3
            })),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "paymentMethodId: paymentMethodId is required. detail: detail is required"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_invoice_normalizes_cent_amounts() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_invoice(
            fake.clone(),
            args(json!({
                "companyCurrencyId": 1,
                "companyGatewayId": 2,
                "customerId": 3,
                "paymentMethodId": 4,
                "detail": [
                    {"amount": 3000, "description": "Setup", "qty": 1},
                    {"amount": "20.00"}
                ]
            })),
        )
        .await;
        assert!(!result.is_error());
        let body = fake.single_call().body.unwrap();
        assert_eq!(body["detail"][0]["amount"], "30.00");
        assert_eq!(body["detail"][1]["amount"], "20.00");
    }

    #[tokio::test]
    async fn create_invoice_ignores_empty_shipping_address() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_invoice(
            fake.clone(),
            args(json!({
                "companyCurrencyId": 1,
                "companyGatewayId": 2,
                "customerId": 3,
                "paymentMethodId": 4,
                "detail": [{"amount": "10.00"}],
                "shippingAddress": {}
            })),
        )
        .await;
        assert!(!result.is_error());
        let body = fake.single_call().body.unwrap();
        assert!(body.get("shippingAddress").is_none());
    }

    #[tokio::test]
    async fn charge_invoice_posts_amount_and_type() {
        let fake = Arc::new(FakeTransport::new());
        let result = charge_invoice(
            fake.clone(),
            args(json!({"invoiceId": 7, "amount": 5500, "paymentType": "thirdPartyPaymentProvider"})),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/invoices/7/charge");
        assert_eq!(
            call.body,
            Some(json!({"amount": 5500, "paymentType": "thirdPartyPaymentProvider"}))
        );
    }

    #[tokio::test]
    async fn external_charge_forces_offline_type() {
        let fake = Arc::new(FakeTransport::new());
        let result = charge_invoice_external(
            fake.clone(),
            args(json!({"invoiceId": 8, "amount": 1200})),
        )
        .await;
        assert!(!result.is_error());
        let body = fake.single_call().body.unwrap();
        assert_eq!(body["paymentType"], "offlinePaymentProvider");
    }

    #[tokio::test]
    async fn update_invoice_sends_body_even_when_empty() {
        let fake = Arc::new(FakeTransport::new());
        let result = update_invoice(fake.clone(), args(json!({"invoiceId": 12}))).await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/invoices/12");
        assert_eq!(call.body, Some(json!({})));
    }

    #[tokio::test]
    async fn charge_rejects_zero_amount() {
        let fake = Arc::new(FakeTransport::new());
        let result = charge_invoice(
            fake.clone(),
            args(json!({"invoiceId": 7, "amount": 0, "paymentType": "otherPayment"})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "amount: must be a positive integer (cents)"
        );
        assert!(fake.calls().is_empty());
    }
}
