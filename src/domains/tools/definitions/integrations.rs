//! Integration tools: company integrations, key-name lookups, and the
//! external invoices/products/order-statuses surfaced by connectors.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::run_service;
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::integrations as svc;

pub(crate) const INTEGRATION_TYPES: &[&str] = &[
    "ecommerce",
    "email",
    "marketing",
    "tax",
    "shipping",
    "accounting",
    "chat",
];

/// Key names accepted by the `/integrations/{keyName}/...` routes.
pub(crate) const INTEGRATION_KEY_NAMES: &[&str] = &[
    "avalara",
    "bigcommerce",
    "customRate",
    "fedex",
    "flatRate",
    "freeShipping",
    "freshBooksCloudAccounting",
    "google",
    "mailchimp",
    "monsoonStoneEdge",
    "myob",
    "pickupInStore",
    "quickbooks",
    "saasu",
    "salesforce",
    "shipBy",
    "shipperHq",
    "shippingZone",
    "shopify",
    "slack",
    "smtp",
    "taxamo",
    "thomsonreuters",
    "ups",
    "upsShippingProtection",
    "usps",
    "vertex",
    "xero",
];

pub fn register(registry: &mut ToolRegistry) {
    let key_names = INTEGRATION_KEY_NAMES.join(", ");
    registry.register(ToolDef {
        name: "list_integrations",
        description: "List company integrations. GET /integrations. Optional: type (ecommerce, email, marketing, tax, shipping, accounting, chat), include, itemPerPage, pageNo.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "description": "Filter by integration type: ecommerce, email, marketing, tax, shipping, accounting, chat"
                },
                "include": { "type": "string", "description": "Comma-separated attributes to include" },
                "itemPerPage": { "type": "number", "description": "Items per page" },
                "pageNo": { "type": "number", "description": "Page number" }
            }
        }),
        handler: |client, args| list_integrations(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_integration_config",
        description: "Get company integration config by ID. GET /integrations/{integrationId}/config.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "integrationId": { "type": "number", "description": "Company integration ID (required)" }
            },
            "required": ["integrationId"]
        }),
        handler: |client, args| get_integration_config(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_integration_by_key",
        description: "Get global integration info by key name. GET /integrations/{keyName}/get.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "keyName": {
                    "type": "string",
                    "description": format!("Integration key name (required). One of: {key_names}")
                }
            },
            "required": ["keyName"]
        }),
        handler: |client, args| get_integration_by_key(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_integrations_by_key",
        description: "List company integrations by key name. GET /integrations/{keyName}/list.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "keyName": {
                    "type": "string",
                    "description": format!("Integration key name (required). One of: {key_names}")
                }
            },
            "required": ["keyName"]
        }),
        handler: |client, args| list_integrations_by_key(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_external_invoices",
        description: "List external invoices for an integration. GET /integrations/{integrationId}/external-invoices. Optional: include, itemPerPage, pageNo.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "integrationId": { "type": "number", "description": "Company integration ID (required)" },
                "include": { "type": "string", "description": "Comma-separated attributes to include" },
                "itemPerPage": { "type": "number", "description": "Items per page" },
                "pageNo": { "type": "number", "description": "Page number" }
            },
            "required": ["integrationId"]
        }),
        handler: |client, args| list_external_invoices(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_external_products",
        description: "List external products for an integration. GET /integrations/{integrationId}/products. Required: integrationId, productName (sent as name query param).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "integrationId": { "type": "number", "description": "Company integration ID (required)" },
                "productName": { "type": "string", "description": "Product name filter (required)" }
            },
            "required": ["integrationId", "productName"]
        }),
        handler: |client, args| list_external_products(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_external_product",
        description: "Get an external product by ID. GET /integrations/{integrationId}/products/{externalProductId}. API expects numeric productId.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "integrationId": { "type": "number", "description": "Company integration ID (required)" },
                "externalProductId": {
                    "type": "string",
                    "description": "External product ID (required, numeric as string)"
                }
            },
            "required": ["integrationId", "externalProductId"]
        }),
        handler: |client, args| get_external_product(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_order_statuses",
        description: "List order statuses for an integration. GET /integrations/{integrationId}/orders/statuses. Supported for e.g. BigCommerce, Shopify.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "integrationId": { "type": "number", "description": "Company integration ID (required)" }
            },
            "required": ["integrationId"]
        }),
        handler: |client, args| list_order_statuses(client, args).boxed(),
    });
}

async fn list_integrations(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let integration_type = v.optional_enum("type", INTEGRATION_TYPES);
    let include = v.optional_str("include");
    let item_per_page = v.optional_i64("itemPerPage");
    let page_no = v.optional_i64("pageNo");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_integrations(
            client.as_ref(),
            svc::ListIntegrationsParams {
                integration_type,
                include,
                item_per_page,
                page_no,
            },
        )
        .await,
    )
}

async fn get_integration_config(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let integration_id = v.require_positive_i64("integrationId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_integration_config(client.as_ref(), integration_id).await)
}

fn require_key_name<'a>(v: &mut Validator<'a>) -> &'a str {
    let key_name = v.require_str("keyName");
    if !key_name.is_empty() && !INTEGRATION_KEY_NAMES.contains(&key_name) {
        v.push("keyName must be a valid integration key");
    }
    key_name
}

async fn get_integration_by_key(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let key_name = require_key_name(&mut v);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_integration_by_key(client.as_ref(), key_name).await)
}

async fn list_integrations_by_key(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let key_name = require_key_name(&mut v);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::list_integrations_by_key(client.as_ref(), key_name).await)
}

async fn list_external_invoices(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let integration_id = v.require_positive_i64("integrationId");
    let include = v.optional_str("include");
    let item_per_page = v.optional_i64("itemPerPage");
    let page_no = v.optional_i64("pageNo");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_external_invoices(
            client.as_ref(),
            integration_id,
            svc::ListExternalInvoicesParams {
                include,
                item_per_page,
                page_no,
            },
        )
        .await,
    )
}

async fn list_external_products(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let integration_id = v.require_positive_i64("integrationId");
    let product_name = v.require_str("productName");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_external_products(client.as_ref(), integration_id, Some(product_name)).await,
    )
}

async fn get_external_product(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let integration_id = v.require_positive_i64("integrationId");
    let external_product_id = v.require_str("externalProductId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::get_external_product(client.as_ref(), integration_id, external_product_id).await,
    )
}

async fn list_order_statuses(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let integration_id = v.require_positive_i64("integrationId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::list_order_statuses(client.as_ref(), integration_id).await)
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
    async fn key_name_must_be_known() {
        let fake = Arc::new(FakeTransport::new());
        let result =
            list_integrations_by_key(fake.clone(), args(json!({"keyName": "stripe"}))).await;
        assert!(result.is_error());
        assert_eq!(result.first_text(), "keyName must be a valid integration key");
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn key_name_routes_to_list() {
        let fake = Arc::new(FakeTransport::new());
        let result =
            list_integrations_by_key(fake.clone(), args(json!({"keyName": "shopify"}))).await;
        assert!(!result.is_error());
        assert_eq!(fake.single_call().path, "/integrations/shopify/list");
    }

    #[tokio::test]
    async fn list_rejects_unknown_type() {
        let fake = Arc::new(FakeTransport::new());
        let result = list_integrations(fake.clone(), args(json!({"type": "crm"}))).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "type: must be one of ecommerce, email, marketing, tax, shipping, accounting, chat"
        );
    }

    #[tokio::test]
    async fn external_products_filter_by_name() {
        let fake = Arc::new(FakeTransport::new());
        let result = list_external_products(
            fake.clone(),
            args(json!({"integrationId": 4, "productName": "Widget"})),
        )
        .await;
        assert!(!result.is_error());
        assert_eq!(fake.single_call().path, "/integrations/4/products?name=Widget");
    }
}
