//! Company gateway tools.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{run_service, set};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::gateways as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_gateways",
        description: "List company gateways. GET /gateways. Optional: status (filter by active, disabled, error, archive), companyCurrencyId, include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "status": { "type": "string", "description": "Filter by status (e.g. active, disabled, error, archive)" },
                "companyCurrencyId": { "type": "string", "description": "Filter by company currency ID" },
                "include": { "type": "string", "description": "Comma-separated attributes to include" }
            }
        }),
        handler: |client, args| list_gateways(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_gateway",
        description: "Get a company gateway by ID. GET /gateways/{id}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "gatewayId": { "type": "number", "description": "Gateway ID (required)" }
            },
            "required": ["gatewayId"]
        }),
        handler: |client, args| get_gateway(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_gateway",
        description: "Create a company gateway. POST /gateways. Required: gblGatewayId, setting (object with credential keys, e.g. publicKey, privateKey, merchantId). Optional: displayName, card (array of card type IDs), paymentMethod.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "gblGatewayId": { "type": "number", "description": "Global gateway ID (required)" },
                "displayName": { "type": "string", "description": "Display name for the gateway" },
                "setting": {
                    "type": "object",
                    "description": "Credentials object (required). Keys depend on gateway type, e.g. publicKey, privateKey, merchantId, transactionKey. Pass as key-value object."
                },
                "card": { "type": "array", "description": "Array of card type IDs" },
                "paymentMethod": { "type": "string", "description": "Payment method (may be required by the API)" }
            },
            "required": ["gblGatewayId", "setting"]
        }),
        handler: |client, args| create_gateway(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_gateway",
        description: "Update a company gateway. PUT /gateways/{id}. Optional: displayName, setting (credentials key-value object).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "gatewayId": { "type": "number", "description": "Gateway ID (required)" },
                "displayName": { "type": "string" },
                "setting": {
                    "type": "object",
                    "description": "Credentials object (key-value). Keys depend on gateway type."
                }
            },
            "required": ["gatewayId"]
        }),
        handler: |client, args| update_gateway(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_gateway",
        description: "Delete a company gateway. DELETE /gateways/{id}. Fails if the gateway is linked to company currencies or customers.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "gatewayId": { "type": "number", "description": "Gateway ID (required)" }
            },
            "required": ["gatewayId"]
        }),
        handler: |client, args| delete_gateway(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "test_gateway",
        description: "Test gateway connection. GET /gateways/{id}/test. Returns the gateway object with connection status (e.g. status active on success).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "gatewayId": { "type": "number", "description": "Gateway ID (required)" }
            },
            "required": ["gatewayId"]
        }),
        handler: |client, args| test_gateway(client, args).boxed(),
    });
}

async fn list_gateways(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let status = v.optional_str("status");
    let company_currency_id = v.optional_str("companyCurrencyId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_gateways(
            client.as_ref(),
            svc::ListGatewaysParams {
                status,
                company_currency_id,
                include,
            },
        )
        .await,
    )
}

async fn get_gateway(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let gateway_id = v.require_positive_i64("gatewayId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_gateway(client.as_ref(), gateway_id).await)
}

/// Credential objects pass through as-is; only the shape is checked, and an
/// empty object is rejected because the upstream needs at least one key.
fn require_setting(
    v: &mut Validator<'_>,
    args: &Map<String, Value>,
    field: &str,
) -> Map<String, Value> {
    match args.get(field) {
        None | Some(Value::Null) => {
            v.push(format!("{field}: {field} is required"));
            Map::new()
        }
        Some(Value::Object(map)) if !map.is_empty() => map.clone(),
        Some(Value::Object(_)) => {
            v.push(format!("{field}: must have at least one credential key"));
            Map::new()
        }
        Some(_) => {
            v.push(format!("{field}: must be an object"));
            Map::new()
        }
    }
}

async fn create_gateway(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let gbl_gateway_id = v.require_positive_i64("gblGatewayId");
    let setting = require_setting(&mut v, &args, "setting");
    let display_name = v.optional_str("displayName");
    let card = v.optional_array("card").map(<[Value]>::to_vec);
    let payment_method = v.optional_str("paymentMethod");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    let mut body = Map::new();
    body.insert("gblGatewayId".to_string(), json!(gbl_gateway_id));
    body.insert("setting".to_string(), Value::Object(setting));
    set(&mut body, "displayName", display_name);
    set(&mut body, "card", card.map(Value::Array));
    set(&mut body, "paymentMethod", payment_method);
    run_service(svc::create_gateway(client.as_ref(), body).await)
}

async fn update_gateway(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let gateway_id = v.require_positive_i64("gatewayId");
    let mut body = Map::new();
    set(&mut body, "displayName", v.optional_str("displayName"));
    if let Some(setting) = v.optional_object("setting") {
        body.insert("setting".to_string(), Value::Object(setting.clone()));
    }
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_gateway(client.as_ref(), gateway_id, body).await)
}

async fn delete_gateway(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let gateway_id = v.require_positive_i64("gatewayId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_gateway(client.as_ref(), gateway_id).await)
}

async fn test_gateway(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let gateway_id = v.require_positive_i64("gatewayId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::test_gateway(client.as_ref(), gateway_id).await)
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
    async fn create_rejects_empty_setting() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_gateway(
            fake.clone(),
            args(json!({"gblGatewayId": 3, "setting": {}})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "setting: must have at least one credential key"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_posts_credentials() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_gateway(
            fake.clone(),
            args(json!({
                "gblGatewayId": 3,
                "setting": {"publicKey": "pk", "privateKey": "sk"},
                "displayName": "Stripe"
            })),
        )
        .await;
        assert!(!result.is_error());
        let body = fake.single_call().body.unwrap();
        assert_eq!(body["setting"]["publicKey"], "pk");
        assert_eq!(body["displayName"], "Stripe");
    }

    #[tokio::test]
    async fn test_endpoint_is_a_get() {
        let fake = Arc::new(FakeTransport::new());
        let result = test_gateway(fake.clone(), args(json!({"gatewayId": 5}))).await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.method, "GET");
        assert_eq!(call.path, "/gateways/5/test");
    }
}
