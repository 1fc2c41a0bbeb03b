//! Shipping tools.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{run_service, set};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::shipping as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_shipping_services",
        description: "List shipping services. GET /shipping/services. Returns available shipping services for the company.",
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
        handler: |client, args| list_shipping_services(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "calculate_shipping",
        description: "Calculate shipping rates. POST /shipping/calculate. Required: companyCurrencyId, fromZip, fromCountry, zip, country, weight, orderAmount, itemCount. Optional: residential, street1, street2, city, state, services, packagingType.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "companyCurrencyId": { "type": "number", "description": "Company currency ID (required)" },
                "fromZip": { "type": "string", "description": "Origin zip (required)" },
                "fromCountry": { "type": "string", "description": "Origin country code (required)" },
                "zip": { "type": "string", "description": "Destination zip (required)" },
                "country": { "type": "string", "description": "Destination country code (required)" },
                "weight": { "type": "number", "description": "Weight (required)" },
                "orderAmount": { "type": "number", "description": "Order amount (required)" },
                "itemCount": { "type": "number", "description": "Item/order quantity (required)" },
                "residential": { "type": "boolean", "description": "Residential address indicator" },
                "street1": { "type": "string", "description": "Street line 1" },
                "street2": { "type": "string", "description": "Street line 2" },
                "city": { "type": "string", "description": "City" },
                "state": { "type": "string", "description": "State" },
                "services": { "type": "array", "description": "Service IDs to filter" },
                "packagingType": { "type": "string", "description": "Packaging type" }
            },
            "required": [
                "companyCurrencyId",
                "fromZip",
                "fromCountry",
                "zip",
                "country",
                "weight",
                "orderAmount",
                "itemCount"
            ]
        }),
        handler: |client, args| calculate_shipping(client, args).boxed(),
    });
}

async fn list_shipping_services(
    client: Arc<dyn ApiTransport>,
    _args: Map<String, Value>,
) -> ToolResult {
    run_service(svc::list_shipping_services(client.as_ref()).await)
}

async fn calculate_shipping(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let company_currency_id = v.require_positive_i64("companyCurrencyId");
    let from_zip = v.require_str("fromZip");
    let from_country = v.require_str("fromCountry");
    let zip = v.require_str("zip");
    let country = v.require_str("country");
    let weight = v.require_f64("weight");
    let order_amount = v.require_f64("orderAmount");
    let item_count = v.require_i64("itemCount");
    if item_count < 0 {
        v.push("itemCount: must be a non-negative integer");
    }
    let residential = v.optional_bool("residential");
    let street1 = v.optional_str("street1");
    let street2 = v.optional_str("street2");
    let city = v.optional_str("city");
    let state = v.optional_str("state");
    let services = v.optional_array("services").map(<[Value]>::to_vec);
    let packaging_type = v.optional_str("packagingType");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    let mut body = Map::new();
    body.insert("companyCurrencyId".to_string(), json!(company_currency_id));
    body.insert("fromZip".to_string(), json!(from_zip));
    body.insert("fromCountry".to_string(), json!(from_country));
    body.insert("zip".to_string(), json!(zip));
    body.insert("country".to_string(), json!(country));
    body.insert("weight".to_string(), json!(weight));
    body.insert("orderAmount".to_string(), json!(order_amount));
    body.insert("itemCount".to_string(), json!(item_count));
    set(&mut body, "residential", residential);
    set(&mut body, "street1", street1);
    set(&mut body, "street2", street2);
    set(&mut body, "city", city);
    set(&mut body, "state", state);
    set(&mut body, "services", services.map(Value::Array));
    set(&mut body, "packagingType", packaging_type);
    run_service(svc::calculate_shipping(client.as_ref(), body).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn quote_args() -> Map<String, Value> {
        args(json!({
            "companyCurrencyId": 1,
            "fromZip": "30303",
            "fromCountry": "US",
            "zip": "94105",
            "country": "US",
            "weight": 2.5,
            "orderAmount": 4500,
            "itemCount": 3
        }))
    }

    #[tokio::test]
    async fn quote_renames_item_count() {
        let fake = Arc::new(FakeTransport::new());
        let result = calculate_shipping(fake.clone(), quote_args()).await;
        assert!(!result.is_error());
        let sent = fake.single_call().body.unwrap();
        assert_eq!(sent["orderQty"], 3);
        assert!(sent.get("itemCount").is_none());
    }

    #[tokio::test]
    async fn quote_requires_destination() {
        let fake = Arc::new(FakeTransport::new());
        let mut incomplete = quote_args();
        incomplete.remove("zip");
        incomplete.remove("country");
        let result = calculate_shipping(fake.clone(), incomplete).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "zip: zip is required; country: country is required"
        );
        assert!(fake.calls().is_empty());
    }
}
