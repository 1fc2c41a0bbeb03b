//! Shipping endpoints.

use serde_json::{Map, Value};

use crate::core::client::{ApiError, ApiTransport};

pub async fn list_shipping_services(client: &dyn ApiTransport) -> Result<Value, ApiError> {
    client.get("/shipping/services").await
}

/// Quote shipping rates. Callers speak in `itemCount`; the upstream
/// connectors want `orderQty`, so the field is renamed here.
pub async fn calculate_shipping(
    client: &dyn ApiTransport,
    mut body: Map<String, Value>,
) -> Result<Value, ApiError> {
    if let Some(item_count) = body.remove("itemCount") {
        body.insert("orderQty".to_string(), item_count);
    }
    client
        .post("/shipping/calculate", Some(Value::Object(body)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn item_count_is_renamed_to_order_qty() {
        let fake = FakeTransport::new();
        let body = json!({
            "companyCurrencyId": 1,
            "fromZip": "30303",
            "fromCountry": "US",
            "zip": "94105",
            "country": "US",
            "weight": 2.5,
            "orderAmount": 4500,
            "itemCount": 3
        });
        calculate_shipping(&fake, body.as_object().unwrap().clone())
            .await
            .unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/shipping/calculate");
        let sent = call.body.unwrap();
        assert_eq!(sent["orderQty"], 3);
        assert!(sent.get("itemCount").is_none());
    }

    #[tokio::test]
    async fn services_listing_path() {
        let fake = FakeTransport::new();
        list_shipping_services(&fake).await.unwrap();
        assert_eq!(fake.single_call().path, "/shipping/services");
    }
}
