//! Company gateway endpoints.

use serde_json::{Map, Value, json};

use super::Query;
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /gateways`.
#[derive(Debug, Default)]
pub struct ListGatewaysParams<'a> {
    pub status: Option<&'a str>,
    pub company_currency_id: Option<&'a str>,
    pub include: Option<&'a str>,
}

pub async fn list_gateways(
    client: &dyn ApiTransport,
    params: ListGatewaysParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("status", params.status);
    q.push_opt_str("companyCurrencyId", params.company_currency_id);
    q.push_opt_str("include", params.include);
    client.get(&format!("/gateways{}", q.build())).await
}

pub async fn get_gateway(client: &dyn ApiTransport, gateway_id: i64) -> Result<Value, ApiError> {
    client.get(&format!("/gateways/{gateway_id}")).await
}

pub async fn create_gateway(
    client: &dyn ApiTransport,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client.post("/gateways", Some(Value::Object(body))).await
}

/// Update a gateway. Always sends a body, empty when no fields changed.
pub async fn update_gateway(
    client: &dyn ApiTransport,
    gateway_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(&format!("/gateways/{gateway_id}"), Some(Value::Object(body)))
        .await
}

pub async fn delete_gateway(client: &dyn ApiTransport, gateway_id: i64) -> Result<Value, ApiError> {
    client.delete(&format!("/gateways/{gateway_id}")).await
}

/// Test the gateway's connection; returns the gateway with its connection
/// status.
pub async fn test_gateway(client: &dyn ApiTransport, gateway_id: i64) -> Result<Value, ApiError> {
    client.get(&format!("/gateways/{gateway_id}/test")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;

    #[tokio::test]
    async fn test_endpoint_is_a_get() {
        let fake = FakeTransport::new();
        test_gateway(&fake, 5).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "GET");
        assert_eq!(call.path, "/gateways/5/test");
    }

    #[tokio::test]
    async fn update_sends_empty_body_when_no_fields() {
        let fake = FakeTransport::new();
        update_gateway(&fake, 5, Map::new()).await.unwrap();
        assert_eq!(fake.single_call().body, Some(json!({})));
    }
}
