//! Company integration endpoints, including external invoices, products,
//! and order statuses surfaced through e-commerce connectors.

use serde_json::Value;

use super::Query;
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /integrations`.
#[derive(Debug, Default)]
pub struct ListIntegrationsParams<'a> {
    pub integration_type: Option<&'a str>,
    pub include: Option<&'a str>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
}

/// Pagination for `GET /integrations/{id}/external-invoices`.
#[derive(Debug, Default)]
pub struct ListExternalInvoicesParams<'a> {
    pub include: Option<&'a str>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
}

pub async fn list_integrations(
    client: &dyn ApiTransport,
    params: ListIntegrationsParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("type", params.integration_type);
    q.push_opt_str("include", params.include);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    client.get(&format!("/integrations{}", q.build())).await
}

pub async fn get_integration_config(
    client: &dyn ApiTransport,
    integration_id: i64,
) -> Result<Value, ApiError> {
    client
        .get(&format!("/integrations/{integration_id}/config"))
        .await
}

/// Global integration info by key name (e.g. `shopify`, `avalara`).
pub async fn get_integration_by_key(
    client: &dyn ApiTransport,
    key_name: &str,
) -> Result<Value, ApiError> {
    client.get(&format!("/integrations/{key_name}/get")).await
}

/// Company integrations installed under a key name.
pub async fn list_integrations_by_key(
    client: &dyn ApiTransport,
    key_name: &str,
) -> Result<Value, ApiError> {
    client.get(&format!("/integrations/{key_name}/list")).await
}

pub async fn list_external_invoices(
    client: &dyn ApiTransport,
    integration_id: i64,
    params: ListExternalInvoicesParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    client
        .get(&format!(
            "/integrations/{integration_id}/external-invoices{}",
            q.build()
        ))
        .await
}

pub async fn list_external_products(
    client: &dyn ApiTransport,
    integration_id: i64,
    name: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("name", name);
    client
        .get(&format!(
            "/integrations/{integration_id}/products{}",
            q.build()
        ))
        .await
}

pub async fn get_external_product(
    client: &dyn ApiTransport,
    integration_id: i64,
    external_product_id: &str,
) -> Result<Value, ApiError> {
    client
        .get(&format!(
            "/integrations/{integration_id}/products/{external_product_id}"
        ))
        .await
}

pub async fn list_order_statuses(
    client: &dyn ApiTransport,
    integration_id: i64,
) -> Result<Value, ApiError> {
    client
        .get(&format!("/integrations/{integration_id}/orders/statuses"))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;

    #[tokio::test]
    async fn list_filters_by_type() {
        let fake = FakeTransport::new();
        list_integrations(
            &fake,
            ListIntegrationsParams {
                integration_type: Some("ecommerce"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(fake.single_call().path, "/integrations?type=ecommerce");
    }

    #[tokio::test]
    async fn key_name_routes() {
        let fake = FakeTransport::new();
        get_integration_by_key(&fake, "shopify").await.unwrap();
        list_integrations_by_key(&fake, "shopify").await.unwrap();
        let calls = fake.calls();
        assert_eq!(calls[0].path, "/integrations/shopify/get");
        assert_eq!(calls[1].path, "/integrations/shopify/list");
    }

    #[tokio::test]
    async fn order_statuses_path() {
        let fake = FakeTransport::new();
        list_order_statuses(&fake, 4).await.unwrap();
        assert_eq!(fake.single_call().path, "/integrations/4/orders/statuses");
    }
}
