//! Product endpoints, including external-product links.

use serde_json::{Map, Value, json};

use super::{Query, body_if_nonempty, delete_confirmation};
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /products`.
#[derive(Debug, Default)]
pub struct ListProductsParams<'a> {
    pub include: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
    pub filter_id: Option<i64>,
    pub query: Option<&'a str>,
}

pub async fn list_products(
    client: &dyn ApiTransport,
    params: ListProductsParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    q.push_opt("filterId", params.filter_id);
    q.push_opt_str("query", params.query);
    client.get(&format!("/products{}", q.build())).await
}

pub async fn get_product(
    client: &dyn ApiTransport,
    product_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!("/products/{product_id}{}", q.build()))
        .await
}

/// Create a product. `productRatePlan` always ships, defaulting to an empty
/// array.
pub async fn create_product(
    client: &dyn ApiTransport,
    mut body: Map<String, Value>,
) -> Result<Value, ApiError> {
    body.entry("productRatePlan").or_insert_with(|| json!([]));
    client.post("/products", Some(Value::Object(body))).await
}

pub async fn update_product(
    client: &dyn ApiTransport,
    product_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(&format!("/products/{product_id}"), body_if_nonempty(body))
        .await
}

pub async fn delete_product(client: &dyn ApiTransport, product_id: i64) -> Result<Value, ApiError> {
    let result = client.delete(&format!("/products/{product_id}")).await?;
    Ok(delete_confirmation(result, "Product deleted"))
}

pub async fn update_product_status(
    client: &dyn ApiTransport,
    product_id: i64,
    status: &str,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/products/{product_id}/status"),
            Some(json!({ "status": status })),
        )
        .await
}

/// Link a product to an external storefront product.
pub async fn link_external_product(
    client: &dyn ApiTransport,
    product_id: &str,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post(
            &format!("/products/{product_id}/external-products"),
            Some(Value::Object(body)),
        )
        .await
}

pub async fn unlink_external_product(
    client: &dyn ApiTransport,
    product_id: &str,
    external_product_id: &str,
) -> Result<Value, ApiError> {
    client
        .delete(&format!(
            "/products/{product_id}/external-products/{external_product_id}"
        ))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn create_product_defaults_rate_plan_array() {
        let fake = FakeTransport::new();
        let body = json!({"name": "Widget", "category": "physical"});
        create_product(&fake, body.as_object().unwrap().clone())
            .await
            .unwrap();
        let sent = fake.single_call().body.unwrap();
        assert_eq!(sent["productRatePlan"], json!([]));
    }

    #[tokio::test]
    async fn status_update_body() {
        let fake = FakeTransport::new();
        update_product_status(&fake, 4, "archived").await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/products/4/status");
        assert_eq!(call.body, Some(json!({"status": "archived"})));
    }

    #[tokio::test]
    async fn unlink_path_includes_both_ids() {
        let fake = FakeTransport::new();
        unlink_external_product(&fake, "12", "ext-9").await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "DELETE");
        assert_eq!(call.path, "/products/12/external-products/ext-9");
    }
}
