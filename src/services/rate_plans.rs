//! Product rate plan endpoints. The upstream calls these
//! `/product-rateplans`; listing hangs off the owning product.

use serde_json::{Map, Value, json};

use super::{Query, body_if_nonempty, delete_confirmation};
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /products/{id}/product-rateplans`.
#[derive(Debug, Default)]
pub struct ListRatePlansParams<'a> {
    pub include: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub sort: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub page_no: Option<i64>,
    pub item_per_page: Option<i64>,
    pub query: Option<&'a str>,
    pub status: Option<&'a str>,
}

pub async fn list_rate_plans(
    client: &dyn ApiTransport,
    product_id: i64,
    params: ListRatePlansParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sort", params.sort);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt_str("query", params.query);
    q.push_opt_str("status", params.status);
    client
        .get(&format!(
            "/products/{product_id}/product-rateplans{}",
            q.build()
        ))
        .await
}

pub async fn get_rate_plan(
    client: &dyn ApiTransport,
    rate_plan_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!("/product-rateplans/{rate_plan_id}{}", q.build()))
        .await
}

pub async fn create_rate_plan(
    client: &dyn ApiTransport,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post("/product-rateplans", Some(Value::Object(body)))
        .await
}

pub async fn update_rate_plan(
    client: &dyn ApiTransport,
    rate_plan_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/product-rateplans/{rate_plan_id}"),
            body_if_nonempty(body),
        )
        .await
}

pub async fn delete_rate_plan(
    client: &dyn ApiTransport,
    rate_plan_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!("/product-rateplans/{rate_plan_id}"))
        .await?;
    Ok(delete_confirmation(result, "Rate plan deleted"))
}

pub async fn update_rate_plan_status(
    client: &dyn ApiTransport,
    rate_plan_id: i64,
    status: &str,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/product-rateplans/{rate_plan_id}/status"),
            Some(json!({ "status": status })),
        )
        .await
}

/// Push the rate plan to linked external platforms.
pub async fn sync_rate_plan(
    client: &dyn ApiTransport,
    rate_plan_id: i64,
) -> Result<Value, ApiError> {
    client
        .post(&format!("/product-rateplans/{rate_plan_id}/sync"), None)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn list_is_scoped_to_product() {
        let fake = FakeTransport::new();
        list_rate_plans(
            &fake,
            6,
            ListRatePlansParams {
                status: Some("published"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            fake.single_call().path,
            "/products/6/product-rateplans?status=published"
        );
    }

    #[tokio::test]
    async fn sync_posts_without_body() {
        let fake = FakeTransport::new();
        sync_rate_plan(&fake, 3).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/product-rateplans/3/sync");
        assert_eq!(call.body, None);
    }

    #[tokio::test]
    async fn delete_synthesizes_confirmation() {
        let fake = FakeTransport::new();
        let result = delete_rate_plan(&fake, 3).await.unwrap();
        assert_eq!(result, json!({"success": true, "message": "Rate plan deleted"}));
    }
}
