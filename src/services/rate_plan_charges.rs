//! Product rate plan charge endpoints (`/product-rateplan-charges`).

use serde_json::{Map, Value};

use super::{Query, body_if_nonempty, delete_confirmation};
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /product-rateplans/{id}/product-rateplan-charges`.
#[derive(Debug, Default)]
pub struct ListRatePlanChargesParams<'a> {
    pub include: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub page_no: Option<i64>,
    pub item_per_page: Option<i64>,
}

pub async fn list_rate_plan_charges(
    client: &dyn ApiTransport,
    rate_plan_id: i64,
    params: ListRatePlanChargesParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    client
        .get(&format!(
            "/product-rateplans/{rate_plan_id}/product-rateplan-charges{}",
            q.build()
        ))
        .await
}

pub async fn get_rate_plan_charge(
    client: &dyn ApiTransport,
    charge_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!("/product-rateplan-charges/{charge_id}{}", q.build()))
        .await
}

pub async fn create_rate_plan_charge(
    client: &dyn ApiTransport,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post("/product-rateplan-charges", Some(Value::Object(body)))
        .await
}

pub async fn update_rate_plan_charge(
    client: &dyn ApiTransport,
    charge_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/product-rateplan-charges/{charge_id}"),
            body_if_nonempty(body),
        )
        .await
}

pub async fn delete_rate_plan_charge(
    client: &dyn ApiTransport,
    charge_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!("/product-rateplan-charges/{charge_id}"))
        .await?;
    Ok(delete_confirmation(result, "Rate plan charge deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn list_is_scoped_to_rate_plan() {
        let fake = FakeTransport::new();
        list_rate_plan_charges(&fake, 11, ListRatePlanChargesParams::default())
            .await
            .unwrap();
        assert_eq!(
            fake.single_call().path,
            "/product-rateplans/11/product-rateplan-charges"
        );
    }

    #[tokio::test]
    async fn delete_synthesizes_confirmation() {
        let fake = FakeTransport::new();
        let result = delete_rate_plan_charge(&fake, 2).await.unwrap();
        assert_eq!(
            result,
            json!({"success": true, "message": "Rate plan charge deleted"})
        );
    }
}
