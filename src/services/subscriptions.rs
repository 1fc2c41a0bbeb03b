//! Subscription endpoints, including the subscription-level rate plans and
//! rate plan charges.

use serde_json::{Map, Value, json};

use super::{Query, body_if_nonempty, delete_confirmation};
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /subscriptions`.
#[derive(Debug, Default)]
pub struct ListSubscriptionsParams<'a> {
    pub include: Option<&'a str>,
    pub query: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub filter_id: Option<i64>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
}

/// Pagination plus include, shared by the nested list endpoints.
#[derive(Debug, Default)]
pub struct PageParams<'a> {
    pub include: Option<&'a str>,
    pub page_no: Option<i64>,
    pub item_per_page: Option<i64>,
}

/// The upstream requires `priceFormat` on every charge tier; default it to
/// the empty string when the caller leaves it out.
fn normalize_charge_tiers(body: &mut Map<String, Value>) {
    if let Some(Value::Array(tiers)) = body.get_mut("chargeTier") {
        for tier in tiers {
            if let Some(map) = tier.as_object_mut() {
                map.entry("priceFormat").or_insert_with(|| json!(""));
            }
        }
    }
}

pub async fn list_subscriptions(
    client: &dyn ApiTransport,
    params: ListSubscriptionsParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt_str("query", params.query);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt("filterId", params.filter_id);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    client.get(&format!("/subscriptions{}", q.build())).await
}

pub async fn get_subscription(
    client: &dyn ApiTransport,
    subscription_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!("/subscriptions/{subscription_id}{}", q.build()))
        .await
}

pub async fn create_subscription(
    client: &dyn ApiTransport,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post("/subscriptions", Some(Value::Object(body)))
        .await
}

pub async fn update_subscription(
    client: &dyn ApiTransport,
    subscription_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/subscriptions/{subscription_id}"),
            body_if_nonempty(body),
        )
        .await
}

pub async fn delete_subscription(
    client: &dyn ApiTransport,
    subscription_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!("/subscriptions/{subscription_id}"))
        .await?;
    Ok(delete_confirmation(result, "Subscription deleted"))
}

pub async fn update_subscription_status(
    client: &dyn ApiTransport,
    subscription_id: i64,
    status: &str,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/subscriptions/{subscription_id}/status"),
            Some(json!({ "status": status })),
        )
        .await
}

// ---------------------------------------------------------------------------
// Billing preview and history
// ---------------------------------------------------------------------------

pub async fn subscription_next_bill(
    client: &dyn ApiTransport,
    subscription_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/nextBill{}",
            q.build()
        ))
        .await
}

pub async fn subscription_upcoming_charges(
    client: &dyn ApiTransport,
    subscription_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/upcoming{}",
            q.build()
        ))
        .await
}

pub async fn subscription_invoices(
    client: &dyn ApiTransport,
    subscription_id: i64,
    params: PageParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/invoices{}",
            q.build()
        ))
        .await
}

pub async fn subscription_logs(
    client: &dyn ApiTransport,
    subscription_id: i64,
    page_no: Option<i64>,
    item_per_page: Option<i64>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt("pageNo", page_no);
    q.push_opt("itemPerPage", item_per_page);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/logs{}",
            q.build()
        ))
        .await
}

/// External (e-commerce) orders linked to the subscription.
pub async fn subscription_external_invoices(
    client: &dyn ApiTransport,
    subscription_id: i64,
    params: PageParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/external-invoices{}",
            q.build()
        ))
        .await
}

// ---------------------------------------------------------------------------
// Subscription rate plans
// ---------------------------------------------------------------------------

/// Query parameters for `GET /subscriptions/{id}/rateplans`.
#[derive(Debug, Default)]
pub struct ListRatePlansParams<'a> {
    pub include: Option<&'a str>,
    pub page_no: Option<i64>,
    pub item_per_page: Option<i64>,
    pub order_by: Option<&'a str>,
    pub sort_by: Option<&'a str>,
}

pub async fn list_subscription_rate_plans(
    client: &dyn ApiTransport,
    subscription_id: i64,
    params: ListRatePlansParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sortBy", params.sort_by);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/rateplans{}",
            q.build()
        ))
        .await
}

pub async fn get_subscription_rate_plan(
    client: &dyn ApiTransport,
    subscription_id: i64,
    rate_plan_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/rateplans/{rate_plan_id}{}",
            q.build()
        ))
        .await
}

pub async fn add_subscription_rate_plan(
    client: &dyn ApiTransport,
    subscription_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post(
            &format!("/subscriptions/{subscription_id}/rateplans"),
            body_if_nonempty(body),
        )
        .await
}

pub async fn update_subscription_rate_plan(
    client: &dyn ApiTransport,
    subscription_id: i64,
    rate_plan_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/subscriptions/{subscription_id}/rateplans/{rate_plan_id}"),
            body_if_nonempty(body),
        )
        .await
}

pub async fn remove_subscription_rate_plan(
    client: &dyn ApiTransport,
    subscription_id: i64,
    rate_plan_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!(
            "/subscriptions/{subscription_id}/rateplans/{rate_plan_id}"
        ))
        .await?;
    Ok(delete_confirmation(result, "Rate plan removed"))
}

// ---------------------------------------------------------------------------
// Subscription rate plan charges
// ---------------------------------------------------------------------------

pub async fn get_subscription_rate_plan_charge(
    client: &dyn ApiTransport,
    subscription_id: i64,
    charge_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!(
            "/subscriptions/{subscription_id}/rateplan-charges/{charge_id}{}",
            q.build()
        ))
        .await
}

pub async fn add_subscription_rate_plan_charge(
    client: &dyn ApiTransport,
    subscription_id: i64,
    rate_plan_id: i64,
    mut body: Map<String, Value>,
) -> Result<Value, ApiError> {
    normalize_charge_tiers(&mut body);
    client
        .post(
            &format!("/subscriptions/{subscription_id}/rateplans/{rate_plan_id}/rateplan-charges"),
            Some(Value::Object(body)),
        )
        .await
}

pub async fn update_subscription_rate_plan_charge(
    client: &dyn ApiTransport,
    subscription_id: i64,
    charge_id: i64,
    mut body: Map<String, Value>,
) -> Result<Value, ApiError> {
    normalize_charge_tiers(&mut body);
    client
        .put(
            &format!("/subscriptions/{subscription_id}/rateplan-charges/{charge_id}"),
            body_if_nonempty(body),
        )
        .await
}

pub async fn remove_subscription_rate_plan_charge(
    client: &dyn ApiTransport,
    subscription_id: i64,
    charge_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!(
            "/subscriptions/{subscription_id}/rateplan-charges/{charge_id}"
        ))
        .await?;
    Ok(delete_confirmation(result, "Charge removed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn status_update_puts_status_body() {
        let fake = FakeTransport::new();
        update_subscription_status(&fake, 31, "archived").await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "PUT");
        assert_eq!(call.path, "/subscriptions/31/status");
        assert_eq!(call.body, Some(json!({"status": "archived"})));
    }

    #[tokio::test]
    async fn list_subscriptions_query_order() {
        let fake = FakeTransport::new();
        list_subscriptions(
            &fake,
            ListSubscriptionsParams {
                include: Some("ratePlan"),
                query: Some("acme"),
                filter_id: Some(4),
                page_no: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            fake.single_call().path,
            "/subscriptions?include=ratePlan&query=acme&filterId=4&pageNo=1"
        );
    }

    #[tokio::test]
    async fn charge_tiers_get_price_format_default() {
        let fake = FakeTransport::new();
        let body = json!({
            "name": "Usage",
            "chargeTier": [
                {"currency": "USD", "price": 500},
                {"currency": "USD", "price": 900, "priceFormat": "flat"}
            ]
        });
        add_subscription_rate_plan_charge(&fake, 1, 2, body.as_object().unwrap().clone())
            .await
            .unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/subscriptions/1/rateplans/2/rateplan-charges");
        let tiers = call.body.unwrap()["chargeTier"].clone();
        assert_eq!(tiers[0]["priceFormat"], "");
        assert_eq!(tiers[1]["priceFormat"], "flat");
    }

    #[tokio::test]
    async fn external_invoices_path() {
        let fake = FakeTransport::new();
        subscription_external_invoices(&fake, 8, PageParams::default())
            .await
            .unwrap();
        assert_eq!(fake.single_call().path, "/subscriptions/8/external-invoices");
    }

    #[tokio::test]
    async fn remove_rate_plan_confirmation() {
        let fake = FakeTransport::new();
        let result = remove_subscription_rate_plan(&fake, 3, 9).await.unwrap();
        assert_eq!(result, json!({"success": true, "message": "Rate plan removed"}));
    }
}
