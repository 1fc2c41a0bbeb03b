//! Company currency endpoints, including the account default currency.

use serde_json::{Value, json};

use super::Query;
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /currencies`.
#[derive(Debug, Default)]
pub struct ListCurrenciesParams<'a> {
    pub include: Option<&'a str>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
}

pub async fn list_currencies(
    client: &dyn ApiTransport,
    params: ListCurrenciesParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    client.get(&format!("/currencies{}", q.build())).await
}

pub async fn get_currency(client: &dyn ApiTransport, currency_id: i64) -> Result<Value, ApiError> {
    client.get(&format!("/currencies/{currency_id}")).await
}

pub async fn create_currency(
    client: &dyn ApiTransport,
    currency_id: i64,
    conversion_rate: f64,
    fixed_rate: bool,
) -> Result<Value, ApiError> {
    let body = json!({
        "currencyId": currency_id,
        "conversionRate": conversion_rate,
        "fixedRate": fixed_rate,
    });
    client.post("/currencies", Some(body)).await
}

pub async fn update_currency(
    client: &dyn ApiTransport,
    company_currency_id: i64,
    conversion_rate: f64,
    fixed_rate: bool,
) -> Result<Value, ApiError> {
    let body = json!({
        "conversionRate": conversion_rate,
        "fixedRate": fixed_rate,
    });
    client
        .put(&format!("/currencies/{company_currency_id}"), Some(body))
        .await
}

pub async fn delete_currency(
    client: &dyn ApiTransport,
    company_currency_id: i64,
) -> Result<Value, ApiError> {
    client
        .delete(&format!("/currencies/{company_currency_id}"))
        .await
}

pub async fn get_default_currency(client: &dyn ApiTransport) -> Result<Value, ApiError> {
    client.get("/currencies/default").await
}

pub async fn set_default_currency(
    client: &dyn ApiTransport,
    currency_id: i64,
) -> Result<Value, ApiError> {
    client
        .post("/currencies/default", Some(json!({ "currencyId": currency_id })))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;

    #[tokio::test]
    async fn create_sends_all_three_fields() {
        let fake = FakeTransport::new();
        create_currency(&fake, 2, 1.08, false).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/currencies");
        assert_eq!(
            call.body,
            Some(json!({"currencyId": 2, "conversionRate": 1.08, "fixedRate": false}))
        );
    }

    #[tokio::test]
    async fn default_currency_endpoints() {
        let fake = FakeTransport::new();
        get_default_currency(&fake).await.unwrap();
        set_default_currency(&fake, 3).await.unwrap();
        let calls = fake.calls();
        assert_eq!(calls[0].path, "/currencies/default");
        assert_eq!(calls[1].method, "POST");
        assert_eq!(calls[1].body, Some(json!({"currencyId": 3})));
    }
}
