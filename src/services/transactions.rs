//! Transaction endpoints.

use serde_json::{Value, json};

use super::Query;
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /transactions`.
#[derive(Debug, Default)]
pub struct ListTransactionsParams<'a> {
    pub order_by: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
}

pub async fn list_transactions(
    client: &dyn ApiTransport,
    params: ListTransactionsParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    client.get(&format!("/transactions{}", q.build())).await
}

pub async fn get_transaction(
    client: &dyn ApiTransport,
    transaction_id: i64,
) -> Result<Value, ApiError> {
    client.get(&format!("/transactions/{transaction_id}")).await
}

/// Refund a settled transaction. The amount travels as a query parameter,
/// in cents, with an empty JSON body.
pub async fn refund_transaction(
    client: &dyn ApiTransport,
    transaction_id: i64,
    amount_cents: i64,
) -> Result<Value, ApiError> {
    client
        .post(
            &format!("/transactions/{transaction_id}/refund?amount={amount_cents}"),
            Some(json!({})),
        )
        .await
}

/// Void a transaction. Only possible before settlement.
pub async fn void_transaction(
    client: &dyn ApiTransport,
    transaction_id: i64,
) -> Result<Value, ApiError> {
    client
        .post(&format!("/transactions/{transaction_id}/void"), Some(json!({})))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;

    #[tokio::test]
    async fn refund_puts_amount_in_query() {
        let fake = FakeTransport::new();
        refund_transaction(&fake, 77, 250).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/transactions/77/refund?amount=250");
        assert_eq!(call.body, Some(json!({})));
    }

    #[tokio::test]
    async fn void_posts_empty_body() {
        let fake = FakeTransport::new();
        void_transaction(&fake, 77).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/transactions/77/void");
        assert_eq!(call.body, Some(json!({})));
    }
}
