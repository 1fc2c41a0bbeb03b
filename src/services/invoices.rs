//! Invoice endpoints.

use serde_json::{Map, Value, json};

use super::{Query, delete_confirmation};
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /invoices`.
#[derive(Debug, Default)]
pub struct ListInvoicesParams<'a> {
    pub include: Option<&'a str>,
    pub status: Option<&'a str>,
    pub query: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub filter_id: Option<i64>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
}

pub async fn list_invoices(
    client: &dyn ApiTransport,
    params: ListInvoicesParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt_str("status", params.status);
    q.push_opt_str("query", params.query);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt("filterId", params.filter_id);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    client.get(&format!("/invoices{}", q.build())).await
}

pub async fn get_invoice(
    client: &dyn ApiTransport,
    invoice_id: i64,
    include: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", include);
    client
        .get(&format!("/invoices/{invoice_id}{}", q.build()))
        .await
}

pub async fn create_invoice(
    client: &dyn ApiTransport,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client.post("/invoices", Some(Value::Object(body))).await
}

/// Update an invoice. Unlike other updates this always sends a JSON body,
/// even an empty one; the upstream rejects a bodyless PUT here.
pub async fn update_invoice(
    client: &dyn ApiTransport,
    invoice_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(&format!("/invoices/{invoice_id}"), Some(Value::Object(body)))
        .await
}

pub async fn delete_invoice(
    client: &dyn ApiTransport,
    invoice_id: i64,
) -> Result<Value, ApiError> {
    let result = client.delete(&format!("/invoices/{invoice_id}")).await?;
    Ok(delete_confirmation(result, "Invoice deleted"))
}

/// Charge an invoice through its gateway. Amount is in cents.
pub async fn charge_invoice(
    client: &dyn ApiTransport,
    invoice_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post(
            &format!("/invoices/{invoice_id}/charge"),
            Some(Value::Object(body)),
        )
        .await
}

/// Record an offline (cash/check/wire) charge against an invoice. The
/// payment type is forced to `offlinePaymentProvider` regardless of input.
pub async fn charge_invoice_external(
    client: &dyn ApiTransport,
    invoice_id: i64,
    mut body: Map<String, Value>,
) -> Result<Value, ApiError> {
    body.insert(
        "paymentType".to_string(),
        json!("offlinePaymentProvider"),
    );
    client
        .post(
            &format!("/invoices/{invoice_id}/charge"),
            Some(Value::Object(body)),
        )
        .await
}

/// Void an invoice. Irreversible.
pub async fn void_invoice(client: &dyn ApiTransport, invoice_id: i64) -> Result<Value, ApiError> {
    client
        .put(&format!("/invoices/{invoice_id}/void"), None)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn update_invoice_always_sends_body() {
        let fake = FakeTransport::new();
        update_invoice(&fake, 12, Map::new()).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/invoices/12");
        assert_eq!(call.body, Some(json!({})));
    }

    #[tokio::test]
    async fn external_charge_forces_offline_payment_type() {
        let fake = FakeTransport::new();
        let body = json!({"amount": 5500, "paymentType": "walletPaymentProvider"});
        charge_invoice_external(&fake, 8, body.as_object().unwrap().clone())
            .await
            .unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/invoices/8/charge");
        let sent = call.body.unwrap();
        assert_eq!(sent["paymentType"], "offlinePaymentProvider");
        assert_eq!(sent["amount"], 5500);
    }

    #[tokio::test]
    async fn void_invoice_puts_without_body() {
        let fake = FakeTransport::new();
        void_invoice(&fake, 99).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "PUT");
        assert_eq!(call.path, "/invoices/99/void");
        assert_eq!(call.body, None);
    }

    #[tokio::test]
    async fn list_invoices_status_filter() {
        let fake = FakeTransport::new();
        list_invoices(
            &fake,
            ListInvoicesParams {
                status: Some("posted"),
                page_no: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(fake.single_call().path, "/invoices?status=posted&pageNo=3");
    }
}
