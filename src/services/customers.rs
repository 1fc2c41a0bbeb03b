//! Customer endpoints: the customer record plus its nested addressbooks,
//! payment methods, and charges/credits.

use serde_json::{Map, Value, json};

use super::{Query, body_if_nonempty, delete_confirmation};
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /customers`.
#[derive(Debug, Default)]
pub struct ListCustomersParams<'a> {
    pub page_no: Option<i64>,
    pub item_per_page: Option<i64>,
    pub query: Option<&'a str>,
    pub status: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub include: Option<&'a str>,
    pub filter_id: Option<i64>,
}

/// Shared pagination parameters for nested list endpoints.
#[derive(Debug, Default)]
pub struct PageParams<'a> {
    pub page_no: Option<i64>,
    pub item_per_page: Option<i64>,
    pub include: Option<&'a str>,
}

/// Query parameters for `GET /customers/{id}/charges_credits`.
#[derive(Debug, Default)]
pub struct ListChargesCreditsParams<'a> {
    pub status: Option<&'a str>,
    pub charge_type: Option<&'a str>,
    pub include: Option<&'a str>,
    pub page_no: Option<i64>,
    pub item_per_page: Option<i64>,
}

pub async fn list_customers(
    client: &dyn ApiTransport,
    params: ListCustomersParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt_str("query", params.query);
    q.push_opt_str("status", params.status);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("include", params.include);
    q.push_opt("filterId", params.filter_id);
    client.get(&format!("/customers{}", q.build())).await
}

pub async fn get_customer(
    client: &dyn ApiTransport,
    customer_id: i64,
    include_addresses: bool,
    include_payment_methods: bool,
) -> Result<Value, ApiError> {
    let mut includes = Vec::new();
    if include_addresses {
        includes.push("addressbook");
    }
    if include_payment_methods {
        includes.push("paymentmethod");
    }
    let mut q = Query::new();
    if !includes.is_empty() {
        q.push("include", includes.join(","));
    }
    client
        .get(&format!("/customers/{customer_id}{}", q.build()))
        .await
}

pub async fn create_customer(
    client: &dyn ApiTransport,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client.post("/customers", Some(Value::Object(body))).await
}

pub async fn update_customer(
    client: &dyn ApiTransport,
    customer_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(&format!("/customers/{customer_id}"), body_if_nonempty(body))
        .await
}

pub async fn delete_customer(
    client: &dyn ApiTransport,
    customer_id: i64,
) -> Result<Value, ApiError> {
    let result = client.delete(&format!("/customers/{customer_id}")).await?;
    Ok(delete_confirmation(result, "Customer deleted"))
}

pub async fn customer_invoices(
    client: &dyn ApiTransport,
    customer_id: i64,
    params: PageParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt_str("include", params.include);
    client
        .get(&format!("/customers/{customer_id}/invoices{}", q.build()))
        .await
}

pub async fn customer_subscriptions(
    client: &dyn ApiTransport,
    customer_id: i64,
    params: PageParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt_str("include", params.include);
    client
        .get(&format!(
            "/customers/{customer_id}/subscriptions{}",
            q.build()
        ))
        .await
}

pub async fn customer_logs(
    client: &dyn ApiTransport,
    customer_id: i64,
    page_no: Option<i64>,
    item_per_page: Option<i64>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt("pageNo", page_no);
    q.push_opt("itemPerPage", item_per_page);
    client
        .get(&format!("/customers/{customer_id}/logs{}", q.build()))
        .await
}

// ---------------------------------------------------------------------------
// Addressbooks
// ---------------------------------------------------------------------------

pub async fn list_customer_addresses(
    client: &dyn ApiTransport,
    customer_id: i64,
) -> Result<Value, ApiError> {
    client
        .get(&format!("/customers/{customer_id}/addressbooks"))
        .await
}

pub async fn get_customer_address(
    client: &dyn ApiTransport,
    customer_id: i64,
    address_id: i64,
) -> Result<Value, ApiError> {
    client
        .get(&format!(
            "/customers/{customer_id}/addressbooks/{address_id}"
        ))
        .await
}

pub async fn create_customer_address(
    client: &dyn ApiTransport,
    customer_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post(
            &format!("/customers/{customer_id}/addressbooks"),
            Some(Value::Object(body)),
        )
        .await
}

pub async fn update_customer_address(
    client: &dyn ApiTransport,
    customer_id: i64,
    address_id: i64,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/customers/{customer_id}/addressbooks/{address_id}"),
            body_if_nonempty(body),
        )
        .await
}

pub async fn delete_customer_address(
    client: &dyn ApiTransport,
    customer_id: i64,
    address_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!(
            "/customers/{customer_id}/addressbooks/{address_id}"
        ))
        .await?;
    Ok(delete_confirmation(result, "Address deleted"))
}

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

pub async fn list_customer_payment_methods(
    client: &dyn ApiTransport,
    customer_id: i64,
) -> Result<Value, ApiError> {
    client
        .get(&format!("/customers/{customer_id}/paymentmethods"))
        .await
}

pub async fn get_customer_payment_method(
    client: &dyn ApiTransport,
    customer_id: i64,
    payment_method_id: i64,
) -> Result<Value, ApiError> {
    client
        .get(&format!(
            "/customers/{customer_id}/paymentmethods/{payment_method_id}"
        ))
        .await
}

/// Create a payment method. The upstream wants the nonce nested under
/// `paymentMethod` and a billing address with `street2` always present, so
/// the flat caller shape is reshaped here.
pub async fn create_customer_payment_method(
    client: &dyn ApiTransport,
    customer_id: i64,
    company_gateway_id: &str,
    method_type: &str,
    payment_nonce: &str,
    billing: &Map<String, Value>,
) -> Result<Value, ApiError> {
    let billing_address = json!({
        "countryId": billing.get("countryId").cloned().unwrap_or(Value::Null),
        "street1": billing.get("street1").cloned().unwrap_or(Value::Null),
        "street2": billing.get("street2").cloned().unwrap_or_else(|| json!("")),
        "city": billing.get("city").cloned().unwrap_or(Value::Null),
        "state": billing.get("state").cloned().unwrap_or(Value::Null),
        "zip": billing.get("zip").cloned().unwrap_or(Value::Null),
    });
    let payload = json!({
        "companyGatewayId": company_gateway_id,
        "type": method_type,
        "paymentMethod": { "nonce": payment_nonce },
        "billingAddress": billing_address,
    });
    client
        .post(
            &format!("/customers/{customer_id}/paymentmethods"),
            Some(payload),
        )
        .await
}

/// Update a payment method. The upstream only accepts billing-address
/// changes.
pub async fn update_customer_payment_method(
    client: &dyn ApiTransport,
    customer_id: i64,
    payment_method_id: i64,
    billing_address: Value,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/customers/{customer_id}/paymentmethods/{payment_method_id}"),
            Some(json!({ "billingAddress": billing_address })),
        )
        .await
}

pub async fn delete_customer_payment_method(
    client: &dyn ApiTransport,
    customer_id: i64,
    payment_method_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!(
            "/customers/{customer_id}/paymentmethods/{payment_method_id}"
        ))
        .await?;
    Ok(delete_confirmation(result, "Payment method deleted"))
}

// ---------------------------------------------------------------------------
// Charges / credits
// ---------------------------------------------------------------------------

pub async fn list_customer_charges_credits(
    client: &dyn ApiTransport,
    customer_id: i64,
    params: ListChargesCreditsParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("status", params.status);
    q.push_opt_str("type", params.charge_type);
    q.push_opt_str("include", params.include);
    q.push_opt("pageNo", params.page_no);
    q.push_opt("itemPerPage", params.item_per_page);
    client
        .get(&format!(
            "/customers/{customer_id}/charges_credits{}",
            q.build()
        ))
        .await
}

/// Create a charge or credit. The upstream validator treats description,
/// qty, isFreeShipping, and taxable as mandatory, so defaults are filled in
/// when the caller omits them.
pub async fn create_customer_charge_credit(
    client: &dyn ApiTransport,
    customer_id: i64,
    mut body: Map<String, Value>,
) -> Result<Value, ApiError> {
    body.entry("description").or_insert_with(|| json!(""));
    body.entry("qty").or_insert_with(|| json!(1));
    body.entry("isFreeShipping").or_insert_with(|| json!(false));
    body.entry("taxable").or_insert_with(|| json!(false));
    client
        .post(
            &format!("/customers/{customer_id}/charges_credits"),
            Some(Value::Object(body)),
        )
        .await
}

pub async fn delete_customer_charge_credit(
    client: &dyn ApiTransport,
    customer_id: i64,
    charge_credit_id: i64,
) -> Result<Value, ApiError> {
    let result = client
        .delete(&format!(
            "/customers/{customer_id}/charges_credits/{charge_credit_id}"
        ))
        .await?;
    Ok(delete_confirmation(result, "Charge/credit deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn list_customers_builds_full_query_in_declared_order() {
        let fake = FakeTransport::new();
        list_customers(
            &fake,
            ListCustomersParams {
                page_no: Some(2),
                item_per_page: Some(50),
                query: Some("smith"),
                status: Some("active"),
                sort_by: Some("email"),
                order_by: Some("desc"),
                include: Some("addressbook,subscriptions"),
                filter_id: Some(12),
            },
        )
        .await
        .unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "GET");
        assert_eq!(
            call.path,
            "/customers?pageNo=2&itemPerPage=50&query=smith&status=active&sortBy=email&orderBy=desc&include=addressbook%2Csubscriptions&filterId=12"
        );
    }

    #[tokio::test]
    async fn list_customers_with_no_params_has_no_query() {
        let fake = FakeTransport::new();
        list_customers(&fake, ListCustomersParams::default())
            .await
            .unwrap();
        assert_eq!(fake.single_call().path, "/customers");
    }

    #[tokio::test]
    async fn get_customer_joins_include_flags() {
        let fake = FakeTransport::new();
        get_customer(&fake, 42, true, true).await.unwrap();
        assert_eq!(
            fake.single_call().path,
            "/customers/42?include=addressbook%2Cpaymentmethod"
        );
    }

    #[tokio::test]
    async fn update_customer_without_fields_sends_no_body() {
        let fake = FakeTransport::new();
        update_customer(&fake, 7, Map::new()).await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "PUT");
        assert_eq!(call.path, "/customers/7");
        assert_eq!(call.body, None);
    }

    #[tokio::test]
    async fn delete_customer_synthesizes_confirmation() {
        let fake = FakeTransport::new();
        let result = delete_customer(&fake, 7).await.unwrap();
        assert_eq!(result, json!({"success": true, "message": "Customer deleted"}));
    }

    #[tokio::test]
    async fn payment_method_nonce_is_nested_and_street2_defaulted() {
        let fake = FakeTransport::new();
        let billing = json!({
            "countryId": "US",
            "street1": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zip": "62701"
        });
        create_customer_payment_method(
            &fake,
            9,
            "14",
            "card",
            "nonce-abc",
            billing.as_object().unwrap(),
        )
        .await
        .unwrap();
        let call = fake.single_call();
        assert_eq!(call.path, "/customers/9/paymentmethods");
        let body = call.body.unwrap();
        assert_eq!(body["paymentMethod"]["nonce"], "nonce-abc");
        assert_eq!(body["billingAddress"]["street2"], "");
        assert!(body.get("paymentNonce").is_none());
    }

    #[tokio::test]
    async fn charge_credit_defaults_filled_in() {
        let fake = FakeTransport::new();
        let body = json!({
            "amount": 1000,
            "type": "charge",
            "companyCurrencyId": 1,
            "category": "digital"
        });
        create_customer_charge_credit(&fake, 5, body.as_object().unwrap().clone())
            .await
            .unwrap();
        let sent = fake.single_call().body.unwrap();
        assert_eq!(sent["description"], "");
        assert_eq!(sent["qty"], 1);
        assert_eq!(sent["isFreeShipping"], false);
        assert_eq!(sent["taxable"], false);
    }

    #[tokio::test]
    async fn charge_credit_caller_values_not_overridden() {
        let fake = FakeTransport::new();
        let body = json!({
            "amount": 1000,
            "type": "credit",
            "companyCurrencyId": 1,
            "category": "physical",
            "qty": 3,
            "taxable": true
        });
        create_customer_charge_credit(&fake, 5, body.as_object().unwrap().clone())
            .await
            .unwrap();
        let sent = fake.single_call().body.unwrap();
        assert_eq!(sent["qty"], 3);
        assert_eq!(sent["taxable"], true);
    }
}
