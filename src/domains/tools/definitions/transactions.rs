//! Transaction tools: list, get, refund, void.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::run_service;
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::transactions as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_transactions",
        description: "List transactions. GET /transactions. Optional: orderBy, sortBy, itemPerPage, pageNo.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "orderBy": { "type": "string", "description": "Sort column" },
                "sortBy": { "type": "string", "description": "Sort direction" },
                "itemPerPage": { "type": "number", "description": "Items per page" },
                "pageNo": { "type": "number", "description": "Page number" }
            }
        }),
        handler: |client, args| list_transactions(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_transaction",
        description: "Get a transaction by ID. GET /transactions/{id}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "transactionId": { "type": "number", "description": "Transaction ID (required)" }
            },
            "required": ["transactionId"]
        }),
        handler: |client, args| get_transaction(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "refund_transaction",
        description: "Refund a transaction. POST /transactions/{id}/refund. AMOUNT IN CENTS: e.g. 250 = $2.50, 5500 = $55.00. Required: transactionId, amount (integer cents).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "transactionId": { "type": "number", "description": "Transaction ID (required)" },
                "amount": {
                    "type": "number",
                    "description": "Refund amount in CENTS (e.g. 250 = $2.50, 5500 = $55.00). Integer, required."
                }
            },
            "required": ["transactionId", "amount"]
        }),
        handler: |client, args| refund_transaction(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "void_transaction",
        description: "Void a transaction. POST /transactions/{id}/void. Only works before settlement; after settlement use refund_transaction instead.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "transactionId": {
                    "type": "number",
                    "description": "Transaction ID (required). Void only works before settlement; after settlement use refund_transaction."
                }
            },
            "required": ["transactionId"]
        }),
        handler: |client, args| void_transaction(client, args).boxed(),
    });
}

async fn list_transactions(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let order_by = v.optional_str("orderBy");
    let sort_by = v.optional_str("sortBy");
    let item_per_page = v.optional_i64("itemPerPage");
    let page_no = v.optional_i64("pageNo");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_transactions(
            client.as_ref(),
            svc::ListTransactionsParams {
                order_by,
                sort_by,
                item_per_page,
                page_no,
            },
        )
        .await,
    )
}

async fn get_transaction(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let transaction_id = v.require_positive_i64("transactionId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_transaction(client.as_ref(), transaction_id).await)
}

async fn refund_transaction(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let transaction_id = v.require_positive_i64("transactionId");
    let amount = v.require_cents("amount");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::refund_transaction(client.as_ref(), transaction_id, amount).await)
}

async fn void_transaction(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let transaction_id = v.require_positive_i64("transactionId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::void_transaction(client.as_ref(), transaction_id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn refund_sends_amount_as_query() {
        let fake = Arc::new(FakeTransport::new());
        let result = refund_transaction(
            fake.clone(),
            args(json!({"transactionId": 77, "amount": 250})),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/transactions/77/refund?amount=250");
        assert_eq!(call.body, Some(json!({})));
    }

    #[tokio::test]
    async fn refund_requires_positive_amount() {
        let fake = Arc::new(FakeTransport::new());
        let result = refund_transaction(
            fake.clone(),
            args(json!({"transactionId": 77, "amount": -5})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "amount: must be a positive integer (cents)"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn void_posts_empty_body() {
        let fake = Arc::new(FakeTransport::new());
        let result = void_transaction(fake.clone(), args(json!({"transactionId": 77}))).await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/transactions/77/void");
        assert_eq!(call.body, Some(json!({})));
    }
}
