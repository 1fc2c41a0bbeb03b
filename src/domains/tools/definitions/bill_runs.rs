//! Bill run tools: list, get, reschedule, invoices.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{BILL_RUN_STATUSES, run_service};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::bill_runs as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_bill_runs",
        description: "List bill runs. GET /bill-run. Optional: include (e.g. invoice), query (filter by status: completed, pending, error), orderBy, sortBy, itemPerPage, pageNo.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "include": { "type": "string", "description": "Include related data (e.g. invoice)" },
                "query": { "type": "string", "description": "Filter by status: completed, pending, or error" },
                "orderBy": { "type": "string", "description": "Sort column" },
                "sortBy": { "type": "string", "description": "Sort direction" },
                "itemPerPage": { "type": "number" },
                "pageNo": { "type": "number" }
            }
        }),
        handler: |client, args| list_bill_runs(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_bill_run",
        description: "Get a bill run by ID. GET /bill-run/{id}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "billRunId": { "type": "number", "description": "Bill run ID (required)" }
            },
            "required": ["billRunId"]
        }),
        handler: |client, args| get_bill_run(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_bill_run",
        description: "Update a bill run schedule. PUT /bill-run/{id}. Required: billRunId, newDateTime. Use ISO 8601: YYYY-MM-DDTHH:MM:SS or with timezone (e.g. 2026-02-26T20:05:00Z). If no timezone, Z (UTC) is appended.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "billRunId": { "type": "number", "description": "Bill run ID (required)" },
                "newDateTime": {
                    "type": "string",
                    "description": "New date/time for schedule (required). ISO 8601, e.g. 2026-02-26T20:05:00 or 2026-02-26T20:05:00Z. Without timezone, Z is added."
                }
            },
            "required": ["billRunId", "newDateTime"]
        }),
        handler: |client, args| update_bill_run(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_bill_run_invoices",
        description: "Get invoices for a bill run. GET /bill-run/{id}/invoices.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "billRunId": { "type": "number", "description": "Bill run ID (required)" }
            },
            "required": ["billRunId"]
        }),
        handler: |client, args| get_bill_run_invoices(client, args).boxed(),
    });
}

async fn list_bill_runs(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let include = v.optional_str("include");
    let query = v.optional_enum("query", BILL_RUN_STATUSES);
    let order_by = v.optional_str("orderBy");
    let sort_by = v.optional_str("sortBy");
    let item_per_page = v.optional_i64("itemPerPage");
    let page_no = v.optional_i64("pageNo");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_bill_runs(
            client.as_ref(),
            svc::ListBillRunsParams {
                include,
                query,
                order_by,
                sort_by,
                item_per_page,
                page_no,
            },
        )
        .await,
    )
}

async fn get_bill_run(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let bill_run_id = v.require_positive_i64("billRunId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_bill_run(client.as_ref(), bill_run_id).await)
}

async fn update_bill_run(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let bill_run_id = v.require_positive_i64("billRunId");
    let new_date_time = v.require_str("newDateTime");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_bill_run(client.as_ref(), bill_run_id, new_date_time).await)
}

async fn get_bill_run_invoices(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let bill_run_id = v.require_positive_i64("billRunId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::bill_run_invoices(client.as_ref(), bill_run_id).await)
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
    async fn update_normalizes_schedule_datetime() {
        let fake = Arc::new(FakeTransport::new());
        let result = update_bill_run(
            fake.clone(),
            args(json!({"billRunId": 5, "newDateTime": "2026-02-26 20:05:00"})),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/bill-run/5");
        assert_eq!(
            call.body,
            Some(json!({"newDateTime": "2026-02-26T20:05:00Z"}))
        );
    }

    #[tokio::test]
    async fn list_rejects_unknown_status_query() {
        let fake = Arc::new(FakeTransport::new());
        let result = list_bill_runs(fake.clone(), args(json!({"query": "running"}))).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "query: must be one of completed, pending, error"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn invoices_use_singular_segment() {
        let fake = Arc::new(FakeTransport::new());
        let result = get_bill_run_invoices(fake.clone(), args(json!({"billRunId": 9}))).await;
        assert!(!result.is_error());
        assert_eq!(fake.single_call().path, "/bill-run/9/invoices");
    }
}
