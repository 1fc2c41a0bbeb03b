//! Product rate plan tools.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{RATE_PLAN_STATUSES, RATE_PLAN_TYPES, run_service, set};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::rate_plans as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_rate_plans",
        description: "List rate plans for a product. GET /products/{productId}/product-rateplans. Required: productId. Optional: include, orderBy, sortBy, pageNo, itemPerPage, query, status.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "number", "description": "Product ID (required)" },
                "include": { "type": "string", "description": "Attributes to include" },
                "orderBy": { "type": "string", "description": "Sort column" },
                "sortBy": { "type": "string", "description": "Sort direction" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" },
                "query": { "type": "string", "description": "Search text" },
                "status": { "type": "string", "description": "published, archived, disabled, or discontinue" }
            },
            "required": ["productId"]
        }),
        handler: |client, args| list_rate_plans(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_rate_plan",
        description: "Get a rate plan by ID. GET /product-rateplans/{id}. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "ratePlanId": { "type": "number", "description": "Rate plan ID (required)" },
                "include": { "type": "string" }
            },
            "required": ["ratePlanId"]
        }),
        handler: |client, args| get_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_rate_plan",
        description: "Create a rate plan. POST /product-rateplans. Required: productId, name, type (contract|ongoing|prepaid). Optional: description, effectiveStartDate, effectiveEndDate, minimumCommitment, minimumCommitmentLength, minimumCommitmentUnit, changeStatusBasedOnCharge, sourceTemplateId, image.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "number", "description": "Product ID (required)" },
                "name": { "type": "string", "description": "Rate plan name (required)" },
                "type": { "type": "string", "description": "contract, ongoing, or prepaid (required)" },
                "description": { "type": "string" },
                "effectiveStartDate": { "type": "string" },
                "effectiveEndDate": { "type": "string" },
                "minimumCommitment": { "type": "boolean" },
                "minimumCommitmentLength": { "type": "number" },
                "minimumCommitmentUnit": { "type": "string" },
                "changeStatusBasedOnCharge": { "type": "boolean" },
                "sourceTemplateId": { "type": "number" },
                "image": { "type": "string" }
            },
            "required": ["productId", "name", "type"]
        }),
        handler: |client, args| create_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_rate_plan",
        description: "Update a rate plan. PUT /product-rateplans/{id}. Optional: name, type (contract|ongoing|prepaid), description, effectiveStartDate, effectiveEndDate, minimumCommitment, minimumCommitmentLength, minimumCommitmentUnit, changeStatusBasedOnCharge, image.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "ratePlanId": { "type": "number", "description": "Rate plan ID (required)" },
                "name": { "type": "string" },
                "type": { "type": "string", "description": "contract, ongoing, or prepaid" },
                "description": { "type": "string" },
                "effectiveStartDate": { "type": "string" },
                "effectiveEndDate": { "type": "string" },
                "minimumCommitment": { "type": "boolean" },
                "minimumCommitmentLength": { "type": "number" },
                "minimumCommitmentUnit": { "type": "string" },
                "changeStatusBasedOnCharge": { "type": "boolean" },
                "image": { "type": "string" }
            },
            "required": ["ratePlanId"]
        }),
        handler: |client, args| update_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_rate_plan",
        description: "Delete a rate plan. DELETE /product-rateplans/{id}. IRREVERSIBLE.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "ratePlanId": { "type": "number", "description": "Rate plan ID (required)" }
            },
            "required": ["ratePlanId"]
        }),
        handler: |client, args| delete_rate_plan(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_rate_plan_status",
        description: "Update a rate plan status. PUT /product-rateplans/{id}/status. Required: status (published|archived|disabled|discontinue).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "ratePlanId": { "type": "number", "description": "Rate plan ID (required)" },
                "status": { "type": "string", "description": "published, archived, disabled, or discontinue (required)" }
            },
            "required": ["ratePlanId", "status"]
        }),
        handler: |client, args| update_rate_plan_status(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "sync_rate_plan",
        description: "Sync a rate plan to linked external platforms. POST /product-rateplans/{id}/sync.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "ratePlanId": { "type": "number", "description": "Rate plan ID (required)" }
            },
            "required": ["ratePlanId"]
        }),
        handler: |client, args| sync_rate_plan(client, args).boxed(),
    });
}

async fn list_rate_plans(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_positive_i64("productId");
    let include = v.optional_str("include");
    let order_by = v.optional_str("orderBy");
    let sort_by = v.optional_str("sortBy");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    let query = v.optional_str("query");
    let status = v.optional_enum("status", RATE_PLAN_STATUSES);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_rate_plans(
            client.as_ref(),
            product_id,
            svc::ListRatePlansParams {
                include,
                order_by,
                sort: None,
                sort_by,
                page_no,
                item_per_page,
                query,
                status,
            },
        )
        .await,
    )
}

async fn get_rate_plan(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_rate_plan(client.as_ref(), rate_plan_id, include).await)
}

fn rate_plan_fields(v: &mut Validator<'_>, body: &mut Map<String, Value>) {
    set(body, "description", v.optional_str("description"));
    set(body, "effectiveStartDate", v.optional_str("effectiveStartDate"));
    set(body, "effectiveEndDate", v.optional_str("effectiveEndDate"));
    set(body, "minimumCommitment", v.optional_bool("minimumCommitment"));
    set(
        body,
        "minimumCommitmentLength",
        v.optional_i64("minimumCommitmentLength"),
    );
    set(
        body,
        "minimumCommitmentUnit",
        v.optional_str("minimumCommitmentUnit"),
    );
    set(
        body,
        "changeStatusBasedOnCharge",
        v.optional_bool("changeStatusBasedOnCharge"),
    );
    set(body, "image", v.optional_str("image"));
}

async fn create_rate_plan(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_positive_i64("productId");
    let name = v.require_str("name");
    let plan_type = v.require_enum("type", RATE_PLAN_TYPES);
    let mut body = Map::new();
    body.insert("productId".to_string(), json!(product_id));
    body.insert("name".to_string(), json!(name));
    body.insert("type".to_string(), json!(plan_type));
    rate_plan_fields(&mut v, &mut body);
    set(&mut body, "sourceTemplateId", v.optional_i64("sourceTemplateId"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::create_rate_plan(client.as_ref(), body).await)
}

async fn update_rate_plan(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let mut body = Map::new();
    set(&mut body, "name", v.optional_str("name"));
    set(&mut body, "type", v.optional_enum("type", RATE_PLAN_TYPES));
    rate_plan_fields(&mut v, &mut body);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_rate_plan(client.as_ref(), rate_plan_id, body).await)
}

async fn delete_rate_plan(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_rate_plan(client.as_ref(), rate_plan_id).await)
}

async fn update_rate_plan_status(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    let status = v.require_enum("status", RATE_PLAN_STATUSES);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_rate_plan_status(client.as_ref(), rate_plan_id, status).await)
}

async fn sync_rate_plan(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let rate_plan_id = v.require_positive_i64("ratePlanId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::sync_rate_plan(client.as_ref(), rate_plan_id).await)
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
    async fn create_requires_type_enum() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_rate_plan(
            fake.clone(),
            args(json!({"productId": 6, "name": "Monthly", "type": "weekly"})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "type: must be one of contract, ongoing, prepaid"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn list_scoped_to_product() {
        let fake = Arc::new(FakeTransport::new());
        let result = list_rate_plans(
            fake.clone(),
            args(json!({"productId": 6, "status": "published"})),
        )
        .await;
        assert!(!result.is_error());
        assert_eq!(
            fake.single_call().path,
            "/products/6/product-rateplans?status=published"
        );
    }

    #[tokio::test]
    async fn sync_posts_without_body() {
        let fake = Arc::new(FakeTransport::new());
        let result = sync_rate_plan(fake.clone(), args(json!({"ratePlanId": 3}))).await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/product-rateplans/3/sync");
        assert_eq!(call.body, None);
    }
}
