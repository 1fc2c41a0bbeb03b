//! Product catalog tools, including external storefront links.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{PRODUCT_STATUSES, run_service, set};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::products as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_products",
        description: "List products. GET /products. Optional: include, orderBy, sortBy (ASC/DESC), itemPerPage, pageNo, filterId, query.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "include": { "type": "string", "description": "Comma-separated attributes to include" },
                "orderBy": { "type": "string", "description": "Sort column" },
                "sortBy": { "type": "string", "description": "ASC or DESC" },
                "itemPerPage": { "type": "number", "description": "Items per page" },
                "pageNo": { "type": "number", "description": "Page number (1-based)" },
                "filterId": { "type": "number", "description": "Saved filter ID" },
                "query": { "type": "string", "description": "Search text" }
            }
        }),
        handler: |client, args| list_products(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_product",
        description: "Get a product by ID. GET /products/{id}. Optional: include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "number", "description": "Product ID (required)" },
                "include": { "type": "string", "description": "Comma-separated relations" }
            },
            "required": ["productId"]
        }),
        handler: |client, args| get_product(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_product",
        description: "Create a product. POST /products. Required: name, category. Optional: description, internalProductId, sku.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Product name (required)" },
                "category": { "type": "string", "description": "Category (required)" },
                "description": { "type": "string" },
                "internalProductId": { "type": "string" },
                "sku": { "type": "string" }
            },
            "required": ["name", "category"]
        }),
        handler: |client, args| create_product(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_product",
        description: "Update a product. PUT /products/{id}. Optional: name, category, description, internalProductId, sku.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "number", "description": "Product ID (required)" },
                "name": { "type": "string" },
                "category": { "type": "string" },
                "description": { "type": "string" },
                "internalProductId": { "type": "string" },
                "sku": { "type": "string" }
            },
            "required": ["productId"]
        }),
        handler: |client, args| update_product(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_product",
        description: "Delete a product. DELETE /products/{id}. IRREVERSIBLE.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "number", "description": "Product ID (required)" }
            },
            "required": ["productId"]
        }),
        handler: |client, args| delete_product(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_product_status",
        description: "Update a product status. PUT /products/{id}/status. Required: status (published|archived|disabled).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "number", "description": "Product ID (required)" },
                "status": { "type": "string", "description": "published, archived, or disabled (required)" }
            },
            "required": ["productId", "status"]
        }),
        handler: |client, args| update_product_status(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "link_external_product",
        description: "Link an external product to a product. POST /products/{id}/external-products. Required: productId, companyIntegrationId, productIdExternal, modifierDisplayName (sent as settings.modifierDisplayName). Optional: displayStyle (e.g. dropdown), required, defaultRatePlan.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "string", "description": "Rebillia product ID (required)" },
                "companyIntegrationId": { "type": "number", "description": "Company integration ID (required)" },
                "productIdExternal": { "type": "string", "description": "External product ID from the integration (required)" },
                "modifierDisplayName": { "type": "string", "description": "Display name for the modifier (required, part of settings)" },
                "displayStyle": { "type": "string", "description": "e.g. dropdown" },
                "required": { "type": "boolean", "description": "Whether the external product is required" },
                "defaultRatePlan": { "type": "string", "description": "Default rate plan" }
            },
            "required": ["productId", "companyIntegrationId", "productIdExternal", "modifierDisplayName"]
        }),
        handler: |client, args| link_external_product(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "unlink_external_product",
        description: "Unlink an external product from a product. DELETE /products/{id}/external-products/{externalProductId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": { "type": "string", "description": "Rebillia product ID (required)" },
                "externalProductId": { "type": "string", "description": "External product link ID (required)" }
            },
            "required": ["productId", "externalProductId"]
        }),
        handler: |client, args| unlink_external_product(client, args).boxed(),
    });
}

async fn list_products(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let include = v.optional_str("include");
    let order_by = v.optional_str("orderBy");
    let sort_by = v.optional_enum("sortBy", &["ASC", "DESC"]);
    let item_per_page = v.optional_i64("itemPerPage");
    let page_no = v.optional_i64("pageNo");
    let filter_id = v.optional_i64("filterId");
    let query = v.optional_str("query");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_products(
            client.as_ref(),
            svc::ListProductsParams {
                include,
                order_by,
                sort_by,
                item_per_page,
                page_no,
                filter_id,
                query,
            },
        )
        .await,
    )
}

async fn get_product(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_positive_i64("productId");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_product(client.as_ref(), product_id, include).await)
}

async fn create_product(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let name = v.require_str("name");
    let category = v.require_str("category");
    let mut body = Map::new();
    body.insert("name".to_string(), json!(name));
    body.insert("category".to_string(), json!(category));
    set(&mut body, "description", v.optional_str("description"));
    set(&mut body, "internalProductId", v.optional_str("internalProductId"));
    set(&mut body, "sku", v.optional_str("sku"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::create_product(client.as_ref(), body).await)
}

async fn update_product(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_positive_i64("productId");
    let mut body = Map::new();
    set(&mut body, "name", v.optional_str("name"));
    set(&mut body, "category", v.optional_str("category"));
    set(&mut body, "description", v.optional_str("description"));
    set(&mut body, "internalProductId", v.optional_str("internalProductId"));
    set(&mut body, "sku", v.optional_str("sku"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_product(client.as_ref(), product_id, body).await)
}

async fn delete_product(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_positive_i64("productId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_product(client.as_ref(), product_id).await)
}

async fn update_product_status(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_positive_i64("productId");
    let status = v.require_enum("status", PRODUCT_STATUSES);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_product_status(client.as_ref(), product_id, status).await)
}

async fn link_external_product(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_str("productId");
    let company_integration_id = v.require_positive_i64("companyIntegrationId");
    let external_id = v.require_str("productIdExternal");
    let modifier_display_name = v.require_str("modifierDisplayName");
    let display_style = v.optional_str("displayStyle");
    let required = v.optional_bool("required");
    let default_rate_plan = v.optional_str("defaultRatePlan");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    // The external product ID is sent as `productId` in the body; the
    // settings object carries the modifier display name.
    let mut body = Map::new();
    body.insert("companyIntegrationId".to_string(), json!(company_integration_id));
    body.insert("productId".to_string(), json!(external_id));
    body.insert(
        "settings".to_string(),
        json!({ "modifierDisplayName": modifier_display_name }),
    );
    set(&mut body, "displayStyle", display_style);
    set(&mut body, "required", required);
    set(&mut body, "defaultRatePlan", default_rate_plan);
    run_service(svc::link_external_product(client.as_ref(), product_id, body).await)
}

async fn unlink_external_product(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let product_id = v.require_str("productId");
    let external_product_id = v.require_str("externalProductId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::unlink_external_product(client.as_ref(), product_id, external_product_id).await)
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
    async fn create_product_requires_name_and_category() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_product(fake.clone(), args(json!({}))).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "name: name is required; category: category is required"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_product_gets_default_rate_plan_array() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_product(
            fake.clone(),
            args(json!({"name": "Widget", "category": "physical"})),
        )
        .await;
        assert!(!result.is_error());
        let body = fake.single_call().body.unwrap();
        assert_eq!(body["productRatePlan"], json!([]));
    }

    #[tokio::test]
    async fn status_update_rejects_unknown_status() {
        let fake = Arc::new(FakeTransport::new());
        let result = update_product_status(
            fake.clone(),
            args(json!({"productId": 4, "status": "hidden"})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "status: must be one of published, archived, disabled"
        );
    }

    #[tokio::test]
    async fn link_reshapes_external_product_body() {
        let fake = Arc::new(FakeTransport::new());
        let result = link_external_product(
            fake.clone(),
            args(json!({
                "productId": "12",
                "companyIntegrationId": 3,
                "productIdExternal": "ext-9",
                "modifierDisplayName": "Plan",
                "displayStyle": "dropdown"
            })),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/products/12/external-products");
        let body = call.body.unwrap();
        assert_eq!(body["productId"], "ext-9");
        assert_eq!(body["settings"]["modifierDisplayName"], "Plan");
        assert_eq!(body["displayStyle"], "dropdown");
    }
}
