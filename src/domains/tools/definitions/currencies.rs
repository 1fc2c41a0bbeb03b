//! Company currency tools, including the account default currency.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::run_service;
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::currencies as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_currencies",
        description: "List company currencies. GET /currencies. Optional: include, itemPerPage, pageNo.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "include": { "type": "string", "description": "Comma-separated attributes to include" },
                "itemPerPage": { "type": "number", "description": "Items per page" },
                "pageNo": { "type": "number", "description": "Page number" }
            }
        }),
        handler: |client, args| list_currencies(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_currency",
        description: "Get a company currency by ID. GET /currencies/{currencyId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "currencyId": { "type": "number", "description": "Company currency ID (required)" }
            },
            "required": ["currencyId"]
        }),
        handler: |client, args| get_currency(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_currency",
        description: "Create a company currency. POST /currencies. Required: currencyId (global currency ID), conversionRate (number), fixedRate (boolean).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "currencyId": { "type": "number", "description": "Global currency ID (required)" },
                "conversionRate": { "type": "number", "description": "Conversion rate (required)" },
                "fixedRate": { "type": "boolean", "description": "Fixed rate flag (required)" }
            },
            "required": ["currencyId", "conversionRate", "fixedRate"]
        }),
        handler: |client, args| create_currency(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_currency",
        description: "Update a company currency. PUT /currencies/{companyCurrencyId}. Required: companyCurrencyId, conversionRate, fixedRate.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "companyCurrencyId": { "type": "number", "description": "Company currency ID (required)" },
                "conversionRate": { "type": "number", "description": "Conversion rate (required)" },
                "fixedRate": { "type": "boolean", "description": "Fixed rate flag (required)" }
            },
            "required": ["companyCurrencyId", "conversionRate", "fixedRate"]
        }),
        handler: |client, args| update_currency(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_currency",
        description: "Delete a company currency. DELETE /currencies/{companyCurrencyId}. Fails if currency is in use (invoices, subscriptions, transactions, or gateways).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "companyCurrencyId": { "type": "number", "description": "Company currency ID (required)" }
            },
            "required": ["companyCurrencyId"]
        }),
        handler: |client, args| delete_currency(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_default_currency",
        description: "Get the company default currency. GET /currencies/default.",
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
        handler: |client, args| get_default_currency(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "set_default_currency",
        description: "Set the company default currency. POST /currencies/default. Required: currencyId (global currency ID). Creates company currency if needed. Fails if there are invoices with that currency.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "currencyId": { "type": "number", "description": "Global currency ID (required)" }
            },
            "required": ["currencyId"]
        }),
        handler: |client, args| set_default_currency(client, args).boxed(),
    });
}

async fn list_currencies(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let include = v.optional_str("include");
    let item_per_page = v.optional_i64("itemPerPage");
    let page_no = v.optional_i64("pageNo");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_currencies(
            client.as_ref(),
            svc::ListCurrenciesParams {
                include,
                item_per_page,
                page_no,
            },
        )
        .await,
    )
}

async fn get_currency(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let currency_id = v.require_positive_i64("currencyId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_currency(client.as_ref(), currency_id).await)
}

async fn create_currency(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let currency_id = v.require_positive_i64("currencyId");
    let conversion_rate = v.require_f64("conversionRate");
    let fixed_rate = v.require_bool("fixedRate");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::create_currency(client.as_ref(), currency_id, conversion_rate, fixed_rate).await,
    )
}

async fn update_currency(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let company_currency_id = v.require_positive_i64("companyCurrencyId");
    let conversion_rate = v.require_f64("conversionRate");
    let fixed_rate = v.require_bool("fixedRate");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::update_currency(
            client.as_ref(),
            company_currency_id,
            conversion_rate,
            fixed_rate,
        )
        .await,
    )
}

async fn delete_currency(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let company_currency_id = v.require_positive_i64("companyCurrencyId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_currency(client.as_ref(), company_currency_id).await)
}

async fn get_default_currency(
    client: Arc<dyn ApiTransport>,
    _args: Map<String, Value>,
) -> ToolResult {
    run_service(svc::get_default_currency(client.as_ref()).await)
}

async fn set_default_currency(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let currency_id = v.require_positive_i64("currencyId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::set_default_currency(client.as_ref(), currency_id).await)
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
    async fn create_requires_all_three_fields() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_currency(fake.clone(), args(json!({"currencyId": 2}))).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "conversionRate: conversionRate is required; fixedRate: fixedRate is required"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn update_puts_rate_and_flag() {
        let fake = Arc::new(FakeTransport::new());
        let result = update_currency(
            fake.clone(),
            args(json!({"companyCurrencyId": 4, "conversionRate": 0.92, "fixedRate": true})),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/currencies/4");
        assert_eq!(
            call.body,
            Some(json!({"conversionRate": 0.92, "fixedRate": true}))
        );
    }

    #[tokio::test]
    async fn default_currency_ignores_arguments() {
        let fake = Arc::new(FakeTransport::new());
        let result = get_default_currency(fake.clone(), Map::new()).await;
        assert!(!result.is_error());
        assert_eq!(fake.single_call().path, "/currencies/default");
    }
}
