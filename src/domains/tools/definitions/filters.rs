//! Saved filter tools.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::run_service;
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;
use crate::services::filters as svc;

/// Sections the filter endpoints accept.
pub(crate) const FILTER_SECTIONS: &[&str] = &[
    "subscriptions",
    "invoices",
    "customers",
    "products",
    "orders",
    "billRuns",
    "transactions",
    "gateways",
];

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_filters",
        description: "List company filters. GET /companies/filters. Required: section (e.g. subscriptions, invoices, customers, products, orders, billRuns).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "section": {
                    "type": "string",
                    "description": "Section (required). One of: subscriptions, invoices, customers, products, orders, billRuns, etc."
                }
            },
            "required": ["section"]
        }),
        handler: |client, args| list_filters(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_filter_fields",
        description: "List available filter fields/attributes for a section. GET /companies/filters/fields. Required: section. Returns available filter attributes for the section.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "section": {
                    "type": "string",
                    "description": "Section (required). One of: subscriptions, invoices, customers, products, orders, billRuns, etc."
                }
            },
            "required": ["section"]
        }),
        handler: |client, args| list_filter_fields(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_filter",
        description: "Create a company filter. POST /companies/filters. Required: displayName, section, isDefault, rules (array of { operatorId, attributeId, settingValues }). Optional per rule: operatorDisplayName.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "displayName": { "type": "string", "description": "Display name (required)" },
                "section": {
                    "type": "string",
                    "description": "Section (required). One of: subscriptions, invoices, customers, products, orders, etc."
                },
                "isDefault": { "type": "boolean", "description": "Set as default filter (required)" },
                "rules": {
                    "type": "array",
                    "description": "Rules array (required). Each: operatorId (number), attributeId (number), settingValues (array of { value }), optional operatorDisplayName"
                }
            },
            "required": ["displayName", "section", "isDefault", "rules"]
        }),
        handler: |client, args| create_filter(client, args).boxed(),
    });
}

fn require_section<'a>(v: &mut Validator<'a>) -> &'a str {
    let section = v.require_str("section");
    if !section.is_empty() && !FILTER_SECTIONS.contains(&section) {
        v.push(
            "section must be a valid section (e.g. subscriptions, invoices, customers, products)",
        );
    }
    section
}

async fn list_filters(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let section = require_section(&mut v);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::list_filters(client.as_ref(), Some(section)).await)
}

async fn list_filter_fields(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let section = require_section(&mut v);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::list_filter_fields(client.as_ref(), section).await)
}

/// Each rule keeps only the keys the API knows about; `settingValues`
/// defaults to an empty array when omitted.
fn filter_rules(v: &mut Validator<'_>, field: &str) -> Vec<Value> {
    let items = v.require_non_empty_array(field);
    let mut rules = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(rule) = item.as_object() else {
            v.push(format!("{field}.{i}: must be an object"));
            continue;
        };
        let mut out = Map::new();
        match rule.get("operatorId").and_then(Value::as_i64) {
            Some(operator_id) => {
                out.insert("operatorId".to_string(), json!(operator_id));
            }
            None => v.push(format!("{field}.{i}.operatorId: operatorId is required")),
        }
        match rule.get("attributeId").and_then(Value::as_i64) {
            Some(attribute_id) => {
                out.insert("attributeId".to_string(), json!(attribute_id));
            }
            None => v.push(format!("{field}.{i}.attributeId: attributeId is required")),
        }
        if let Some(name) = rule.get("operatorDisplayName").and_then(Value::as_str) {
            out.insert("operatorDisplayName".to_string(), json!(name));
        }
        let setting_values = match rule.get("settingValues") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values.clone(),
            Some(_) => {
                v.push(format!("{field}.{i}.settingValues: must be an array"));
                Vec::new()
            }
        };
        out.insert("settingValues".to_string(), Value::Array(setting_values));
        rules.push(Value::Object(out));
    }
    rules
}

async fn create_filter(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let display_name = v.require_str("displayName");
    let section = require_section(&mut v);
    let is_default = v.require_bool("isDefault");
    let rules = filter_rules(&mut v, "rules");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    let mut body = Map::new();
    body.insert("displayName".to_string(), json!(display_name));
    body.insert("section".to_string(), json!(section));
    body.insert("isDefault".to_string(), json!(is_default));
    body.insert("rules".to_string(), Value::Array(rules));
    run_service(svc::create_filter(client.as_ref(), body).await)
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
    async fn fields_require_known_section() {
        let fake = Arc::new(FakeTransport::new());
        let result = list_filter_fields(fake.clone(), args(json!({"section": "refunds"}))).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "section must be a valid section (e.g. subscriptions, invoices, customers, products)"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_defaults_setting_values() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_filter(
            fake.clone(),
            args(json!({
                "displayName": "Past due",
                "section": "invoices",
                "isDefault": false,
                "rules": [{"operatorId": 2, "attributeId": 14}]
            })),
        )
        .await;
        assert!(!result.is_error());
        let body = fake.single_call().body.unwrap();
        assert_eq!(body["rules"][0]["settingValues"], json!([]));
    }

    #[tokio::test]
    async fn create_rejects_empty_rules() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_filter(
            fake.clone(),
            args(json!({
                "displayName": "Past due",
                "section": "invoices",
                "isDefault": false,
                "rules": []
            })),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(result.first_text(), "rules: must have at least one item");
        assert!(fake.calls().is_empty());
    }
}
