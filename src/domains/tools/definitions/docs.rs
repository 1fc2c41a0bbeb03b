//! Documentation tool.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use crate::core::client::ApiTransport;
use crate::domains::resources::{DOC_KEYS, doc_by_key};
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::Validator;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "get_api_docs",
        description: "Get Rebillia API documentation as markdown. Returns the overview by default so the caller can read base URLs, auth, pagination, dates, amounts without fetching external URLs. Optional: doc (overview | models | subscription-statuses | charge-types).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "doc": {
                    "type": "string",
                    "description": "Which doc to return. Default: overview. Options: overview, models, subscription-statuses, charge-types"
                }
            }
        }),
        handler: |client, args| get_api_docs(client, args).boxed(),
    });
}

async fn get_api_docs(_client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let key = v.optional_enum("doc", DOC_KEYS).unwrap_or("overview");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    match doc_by_key(key) {
        Some(doc) => ToolResult::text(doc.text),
        None => ToolResult::error(format!(
            "Unknown doc: {key}. Use one of: {}",
            DOC_KEYS.join(", ")
        )),
    }
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
    async fn defaults_to_overview() {
        let fake = Arc::new(FakeTransport::new());
        let result = get_api_docs(fake.clone(), Map::new()).await;
        assert!(!result.is_error());
        assert!(result.first_text().starts_with("# Rebillia Public API"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_doc() {
        let fake = Arc::new(FakeTransport::new());
        let result = get_api_docs(fake.clone(), args(json!({"doc": "webhooks"}))).await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn returns_charge_type_reference() {
        let fake = Arc::new(FakeTransport::new());
        let result = get_api_docs(fake.clone(), args(json!({"doc": "charge-types"}))).await;
        assert!(!result.is_error());
        assert!(result.first_text().contains("chargeModel"));
    }
}
