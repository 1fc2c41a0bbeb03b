//! Saved filter endpoints (`/companies/filters`).

use serde_json::{Map, Value};

use super::Query;
use crate::core::client::{ApiError, ApiTransport};

pub async fn list_filters(
    client: &dyn ApiTransport,
    section: Option<&str>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("section", section);
    client
        .get(&format!("/companies/filters{}", q.build()))
        .await
}

/// Filterable attributes for one section.
pub async fn list_filter_fields(
    client: &dyn ApiTransport,
    section: &str,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push("section", section);
    client
        .get(&format!("/companies/filters/fields{}", q.build()))
        .await
}

pub async fn create_filter(
    client: &dyn ApiTransport,
    body: Map<String, Value>,
) -> Result<Value, ApiError> {
    client
        .post("/companies/filters", Some(Value::Object(body)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;

    #[tokio::test]
    async fn fields_require_section_query() {
        let fake = FakeTransport::new();
        list_filter_fields(&fake, "subscriptions").await.unwrap();
        assert_eq!(
            fake.single_call().path,
            "/companies/filters/fields?section=subscriptions"
        );
    }

    #[tokio::test]
    async fn list_without_section() {
        let fake = FakeTransport::new();
        list_filters(&fake, None).await.unwrap();
        assert_eq!(fake.single_call().path, "/companies/filters");
    }
}
