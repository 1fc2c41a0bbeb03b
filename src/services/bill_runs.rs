//! Bill run endpoints. The upstream path segment is `/bill-run` (singular).

use serde_json::{Value, json};

use super::Query;
use crate::core::client::{ApiError, ApiTransport};

/// Query parameters for `GET /bill-run`. `query` filters by run status.
#[derive(Debug, Default)]
pub struct ListBillRunsParams<'a> {
    pub include: Option<&'a str>,
    pub query: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub item_per_page: Option<i64>,
    pub page_no: Option<i64>,
}

fn has_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

/// `H:MM` or `HH:MM` at the start of `s`.
fn starts_with_time(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    while i < 2 && i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    i >= 1
        && b.get(i) == Some(&b':')
        && b.get(i + 1).is_some_and(u8::is_ascii_digit)
        && b.get(i + 2).is_some_and(u8::is_ascii_digit)
}

/// Trailing `Z`, `±HHMM`, or `±HH:MM`.
fn has_timezone(s: &str) -> bool {
    if s.ends_with('Z') || s.ends_with('z') {
        return true;
    }
    let b = s.as_bytes();
    let n = b.len();
    if n >= 5
        && (b[n - 5] == b'+' || b[n - 5] == b'-')
        && b[n - 4..].iter().all(u8::is_ascii_digit)
    {
        return true;
    }
    n >= 6
        && (b[n - 6] == b'+' || b[n - 6] == b'-')
        && b[n - 5].is_ascii_digit()
        && b[n - 4].is_ascii_digit()
        && b[n - 3] == b':'
        && b[n - 2].is_ascii_digit()
        && b[n - 1].is_ascii_digit()
}

/// Normalize a schedule datetime to the ISO 8601 shape the upstream wants:
/// a space between date and time becomes `T`, and a missing timezone gets a
/// trailing `Z`. Already-valid ISO strings pass through untouched.
pub fn normalize_date_time(value: &str) -> String {
    let mut s = value.trim().to_string();

    if has_date_prefix(&s) {
        let rest = &s[10..];
        let time_part = rest.trim_start();
        if time_part.len() < rest.len() && starts_with_time(time_part) {
            s = format!("{}T{}", &s[..10], time_part);
        }
    }

    if !has_timezone(&s)
        && has_date_prefix(&s)
        && s.as_bytes().get(10) == Some(&b'T')
        && starts_with_time(&s[11..])
    {
        s.push('Z');
    }
    s
}

pub async fn list_bill_runs(
    client: &dyn ApiTransport,
    params: ListBillRunsParams<'_>,
) -> Result<Value, ApiError> {
    let mut q = Query::new();
    q.push_opt_str("include", params.include);
    q.push_opt_str("query", params.query);
    q.push_opt_str("orderBy", params.order_by);
    q.push_opt_str("sortBy", params.sort_by);
    q.push_opt("itemPerPage", params.item_per_page);
    q.push_opt("pageNo", params.page_no);
    client.get(&format!("/bill-run{}", q.build())).await
}

pub async fn get_bill_run(client: &dyn ApiTransport, bill_run_id: i64) -> Result<Value, ApiError> {
    client.get(&format!("/bill-run/{bill_run_id}")).await
}

/// Reschedule a pending bill run.
pub async fn update_bill_run(
    client: &dyn ApiTransport,
    bill_run_id: i64,
    new_date_time: &str,
) -> Result<Value, ApiError> {
    let payload = json!({ "newDateTime": normalize_date_time(new_date_time) });
    client
        .put(&format!("/bill-run/{bill_run_id}"), Some(payload))
        .await
}

pub async fn bill_run_invoices(
    client: &dyn ApiTransport,
    bill_run_id: i64,
) -> Result<Value, ApiError> {
    client
        .get(&format!("/bill-run/{bill_run_id}/invoices"))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    #[test]
    fn space_separator_becomes_t_and_gets_utc() {
        assert_eq!(
            normalize_date_time("2026-02-26 19:00:00"),
            "2026-02-26T19:00:00Z"
        );
        assert_eq!(normalize_date_time("2026-02-26 9:30"), "2026-02-26T9:30Z");
    }

    #[test]
    fn missing_timezone_appended() {
        assert_eq!(
            normalize_date_time("2026-02-26T19:00:00"),
            "2026-02-26T19:00:00Z"
        );
    }

    #[test]
    fn valid_iso_strings_untouched() {
        assert_eq!(
            normalize_date_time("2026-02-26T19:00:00Z"),
            "2026-02-26T19:00:00Z"
        );
        assert_eq!(
            normalize_date_time("2026-02-26T19:00:00+05:30"),
            "2026-02-26T19:00:00+05:30"
        );
        assert_eq!(
            normalize_date_time("2026-02-26T19:00:00-0800"),
            "2026-02-26T19:00:00-0800"
        );
    }

    #[test]
    fn non_datetime_strings_untouched() {
        assert_eq!(normalize_date_time("2026-02-26"), "2026-02-26");
        assert_eq!(normalize_date_time("tomorrow"), "tomorrow");
    }

    #[tokio::test]
    async fn update_sends_normalized_datetime() {
        let fake = FakeTransport::new();
        update_bill_run(&fake, 15, "2026-03-01 08:00:00").await.unwrap();
        let call = fake.single_call();
        assert_eq!(call.method, "PUT");
        assert_eq!(call.path, "/bill-run/15");
        assert_eq!(call.body, Some(json!({"newDateTime": "2026-03-01T08:00:00Z"})));
    }

    #[tokio::test]
    async fn list_uses_singular_path() {
        let fake = FakeTransport::new();
        list_bill_runs(
            &fake,
            ListBillRunsParams {
                query: Some("pending"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(fake.single_call().path, "/bill-run?query=pending");
    }
}
