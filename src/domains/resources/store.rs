//! Static API documentation resources.
//!
//! All docs are self-contained; clients should never fetch external URLs.

/// URI prefix for the documentation resources.
pub const DOCS_URI_PREFIX: &str = "rebillia://docs/";

/// Doc keys accepted by the `get_api_docs` tool.
pub const DOC_KEYS: &[&str] = &["overview", "models", "subscription-statuses", "charge-types"];

/// One markdown documentation resource.
#[derive(Debug, Clone, Copy)]
pub struct ApiDoc {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

impl ApiDoc {
    pub const MIME_TYPE: &'static str = "text/markdown";
}

/// All documentation resources, in listing order.
pub fn all_docs() -> &'static [ApiDoc] {
    DOCS
}

/// Look up a doc by full URI.
pub fn find_doc(uri: &str) -> Option<&'static ApiDoc> {
    DOCS.iter().find(|doc| doc.uri == uri)
}

/// Look up a doc by short key (`overview`, `models`, ...).
pub fn doc_by_key(key: &str) -> Option<&'static ApiDoc> {
    DOCS.iter()
        .find(|doc| doc.uri.strip_prefix(DOCS_URI_PREFIX) == Some(key))
}

static DOCS: &[ApiDoc] = &[
    ApiDoc {
        uri: "rebillia://docs/overview",
        name: "Overview documentation",
        description: "Rebillia API overview. Base URLs, authentication, pagination, date format, amount handling. Main entry point for Rebillia API docs.",
        text: OVERVIEW,
    },
    ApiDoc {
        uri: "rebillia://docs/models",
        name: "rebillia-data-models",
        description: "Domain model hierarchy and relationships",
        text: MODELS,
    },
    ApiDoc {
        uri: "rebillia://docs/subscription-statuses",
        name: "rebillia-subscription-statuses",
        description: "Status guide (active, paused, archived, requestPayment)",
        text: SUBSCRIPTION_STATUSES,
    },
    ApiDoc {
        uri: "rebillia://docs/charge-types",
        name: "rebillia-charge-types",
        description: "Charge type reference (chargeType, chargeModel, billingPeriod, billingTiming enums)",
        text: CHARGE_TYPES,
    },
];

const OVERVIEW: &str = r#"# Rebillia Public API – Overview documentation

**This is the Rebillia API overview.** All reference material is in these MCP resources (rebillia://docs/*). Do not fetch external URLs; use `resources/read` with the URIs below. The rest of this document and the other docs contain everything needed.

## Base URLs

| Environment | Base URL |
|-------------|----------|
| Production | `https://api.rebillia.com/v1` |
| Sandbox | `https://sandboxapi.rebillia.com/v1` |

Override with `REBILLIA_API_URL` (include `/v1`).

## Authentication

- **Header:** `X-AUTH-TOKEN` (required) – your Rebillia API key
- **Content-Type:** `application/json` for request bodies
- Missing or invalid key returns `401 Unauthorized`

## Pagination

List endpoints return a paginated shape:

| Field | Type | Description |
|-------|------|-------------|
| `currentPageNumber` | number | Current page (1-based) |
| `itemsPerPage` | number | Page size |
| `totalItems` | number | Total count |
| `totalPages` | number | Total pages |
| `data` | array | Items for the page |

**Common query params:** `pageNo` (default 1), `itemPerPage` (default 25, max 250).

## Date / time format

- Use **ISO 8601** when the API expects a datetime (e.g. `newDateTime` for bill runs): `YYYY-MM-DDTHH:MM:SS` or with timezone `YYYY-MM-DDTHH:MM:SSZ`.
- Date-only fields often use `YYYY-MM-DD` (e.g. `effectiveStartDate`, `dateDue`).

## Amount handling

- **Invoice charge / transaction amounts:** Many endpoints use amounts in **cents** (e.g. `5500` = $55.00). Check per endpoint.
- **Refund (transactions):** `amount` in **cents** (e.g. `250` = $2.50).
- **Invoice detail line items (create):** `amount` as **dollar string** (e.g. `"20.00"`) or number in cents (converted to dollars by the tool).
- **Shipping:** `orderAmount` in company currency units; `weight` per company metrics (oz, kg, etc.).

## Other documentation resources

**Do not fetch external URLs.** Use only these MCP resources. Read them via MCP `resources/read` with the URI:

| Resource | URI | Contents |
|----------|-----|----------|
| **Overview** (this doc) | `rebillia://docs/overview` | Base URLs, auth, pagination, dates, amounts |
| Data models | `rebillia://docs/models` | Domain model hierarchy and relationships |
| Subscription statuses | `rebillia://docs/subscription-statuses` | active, paused, archived, requestPayment |
| Charge types | `rebillia://docs/charge-types` | chargeType, chargeModel, billingPeriod, billingTiming |
"#;

const MODELS: &str = r#"# Rebillia – Domain model hierarchy and relationships

High-level domain model for the Rebillia Public API.

## Company-scoped entities

- **Company** – Tenant; all data is scoped by company (via API key).
- **Company currency** – Currency used by the company (linked to global currency); has conversion rate, fixed rate; can be default.
- **Company gateway** – Payment gateway configuration (Stripe, etc.); has credentials (setting), display name, card types.
- **Company integration** – Integration instance (e.g. BigCommerce, Shopify, Avalara, SMTP) per company; has section/type (ecommerce, tax, shipping, etc.).
- **Company filter** – Saved filter (display name, section, rules) for list views (invoices, subscriptions, customers, etc.).

## Core billing hierarchy

```
Company
  ├── Customers
  │     ├── Address book (billing/shipping)
  │     ├── Payment methods (customer payment method)
  │     ├── Invoices (customer-scoped)
  │     └── Subscriptions
  ├── Products
  │     └── Product rate plans
  │           └── Product rate plan charges (chargeType, chargeModel, tiers)
  ├── Subscriptions (customer + company currency + optional gateway)
  │     ├── Rate plans (product rate plan, charges, quantity)
  │     └── Rate plan charges (quantity, tier, billing period)
  ├── Invoices (customer, currency, gateway; line items, transactions)
  │     └── Transactions (payment/refund/void)
  ├── Bill runs (scheduled runs; target date/time)
  ├── Currencies (company currencies; default)
  └── Gateways (company gateways; test connection)
```

## Key relationships

- **Subscription** → Customer, Company currency, optional Company gateway, optional payment method; contains **Rate plans** (product rate plan ref + rate plan charges).
- **Invoice** → Customer, Company currency/gateway; has **Detail** (line items) and **Transactions**.
- **Transaction** → Invoice (or standalone); amount, status, payment type (e.g. thirdPartyPaymentProvider).
- **Product rate plan** → Product; has **Product rate plan charges** (charge type, model, billing period, tiers).
- **Filter** → Section (e.g. subscriptions, invoices, customers); **Rules** (attribute, operator, setting values).
"#;

const SUBSCRIPTION_STATUSES: &str = r#"# Rebillia – Subscription statuses

Subscription status values used by the Rebillia Public API.

## Status values

| Status | Value | Description |
|--------|--------|-------------|
| **Active** | `active` | Subscription is active; billing and charges apply per schedule. |
| **Paused** | `paused` | Subscription is paused; billing suspended until resumed. |
| **Archived** | `archived` | Subscription is ended/archived; no longer active. |
| **Request payment** | `requestPayment` | Payment is requested (e.g. awaiting payment). |

## Usage

- **List/filter:** Use `status` query param (e.g. `GET /subscriptions?status=active`).
- **Update status:** `PUT /subscriptions/{id}` or dedicated status endpoint with body `{ "status": "archived" }` (or `active`, `paused`, `requestPayment` as allowed by the API).
- **Create:** New subscriptions are typically created in `active` or as per API rules.

## Allowed transitions

- Typical transitions: `active` → `paused`, `active` → `archived`, `requestPayment` → `active`. The API rejects transitions it does not allow.
"#;

const CHARGE_TYPES: &str = r#"# Rebillia – Charge type reference

Enums for rate plan charges and product rate plan charges.

## chargeType

| Value | Description |
|-------|-------------|
| `oneTime` | One-time charge |
| `recurring` | Recurring charge (billing period applies) |
| `usage` | Usage-based charge |

## chargeModel

| Value | Description |
|-------|-------------|
| `flatFee` | Flat fee pricing |
| `perUnit` | Per-unit pricing |
| `tiered` | Tiered pricing (charge tiers) |
| `volume` | Volume pricing |
| `overage` | Overage pricing |

## billingPeriod

Used for recurring charges (e.g. `recurring` chargeType).

| Value | Description |
|-------|-------------|
| `day` | Daily |
| `week` | Weekly |
| `month` | Monthly |
| `quarter` | Quarterly |
| `year` | Yearly |

## billingTiming

| Value | Description |
|-------|-------------|
| `inAdvance` | Billed in advance of the period |
| `inArrears` | Billed in arrears (after the period) |

## Typical usage

- **Create rate plan charge:** `chargeType`, `chargeModel`, `billCycleType`, `category`, `chargeTier` (array), `taxable`, `weight`, `endDateCondition`; for recurring, `billingPeriod` and `billingTiming` (and alignment) apply.
- **Subscription rate plan charges:** Inherit from product rate plan charge; quantity and overrides per subscription.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_doc_key_resolves() {
        for key in DOC_KEYS {
            let doc = doc_by_key(key).unwrap();
            assert_eq!(doc.uri, format!("{DOCS_URI_PREFIX}{key}"));
            assert!(!doc.text.is_empty());
        }
    }

    #[test]
    fn unknown_uri_is_none() {
        assert!(find_doc("rebillia://docs/webhooks").is_none());
        assert!(doc_by_key("webhooks").is_none());
    }

    #[test]
    fn overview_mentions_auth_header() {
        let doc = doc_by_key("overview").unwrap();
        assert!(doc.text.contains("X-AUTH-TOKEN"));
    }
}
