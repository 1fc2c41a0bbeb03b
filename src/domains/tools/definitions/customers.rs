//! Customer tools: the customer record plus its addressbooks, payment
//! methods, and charges/credits.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};

use super::{
    CATEGORIES, CHARGE_CREDIT_TYPES, CUSTOMER_STATUSES, PAYMENT_METHOD_TYPES, run_service, set,
};
use crate::core::client::ApiTransport;
use crate::domains::tools::registry::{ToolDef, ToolRegistry};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::schema::{ADDRESS_TYPES, Validator};
use crate::services::customers as svc;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDef {
        name: "list_customers",
        description: "List customers. GET /customers. Optional: pageNo, itemPerPage, query (search by name/email), status (active|disabled|archived), sortBy, orderBy, include (comma-separated, e.g. addressbook,subscriptions), filterId (saved filter).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "pageNo": { "type": "number", "description": "Page number" },
                "itemPerPage": { "type": "number", "description": "Items per page" },
                "query": { "type": "string", "description": "Search by name or email" },
                "status": { "type": "string", "description": "active, disabled, or archived" },
                "sortBy": { "type": "string", "description": "Sort field" },
                "orderBy": { "type": "string", "description": "asc or desc" },
                "include": { "type": "string", "description": "Comma-separated relations, e.g. addressbook,subscriptions" },
                "filterId": { "type": "number", "description": "Saved filter ID" }
            }
        }),
        handler: |client, args| list_customers(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_customer",
        description: "Get a customer by ID. GET /customers/{id}. Optional: includeAddresses, includePaymentMethods to embed the related records.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "includeAddresses": { "type": "boolean", "description": "Embed addressbook entries" },
                "includePaymentMethods": { "type": "boolean", "description": "Embed payment methods" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| get_customer(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_customer",
        description: "Create a customer. POST /customers. Required: firstName, lastName, email. Optional: businessName, locale, phoneNum, phoneExt, preferredCurrency, taxExempt.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "firstName": { "type": "string", "description": "First name (required)" },
                "lastName": { "type": "string", "description": "Last name (required)" },
                "email": { "type": "string", "description": "Email (required)" },
                "businessName": { "type": "string", "description": "Business name" },
                "locale": { "type": "string", "description": "Locale, e.g. en_US" },
                "phoneNum": { "type": "string", "description": "Phone number" },
                "phoneExt": { "type": "string", "description": "Phone extension" },
                "preferredCurrency": { "type": "string", "description": "Preferred currency code" },
                "taxExempt": { "type": "boolean", "description": "Tax exempt flag" }
            },
            "required": ["firstName", "lastName", "email"]
        }),
        handler: |client, args| create_customer(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_customer",
        description: "Update a customer. PUT /customers/{id}. Only provided fields are sent. Optional: firstName, lastName, email, businessName, locale, phoneNum, phoneExt, preferredCurrency, taxExempt, status (active|disabled|archived).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "firstName": { "type": "string" },
                "lastName": { "type": "string" },
                "email": { "type": "string" },
                "businessName": { "type": "string" },
                "locale": { "type": "string" },
                "phoneNum": { "type": "string" },
                "phoneExt": { "type": "string" },
                "preferredCurrency": { "type": "string" },
                "taxExempt": { "type": "boolean" },
                "status": { "type": "string", "description": "active, disabled, or archived" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| update_customer(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_customer",
        description: "Delete a customer. DELETE /customers/{id}. IRREVERSIBLE.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| delete_customer(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_customer_invoices",
        description: "List a customer's invoices. GET /customers/{id}/invoices. Optional: pageNo, itemPerPage, include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" },
                "include": { "type": "string", "description": "Comma-separated relations" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| get_customer_invoices(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_customer_subscriptions",
        description: "List a customer's subscriptions. GET /customers/{id}/subscriptions. Optional: pageNo, itemPerPage, include.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" },
                "include": { "type": "string", "description": "Comma-separated relations" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| get_customer_subscriptions(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_customer_logs",
        description: "Activity history for a customer. GET /customers/{id}/logs. Optional: pageNo, itemPerPage.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| get_customer_logs(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_customer_addresses",
        description: "List a customer's addressbook entries. GET /customers/{id}/addressbooks.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| list_customer_addresses(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_customer_address",
        description: "Get one addressbook entry. GET /customers/{id}/addressbooks/{addressId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "addressId": { "type": "number", "description": "Address ID (required)" }
            },
            "required": ["customerId", "addressId"]
        }),
        handler: |client, args| get_customer_address(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_customer_address",
        description: "Add an addressbook entry. POST /customers/{id}/addressbooks. Required: name, contactName, street1, city, state, zip, countryId, type (residential|commercial). Optional: street2, company, contactEmail, contactPhone.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "name": { "type": "string", "description": "Address label (required)" },
                "contactName": { "type": "string", "description": "Contact name (required)" },
                "street1": { "type": "string", "description": "Street line 1 (required)" },
                "street2": { "type": "string" },
                "city": { "type": "string", "description": "City (required)" },
                "state": { "type": "string", "description": "State (required)" },
                "zip": { "type": "string", "description": "Postal code (required)" },
                "countryId": { "type": "string", "description": "Country code (required)" },
                "type": { "type": "string", "description": "residential or commercial (required)" },
                "company": { "type": "string" },
                "contactEmail": { "type": "string" },
                "contactPhone": { "type": "string" }
            },
            "required": ["customerId", "name", "contactName", "street1", "city", "state", "zip", "countryId", "type"]
        }),
        handler: |client, args| create_customer_address(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_customer_address",
        description: "Update an addressbook entry. PUT /customers/{id}/addressbooks/{addressId}. Only provided fields are sent.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "addressId": { "type": "number", "description": "Address ID (required)" },
                "name": { "type": "string" },
                "contactName": { "type": "string" },
                "street1": { "type": "string" },
                "street2": { "type": "string" },
                "city": { "type": "string" },
                "state": { "type": "string" },
                "zip": { "type": "string" },
                "countryId": { "type": "string" },
                "type": { "type": "string", "description": "residential or commercial" },
                "company": { "type": "string" },
                "contactEmail": { "type": "string" },
                "contactPhone": { "type": "string" }
            },
            "required": ["customerId", "addressId"]
        }),
        handler: |client, args| update_customer_address(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_customer_address",
        description: "Delete an addressbook entry. DELETE /customers/{id}/addressbooks/{addressId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "addressId": { "type": "number", "description": "Address ID (required)" }
            },
            "required": ["customerId", "addressId"]
        }),
        handler: |client, args| delete_customer_address(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_customer_payment_methods",
        description: "List a customer's payment methods. GET /customers/{id}/paymentmethods.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| list_customer_payment_methods(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "get_customer_payment_method",
        description: "Get one payment method. GET /customers/{id}/paymentmethods/{paymentMethodId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "paymentMethodId": { "type": "number", "description": "Payment method ID (required)" }
            },
            "required": ["customerId", "paymentMethodId"]
        }),
        handler: |client, args| get_customer_payment_method(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_customer_payment_method",
        description: "Add a payment method from a gateway nonce. POST /customers/{id}/paymentmethods. Required: companyGatewayId, type (card|ach), paymentNonce, billingAddress (countryId, street1, city, state, zip; street2 optional). The nonce is sent as paymentMethod.nonce.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "companyGatewayId": { "type": "string", "description": "Company gateway ID (required)" },
                "type": { "type": "string", "description": "card or ach (required)" },
                "paymentNonce": { "type": "string", "description": "One-time payment nonce from the gateway (required)" },
                "billingAddress": {
                    "type": "object",
                    "description": "Required: countryId, street1, city, state, zip. Optional: street2"
                }
            },
            "required": ["customerId", "companyGatewayId", "type", "paymentNonce", "billingAddress"]
        }),
        handler: |client, args| create_customer_payment_method(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "update_customer_payment_method",
        description: "Update a payment method's billing address. PUT /customers/{id}/paymentmethods/{paymentMethodId}. Only the billing address can be changed.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "paymentMethodId": { "type": "number", "description": "Payment method ID (required)" },
                "billingAddress": {
                    "type": "object",
                    "description": "Required: countryId, street1, city, state, zip. Optional: street2"
                }
            },
            "required": ["customerId", "paymentMethodId", "billingAddress"]
        }),
        handler: |client, args| update_customer_payment_method(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_customer_payment_method",
        description: "Delete a payment method. DELETE /customers/{id}/paymentmethods/{paymentMethodId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "paymentMethodId": { "type": "number", "description": "Payment method ID (required)" }
            },
            "required": ["customerId", "paymentMethodId"]
        }),
        handler: |client, args| delete_customer_payment_method(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "list_customer_charges_credits",
        description: "List a customer's one-off charges and credits. GET /customers/{id}/charges_credits. Optional: status, type (charge|credit), include, pageNo, itemPerPage.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "status": { "type": "string", "description": "Filter by status" },
                "type": { "type": "string", "description": "charge or credit" },
                "include": { "type": "string" },
                "pageNo": { "type": "number" },
                "itemPerPage": { "type": "number" }
            },
            "required": ["customerId"]
        }),
        handler: |client, args| list_customer_charges_credits(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "create_customer_charge_credit",
        description: "Add a one-off charge or credit. POST /customers/{id}/charges_credits. Required: amount (CENTS, e.g. 1000 = $10.00), type (charge|credit), companyCurrencyId, category (physical|digital). Optional: description, qty (default 1), isFreeShipping, taxable, weight.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "amount": { "type": "number", "description": "Amount in CENTS (required)" },
                "type": { "type": "string", "description": "charge or credit (required)" },
                "companyCurrencyId": { "type": "number", "description": "Company currency ID (required)" },
                "category": { "type": "string", "description": "physical or digital (required)" },
                "description": { "type": "string" },
                "qty": { "type": "number", "description": "Quantity, default 1" },
                "isFreeShipping": { "type": "boolean" },
                "taxable": { "type": "boolean" },
                "weight": { "type": "number", "description": "Weight, required by the API when category is physical" }
            },
            "required": ["customerId", "amount", "type", "companyCurrencyId", "category"]
        }),
        handler: |client, args| create_customer_charge_credit(client, args).boxed(),
    });
    registry.register(ToolDef {
        name: "delete_customer_charge_credit",
        description: "Delete a charge or credit. DELETE /customers/{id}/charges_credits/{chargeCreditId}.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "customerId": { "type": "number", "description": "Customer ID (required)" },
                "chargeCreditId": { "type": "number", "description": "Charge/credit ID (required)" }
            },
            "required": ["customerId", "chargeCreditId"]
        }),
        handler: |client, args| delete_customer_charge_credit(client, args).boxed(),
    });
}

async fn list_customers(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    let query = v.optional_str("query");
    let status = v.optional_enum("status", CUSTOMER_STATUSES);
    let sort_by = v.optional_str("sortBy");
    let order_by = v.optional_str("orderBy");
    let include = v.optional_str("include");
    let filter_id = v.optional_i64("filterId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_customers(
            client.as_ref(),
            svc::ListCustomersParams {
                page_no,
                item_per_page,
                query,
                status,
                sort_by,
                order_by,
                include,
                filter_id,
            },
        )
        .await,
    )
}

async fn get_customer(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let include_addresses = v.optional_bool("includeAddresses").unwrap_or(false);
    let include_payment_methods = v.optional_bool("includePaymentMethods").unwrap_or(false);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::get_customer(
            client.as_ref(),
            customer_id,
            include_addresses,
            include_payment_methods,
        )
        .await,
    )
}

fn customer_fields(v: &mut Validator<'_>, body: &mut Map<String, Value>) {
    set(body, "firstName", v.optional_str("firstName"));
    set(body, "lastName", v.optional_str("lastName"));
    set(body, "email", v.optional_str("email"));
    set(body, "businessName", v.optional_str("businessName"));
    set(body, "locale", v.optional_str("locale"));
    set(body, "phoneNum", v.optional_str("phoneNum"));
    set(body, "phoneExt", v.optional_str("phoneExt"));
    set(body, "preferredCurrency", v.optional_str("preferredCurrency"));
    set(body, "taxExempt", v.optional_bool("taxExempt"));
}

async fn create_customer(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let first_name = v.require_str("firstName");
    let last_name = v.require_str("lastName");
    let email = v.require_str("email");
    let mut body = Map::new();
    body.insert("firstName".to_string(), json!(first_name));
    body.insert("lastName".to_string(), json!(last_name));
    body.insert("email".to_string(), json!(email));
    set(&mut body, "businessName", v.optional_str("businessName"));
    set(&mut body, "locale", v.optional_str("locale"));
    set(&mut body, "phoneNum", v.optional_str("phoneNum"));
    set(&mut body, "phoneExt", v.optional_str("phoneExt"));
    set(
        &mut body,
        "preferredCurrency",
        v.optional_str("preferredCurrency"),
    );
    set(&mut body, "taxExempt", v.optional_bool("taxExempt"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::create_customer(client.as_ref(), body).await)
}

async fn update_customer(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let mut body = Map::new();
    customer_fields(&mut v, &mut body);
    set(&mut body, "status", v.optional_enum("status", CUSTOMER_STATUSES));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_customer(client.as_ref(), customer_id, body).await)
}

async fn delete_customer(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_customer(client.as_ref(), customer_id).await)
}

async fn get_customer_invoices(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::customer_invoices(
            client.as_ref(),
            customer_id,
            svc::PageParams {
                page_no,
                item_per_page,
                include,
            },
        )
        .await,
    )
}

async fn get_customer_subscriptions(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    let include = v.optional_str("include");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::customer_subscriptions(
            client.as_ref(),
            customer_id,
            svc::PageParams {
                page_no,
                item_per_page,
                include,
            },
        )
        .await,
    )
}

async fn get_customer_logs(client: Arc<dyn ApiTransport>, args: Map<String, Value>) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::customer_logs(client.as_ref(), customer_id, page_no, item_per_page).await)
}

async fn list_customer_addresses(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::list_customer_addresses(client.as_ref(), customer_id).await)
}

async fn get_customer_address(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let address_id = v.require_positive_i64("addressId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::get_customer_address(client.as_ref(), customer_id, address_id).await)
}

fn address_fields(v: &mut Validator<'_>, body: &mut Map<String, Value>) {
    set(body, "name", v.optional_str("name"));
    set(body, "contactName", v.optional_str("contactName"));
    set(body, "street1", v.optional_str("street1"));
    set(body, "street2", v.optional_str("street2"));
    set(body, "city", v.optional_str("city"));
    set(body, "state", v.optional_str("state"));
    set(body, "zip", v.optional_str("zip"));
    set(body, "countryId", v.optional_str("countryId"));
    set(body, "type", v.optional_enum("type", ADDRESS_TYPES));
    set(body, "company", v.optional_str("company"));
    set(body, "contactEmail", v.optional_str("contactEmail"));
    set(body, "contactPhone", v.optional_str("contactPhone"));
}

async fn create_customer_address(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let mut body = Map::new();
    body.insert("name".to_string(), json!(v.require_str("name")));
    body.insert("contactName".to_string(), json!(v.require_str("contactName")));
    body.insert("street1".to_string(), json!(v.require_str("street1")));
    body.insert("city".to_string(), json!(v.require_str("city")));
    body.insert("state".to_string(), json!(v.require_str("state")));
    body.insert("zip".to_string(), json!(v.require_str("zip")));
    body.insert("countryId".to_string(), json!(v.require_str("countryId")));
    body.insert("type".to_string(), json!(v.require_enum("type", ADDRESS_TYPES)));
    set(&mut body, "street2", v.optional_str("street2"));
    set(&mut body, "company", v.optional_str("company"));
    set(&mut body, "contactEmail", v.optional_str("contactEmail"));
    set(&mut body, "contactPhone", v.optional_str("contactPhone"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::create_customer_address(client.as_ref(), customer_id, body).await)
}

async fn update_customer_address(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let address_id = v.require_positive_i64("addressId");
    let mut body = Map::new();
    address_fields(&mut v, &mut body);
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::update_customer_address(client.as_ref(), customer_id, address_id, body).await)
}

async fn delete_customer_address(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let address_id = v.require_positive_i64("addressId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::delete_customer_address(client.as_ref(), customer_id, address_id).await)
}

async fn list_customer_payment_methods(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::list_customer_payment_methods(client.as_ref(), customer_id).await)
}

async fn get_customer_payment_method(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let payment_method_id = v.require_positive_i64("paymentMethodId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::get_customer_payment_method(client.as_ref(), customer_id, payment_method_id).await,
    )
}

/// Billing address for payment methods: countryId, street1, city, state, zip
/// required; street2 optional.
fn require_billing_address(v: &mut Validator<'_>, field: &str) -> Map<String, Value> {
    let Some(map) = v.optional_object(field) else {
        v.push(format!("{field}: {field} is required"));
        return Map::new();
    };
    let mut out = Map::new();
    for sub in ["countryId", "street1", "city", "state", "zip"] {
        match map.get(sub).and_then(Value::as_str) {
            Some(s) if !s.is_empty() => {
                out.insert(sub.to_string(), json!(s));
            }
            _ => v.push(format!("{field}.{sub}: {sub} is required")),
        }
    }
    if let Some(street2) = map.get("street2").and_then(Value::as_str) {
        out.insert("street2".to_string(), json!(street2));
    }
    out
}

async fn create_customer_payment_method(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let company_gateway_id = v.require_str("companyGatewayId");
    let method_type = v.require_enum("type", PAYMENT_METHOD_TYPES);
    let payment_nonce = v.require_str("paymentNonce");
    let billing = require_billing_address(&mut v, "billingAddress");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::create_customer_payment_method(
            client.as_ref(),
            customer_id,
            company_gateway_id,
            method_type,
            payment_nonce,
            &billing,
        )
        .await,
    )
}

async fn update_customer_payment_method(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let payment_method_id = v.require_positive_i64("paymentMethodId");
    let billing = require_billing_address(&mut v, "billingAddress");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::update_customer_payment_method(
            client.as_ref(),
            customer_id,
            payment_method_id,
            Value::Object(billing),
        )
        .await,
    )
}

async fn delete_customer_payment_method(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let payment_method_id = v.require_positive_i64("paymentMethodId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::delete_customer_payment_method(client.as_ref(), customer_id, payment_method_id).await,
    )
}

async fn list_customer_charges_credits(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let status = v.optional_str("status");
    let charge_type = v.optional_enum("type", CHARGE_CREDIT_TYPES);
    let include = v.optional_str("include");
    let page_no = v.optional_i64("pageNo");
    let item_per_page = v.optional_i64("itemPerPage");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::list_customer_charges_credits(
            client.as_ref(),
            customer_id,
            svc::ListChargesCreditsParams {
                status,
                charge_type,
                include,
                page_no,
                item_per_page,
            },
        )
        .await,
    )
}

async fn create_customer_charge_credit(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let amount = v.require_cents("amount");
    let charge_type = v.require_enum("type", CHARGE_CREDIT_TYPES);
    let company_currency_id = v.require_positive_i64("companyCurrencyId");
    let category = v.require_enum("category", CATEGORIES);
    let mut body = Map::new();
    body.insert("amount".to_string(), json!(amount));
    body.insert("type".to_string(), json!(charge_type));
    body.insert("companyCurrencyId".to_string(), json!(company_currency_id));
    body.insert("category".to_string(), json!(category));
    set(&mut body, "description", v.optional_str("description"));
    if let Some(qty) = v.optional_i64("qty") {
        if qty < 1 {
            v.push("qty: must be a positive integer");
        } else {
            body.insert("qty".to_string(), json!(qty));
        }
    }
    set(&mut body, "isFreeShipping", v.optional_bool("isFreeShipping"));
    set(&mut body, "taxable", v.optional_bool("taxable"));
    set(&mut body, "weight", v.optional_f64("weight"));
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(svc::create_customer_charge_credit(client.as_ref(), customer_id, body).await)
}

async fn delete_customer_charge_credit(
    client: Arc<dyn ApiTransport>,
    args: Map<String, Value>,
) -> ToolResult {
    let mut v = Validator::new(&args);
    let customer_id = v.require_positive_i64("customerId");
    let charge_credit_id = v.require_positive_i64("chargeCreditId");
    if let Some(message) = v.into_error() {
        return ToolResult::error(message);
    }
    run_service(
        svc::delete_customer_charge_credit(client.as_ref(), customer_id, charge_credit_id).await,
    )
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
    async fn create_customer_aggregates_missing_fields() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_customer(fake.clone(), args(json!({"firstName": "Ada"}))).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "lastName: lastName is required; email: email is required"
        );
        assert!(fake.calls().is_empty(), "no request on validation failure");
    }

    #[tokio::test]
    async fn update_customer_rejects_bad_status() {
        let fake = Arc::new(FakeTransport::new());
        let result = update_customer(
            fake.clone(),
            args(json!({"customerId": 3, "status": "frozen"})),
        )
        .await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "status: must be one of active, disabled, archived"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn get_customer_success_pretty_prints() {
        let fake = Arc::new(FakeTransport::replying(json!({"id": 42, "email": "a@b.c"})));
        let result = get_customer(
            fake.clone(),
            args(json!({"customerId": 42, "includeAddresses": true})),
        )
        .await;
        assert!(!result.is_error());
        assert!(result.first_text().contains("\"id\": 42"));
        assert_eq!(
            fake.single_call().path,
            "/customers/42?include=addressbook"
        );
    }

    #[tokio::test]
    async fn transport_failure_is_wrapped() {
        let fake = Arc::new(FakeTransport::failing(404, "Not Found", "{\"error\":\"missing\"}"));
        let result = get_customer(fake.clone(), args(json!({"customerId": 1}))).await;
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "Error: Rebillia API error (404 Not Found): {\"error\":\"missing\"}"
        );
    }

    #[tokio::test]
    async fn payment_method_requires_billing_fields() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_customer_payment_method(
            fake.clone(),
            args(json!({
                "customerId": 1,
                "companyGatewayId": "2",
                "type": "card",
                "paymentNonce": "n",
                "billingAddress": {"countryId": "US"}
            })),
        )
        .await;
        assert!(result.is_error());
        let text = result.first_text();
        assert!(text.contains("billingAddress.street1: street1 is required"));
        assert!(text.contains("billingAddress.zip: zip is required"));
    }

    #[tokio::test]
    async fn charge_credit_happy_path_posts_body() {
        let fake = Arc::new(FakeTransport::new());
        let result = create_customer_charge_credit(
            fake.clone(),
            args(json!({
                "customerId": 5,
                "amount": 1000,
                "type": "charge",
                "companyCurrencyId": 1,
                "category": "digital"
            })),
        )
        .await;
        assert!(!result.is_error());
        let call = fake.single_call();
        assert_eq!(call.path, "/customers/5/charges_credits");
        let body = call.body.unwrap();
        assert_eq!(body["amount"], 1000);
        assert_eq!(body["qty"], 1);
    }
}
