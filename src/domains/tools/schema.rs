//! Argument validation for tool handlers.
//!
//! Tool arguments arrive as a loose JSON object. [`Validator`] walks that
//! object with typed accessors, collecting every violation instead of
//! stopping at the first, so the caller gets one complete error message.
//! Violations are qualified with the field path (`billingAddress.city: ...`).
//!
//! Required accessors return a dummy value (empty string, zero) when the
//! field is missing or malformed; they always record a violation first, and
//! handlers check [`Validator::into_error`] before acting, so the dummy is
//! never observable.
//!
//! `null` is treated the same as an absent field throughout.

use serde_json::{Map, Value};

const EMPTY_ITEMS: &[Value] = &[];

/// Collects field violations while extracting typed values.
pub struct Validator<'a> {
    args: &'a Map<String, Value>,
    violations: Vec<String>,
}

impl<'a> Validator<'a> {
    pub fn new(args: &'a Map<String, Value>) -> Self {
        Self {
            args,
            violations: Vec::new(),
        }
    }

    /// Record a violation that the typed accessors cannot express.
    pub fn push(&mut self, message: impl Into<String>) {
        self.violations.push(message.into());
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        match self.args.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn missing(&mut self, field: &str) {
        self.violations.push(format!("{field}: {field} is required"));
    }

    pub fn require_str(&mut self, field: &str) -> &'a str {
        match self.present(field) {
            None => {
                self.missing(field);
                ""
            }
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::String(_)) => {
                self.missing(field);
                ""
            }
            Some(_) => {
                self.push(format!("{field}: must be a string"));
                ""
            }
        }
    }

    pub fn optional_str(&mut self, field: &str) -> Option<&'a str> {
        match self.present(field) {
            None => None,
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                self.push(format!("{field}: must be a string"));
                None
            }
        }
    }

    /// Optional string with an upstream-enforced maximum length.
    pub fn optional_str_max(&mut self, field: &str, max: usize) -> Option<&'a str> {
        let value = self.optional_str(field)?;
        if value.chars().count() > max {
            self.push(format!("{field}: must be at most {max} characters"));
            return None;
        }
        Some(value)
    }

    pub fn require_i64(&mut self, field: &str) -> i64 {
        match self.present(field) {
            None => {
                self.missing(field);
                0
            }
            Some(value) => match value.as_i64() {
                Some(n) => n,
                None => {
                    self.push(format!("{field}: must be an integer"));
                    0
                }
            },
        }
    }

    /// Required positive integer, the usual shape of upstream identifiers.
    pub fn require_positive_i64(&mut self, field: &str) -> i64 {
        match self.present(field) {
            None => {
                self.missing(field);
                0
            }
            Some(value) => match value.as_i64() {
                Some(n) if n > 0 => n,
                Some(_) => {
                    self.push(format!("{field}: must be a positive integer"));
                    0
                }
                None => {
                    self.push(format!("{field}: must be an integer"));
                    0
                }
            },
        }
    }

    pub fn optional_i64(&mut self, field: &str) -> Option<i64> {
        match self.present(field) {
            None => None,
            Some(value) => match value.as_i64() {
                Some(n) => Some(n),
                None => {
                    self.push(format!("{field}: must be an integer"));
                    None
                }
            },
        }
    }

    /// Optional integer constrained to `min..=max`.
    pub fn optional_i64_range(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let n = self.optional_i64(field)?;
        if n < min || n > max {
            self.push(format!("{field}: must be between {min} and {max}"));
            return None;
        }
        Some(n)
    }

    /// Optional non-negative integer amount in cents.
    pub fn optional_cents(&mut self, field: &str) -> Option<i64> {
        let n = self.optional_i64(field)?;
        if n < 0 {
            self.push(format!("{field}: must be a non-negative integer (cents)"));
            return None;
        }
        Some(n)
    }

    /// Required positive integer amount in cents.
    pub fn require_cents(&mut self, field: &str) -> i64 {
        match self.present(field) {
            None => {
                self.missing(field);
                0
            }
            Some(value) => match value.as_i64() {
                Some(n) if n > 0 => n,
                _ => {
                    self.push(format!("{field}: must be a positive integer (cents)"));
                    0
                }
            },
        }
    }

    pub fn optional_f64(&mut self, field: &str) -> Option<f64> {
        match self.present(field) {
            None => None,
            Some(value) => match value.as_f64() {
                Some(n) => Some(n),
                None => {
                    self.push(format!("{field}: must be a number"));
                    None
                }
            },
        }
    }

    pub fn require_f64(&mut self, field: &str) -> f64 {
        match self.present(field) {
            None => {
                self.missing(field);
                0.0
            }
            Some(value) => match value.as_f64() {
                Some(n) => n,
                None => {
                    self.push(format!("{field}: must be a number"));
                    0.0
                }
            },
        }
    }

    pub fn require_bool(&mut self, field: &str) -> bool {
        match self.present(field) {
            None => {
                self.missing(field);
                false
            }
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.push(format!("{field}: must be a boolean"));
                false
            }
        }
    }

    pub fn optional_bool(&mut self, field: &str) -> Option<bool> {
        match self.present(field) {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => {
                self.push(format!("{field}: must be a boolean"));
                None
            }
        }
    }

    /// Required string restricted to a closed set; the violation names the
    /// legal values.
    pub fn require_enum(&mut self, field: &str, allowed: &[&str]) -> &'a str {
        let value = self.require_str(field);
        if value.is_empty() || allowed.contains(&value) {
            value
        } else {
            self.push(format!("{field}: must be one of {}", allowed.join(", ")));
            ""
        }
    }

    pub fn optional_enum(&mut self, field: &str, allowed: &[&str]) -> Option<&'a str> {
        let value = self.optional_str(field)?;
        if allowed.contains(&value) {
            Some(value)
        } else {
            self.push(format!("{field}: must be one of {}", allowed.join(", ")));
            None
        }
    }

    pub fn require_array(&mut self, field: &str) -> &'a [Value] {
        match self.present(field) {
            None => {
                self.missing(field);
                EMPTY_ITEMS
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.push(format!("{field}: must be an array"));
                EMPTY_ITEMS
            }
        }
    }

    /// Required array with at least one element.
    pub fn require_non_empty_array(&mut self, field: &str) -> &'a [Value] {
        match self.present(field) {
            None => {
                self.missing(field);
                EMPTY_ITEMS
            }
            Some(Value::Array(items)) if !items.is_empty() => items,
            Some(Value::Array(_)) => {
                self.push(format!("{field}: must have at least one item"));
                EMPTY_ITEMS
            }
            Some(_) => {
                self.push(format!("{field}: must be an array"));
                EMPTY_ITEMS
            }
        }
    }

    pub fn optional_array(&mut self, field: &str) -> Option<&'a [Value]> {
        match self.present(field) {
            None => None,
            Some(Value::Array(items)) => Some(items),
            Some(_) => {
                self.push(format!("{field}: must be an array"));
                None
            }
        }
    }

    pub fn optional_object(&mut self, field: &str) -> Option<&'a Map<String, Value>> {
        match self.present(field) {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                self.push(format!("{field}: must be an object"));
                None
            }
        }
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<String> {
        self.violations
    }

    /// Collapse collected violations into a single message, or `None` when
    /// validation passed.
    pub fn into_error(self) -> Option<String> {
        if self.violations.is_empty() {
            None
        } else {
            Some(self.violations.join("; "))
        }
    }
}

/// Required fields of a postal address.
const ADDRESS_REQUIRED: &[&str] = &["contactName", "street1", "city", "zip", "countryId"];

/// Optional address fields copied through when present.
const ADDRESS_OPTIONAL: &[&str] = &[
    "street2",
    "state",
    "contactEmail",
    "contactPhone",
    "contactCompany",
];

pub const ADDRESS_TYPES: &[&str] = &["residential", "commercial"];

/// Validate an optional address argument.
///
/// An absent field or an empty object `{}` counts as "not provided" and
/// yields `None` without violations. A partial address fails with one
/// violation per missing required sub-field, qualified as `{field}.{sub}`.
pub fn optional_address(v: &mut Validator<'_>, field: &str) -> Option<Value> {
    let map = v.optional_object(field)?;
    if map.is_empty() {
        return None;
    }

    let mut address = Map::new();
    let mut complete = true;
    for sub in ADDRESS_REQUIRED {
        match map.get(*sub).and_then(Value::as_str) {
            Some(s) if !s.is_empty() => {
                address.insert((*sub).to_string(), Value::String(s.to_string()));
            }
            _ => {
                v.push(format!("{field}.{sub}: {sub} is required"));
                complete = false;
            }
        }
    }
    match map.get("type").and_then(Value::as_str) {
        Some(t) if ADDRESS_TYPES.contains(&t) => {
            address.insert("type".to_string(), Value::String(t.to_string()));
        }
        _ => {
            v.push(format!(
                "{field}.type: must be one of {}",
                ADDRESS_TYPES.join(", ")
            ));
            complete = false;
        }
    }
    for sub in ADDRESS_OPTIONAL {
        if let Some(value) = map.get(*sub) {
            if !value.is_null() {
                address.insert((*sub).to_string(), value.clone());
            }
        }
    }

    complete.then_some(Value::Object(address))
}

/// Format an integer cents amount as a two-decimal dollar string.
pub fn cents_to_dollars(cents: i64) -> String {
    format!("{:.2}", cents as f64 / 100.0)
}

/// Validate one invoice line item and normalize its `amount`.
///
/// `amount` is accepted either as a decimal string (passed through verbatim)
/// or an integer number of cents (converted to a two-decimal string).
pub fn detail_item(v: &mut Validator<'_>, item: &Value, path: &str) -> Option<Value> {
    let Some(map) = item.as_object() else {
        v.push(format!("{path}: must be an object"));
        return None;
    };

    let mut out = Map::new();
    match map.get("amount") {
        Some(Value::String(s)) if !s.is_empty() => {
            out.insert("amount".to_string(), Value::String(s.clone()));
        }
        Some(Value::Number(n)) if n.as_i64().is_some_and(|c| c >= 0) => {
            let cents = n.as_i64().unwrap_or(0);
            out.insert("amount".to_string(), Value::String(cents_to_dollars(cents)));
        }
        _ => {
            v.push(format!(
                "{path}.amount: must be a non-empty string (e.g. '20.00') or a non-negative integer in cents"
            ));
            return None;
        }
    }

    if let Some(description) = map.get("description").and_then(Value::as_str) {
        if description.chars().count() > 255 {
            v.push(format!("{path}.description: must be at most 255 characters"));
            return None;
        }
        out.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }
    if let Some(qty) = map.get("qty") {
        if !qty.is_null() {
            match qty.as_i64() {
                Some(n) if n >= 1 => {
                    out.insert("qty".to_string(), Value::from(n));
                }
                _ => {
                    v.push(format!("{path}.qty: must be a positive integer"));
                    return None;
                }
            }
        }
    }

    Some(Value::Object(out))
}

/// Validate a required charge-tier array. Each tier needs `currency` and an
/// integer `price`; startingUnit/endingUnit/tier/priceFormat pass through
/// when present. Returns an empty vec when anything failed.
pub fn require_charge_tiers(v: &mut Validator<'_>, field: &str) -> Vec<Value> {
    let items = v.require_non_empty_array(field);
    let mut tiers = Vec::with_capacity(items.len());
    let mut complete = true;

    for (i, item) in items.iter().enumerate() {
        let Some(map) = item.as_object() else {
            v.push(format!("{field}.{i}: must be an object"));
            complete = false;
            continue;
        };
        let mut tier = Map::new();
        match map.get("currency").and_then(Value::as_str) {
            Some(c) if !c.is_empty() => {
                tier.insert("currency".to_string(), Value::String(c.to_string()));
            }
            _ => {
                v.push(format!("{field}.{i}.currency: currency is required"));
                complete = false;
            }
        }
        match map.get("price").and_then(Value::as_i64) {
            Some(price) => {
                tier.insert("price".to_string(), Value::from(price));
            }
            None => {
                v.push(format!("{field}.{i}.price: must be an integer (cents)"));
                complete = false;
            }
        }
        for sub in ["startingUnit", "endingUnit", "tier"] {
            if let Some(value) = map.get(sub) {
                if !value.is_null() {
                    match value.as_i64() {
                        Some(n) => {
                            tier.insert(sub.to_string(), Value::from(n));
                        }
                        None => {
                            v.push(format!("{field}.{i}.{sub}: must be an integer"));
                            complete = false;
                        }
                    }
                }
            }
        }
        if let Some(format) = map.get("priceFormat").and_then(Value::as_str) {
            tier.insert("priceFormat".to_string(), Value::String(format.to_string()));
        }
        tiers.push(Value::Object(tier));
    }

    if complete { tiers } else { Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn aggregates_all_violations() {
        let args = args(json!({"firstName": "Ada"}));
        let mut v = Validator::new(&args);
        v.require_str("firstName");
        v.require_str("lastName");
        v.require_str("email");
        let message = v.into_error().unwrap();
        assert_eq!(
            message,
            "lastName: lastName is required; email: email is required"
        );
    }

    #[test]
    fn null_is_treated_as_absent() {
        let args = args(json!({"email": null}));
        let mut v = Validator::new(&args);
        assert!(v.optional_str("email").is_none());
        assert!(v.into_error().is_none());

        let args2 = self::args(json!({"email": null}));
        let mut v2 = Validator::new(&args2);
        v2.require_str("email");
        assert_eq!(v2.into_error().unwrap(), "email: email is required");
    }

    #[test]
    fn enum_violation_names_legal_values() {
        let args = args(json!({"status": "frozen"}));
        let mut v = Validator::new(&args);
        v.require_enum("status", &["active", "disabled", "archived"]);
        assert_eq!(
            v.into_error().unwrap(),
            "status: must be one of active, disabled, archived"
        );
    }

    #[test]
    fn valid_enum_passes() {
        let args = args(json!({"status": "active"}));
        let mut v = Validator::new(&args);
        let status = v.require_enum("status", &["active", "disabled", "archived"]);
        assert_eq!(status, "active");
        assert!(v.into_error().is_none());
    }

    #[test]
    fn string_max_length_enforced() {
        let args = args(json!({"customerEmail": "x".repeat(46)}));
        let mut v = Validator::new(&args);
        v.optional_str_max("customerEmail", 45);
        assert_eq!(
            v.into_error().unwrap(),
            "customerEmail: must be at most 45 characters"
        );
    }

    #[test]
    fn positive_integer_rejects_zero() {
        let args = args(json!({"customerId": 0}));
        let mut v = Validator::new(&args);
        v.require_positive_i64("customerId");
        assert_eq!(
            v.into_error().unwrap(),
            "customerId: must be a positive integer"
        );
    }

    #[test]
    fn empty_address_object_is_elided() {
        let args = args(json!({"billingAddress": {}}));
        let mut v = Validator::new(&args);
        assert!(optional_address(&mut v, "billingAddress").is_none());
        assert!(v.into_error().is_none());
    }

    #[test]
    fn partial_address_names_missing_fields() {
        let args = args(json!({"billingAddress": {"street1": "1 Main St", "type": "residential"}}));
        let mut v = Validator::new(&args);
        assert!(optional_address(&mut v, "billingAddress").is_none());
        let message = v.into_error().unwrap();
        assert!(message.contains("billingAddress.contactName: contactName is required"));
        assert!(message.contains("billingAddress.city: city is required"));
        assert!(message.contains("billingAddress.zip: zip is required"));
        assert!(message.contains("billingAddress.countryId: countryId is required"));
        assert!(!message.contains("street1"));
    }

    #[test]
    fn complete_address_passes_through() {
        let args = args(json!({"shippingAddress": {
            "contactName": "Ada Lovelace",
            "street1": "1 Main St",
            "street2": "Apt 4",
            "city": "Springfield",
            "zip": "12345",
            "countryId": "US",
            "type": "commercial"
        }}));
        let mut v = Validator::new(&args);
        let address = optional_address(&mut v, "shippingAddress").unwrap();
        assert!(v.into_error().is_none());
        assert_eq!(address["type"], "commercial");
        assert_eq!(address["street2"], "Apt 4");
    }

    #[test]
    fn cents_format_to_two_decimals() {
        assert_eq!(cents_to_dollars(3000), "30.00");
        assert_eq!(cents_to_dollars(1999), "19.99");
        assert_eq!(cents_to_dollars(5), "0.05");
        assert_eq!(cents_to_dollars(0), "0.00");
    }

    #[test]
    fn detail_amount_string_passes_through() {
        let args = args(json!({}));
        let mut v = Validator::new(&args);
        let item = detail_item(&mut v, &json!({"amount": "20.00"}), "detail.0").unwrap();
        assert_eq!(item["amount"], "20.00");
    }

    #[test]
    fn detail_amount_cents_converted() {
        let args = args(json!({}));
        let mut v = Validator::new(&args);
        let item = detail_item(&mut v, &json!({"amount": 3000, "qty": 2}), "detail.0").unwrap();
        assert_eq!(item["amount"], "30.00");
        assert_eq!(item["qty"], 2);
    }

    #[test]
    fn charge_tier_requires_currency_and_price() {
        let args = args(json!({"chargeTier": [{"price": 500}]}));
        let mut v = Validator::new(&args);
        assert!(require_charge_tiers(&mut v, "chargeTier").is_empty());
        assert_eq!(
            v.into_error().unwrap(),
            "chargeTier.0.currency: currency is required"
        );
    }

    #[test]
    fn empty_charge_tier_array_rejected() {
        let args = args(json!({"chargeTier": []}));
        let mut v = Validator::new(&args);
        require_charge_tiers(&mut v, "chargeTier");
        assert_eq!(
            v.into_error().unwrap(),
            "chargeTier: must have at least one item"
        );
    }

    #[test]
    fn valid_charge_tiers_preserved() {
        let args = args(json!({"chargeTier": [
            {"currency": "USD", "price": 500, "startingUnit": 1, "endingUnit": 10},
            {"currency": "USD", "price": 400, "priceFormat": "flat"}
        ]}));
        let mut v = Validator::new(&args);
        let tiers = require_charge_tiers(&mut v, "chargeTier");
        assert!(v.into_error().is_none());
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0]["endingUnit"], 10);
        assert_eq!(tiers[1]["priceFormat"], "flat");
    }
}
