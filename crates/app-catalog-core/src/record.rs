//! App records and the lenient normalizer
//!
//! Raw records come from fixtures or the catalog service as loosely-typed
//! JSON. `AppRecord::normalize` turns one into a well-formed record whose
//! metrics are always finite numbers, keeping every unknown field as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names of the numeric metrics the normalizer coerces.
pub const METRIC_FIELDS: [&str; 4] = ["price", "rating", "downloads", "reviews"];

/// A normalized catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppRecord {
    /// Stable identifier, default sort key and universal tie-break
    pub id: i64,
    /// Classification used by the category filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Price, `0` when absent or malformed
    #[serde(default)]
    pub price: f64,
    /// Average rating, `0` when absent or malformed
    #[serde(default)]
    pub rating: f64,
    /// Download count, `0` when absent or malformed
    #[serde(default)]
    pub downloads: f64,
    /// Review count, `0` when absent or malformed
    #[serde(default)]
    pub reviews: f64,
    /// Every other field of the raw record, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppRecord {
    /// Normalize one raw record. The input is not modified and no input
    /// is rejected: anything that does not coerce to a finite number
    /// becomes `0`.
    pub fn normalize(raw: &Value) -> Self {
        let mut extra = match raw {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        let id = coerce_number(extra.remove("id").as_ref()) as i64;
        let price = coerce_number(extra.remove("price").as_ref());
        let rating = coerce_number(extra.remove("rating").as_ref());
        let downloads = coerce_number(extra.remove("downloads").as_ref());
        let reviews = coerce_number(extra.remove("reviews").as_ref());

        // A non-string category stays in `extra` so nothing is lost.
        let category = match extra.get("category") {
            Some(Value::String(_)) => match extra.remove("category") {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
            _ => None,
        };

        AppRecord {
            id,
            category,
            price,
            rating,
            downloads,
            reviews,
            extra,
        }
    }

    /// Look up a passthrough field by name.
    pub fn extra_field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Display name, when the record carries one.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}

/// Normalize a whole collection, preserving order.
pub fn normalize_all(raw: &[Value]) -> Vec<AppRecord> {
    raw.iter().map(AppRecord::normalize).collect()
}

/// Coerce a loosely-typed JSON value to a finite number.
///
/// Missing, `null`, `false`, `0`, `""`, containers and unparsable strings
/// give `0`. `true` gives `1`. Strings are trimmed and accept decimal,
/// exponent and `0x`/`0o`/`0b` forms.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_numeric_str(s),
        Some(Value::Array(_)) | Some(Value::Object(_)) => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn parse_numeric_str(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(0.0);
    }

    // Rust also accepts "inf"/"nan" spellings; the finiteness check in
    // `coerce_number` folds those to zero.
    s.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metric_of(value: Value) -> f64 {
        let raw = json!({ "id": 1, "price": value });
        AppRecord::normalize(&raw).price
    }

    #[test]
    fn test_missing_metrics_default_to_zero() {
        let rec = AppRecord::normalize(&json!({ "id": 4 }));
        assert_eq!(rec.price, 0.0);
        assert_eq!(rec.rating, 0.0);
        assert_eq!(rec.downloads, 0.0);
        assert_eq!(rec.reviews, 0.0);
    }

    #[test]
    fn test_lenient_metric_table() {
        assert_eq!(metric_of(Value::Null), 0.0);
        assert_eq!(metric_of(json!("")), 0.0);
        assert_eq!(metric_of(json!("abc")), 0.0);
        assert_eq!(metric_of(json!(0)), 0.0);
        assert_eq!(metric_of(json!("5")), 5.0);
        assert_eq!(metric_of(json!(5)), 5.0);
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(metric_of(json!("  4.5 ")), 4.5);
        assert_eq!(metric_of(json!("1e3")), 1000.0);
        assert_eq!(metric_of(json!("0x1A")), 26.0);
        assert_eq!(metric_of(json!("0b101")), 5.0);
        assert_eq!(metric_of(json!("Infinity")), 0.0);
        assert_eq!(metric_of(json!("NaN")), 0.0);
        assert_eq!(metric_of(json!("12abc")), 0.0);
    }

    #[test]
    fn test_bool_and_container_values() {
        assert_eq!(metric_of(json!(true)), 1.0);
        assert_eq!(metric_of(json!(false)), 0.0);
        assert_eq!(metric_of(json!([])), 0.0);
        assert_eq!(metric_of(json!({ "v": 3 })), 0.0);
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let raw = json!({
            "id": 9,
            "name": "Notes",
            "author": "acme",
            "category": "tools",
            "downloads": "120",
        });
        let rec = AppRecord::normalize(&raw);

        assert_eq!(rec.id, 9);
        assert_eq!(rec.category.as_deref(), Some("tools"));
        assert_eq!(rec.downloads, 120.0);
        assert_eq!(rec.name(), Some("Notes"));
        assert_eq!(rec.extra_field("author"), Some(&json!("acme")));
        assert!(!rec.extra.contains_key("downloads"));
    }

    #[test]
    fn test_original_is_untouched() {
        let raw = json!({ "id": 2, "rating": "4.1" });
        let before = raw.clone();
        let _ = AppRecord::normalize(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_non_string_category_is_kept_as_extra() {
        let rec = AppRecord::normalize(&json!({ "id": 1, "category": 7 }));
        assert_eq!(rec.category, None);
        assert_eq!(rec.extra_field("category"), Some(&json!(7)));
    }

    #[test]
    fn test_non_object_record_normalizes_to_defaults() {
        let rec = AppRecord::normalize(&json!("garbage"));
        assert_eq!(rec.id, 0);
        assert!(rec.extra.is_empty());
    }

    #[test]
    fn test_serialize_flattens_extra_fields() {
        let rec = AppRecord::normalize(&json!({ "id": 3, "name": "Maps", "price": "1.5" }));
        let out = serde_json::to_value(&rec).unwrap();
        assert_eq!(out["id"], json!(3));
        assert_eq!(out["name"], json!("Maps"));
        assert_eq!(out["price"], json!(1.5));
        assert!(out.get("category").is_none());
    }
}
