//! Sort specifications and the comparator factory
//!
//! Every comparator built here is a strict total order: records whose sort
//! values are equal fall back to ascending `id`, whatever the direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::AppRecord;

/// Field a listing is sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Record identifier
    #[default]
    Id,
    /// Price metric
    Price,
    /// Rating metric
    Rating,
    /// Download count
    Downloads,
    /// Review count
    Reviews,
    /// Category name
    Category,
    /// Any passthrough field, compared as an opaque JSON value
    Field(String),
}

impl SortKey {
    /// Wire name of the key.
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Id => "id",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
            SortKey::Downloads => "downloads",
            SortKey::Reviews => "reviews",
            SortKey::Category => "category",
            SortKey::Field(name) => name,
        }
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        match s {
            "id" => SortKey::Id,
            "price" => SortKey::Price,
            "rating" => SortKey::Rating,
            "downloads" => SortKey::Downloads,
            "reviews" => SortKey::Reviews,
            "category" => SortKey::Category,
            "" => SortKey::Id,
            other => SortKey::Field(other.to_string()),
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortKey::from(s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(SortKey::from(s.as_str()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortOrder {
    /// Wire name of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other} (expected asc or desc)")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key plus direction. Defaults to `id` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    #[serde(rename = "sortBy", default)]
    pub sort_by: SortKey,
    /// Direction
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    /// Build a spec from a key and direction.
    pub fn new(sort_by: impl Into<SortKey>, order: SortOrder) -> Self {
        SortSpec {
            sort_by: sort_by.into(),
            order,
        }
    }

    /// Build the comparator for this spec.
    pub fn comparator(&self) -> impl Fn(&AppRecord, &AppRecord) -> Ordering + '_ {
        move |a, b| compare_records(a, b, &self.sort_by, self.order)
    }

    /// Sort records in place with this spec.
    pub fn sort(&self, records: &mut [AppRecord]) {
        records.sort_by(self.comparator());
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sort_by, self.order)
    }
}

/// Build a comparator from a key and direction.
pub fn make_comparator(
    sort_by: SortKey,
    order: SortOrder,
) -> impl Fn(&AppRecord, &AppRecord) -> Ordering {
    move |a, b| compare_records(a, b, &sort_by, order)
}

/// Compare two records: primary key in the requested direction, then
/// ascending `id`.
pub fn compare_records(a: &AppRecord, b: &AppRecord, key: &SortKey, order: SortOrder) -> Ordering {
    let primary = compare_key(a, b, key);
    if primary == Ordering::Equal {
        return a.id.cmp(&b.id);
    }
    match order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    }
}

fn compare_key(a: &AppRecord, b: &AppRecord, key: &SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Price => compare_f64(a.price, b.price),
        SortKey::Rating => compare_f64(a.rating, b.rating),
        SortKey::Downloads => compare_f64(a.downloads, b.downloads),
        SortKey::Reviews => compare_f64(a.reviews, b.reviews),
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::Field(name) => compare_json(a.extra_field(name), b.extra_field(name)),
    }
}

// Normalized metrics are finite, so `partial_cmp` always answers; -0 and
// 0 compare equal.
fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Total order over optional JSON values used for passthrough sort keys:
/// missing/null < bool < number < string < array < object.
pub fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (ra, rb) = (json_rank(a), json_rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_f64(
            x.as_f64().unwrap_or(0.0),
            y.as_f64().unwrap_or(0.0),
        ),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x @ Value::Array(_)), Some(y @ Value::Array(_)))
        | (Some(x @ Value::Object(_)), Some(y @ Value::Object(_))) => {
            x.to_string().cmp(&y.to_string())
        }
        _ => Ordering::Equal,
    }
}

fn json_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// A sort choice offered by the listing screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortPreset {
    /// Label shown in the picker
    pub label: &'static str,
    /// Sort applied when picked
    pub spec: SortSpec,
}

/// The listing screen's sort presets, in picker order.
pub fn sort_presets() -> Vec<SortPreset> {
    vec![
        SortPreset {
            label: "Default",
            spec: SortSpec::new(SortKey::Id, SortOrder::Asc),
        },
        SortPreset {
            label: "Downloads (high to low)",
            spec: SortSpec::new(SortKey::Downloads, SortOrder::Desc),
        },
        SortPreset {
            label: "Rating (high to low)",
            spec: SortSpec::new(SortKey::Rating, SortOrder::Desc),
        },
    ]
}

/// Preset at `index`, or the default preset when out of range.
pub fn preset(index: usize) -> SortPreset {
    let mut presets = sort_presets();
    if index < presets.len() {
        presets.swap_remove(index)
    } else {
        presets.swap_remove(0)
    }
}

/// Index of the preset matching `spec` exactly, or `0`.
pub fn preset_index_for(spec: &SortSpec) -> usize {
    sort_presets()
        .iter()
        .position(|p| &p.spec == spec)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::normalize_all;
    use serde_json::json;

    fn ids(records: &[AppRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    fn sample() -> Vec<AppRecord> {
        normalize_all(&[
            json!({ "id": 4, "rating": 4.5, "downloads": 100 }),
            json!({ "id": 2, "rating": 3.0, "downloads": 900 }),
            json!({ "id": 3, "rating": 4.5, "downloads": 100 }),
            json!({ "id": 1, "rating": "2.5", "downloads": "50" }),
        ])
    }

    #[test]
    fn test_default_spec_is_id_ascending() {
        let mut records = sample();
        SortSpec::default().sort(&mut records);
        assert_eq!(ids(&records), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_desc_inverts_primary_only() {
        let mut records = sample();
        SortSpec::new(SortKey::Rating, SortOrder::Desc).sort(&mut records);
        // 3 and 4 tie on rating and stay in ascending id order
        assert_eq!(ids(&records), vec![3, 4, 2, 1]);
    }

    #[test]
    fn test_tie_break_is_ascending_id_in_both_directions() {
        let records = sample();
        let a = &records[0]; // id 4
        let b = &records[2]; // id 3
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let cmp = make_comparator(SortKey::Downloads, order);
            assert_eq!(cmp(b, a), Ordering::Less);
            assert_eq!(cmp(a, b), Ordering::Greater);
        }
    }

    #[test]
    fn test_sorting_twice_is_identical() {
        let spec = SortSpec::new("downloads", SortOrder::Desc);
        let mut first = sample();
        let mut second = sample();
        second.reverse();
        spec.sort(&mut first);
        spec.sort(&mut second);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_opaque_field_ordering() {
        let mut records = normalize_all(&[
            json!({ "id": 1, "name": "Zed" }),
            json!({ "id": 2 }),
            json!({ "id": 3, "name": "Atlas" }),
            json!({ "id": 4, "name": 12 }),
        ]);
        SortSpec::new("name", SortOrder::Asc).sort(&mut records);
        assert_eq!(ids(&records), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::from("downloads"), SortKey::Downloads);
        assert_eq!(SortKey::from(""), SortKey::Id);
        assert_eq!(
            SortKey::from("publishedAt"),
            SortKey::Field("publishedAt".to_string())
        );
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        // Matching is exact, like the serde form
        assert!("DESC".parse::<SortOrder>().is_err());
        assert!("Asc".parse::<SortOrder>().is_err());
        assert!("down".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_sort_spec_deserializes_with_defaults() {
        let spec: SortSpec = serde_json::from_value(json!({ "sortBy": "rating" })).unwrap();
        assert_eq!(spec, SortSpec::new(SortKey::Rating, SortOrder::Asc));

        let spec: SortSpec = serde_json::from_value(json!({})).unwrap();
        assert_eq!(spec, SortSpec::default());
    }

    #[test]
    fn test_preset_lookup_falls_back_to_default() {
        assert_eq!(preset(1).spec, SortSpec::new(SortKey::Downloads, SortOrder::Desc));
        assert_eq!(preset(42).spec, SortSpec::default());
    }

    #[test]
    fn test_preset_index_for_spec() {
        assert_eq!(
            preset_index_for(&SortSpec::new(SortKey::Rating, SortOrder::Desc)),
            2
        );
        assert_eq!(
            preset_index_for(&SortSpec::new(SortKey::Rating, SortOrder::Asc)),
            0
        );
    }
}
