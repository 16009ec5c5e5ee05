/// Firestore REST wire types — serde shapes for the `:runQuery` and document
/// endpoints. These map to our clean domain types via the mapping functions
/// in client.rs.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Query responses
// ---------------------------------------------------------------------------

/// `:runQuery` returns a JSON array with one entry per matched document.
/// Entries without a `document` only carry a read time and are skipped.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct QueryRow {
    pub document: Option<Document>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name:
    /// `projects/{p}/databases/(default)/documents/{collection}/{id}`
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

impl Document {
    /// Last segment of the resource name — the document id.
    pub fn doc_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn int_field(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    pub fn timestamp_field(&self, key: &str) -> Option<DateTime<Utc>> {
        self.fields.get(key).and_then(Value::as_datetime)
    }

    pub fn map_field(&self, key: &str) -> Option<&HashMap<String, Value>> {
        self.fields.get(key).and_then(Value::as_map)
    }
}

/// A Firestore field value. Exactly one variant field is set; the rest stay
/// None and are omitted when serializing query filters.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    /// Firestore encodes int64 as a JSON string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_value: Option<MapValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_value: Option<ArrayValue>,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self { string_value: Some(s.into()), ..Default::default() }
    }

    pub fn integer(n: i64) -> Self {
        Self { integer_value: Some(n.to_string()), ..Default::default() }
    }

    pub fn boolean(b: bool) -> Self {
        Self { boolean_value: Some(b), ..Default::default() }
    }

    pub fn timestamp(t: DateTime<Utc>) -> Self {
        Self { timestamp_value: Some(t.to_rfc3339()), ..Default::default() }
    }

    pub fn map(fields: HashMap<String, Value>) -> Self {
        Self { map_value: Some(MapValue { fields }), ..Default::default() }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.integer_value.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.boolean_value
    }

    /// `toDate()`-style accessor: RFC 3339 timestamp string → UTC datetime.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.timestamp_value
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        self.map_value.as_ref().map(|m| &m.fields)
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ArrayValue {
    pub values: Option<Vec<Value>>,
}

// ---------------------------------------------------------------------------
// Query requests (structuredQuery)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl StructuredQuery {
    pub fn collection(id: impl Into<String>) -> Self {
        Self {
            from: vec![CollectionSelector { collection_id: id.into() }],
            ..Default::default()
        }
    }

    /// Add an equality filter. Repeated calls combine into an AND composite.
    pub fn where_eq(mut self, path: &str, value: Value) -> Self {
        let next = Filter::eq(path, value);
        self.filter = Some(match self.filter.take() {
            None => next,
            Some(prev) => Filter::and(prev, next),
        });
        self
    }

    pub fn order_by(mut self, path: &str, direction: Direction) -> Self {
        self.order_by.push(Order {
            field: FieldReference { field_path: path.into() },
            direction,
        });
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct CollectionSelector {
    #[serde(rename = "collectionId")]
    pub collection_id: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_filter: Option<FieldFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_filter: Option<CompositeFilter>,
}

impl Filter {
    pub fn eq(path: &str, value: Value) -> Self {
        Self {
            field_filter: Some(FieldFilter {
                field: FieldReference { field_path: path.into() },
                op: "EQUAL".into(),
                value,
            }),
            composite_filter: None,
        }
    }

    /// AND-combine two filters, flattening nested AND composites.
    pub fn and(a: Filter, b: Filter) -> Self {
        let mut filters = Vec::new();
        for filter in [a, b] {
            match filter {
                Filter { composite_filter: Some(composite), .. } => {
                    filters.extend(composite.filters);
                }
                other => filters.push(other),
            }
        }
        Self {
            field_filter: None,
            composite_filter: Some(CompositeFilter { op: "AND".into(), filters }),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: String,
    pub value: Value,
}

#[derive(Debug, Serialize, Clone)]
pub struct CompositeFilter {
    pub op: String,
    pub filters: Vec<Filter>,
}

#[derive(Debug, Serialize, Clone)]
pub struct FieldReference {
    #[serde(rename = "fieldPath")]
    pub field_path: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct Order {
    pub field: FieldReference,
    pub direction: Direction,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Ascending,
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn doc_id_is_last_path_segment() {
        let doc = Document {
            name: "projects/p/databases/(default)/documents/fixtures/fx-001".into(),
            ..Default::default()
        };
        assert_eq!(doc.doc_id(), "fx-001");
    }

    #[test]
    fn integer_values_arrive_as_strings() {
        let value = Value { integer_value: Some("42".into()), ..Default::default() };
        assert_eq!(value.as_i64(), Some(42));
        assert_eq!(Value::integer(7).integer_value.as_deref(), Some("7"));
    }

    #[test]
    fn timestamp_accessor_parses_rfc3339() {
        let value = Value {
            timestamp_value: Some("2025-03-01T15:00:00Z".into()),
            ..Default::default()
        };
        let dt = value.as_datetime().expect("timestamp should parse");
        assert_eq!(dt.to_rfc3339(), "2025-03-01T15:00:00+00:00");

        let garbage = Value { timestamp_value: Some("yesterday".into()), ..Default::default() };
        assert!(garbage.as_datetime().is_none());
    }

    #[test]
    fn query_rows_deserialize_and_skip_documentless_entries() {
        let body = json!([
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/leagues/prem",
                    "fields": {
                        "name": { "stringValue": "Premier Division" },
                        "division": { "integerValue": "1" },
                        "active": { "booleanValue": true }
                    }
                }
            },
            { "readTime": "2025-03-01T15:00:00Z" }
        ]);
        let rows: Vec<QueryRow> = serde_json::from_value(body).expect("rows should parse");
        assert_eq!(rows.len(), 2);
        let doc = rows[0].document.as_ref().expect("first row has a document");
        assert_eq!(doc.doc_id(), "prem");
        assert_eq!(doc.str_field("name"), Some("Premier Division"));
        assert_eq!(doc.int_field("division"), Some(1));
        assert_eq!(doc.bool_field("active"), Some(true));
        assert!(rows[1].document.is_none());
    }

    #[test]
    fn single_filter_query_serializes_without_composite() {
        let query = StructuredQuery::collection("standings")
            .where_eq("leagueId", Value::string("prem"))
            .order_by("position", Direction::Ascending);
        let body = serde_json::to_value(QueryRequest { structured_query: query }).unwrap();
        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "standings" }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": "leagueId" },
                            "op": "EQUAL",
                            "value": { "stringValue": "prem" }
                        }
                    },
                    "orderBy": [{
                        "field": { "fieldPath": "position" },
                        "direction": "ASCENDING"
                    }]
                }
            })
        );
    }

    #[test]
    fn repeated_filters_fold_into_an_and_composite() {
        let query = StructuredQuery::collection("fixtures")
            .where_eq("leagueId", Value::string("prem"))
            .where_eq("status", Value::string("completed"))
            .limit(10);
        let body = serde_json::to_value(&query).unwrap();
        let composite = &body["where"]["compositeFilter"];
        assert_eq!(composite["op"], "AND");
        assert_eq!(composite["filters"].as_array().unwrap().len(), 2);
        assert_eq!(body["limit"], 10);
    }

    #[test]
    fn nested_and_filters_flatten() {
        let abc = Filter::and(
            Filter::and(
                Filter::eq("a", Value::boolean(true)),
                Filter::eq("b", Value::boolean(true)),
            ),
            Filter::eq("c", Value::boolean(true)),
        );
        let filters = abc.composite_filter.expect("composite").filters;
        assert_eq!(filters.len(), 3);
        assert!(filters.iter().all(|f| f.field_filter.is_some()));
    }
}
