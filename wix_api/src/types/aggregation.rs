//! Aggregations requested by a search and the results they produce.
//!
//! Each aggregation request and result is a oneof on the wire: a `type`
//! discriminator plus one populated options field (`value`, `range`, ...).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::oneof::{exclusive, OneofConflict};

/// A named aggregation over one field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "AggregationWire", into = "AggregationWire")]
pub struct Aggregation {
    /// Key of the result in [`AggregationData::by_name`].
    pub name: Option<String>,
    pub field_path: String,
    pub kind: AggregationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationKind {
    /// Histogram of distinct values.
    Value(ValueAggregation),
    /// Counts per numeric range.
    Range(RangeAggregation),
    /// A single reduction such as a minimum or a sum.
    Scalar(ScalarAggregation),
    /// Counts per calendar interval.
    DateHistogram(DateHistogramAggregation),
    /// Multi-level aggregation, each level grouping the next.
    Nested(NestedAggregation),
}

impl Aggregation {
    pub fn value(name: &str, field_path: &str) -> Self {
        Self::new(name, field_path, AggregationKind::Value(Default::default()))
    }

    pub fn range(name: &str, field_path: &str, buckets: Vec<RangeBucket>) -> Self {
        Self::new(
            name,
            field_path,
            AggregationKind::Range(RangeAggregation { buckets }),
        )
    }

    pub fn scalar(name: &str, field_path: &str, scalar_type: ScalarType) -> Self {
        Self::new(
            name,
            field_path,
            AggregationKind::Scalar(ScalarAggregation { scalar_type }),
        )
    }

    pub fn date_histogram(name: &str, field_path: &str, interval: Interval) -> Self {
        Self::new(
            name,
            field_path,
            AggregationKind::DateHistogram(DateHistogramAggregation { interval }),
        )
    }

    pub fn nested(name: &str, levels: Vec<Aggregation>) -> Self {
        let field_path = levels
            .first()
            .map(|a| a.field_path.clone())
            .unwrap_or_default();
        Self::new(
            name,
            &field_path,
            AggregationKind::Nested(NestedAggregation {
                nested_aggregations: levels,
            }),
        )
    }

    fn new(name: &str, field_path: &str, kind: AggregationKind) -> Self {
        Self {
            name: Some(name.to_string()),
            field_path: field_path.to_string(),
            kind,
        }
    }

    pub fn aggregation_type(&self) -> AggregationType {
        match self.kind {
            AggregationKind::Value(_) => AggregationType::Value,
            AggregationKind::Range(_) => AggregationType::Range,
            AggregationKind::Scalar(_) => AggregationType::Scalar,
            AggregationKind::DateHistogram(_) => AggregationType::DateHistogram,
            AggregationKind::Nested(_) => AggregationType::Nested,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationType {
    Value,
    Range,
    Scalar,
    DateHistogram,
    Nested,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueAggregation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<ValueSortType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<ValueSortDirection>,
    /// Maximum number of buckets returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_values: Option<MissingValues>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueSortType {
    Count,
    Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueSortDirection {
    Desc,
    Asc,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingValues {
    Exclude,
    Include,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RangeAggregation {
    pub buckets: Vec<RangeBucket>,
}

/// Half-open range `[from, to)`. A missing bound is unbounded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeBucket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScalarAggregation {
    #[serde(rename = "type")]
    pub scalar_type: ScalarType,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalarType {
    CountDistinct,
    Min,
    Max,
    Sum,
    Avg,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DateHistogramAggregation {
    pub interval: Interval,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interval {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NestedAggregation {
    pub nested_aggregations: Vec<Aggregation>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregationWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    field_path: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    aggregation_type: Option<AggregationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<ValueAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<RangeAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scalar: Option<ScalarAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_histogram: Option<DateHistogramAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nested: Option<NestedAggregation>,
}

impl TryFrom<AggregationWire> for Aggregation {
    type Error = OneofConflict;

    fn try_from(w: AggregationWire) -> Result<Self, Self::Error> {
        let kind = exclusive(
            "kind",
            vec![
                ("value", w.value.map(AggregationKind::Value)),
                ("range", w.range.map(AggregationKind::Range)),
                ("scalar", w.scalar.map(AggregationKind::Scalar)),
                (
                    "dateHistogram",
                    w.date_histogram.map(AggregationKind::DateHistogram),
                ),
                ("nested", w.nested.map(AggregationKind::Nested)),
            ],
        )?;
        // A bare `{"type": "VALUE"}` selects the variant with default options.
        let kind = match (kind, w.aggregation_type) {
            (Some(kind), _) => kind,
            (None, Some(AggregationType::Value)) | (None, None) => {
                AggregationKind::Value(ValueAggregation::default())
            }
            (None, Some(_)) => {
                return Err(OneofConflict::missing("kind"))
            }
        };
        Ok(Aggregation {
            name: w.name,
            field_path: w.field_path,
            kind,
        })
    }
}

impl From<Aggregation> for AggregationWire {
    fn from(a: Aggregation) -> Self {
        let mut wire = AggregationWire {
            aggregation_type: Some(a.aggregation_type()),
            name: a.name,
            field_path: a.field_path,
            value: None,
            range: None,
            scalar: None,
            date_histogram: None,
            nested: None,
        };
        match a.kind {
            AggregationKind::Value(v) => wire.value = Some(v),
            AggregationKind::Range(v) => wire.range = Some(v),
            AggregationKind::Scalar(v) => wire.scalar = Some(v),
            AggregationKind::DateHistogram(v) => wire.date_histogram = Some(v),
            AggregationKind::Nested(v) => wire.nested = Some(v),
        }
        wire
    }
}

/// Aggregation results of a search page.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AggregationData {
    #[serde(default)]
    pub results: Vec<AggregationResult>,
}

impl AggregationData {
    /// Results keyed by aggregation name. Unnamed results are keyed by field path.
    pub fn by_name(&self) -> HashMap<&str, &AggregationResultKind> {
        self.results
            .iter()
            .map(|r| {
                (
                    r.name.as_deref().unwrap_or(r.field_path.as_str()),
                    &r.kind,
                )
            })
            .collect()
    }
}

/// Result of one requested aggregation. Mirrors the request's variant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "AggregationResultWire", into = "AggregationResultWire")]
pub struct AggregationResult {
    pub name: Option<String>,
    pub field_path: String,
    pub kind: AggregationResultKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationResultKind {
    Values(ValueResults),
    Ranges(RangeResults),
    Scalar(ScalarResult),
    GroupedByValue(GroupByValueResults),
    DateHistogram(DateHistogramResults),
    Nested(NestedResults),
    /// A result variant this client does not model, kept as received so the
    /// rest of the page still decodes.
    Unknown {
        result_type: Option<String>,
        payload: serde_json::Map<String, serde_json::Value>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ValueResults {
    #[serde(default)]
    pub results: Vec<ValueResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValueResult {
    pub value: serde_json::Value,
    #[serde(default)]
    pub count: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RangeResults {
    #[serde(default)]
    pub results: Vec<RangeResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RangeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScalarResult {
    #[serde(rename = "type")]
    pub scalar_type: ScalarType,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GroupByValueResults {
    #[serde(default)]
    pub results: Vec<NestedValueAggregationResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NestedValueAggregationResult {
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_results: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DateHistogramResults {
    #[serde(default)]
    pub results: Vec<DateHistogramResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DateHistogramResult {
    /// Start of the interval, ISO-8601.
    pub value: String,
    #[serde(default)]
    pub count: u64,
}

/// Rows of a nested aggregation, each mapping level name to that level's value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NestedResults {
    #[serde(default)]
    pub results: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregationResultWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    field_path: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    result_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<ValueResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ranges: Option<RangeResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scalar: Option<ScalarResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grouped_by_value: Option<GroupByValueResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_histogram: Option<DateHistogramResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nested: Option<NestedResults>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<AggregationResultWire> for AggregationResult {
    type Error = OneofConflict;

    fn try_from(w: AggregationResultWire) -> Result<Self, Self::Error> {
        let kind = exclusive(
            "result",
            vec![
                ("values", w.values.map(AggregationResultKind::Values)),
                ("ranges", w.ranges.map(AggregationResultKind::Ranges)),
                ("scalar", w.scalar.map(AggregationResultKind::Scalar)),
                (
                    "groupedByValue",
                    w.grouped_by_value
                        .map(AggregationResultKind::GroupedByValue),
                ),
                (
                    "dateHistogram",
                    w.date_histogram.map(AggregationResultKind::DateHistogram),
                ),
                ("nested", w.nested.map(AggregationResultKind::Nested)),
            ],
        )?
        .unwrap_or(AggregationResultKind::Unknown {
            result_type: w.result_type,
            payload: w.other,
        });
        Ok(AggregationResult {
            name: w.name,
            field_path: w.field_path,
            kind,
        })
    }
}

impl From<AggregationResult> for AggregationResultWire {
    fn from(r: AggregationResult) -> Self {
        let mut wire = AggregationResultWire {
            name: r.name,
            field_path: r.field_path,
            result_type: None,
            values: None,
            ranges: None,
            scalar: None,
            grouped_by_value: None,
            date_histogram: None,
            nested: None,
            other: serde_json::Map::new(),
        };
        let t = match r.kind {
            AggregationResultKind::Values(v) => {
                wire.values = Some(v);
                AggregationType::Value
            }
            AggregationResultKind::Ranges(v) => {
                wire.ranges = Some(v);
                AggregationType::Range
            }
            AggregationResultKind::Scalar(v) => {
                wire.scalar = Some(v);
                AggregationType::Scalar
            }
            AggregationResultKind::GroupedByValue(v) => {
                wire.grouped_by_value = Some(v);
                AggregationType::Nested
            }
            AggregationResultKind::DateHistogram(v) => {
                wire.date_histogram = Some(v);
                AggregationType::DateHistogram
            }
            AggregationResultKind::Nested(v) => {
                wire.nested = Some(v);
                AggregationType::Nested
            }
            AggregationResultKind::Unknown {
                result_type,
                payload,
            } => {
                wire.result_type = result_type;
                wire.other = payload;
                return wire;
            }
        };
        wire.result_type = Some(type_name(t).to_string());
        wire
    }
}

fn type_name(t: AggregationType) -> &'static str {
    match t {
        AggregationType::Value => "VALUE",
        AggregationType::Range => "RANGE",
        AggregationType::Scalar => "SCALAR",
        AggregationType::DateHistogram => "DATE_HISTOGRAM",
        AggregationType::Nested => "NESTED",
        AggregationType::Unknown => "UNKNOWN",
    }
}
