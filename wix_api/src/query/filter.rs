//! Builders for the Wix filter language: `{"field": {"$op": value}}` leaves
//! combined with `$and`, `$or` and `$not`.
//!
//! The client never interprets a filter; it is forwarded to the service as-is.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Filter(Value);

impl Filter {
    /// Wraps an already-built filter expression.
    pub fn raw(value: Value) -> Self {
        Filter(value)
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::op(field, "$eq", value.into())
    }

    pub fn ne(field: &str, value: impl Into<Value>) -> Self {
        Self::op(field, "$ne", value.into())
    }

    pub fn gt(field: &str, value: impl Into<Value>) -> Self {
        Self::op(field, "$gt", value.into())
    }

    pub fn gte(field: &str, value: impl Into<Value>) -> Self {
        Self::op(field, "$gte", value.into())
    }

    pub fn lt(field: &str, value: impl Into<Value>) -> Self {
        Self::op(field, "$lt", value.into())
    }

    pub fn lte(field: &str, value: impl Into<Value>) -> Self {
        Self::op(field, "$lte", value.into())
    }

    pub fn is_in<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::op(field, "$in", Value::Array(values))
    }

    /// Matches array fields containing at least one of `values`.
    pub fn has_some<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::op(field, "$hasSome", Value::Array(values))
    }

    pub fn exists(field: &str, exists: bool) -> Self {
        Self::op(field, "$exists", Value::Bool(exists))
    }

    pub fn starts_with(field: &str, prefix: &str) -> Self {
        Self::op(field, "$startsWith", Value::String(prefix.to_string()))
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Self::combine("$and", filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Self::combine("$or", filters)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter(json!({ "$not": filter.0 }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn op(field: &str, op: &str, value: Value) -> Self {
        Filter(json!({ field: { op: value } }))
    }

    fn combine(op: &str, mut filters: Vec<Filter>) -> Self {
        // A single operand needs no combinator.
        if filters.len() == 1 {
            return filters.remove(0);
        }
        let operands: Vec<Value> = filters.into_iter().map(|f| f.0).collect();
        Filter(json!({ op: operands }))
    }
}

impl From<Value> for Filter {
    fn from(value: Value) -> Self {
        Filter(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_operators() {
        assert_eq!(
            Filter::eq("locale", "de").as_value(),
            &json!({"locale": {"$eq": "de"}})
        );
        assert_eq!(
            Filter::is_in("schemaId", ["a", "b"]).as_value(),
            &json!({"schemaId": {"$in": ["a", "b"]}})
        );
        assert_eq!(
            Filter::exists("parentEntityId", false).as_value(),
            &json!({"parentEntityId": {"$exists": false}})
        );
    }

    #[test]
    fn combinators() {
        let f = Filter::and(vec![Filter::eq("a", 1), Filter::not(Filter::eq("b", 2))]);
        assert_eq!(
            f.as_value(),
            &json!({"$and": [{"a": {"$eq": 1}}, {"$not": {"b": {"$eq": 2}}}]})
        );
        let single = Filter::or(vec![Filter::gt("n", 3)]);
        assert_eq!(single.as_value(), &json!({"n": {"$gt": 3}}));
    }
}
