use serde::{Deserialize, Serialize};

use crate::types::Aggregation;
use crate::Error;

use super::common::{conflict, QueryCommon};
use super::Query;

/// A cursor query extended with free-text search and aggregations.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CursorSearch {
    #[serde(flatten)]
    pub common: QueryCommon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchDetails>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<Aggregation>,
}

/// Free-text search over a list of fields.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchDetails {
    #[serde(default)]
    pub mode: SearchMode,
    pub expression: String,
    /// Fields to search. Empty searches every searchable field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default)]
    pub fuzzy: bool,
}

/// How the terms of a search expression combine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMode {
    /// Any term matches. This is the default.
    #[default]
    Or,
    /// Every term must match.
    And,
}

impl CursorSearch {
    pub fn with_search(mut self, expression: &str) -> Self {
        self.search
            .get_or_insert_with(SearchDetails::default)
            .expression = expression.to_string();
        self
    }

    pub fn with_search_fields(mut self, fields: &[&str]) -> Self {
        self.search
            .get_or_insert_with(SearchDetails::default)
            .fields
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search.get_or_insert_with(SearchDetails::default).mode = mode;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.search.get_or_insert_with(SearchDetails::default).fuzzy = fuzzy;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    /// The request for the page after the one fetched with `self`.
    pub fn next_page(&self, cursor: &str) -> Self {
        let mut next = CursorSearch::default();
        next.common.cursor_paging.cursor = Some(cursor.to_string());
        next.common.cursor_paging.limit = self.common.cursor_paging.limit;
        next
    }
}

impl Query for CursorSearch {
    fn to_body(&self) -> Result<serde_json::Value, Error> {
        self.common.validate()?;
        if self.common.is_continuation() {
            let mut conflicting = Vec::new();
            if self.search.is_some() {
                conflicting.push("search");
            }
            if !self.aggregations.is_empty() {
                conflicting.push("aggregations");
            }
            if !conflicting.is_empty() {
                return Err(conflict(&conflicting));
            }
        }
        let search = serde_json::to_value(self).map_err(|e| {
            tracing::error!("Failed to serialize search: {}", e);
            Error::RequestFailed
        })?;
        Ok(serde_json::json!({ "search": search }))
    }

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::query::{CursorSearch, Query, SearchMode};
    use crate::types::{Aggregation, ScalarType};

    #[test]
    fn test_search_body() {
        let body = CursorSearch::default()
            .with_search("hello world")
            .with_search_fields(&["title", "body"])
            .with_search_mode(SearchMode::And)
            .with_fuzzy(true)
            .with_aggregation(Aggregation::scalar("longest", "length", ScalarType::Max))
            .with_limit(10)
            .to_body()
            .unwrap();
        let search = &body["search"];
        assert_eq!(search["search"]["expression"], "hello world");
        assert_eq!(search["search"]["mode"], "AND");
        assert_eq!(search["search"]["fields"], json!(["title", "body"]));
        assert_eq!(search["search"]["fuzzy"], true);
        assert_eq!(search["aggregations"][0]["name"], "longest");
        assert_eq!(search["cursorPaging"]["limit"], 10);
    }

    #[test]
    fn test_continuation_rejects_search_expression() {
        let err = CursorSearch::default()
            .with_search("x")
            .with_cursor("c1")
            .to_body()
            .unwrap_err();
        assert!(err.to_string().contains("search"));
    }

    #[test]
    fn test_next_page_is_cursor_only() {
        let first = CursorSearch::default().with_search("x").with_limit(5);
        let body = first.next_page("c2").to_body().unwrap();
        assert_eq!(
            body,
            json!({"search": {"cursorPaging": {"limit": 5, "cursor": "c2"}}})
        );
    }
}
