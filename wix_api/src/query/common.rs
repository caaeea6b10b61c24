//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields,
//! [`Sorting`] and [`CursorPaging`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::DEFAULT_PAGE_LIMIT;
use crate::Error;

use super::filter::Filter;

/// Trait implemented by all query builders. Provides request-body
/// serialization and shared builder methods for filtering, sorting and paging.
pub trait Query {
    /// Builds the request body, rejecting contradictory requests locally.
    fn to_body(&self) -> Result<serde_json::Value, Error>;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Returns the common query fields.
    fn common(&self) -> &QueryCommon;

    /// Sets the filter expression. Only valid on the first page.
    fn with_filter(mut self, filter: Filter) -> Self
    where
        Self: Sized,
    {
        self.get_common().filter = Some(filter);
        self
    }

    /// Appends a sort key. Earlier keys take precedence.
    fn with_sort(mut self, sorting: Sorting) -> Self
    where
        Self: Sized,
    {
        self.get_common().sort.push(sorting);
        self
    }

    /// Sets the maximum page size. `0` leaves the service default in place.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().cursor_paging.limit = (limit > 0).then_some(limit);
        self
    }

    /// Continues from a cursor returned by a previous page.
    fn with_cursor(mut self, cursor: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().cursor_paging.cursor = Some(cursor.to_string());
        self
    }
}

/// Sort order for a [`Sorting`] key.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending order. This is the default.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// One sort key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    pub field_name: String,
    #[serde(default)]
    pub order: SortOrder,
    /// For a field inside a repeated sub-structure: sort by the element
    /// matching these `field = value` selectors, ANDed together.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select_items_by: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl Sorting {
    pub fn asc(field_name: &str) -> Self {
        Self::new(field_name, SortOrder::Asc)
    }

    pub fn desc(field_name: &str) -> Self {
        Self::new(field_name, SortOrder::Desc)
    }

    pub fn new(field_name: &str, order: SortOrder) -> Self {
        Self {
            field_name: field_name.to_string(),
            order,
            select_items_by: Vec::new(),
        }
    }

    /// Adds an element selector for sorting on a repeated sub-structure.
    pub fn select_item_by(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        let mut selector = serde_json::Map::new();
        selector.insert(field.to_string(), value.into());
        self.select_items_by.push(selector);
        self
    }
}

/// Page size and position of a cursor-paged request.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CursorPaging {
    /// Maximum items per page. `None` uses the service default of 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Token from a previous page's `pagingMetadata.cursors`. Absent on the
    /// first request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl CursorPaging {
    /// The page size the service will apply.
    pub fn effective_limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.cursor.is_none()
    }

    /// Appends paging parameters for endpoints that take them in the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("paging.limit", &limit.to_string());
        };
        if let Some(cursor) = &self.cursor {
            url.query_pairs_mut()
                .append_pair("paging.cursor", cursor.as_str());
        };
        url
    }
}

/// Fields shared by all query types: filter, sort and paging.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryCommon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sorting>,
    #[serde(skip_serializing_if = "CursorPaging::is_empty")]
    pub cursor_paging: CursorPaging,
}

impl QueryCommon {
    /// Whether this continues an earlier query rather than starting one.
    pub fn is_continuation(&self) -> bool {
        self.cursor_paging.cursor.is_some()
    }

    /// Rejects a cursor combined with a fresh filter or sort. The cursor
    /// already encodes both, and the service refuses the combination.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.is_continuation() {
            return Ok(());
        }
        let mut conflicting = Vec::new();
        if self.filter.is_some() {
            conflicting.push("filter");
        }
        if !self.sort.is_empty() {
            conflicting.push("sort");
        }
        if conflicting.is_empty() {
            return Ok(());
        }
        Err(conflict(&conflicting))
    }
}

pub(crate) fn conflict(fields: &[&str]) -> Error {
    tracing::debug!("rejecting cursor combined with {}", fields.join(", "));
    Error::invalid_argument(format!(
        "cursorPaging.cursor cannot be combined with {}",
        fields.join(", ")
    ))
}
