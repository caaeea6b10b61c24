//! Partial-success results of bulk operations.

use serde::{Deserialize, Serialize};

use crate::errors::ApplicationError;

/// Response of a bulk endpoint: one result per detailed item plus counters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<BulkItemResult<T>>,
    #[serde(default)]
    pub bulk_action_metadata: BulkActionMetadata,
}

impl<T> BulkResponse<T> {
    /// Results whose item succeeded.
    pub fn successes(&self) -> impl Iterator<Item = &BulkItemResult<T>> {
        self.results.iter().filter(|r| r.item_metadata.success)
    }

    /// Results whose item failed and was reported in detail.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemResult<T>> {
        self.results.iter().filter(|r| !r.item_metadata.success)
    }

    /// Looks up the result for the request item at `index`.
    ///
    /// Correlates on `originalIndex`; failed items may be omitted from
    /// `results`, so positions are not meaningful.
    pub fn result_for_index(&self, index: u32) -> Option<&BulkItemResult<T>> {
        self.results
            .iter()
            .find(|r| r.item_metadata.original_index == index)
    }

    /// Whether the counters agree with the detailed results.
    pub fn is_consistent(&self) -> bool {
        self.bulk_action_metadata
            .is_consistent_with(self.results.len())
    }
}

/// Outcome of one item of a bulk request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResult<T> {
    pub item_metadata: ItemMetadata,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
}

/// Per-item status of a bulk operation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    /// Identifier of the affected entity, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Index of the item in the request.
    #[serde(default)]
    pub original_index: u32,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApplicationError>,
}

impl ItemMetadata {
    pub fn succeeded(original_index: u32, id: Option<String>) -> Self {
        Self {
            id,
            original_index,
            success: true,
            error: None,
        }
    }

    pub fn failed(original_index: u32, error: ApplicationError) -> Self {
        Self {
            id: None,
            original_index,
            success: false,
            error: Some(error),
        }
    }
}

/// Aggregate counters of a bulk operation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionMetadata {
    #[serde(default)]
    pub total_successes: u32,
    #[serde(default)]
    pub total_failures: u32,
    /// Failures counted but not described individually, once the service's
    /// detail threshold is exceeded.
    #[serde(default)]
    pub undetailed_failures: u32,
}

impl BulkActionMetadata {
    /// Checks the counters against the number of detailed results.
    ///
    /// Without undetailed failures every item is reported, so the totals sum
    /// to `detailed`. Otherwise up to `undetailed_failures` failed items are
    /// missing from the detailed list.
    pub fn is_consistent_with(&self, detailed: usize) -> bool {
        let reported = self.total_successes as usize + self.total_failures as usize;
        if self.undetailed_failures == 0 {
            return reported == detailed;
        }
        self.total_failures >= self.undetailed_failures
            && detailed <= reported
            && detailed + self.undetailed_failures as usize >= reported
    }
}
