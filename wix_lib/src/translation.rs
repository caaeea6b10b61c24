//! Machine translation with local pre-validation.
//!
//! Requests the service would reject are caught before they are sent. A
//! single-node request fails as a whole. In a bulk request only the offending
//! nodes fail; the rest are forwarded and the results are merged back in the
//! caller's order.

use wix_api::types::{
    BulkActionMetadata, BulkItemResult, BulkMachineTranslateResponse, ItemMetadata, Locale,
    TranslatableContent,
};

use crate::client::RetryingClient;
use crate::error::WixError;
use crate::validation::{validate_language_pair, validate_locale, validate_translatable};

pub struct TranslationService<'a> {
    client: &'a RetryingClient,
}

impl<'a> TranslationService<'a> {
    pub fn new(client: &'a RetryingClient) -> Self {
        Self { client }
    }

    /// Translates one node from `source` to `target`.
    pub async fn translate(
        &self,
        source: &str,
        target: &str,
        content: &TranslatableContent,
    ) -> Result<TranslatableContent, WixError> {
        let (source, target) = language_pair(source, target)?;
        validate_translatable(content)?;
        self.client
            .machine_translate(&source, &target, content)
            .await
    }

    /// Translates several nodes. Each node succeeds or fails on its own.
    ///
    /// Result `original_index` values refer to positions in `contents`.
    pub async fn translate_bulk(
        &self,
        source: &str,
        target: &str,
        contents: &[TranslatableContent],
    ) -> Result<BulkMachineTranslateResponse, WixError> {
        let (source, target) = language_pair(source, target)?;

        let mut results = Vec::with_capacity(contents.len());
        let mut forwarded = Vec::new();
        // Position in `forwarded` -> position in `contents`.
        let mut origin = Vec::new();
        for (index, content) in contents.iter().enumerate() {
            match validate_translatable(content) {
                Ok(()) => {
                    origin.push(index as u32);
                    forwarded.push(content.clone());
                }
                Err(err) => {
                    tracing::debug!("rejecting node {} locally: {}", index, err);
                    let mut metadata =
                        ItemMetadata::failed(index as u32, err.to_application_error());
                    metadata.id = content.id.clone();
                    results.push(BulkItemResult {
                        item_metadata: metadata,
                        item: None,
                    });
                }
            }
        }

        let mut undetailed_failures = 0u32;
        if !forwarded.is_empty() {
            let resp = self
                .client
                .bulk_machine_translate(&source, &target, &forwarded)
                .await?;
            undetailed_failures = resp.bulk_action_metadata.undetailed_failures;
            let mut answered = vec![false; origin.len()];
            for mut result in resp.results {
                let forwarded_index = result.item_metadata.original_index as usize;
                match origin.get(forwarded_index) {
                    Some(_) if answered[forwarded_index] => {
                        tracing::warn!(
                            "bulk translate returned originalIndex {} twice, dropping the repeat",
                            forwarded_index
                        );
                    }
                    Some(index) => {
                        answered[forwarded_index] = true;
                        result.item_metadata.original_index = *index;
                        results.push(result);
                    }
                    None => {
                        tracing::warn!(
                            "bulk translate returned unknown originalIndex {}",
                            forwarded_index
                        );
                        undetailed_failures += 1;
                    }
                }
            }
        }

        results.sort_by_key(|r| r.item_metadata.original_index);
        let total_successes = results.iter().filter(|r| r.item_metadata.success).count() as u32;
        let detailed_failures = results.len() as u32 - total_successes;
        Ok(BulkMachineTranslateResponse {
            results,
            bulk_action_metadata: BulkActionMetadata {
                total_successes,
                total_failures: detailed_failures + undetailed_failures,
                undetailed_failures,
            },
        })
    }
}

fn language_pair(source: &str, target: &str) -> Result<(Locale, Locale), WixError> {
    let source = validate_locale(source)?;
    let target = validate_locale(target)?;
    validate_language_pair(&source, &target)?;
    Ok((source, target))
}
