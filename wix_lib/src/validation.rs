use wix_api::types::{ContentFormat, Locale, TranslatableContent, MAX_TRANSLATABLE_LENGTH};
use wix_api::TranslationError;

use crate::error::WixError;

pub const MAX_ID_LENGTH: usize = 200;
pub const MAX_SEARCH_LENGTH: usize = 200;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, WixError> {
    if input.len() > max_len {
        return Err(WixError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(WixError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate an entity id (GUID or app-defined key).
pub fn validate_id(input: &str) -> Result<String, WixError> {
    sanitize_text(input, MAX_ID_LENGTH)
}

/// Validate a free-text search expression.
pub fn validate_search(input: &str) -> Result<String, WixError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a BCP 47 language tag such as `en` or `pt-BR`.
pub fn validate_locale(input: &str) -> Result<Locale, WixError> {
    Locale::parse(input).map_err(|_| {
        WixError::InvalidInput(format!(
            "invalid language tag '{}'. Expected a BCP 47 tag such as en, de or pt-BR",
            input
        ))
    })
}

/// Validate page limit (must be 1..=100).
pub fn validate_limit(limit: i64) -> Result<u32, WixError> {
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(WixError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }
    Ok(limit as u32)
}

/// Reject a source/target pair naming the same language.
pub fn validate_language_pair(source: &Locale, target: &Locale) -> Result<(), TranslationError> {
    if source.same_as(target) {
        return Err(TranslationError::SameLanguageArguments);
    }
    Ok(())
}

/// Check one node of translatable content against the service's limits.
///
/// The format must agree with the populated value and every text node must
/// be at most [`MAX_TRANSLATABLE_LENGTH`] characters.
pub fn validate_translatable(content: &TranslatableContent) -> Result<(), TranslationError> {
    if matches!(content.format, Some(ContentFormat::Unknown)) || !content.format_matches() {
        return Err(TranslationError::UnknownFormat);
    }
    let length = content.measured_length();
    if length > MAX_TRANSLATABLE_LENGTH {
        return Err(TranslationError::TextTooLong {
            max_length: MAX_TRANSLATABLE_LENGTH as u64,
            actual_length: length as u64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wix_api::types::RichContent;

    // -- Text sanitization --

    #[test]
    fn sanitize_strips_control_chars() {
        assert_eq!(sanitize_text("a\u{0}b\tc ", 20).unwrap(), "abc");
    }

    #[test]
    fn sanitize_rejects_empty() {
        assert!(sanitize_text("  \n ", 20).is_err());
    }

    #[test]
    fn sanitize_rejects_too_long() {
        assert!(validate_id(&"x".repeat(MAX_ID_LENGTH + 1)).is_err());
    }

    // -- Locale validation --

    #[test]
    fn locale_valid() {
        assert_eq!(validate_locale("pt-BR").unwrap().as_str(), "pt-BR");
        assert_eq!(validate_locale("zh_Hant").unwrap().as_str(), "zh-Hant");
    }

    #[test]
    fn locale_invalid() {
        assert!(validate_locale("e").is_err());
        assert!(validate_locale("en--US").is_err());
        assert!(validate_locale("").is_err());
    }

    #[test]
    fn same_language_is_case_insensitive() {
        let a = validate_locale("en-US").unwrap();
        let b = validate_locale("en-us").unwrap();
        assert_eq!(
            validate_language_pair(&a, &b),
            Err(TranslationError::SameLanguageArguments)
        );
        let c = validate_locale("de").unwrap();
        assert!(validate_language_pair(&a, &c).is_ok());
    }

    // -- Limit validation --

    #[test]
    fn limit_bounds() {
        assert_eq!(validate_limit(1).unwrap(), 1);
        assert_eq!(validate_limit(100).unwrap(), 100);
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(101).is_err());
    }

    // -- Translatable content --

    #[test]
    fn text_at_limit_is_accepted() {
        let content = TranslatableContent::plain_text("n", &"a".repeat(5000));
        assert!(validate_translatable(&content).is_ok());
    }

    #[test]
    fn text_over_limit_is_rejected() {
        let content = TranslatableContent::html("n", &"a".repeat(5001));
        assert_eq!(
            validate_translatable(&content),
            Err(TranslationError::TextTooLong {
                max_length: 5000,
                actual_length: 5001
            })
        );
    }

    #[test]
    fn rich_content_is_measured_per_node() {
        let doc = RichContent::from_paragraphs(["a".repeat(4000), "b".repeat(4000)]);
        assert!(validate_translatable(&TranslatableContent::rich("n", doc)).is_ok());
    }

    #[test]
    fn mismatched_format_is_unknown() {
        let mut content = TranslatableContent::plain_text("n", "hi");
        content.format = Some(ContentFormat::Rich);
        assert_eq!(
            validate_translatable(&content),
            Err(TranslationError::UnknownFormat)
        );
    }
}
