//! Error types for the API client.

use serde::{Deserialize, Serialize};

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unexpected response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The API returned a non-success status carrying a Wix application error.
    #[error("Request failed with status {status}: {error}")]
    Api {
        status: u16,
        error: ApplicationError,
    },
    /// The request was rejected locally before being sent.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The application error carried by the response, if any.
    pub fn application_error(&self) -> Option<&ApplicationError> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Error triple reported by Wix services, both for failed requests and for
/// individual items of a bulk operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApplicationError {
    /// Machine-readable error code, e.g. `TEXT_TOO_LONG`.
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Code-specific structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl std::fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} ({})", self.code, self.description)
        }
    }
}

/// Shape of a Wix error response body.
#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<ErrorDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorDetails {
    #[serde(default)]
    pub application_error: Option<ApplicationError>,
}

impl ErrorBody {
    /// Extracts the application error, falling back to the top-level message
    /// when the service omitted a structured code.
    pub(crate) fn into_application_error(self) -> Option<ApplicationError> {
        match self.details.and_then(|d| d.application_error) {
            Some(err) => Some(err),
            None => self.message.map(|message| ApplicationError {
                code: "UNKNOWN".to_string(),
                description: message,
                data: None,
            }),
        }
    }
}

/// Machine translation failure conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// The site's translation word quota is exhausted.
    NotEnoughCredits { credits_required: Option<u64> },
    /// A content node exceeds the per-node character limit.
    TextTooLong {
        max_length: u64,
        actual_length: u64,
    },
    /// The content format is not supported.
    UnknownFormat,
    /// Source and target language are the same.
    SameLanguageArguments,
    /// Any other code, surfaced verbatim.
    Other { code: String, description: String },
}

pub const NOT_ENOUGH_CREDITS: &str = "NOT_ENOUGH_CREDITS";
pub const TEXT_TOO_LONG: &str = "TEXT_TOO_LONG";
pub const UNKNOWN_FORMAT: &str = "UNKNOWN_FORMAT";
pub const SAME_LANGUAGE_ARGUMENTS: &str = "SAME_LANGUAGE_ARGUMENTS";

impl TranslationError {
    /// Interprets a Wix application error as a translation failure.
    pub fn from_application_error(error: &ApplicationError) -> Self {
        let data = error.data.as_ref();
        let number = |key: &str| {
            data.and_then(|d| d.get(key)).and_then(|v| match v {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.parse().ok(),
                _ => None,
            })
        };
        match error.code.as_str() {
            NOT_ENOUGH_CREDITS => TranslationError::NotEnoughCredits {
                credits_required: number("creditsRequired"),
            },
            TEXT_TOO_LONG => TranslationError::TextTooLong {
                max_length: number("maxLength").unwrap_or_default(),
                actual_length: number("actualLength").unwrap_or_default(),
            },
            UNKNOWN_FORMAT => TranslationError::UnknownFormat,
            SAME_LANGUAGE_ARGUMENTS => TranslationError::SameLanguageArguments,
            other => TranslationError::Other {
                code: other.to_string(),
                description: error.description.clone(),
            },
        }
    }

    /// Builds the wire form of this error, as a bulk item would carry it.
    pub fn to_application_error(&self) -> ApplicationError {
        match self {
            TranslationError::NotEnoughCredits { credits_required } => ApplicationError {
                code: NOT_ENOUGH_CREDITS.to_string(),
                description: "Not enough translation credits".to_string(),
                data: credits_required.map(|c| serde_json::json!({ "creditsRequired": c })),
            },
            TranslationError::TextTooLong {
                max_length,
                actual_length,
            } => ApplicationError {
                code: TEXT_TOO_LONG.to_string(),
                description: format!(
                    "Text length {} exceeds the maximum of {}",
                    actual_length, max_length
                ),
                data: Some(serde_json::json!({
                    "maxLength": max_length,
                    "actualLength": actual_length,
                })),
            },
            TranslationError::UnknownFormat => ApplicationError {
                code: UNKNOWN_FORMAT.to_string(),
                description: "Unknown content format".to_string(),
                data: None,
            },
            TranslationError::SameLanguageArguments => ApplicationError {
                code: SAME_LANGUAGE_ARGUMENTS.to_string(),
                description: "Source and target languages are the same".to_string(),
                data: None,
            },
            TranslationError::Other { code, description } => ApplicationError {
                code: code.clone(),
                description: description.clone(),
                data: None,
            },
        }
    }
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationError::NotEnoughCredits {
                credits_required: Some(c),
            } => write!(f, "not enough credits ({} required)", c),
            TranslationError::NotEnoughCredits { .. } => write!(f, "not enough credits"),
            TranslationError::TextTooLong {
                max_length,
                actual_length,
            } => write!(f, "text too long ({} > {})", actual_length, max_length),
            TranslationError::UnknownFormat => write!(f, "unknown format"),
            TranslationError::SameLanguageArguments => {
                write!(f, "source and target language are the same")
            }
            TranslationError::Other { code, description } => write!(f, "{}: {}", code, description),
        }
    }
}
