//! Language identifiers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// An IETF BCP 47 language tag such as `en` or `pt-BR`.
///
/// Tags received from the service are kept as-is; [`Locale::parse`] is used
/// for tags supplied by callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Validates the syntax of a language tag.
    ///
    /// Accepts a 2-3 or 5-8 letter primary language subtag followed by
    /// hyphen-separated alphanumeric subtags of 1-8 characters. `_` is
    /// accepted as a separator and normalized to `-`.
    pub fn parse(tag: &str) -> Result<Self, Error> {
        let normalized = tag.trim().replace('_', "-");
        let mut subtags = normalized.split('-');
        let primary = subtags.next().unwrap_or_default();
        let primary_ok = matches!(primary.len(), 2 | 3 | 5..=8)
            && primary.chars().all(|c| c.is_ascii_alphabetic());
        if !primary_ok {
            return Err(Error::invalid_argument(format!(
                "`{}` is not a valid language tag",
                tag
            )));
        }
        for subtag in subtags {
            if subtag.is_empty()
                || subtag.len() > 8
                || !subtag.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(Error::invalid_argument(format!(
                    "`{}` is not a valid language tag",
                    tag
                )));
            }
        }
        Ok(Locale(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, lowercased.
    pub fn language(&self) -> String {
        self.0
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Case-insensitive tag comparison.
    pub fn same_as(&self, other: &Locale) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-letter country code attached to a language in older payloads.
///
/// Deprecated by the service in favour of [`Locale`]; kept so such payloads
/// still decode.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Flag {
    Usa,
    Gbr,
    Can,
    Aus,
    Deu,
    Aut,
    Che,
    Fra,
    Bel,
    Esp,
    Mex,
    Arg,
    Ita,
    Prt,
    Bra,
    Nld,
    Swe,
    Nor,
    Dnk,
    Fin,
    Pol,
    Cze,
    Tur,
    Rus,
    Ukr,
    Isr,
    Sau,
    Chn,
    Twn,
    Jpn,
    Kor,
    Ind,
    Tha,
    Vnm,
    Idn,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_tags() {
        assert_eq!(Locale::parse("en").unwrap().as_str(), "en");
        assert_eq!(Locale::parse("pt-BR").unwrap().as_str(), "pt-BR");
        assert_eq!(Locale::parse("zh_Hant_TW").unwrap().as_str(), "zh-Hant-TW");
        assert_eq!(Locale::parse("es-419").unwrap().language(), "es");
    }

    #[test]
    fn rejects_malformed_tags() {
        for bad in ["", "e", "englishlanguage", "en--US", "en-US!", "1a"] {
            assert!(Locale::parse(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn comparison_ignores_case() {
        let a = Locale::parse("pt-br").unwrap();
        let b = Locale::parse("PT-BR").unwrap();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&Locale::parse("pt").unwrap()));
    }

    #[test]
    fn unknown_flags_decode() {
        let flag: Flag = serde_json::from_str("\"BRA\"").unwrap();
        assert_eq!(flag, Flag::Bra);
        let flag: Flag = serde_json::from_str("\"XYZ\"").unwrap();
        assert_eq!(flag, Flag::Unknown);
    }
}
