use thiserror::Error;

use crate::models::chat::{ Lang, Mode };

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_QUERY_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Query too short (minimum {} characters)", MIN_QUERY_CHARS)]
    TooShort,
    #[error("Query too long (maximum {} characters)", MAX_QUERY_CHARS)]
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub query: String,
    pub mode: Mode,
    pub lang: Lang,
}

/// Trims and bounds the query; unknown modes and languages resolve to `vindecare` / `ro`.
pub fn validate(raw_query: &str, raw_mode: &str, raw_lang: &str) -> Result<ValidatedQuery, ValidationError> {
    let query = raw_query.trim();
    let len = query.chars().count();

    if len < MIN_QUERY_CHARS {
        return Err(ValidationError::TooShort);
    }
    if len > MAX_QUERY_CHARS {
        return Err(ValidationError::TooLong);
    }

    Ok(ValidatedQuery {
        query: query.to_string(),
        mode: resolve_mode(raw_mode),
        lang: resolve_lang(raw_lang),
    })
}

pub fn resolve_mode(raw: &str) -> Mode {
    Mode::parse(raw).unwrap_or(Mode::Vindecare)
}

pub fn resolve_lang(raw: &str) -> Lang {
    Lang::parse(raw).unwrap_or(Lang::Ro)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trims_before_measuring() {
        assert_eq!(validate("  a  ", "vindecare", "ro"), Err(ValidationError::TooShort));
        let ok = validate("  hi \n", "educatie", "en").unwrap();
        assert_eq!(ok.query, "hi");
        assert_eq!(ok.mode, Mode::Educatie);
        assert_eq!(ok.lang, Lang::En);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 2000 two-byte characters, 4000 bytes.
        let query = "ă".repeat(MAX_QUERY_CHARS);
        assert!(validate(&query, "vindecare", "ro").is_ok());
        assert_eq!(validate("ă", "vindecare", "ro"), Err(ValidationError::TooShort));
    }

    #[test]
    fn boundaries() {
        assert!(validate(&"x".repeat(MIN_QUERY_CHARS), "", "").is_ok());
        assert!(validate(&"x".repeat(MAX_QUERY_CHARS), "", "").is_ok());
        assert_eq!(validate(&"x".repeat(MAX_QUERY_CHARS + 1), "", ""), Err(ValidationError::TooLong));
        assert_eq!(validate("", "", ""), Err(ValidationError::TooShort));
    }

    #[test]
    fn bogus_selectors_default() {
        let ok = validate("hi", "bogus", "xx").unwrap();
        assert_eq!(ok.mode, Mode::Vindecare);
        assert_eq!(ok.lang, Lang::Ro);
    }

    proptest! {
        #[test]
        fn length_decides_outcome(len in 0usize..2100, mode in ".*", lang in ".*") {
            let query = "q".repeat(len);
            let result = validate(&query, &mode, &lang);
            if len < MIN_QUERY_CHARS {
                prop_assert_eq!(result, Err(ValidationError::TooShort));
            } else if len > MAX_QUERY_CHARS {
                prop_assert_eq!(result, Err(ValidationError::TooLong));
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn unknown_mode_resolves_to_vindecare(raw in "[a-zA-Z]{0,12}") {
            prop_assume!(!["vindecare", "educatie", "performanta"].contains(&raw.as_str()));
            prop_assert_eq!(resolve_mode(&raw), Mode::Vindecare);
        }

        #[test]
        fn unknown_lang_resolves_to_ro(raw in "[a-zA-Z]{0,4}") {
            prop_assume!(raw != "ro" && raw != "en");
            prop_assert_eq!(resolve_lang(&raw), Lang::Ro);
        }
    }
}
