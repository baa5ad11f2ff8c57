//! SQL identifier validation and quoting.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

fn ident_regex() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

/// Validate that `ident` is usable as a bare SQL identifier or as a
/// fragment of a templated table name.
///
/// Labels fed to the dynamic shape factory go through this check so a
/// bad label fails loudly instead of being silently mangled into DDL.
pub fn validate_identifier(ident: &str) -> Result<()> {
    if ident_regex().is_match(ident) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(ident.to_string()))
    }
}

/// Quote an identifier for interpolation into SQL, doubling any embedded
/// double quotes.
#[must_use]
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("employees").is_ok());
        assert!(validate_identifier("Employee_CA").is_ok());
        assert!(validate_identifier("_private").is_ok());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("drop table").is_err());
        assert!(validate_identifier("na;me").is_err());
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("parents"), "\"parents\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
