//! SQL column types.

use serde::{Deserialize, Serialize};

/// The SQL type of a column.
///
/// The set is deliberately small: it covers what an embedded SQLite store
/// distinguishes between. `Boolean` columns are declared as such in DDL
/// but store integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlType {
    /// 32-bit integer affinity.
    Integer,
    /// 64-bit integer affinity.
    BigInt,
    /// Floating point.
    Real,
    /// UTF-8 text.
    Text,
    /// Raw bytes.
    Blob,
    /// Boolean, stored as an integer.
    Boolean,
}

impl SqlType {
    /// The keyword used for this type in DDL.
    #[must_use]
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
            SqlType::Boolean => "BOOLEAN",
        }
    }

    /// Whether this type has integer affinity (and can alias the rowid
    /// when used as a single-column primary key).
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, SqlType::Integer | SqlType::BigInt | SqlType::Boolean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_names() {
        assert_eq!(SqlType::Integer.sql_name(), "INTEGER");
        assert_eq!(SqlType::Text.sql_name(), "TEXT");
        assert_eq!(SqlType::Boolean.sql_name(), "BOOLEAN");
    }

    #[test]
    fn test_integer_affinity() {
        assert!(SqlType::BigInt.is_integer());
        assert!(!SqlType::Text.is_integer());
    }
}
