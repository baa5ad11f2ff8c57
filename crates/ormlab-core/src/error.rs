//! Error types shared across the ormlab crates.

use std::fmt;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for record, metadata, and session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The underlying database reported an error.
    Database(String),
    /// A value was set or read for a column the shape does not declare.
    UnknownColumn {
        /// The table whose shape was consulted.
        table: String,
        /// The offending column name.
        column: String,
    },
    /// An operation required a primary key column and the shape has none.
    MissingPrimaryKey {
        /// The table whose shape was consulted.
        table: String,
    },
    /// A table name, column name, or label is not a valid SQL identifier.
    InvalidIdentifier(String),
    /// A table definition declares no columns.
    NoColumns(String),
    /// The instance is not tracked by the session.
    NotTracked,
    /// A record could not be serialized or deserialized.
    Serialization(String),
    /// A table was referenced that is not registered in the metadata.
    UnknownTable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(msg) => write!(f, "database error: {msg}"),
            Error::UnknownColumn { table, column } => {
                write!(f, "table {table:?} has no column {column:?}")
            }
            Error::MissingPrimaryKey { table } => {
                write!(f, "table {table:?} has no primary key column")
            }
            Error::InvalidIdentifier(ident) => {
                write!(f, "invalid SQL identifier: {ident:?}")
            }
            Error::NoColumns(table) => {
                write!(f, "table {table:?} declares no columns")
            }
            Error::NotTracked => write!(f, "instance is not tracked by this session"),
            Error::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Error::UnknownTable(table) => {
                write!(f, "table {table:?} is not registered in the metadata")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_column() {
        let err = Error::UnknownColumn {
            table: "children".to_string(),
            column: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "table \"children\" has no column \"nope\"");
    }

    #[test]
    fn test_display_invalid_identifier() {
        let err = Error::InvalidIdentifier("bad name".to_string());
        assert!(err.to_string().contains("bad name"));
    }
}
