//! DDL generation for the embedded SQLite store.

use ormlab_core::{ColumnDef, Error, Result, quote_ident, validate_identifier};

use crate::metadata::TableDef;

/// Generate `CREATE TABLE IF NOT EXISTS` for a table definition.
///
/// A single integer primary key column becomes a rowid alias
/// (`INTEGER PRIMARY KEY AUTOINCREMENT`) so the database assigns ids.
pub fn create_table_sql(table: &TableDef) -> Result<String> {
    validate_identifier(&table.name)?;
    if table.columns.is_empty() {
        // SQLite would reject the empty parenthesis list with an opaque
        // syntax error at execute time.
        return Err(Error::NoColumns(table.name.clone()));
    }

    let clauses: Result<Vec<String>> = table.columns.iter().map(column_clause).collect();
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(&table.name),
        clauses?.join(", ")
    ))
}

fn column_clause(col: &ColumnDef) -> Result<String> {
    validate_identifier(&col.name)?;

    let mut clause = quote_ident(&col.name);

    if col.primary_key && col.sql_type.is_integer() {
        // SQLite rowid alias; AUTOINCREMENT requires the INTEGER spelling.
        clause.push_str(" INTEGER PRIMARY KEY");
        if col.auto_increment {
            clause.push_str(" AUTOINCREMENT");
        }
    } else {
        clause.push(' ');
        clause.push_str(col.sql_type.sql_name());
        if col.primary_key {
            clause.push_str(" PRIMARY KEY");
        } else if !col.nullable {
            clause.push_str(" NOT NULL");
        }
    }

    if col.unique && !col.primary_key {
        clause.push_str(" UNIQUE");
    }

    if let Some(default) = &col.default {
        clause.push_str(" DEFAULT ");
        clause.push_str(default);
    }

    if let Some(fk) = &col.foreign_key {
        validate_identifier(&fk.table)?;
        validate_identifier(&fk.column)?;
        clause.push_str(&format!(
            " REFERENCES {}({})",
            quote_ident(&fk.table),
            quote_ident(&fk.column)
        ));
        if let Some(action) = fk.on_delete {
            clause.push_str(" ON DELETE ");
            clause.push_str(action.as_sql());
        }
    }

    Ok(clause)
}
