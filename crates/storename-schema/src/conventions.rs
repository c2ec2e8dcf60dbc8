//! Default constraint and index naming.
//!
//! These produce logical names only; they may be arbitrarily long and are
//! resolved like any other declared name.

/// `PK_{table}`.
pub fn key_name(table: &str) -> String {
    format!("PK_{table}")
}

/// `FK_{table}_{principal_table}_{col1}_{col2}...`.
pub fn foreign_key_name<S: AsRef<str>>(
    table: &str,
    principal_table: &str,
    columns: &[S],
) -> String {
    format!("FK_{table}_{principal_table}_{}", join(columns))
}

/// `IX_{table}_{col1}_{col2}...`.
pub fn index_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    format!("IX_{table}_{}", join(columns))
}

fn join<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("_")
}
