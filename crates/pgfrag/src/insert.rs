//! INSERT statement builders for single rows and row sets.

use crate::error::{SqlError, SqlResult};
use crate::fragment::{trace_built, Fragment};
use crate::ident::push_quoted;
use crate::param::{Param, ParamList};
use tokio_postgres::types::ToSql;

/// RETURNING clause selection, shared by the INSERT and UPDATE builders.
#[derive(Debug, Clone, Default)]
pub enum Returning {
    /// No RETURNING clause.
    #[default]
    None,
    /// `RETURNING *`
    All,
    /// `RETURNING <expr>` with the expression used verbatim. The caller is
    /// responsible for quoting identifiers in it if needed.
    Columns(String),
}

impl Returning {
    /// `RETURNING <expr>` from any string-ish expression.
    pub fn columns(expr: impl Into<String>) -> Self {
        Returning::Columns(expr.into())
    }

    pub(crate) fn push_to(&self, text: &mut String) {
        match self {
            Returning::None => {}
            Returning::All => text.push_str(" RETURNING *"),
            Returning::Columns(expr) => {
                text.push_str(" RETURNING ");
                text.push_str(expr);
            }
        }
    }
}

/// An ordered column/value record for INSERT and UPDATE SET clauses.
///
/// Column order is insertion order and determines both the emitted column
/// list and placeholder assignment.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: Vec<(String, Param)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set a column value.
    pub fn set<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.entries.push((column.to_string(), Param::new(value)));
        self
    }

    /// Set an optional column value (None => skip the column).
    pub fn set_opt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.set(column, v)
        } else {
            self
        }
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Param> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, p)| p)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(String, Param)] {
        &self.entries
    }
}

/// Build a single-row INSERT statement.
///
/// Columns and placeholders follow the record's insertion order.
///
/// # Example
///
/// ```
/// use pgfrag::insert::{build_insert, Record, Returning};
///
/// let q = build_insert("users", &Record::new().set("a", 1_i64).set("b", 2_i64), &Returning::All)?;
/// assert_eq!(q.text(), "INSERT INTO \"users\" (\"a\", \"b\") VALUES ($1, $2) RETURNING *");
/// assert_eq!(q.params_ref().len(), 2);
/// # Ok::<(), pgfrag::SqlError>(())
/// ```
pub fn build_insert(table: &str, row: &Record, returning: &Returning) -> SqlResult<Fragment> {
    use std::fmt::Write;

    if row.is_empty() {
        return Err(SqlError::EmptyData);
    }

    let mut text = String::from("INSERT INTO ");
    push_quoted(&mut text, table);
    text.push_str(" (");

    let mut params = ParamList::new();
    for (i, (column, _)) in row.entries().iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        push_quoted(&mut text, column);
    }
    text.push_str(") VALUES (");
    for (i, (_, param)) in row.entries().iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        let idx = params.push_param(param.clone());
        let _ = write!(&mut text, "${}", idx);
    }
    text.push(')');

    returning.push_to(&mut text);

    let fragment = Fragment::new(text, params);
    trace_built("insert", &fragment);
    Ok(fragment)
}

/// Build a multi-row INSERT statement.
///
/// The column set is taken from the first row; every other row must have
/// the same columns (membership, not order; values are matched by name).
/// Placeholders are allocated row-major: row 0 gets `$1..$k`, row 1 gets
/// `$k+1..$2k`, and so on.
pub fn build_insert_many(
    table: &str,
    rows: &[Record],
    returning: &Returning,
) -> SqlResult<Fragment> {
    use std::fmt::Write;

    let Some(first) = rows.first() else {
        return Err(SqlError::EmptyRows);
    };
    if first.is_empty() {
        return Err(SqlError::EmptyData);
    }

    let columns: Vec<&str> = first.columns().collect();

    let mut text = String::from("INSERT INTO ");
    push_quoted(&mut text, table);
    text.push_str(" (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        push_quoted(&mut text, column);
    }
    text.push_str(") VALUES ");

    let mut params = ParamList::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(SqlError::ShapeMismatch { row: row_index });
        }
        if row_index > 0 {
            text.push_str(", ");
        }
        text.push('(');
        for (i, column) in columns.iter().enumerate() {
            let Some(param) = row.get(column) else {
                return Err(SqlError::ShapeMismatch { row: row_index });
            };
            if i > 0 {
                text.push_str(", ");
            }
            let idx = params.push_param(param.clone());
            let _ = write!(&mut text, "${}", idx);
        }
        text.push(')');
    }

    returning.push_to(&mut text);

    let fragment = Fragment::new(text, params);
    trace_built("insert_many", &fragment);
    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_renders_columns_in_order() {
        let q = build_insert(
            "users",
            &Record::new().set("username", "alice").set("age", 30_i32),
            &Returning::None,
        )
        .unwrap();
        assert_eq!(
            q.text(),
            "INSERT INTO \"users\" (\"username\", \"age\") VALUES ($1, $2)"
        );
        assert_eq!(q.params_ref().len(), 2);
    }

    #[test]
    fn insert_returning_all() {
        let q = build_insert(
            "users",
            &Record::new().set("a", 1_i64).set("b", 2_i64),
            &Returning::All,
        )
        .unwrap();
        assert_eq!(
            q.text(),
            "INSERT INTO \"users\" (\"a\", \"b\") VALUES ($1, $2) RETURNING *"
        );
    }

    #[test]
    fn insert_returning_expression_is_verbatim() {
        let q = build_insert(
            "users",
            &Record::new().set("a", 1_i64),
            &Returning::columns("id, created_at"),
        )
        .unwrap();
        assert_eq!(
            q.text(),
            "INSERT INTO \"users\" (\"a\") VALUES ($1) RETURNING id, created_at"
        );
    }

    #[test]
    fn insert_rejects_empty_record() {
        assert!(matches!(
            build_insert("users", &Record::new(), &Returning::None),
            Err(SqlError::EmptyData)
        ));
    }

    #[test]
    fn insert_set_opt_skips_none() {
        let q = build_insert(
            "users",
            &Record::new()
                .set("a", 1_i64)
                .set_opt("b", Option::<i64>::None)
                .set_opt("c", Some(3_i64)),
            &Returning::None,
        )
        .unwrap();
        assert_eq!(q.text(), "INSERT INTO \"users\" (\"a\", \"c\") VALUES ($1, $2)");
    }

    #[test]
    fn insert_many_allocates_row_major() {
        let rows = vec![
            Record::new().set("a", 1_i64).set("b", 2_i64),
            Record::new().set("a", 3_i64).set("b", 4_i64),
            Record::new().set("a", 5_i64).set("b", 6_i64),
        ];
        let q = build_insert_many("t", &rows, &Returning::None).unwrap();
        assert_eq!(
            q.text(),
            "INSERT INTO \"t\" (\"a\", \"b\") VALUES ($1, $2), ($3, $4), ($5, $6)"
        );
        assert_eq!(q.params_ref().len(), 6);
    }

    #[test]
    fn insert_many_matches_values_by_name() {
        // Same membership, different insertion order: first row wins.
        let rows = vec![
            Record::new().set("a", 1_i64).set("b", 2_i64),
            Record::new().set("b", 4_i64).set("a", 3_i64),
        ];
        let q = build_insert_many("t", &rows, &Returning::None).unwrap();
        assert_eq!(
            q.text(),
            "INSERT INTO \"t\" (\"a\", \"b\") VALUES ($1, $2), ($3, $4)"
        );
    }

    #[test]
    fn insert_many_rejects_empty_row_set() {
        assert!(matches!(
            build_insert_many("t", &[], &Returning::None),
            Err(SqlError::EmptyRows)
        ));
    }

    #[test]
    fn insert_many_rejects_empty_first_row() {
        assert!(matches!(
            build_insert_many("t", &[Record::new()], &Returning::None),
            Err(SqlError::EmptyData)
        ));
    }

    #[test]
    fn insert_many_rejects_extra_column() {
        let rows = vec![
            Record::new().set("a", 1_i64),
            Record::new().set("a", 2_i64).set("b", 3_i64),
        ];
        let err = build_insert_many("t", &rows, &Returning::None).unwrap_err();
        assert!(matches!(err, SqlError::ShapeMismatch { row: 1 }));
    }

    #[test]
    fn insert_many_rejects_renamed_column() {
        let rows = vec![
            Record::new().set("a", 1_i64).set("b", 2_i64),
            Record::new().set("a", 3_i64).set("c", 4_i64),
        ];
        assert!(build_insert_many("t", &rows, &Returning::None)
            .unwrap_err()
            .is_shape_mismatch());
    }

    #[test]
    fn insert_many_returning_follows_values() {
        let rows = vec![Record::new().set("a", 1_i64)];
        let q = build_insert_many("t", &rows, &Returning::All).unwrap();
        assert_eq!(
            q.text(),
            "INSERT INTO \"t\" (\"a\") VALUES ($1) RETURNING *"
        );
    }
}
