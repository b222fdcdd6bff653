//! Bulk-insert support via PostgreSQL `UNNEST()`.
//!
//! An [`UnnestSchema`] is declared once per row type with an ordered set of
//! columns, each carrying a Postgres type tag and a transform closure. It
//! can then be applied to any number of row batches: each batch is pivoted
//! from row-major records into one column-major array per column, bound as
//! a single array-typed parameter.
//!
//! # Example
//!
//! ```
//! use pgfrag::pg_type::PgType;
//! use pgfrag::unnest::UnnestSchema;
//!
//! struct LogRow {
//!     id: i64,
//!     level: String,
//! }
//!
//! let schema = UnnestSchema::new()
//!     .column("id", PgType::Bigint, |r: &LogRow| r.id)
//!     .column("level", PgType::Text, |r: &LogRow| r.level.clone());
//!
//! let rows = vec![
//!     LogRow { id: 1, level: "info".into() },
//!     LogRow { id: 2, level: "error".into() },
//! ];
//! let clause = schema.apply(&rows);
//!
//! assert_eq!(clause.cols(), "\"id\", \"level\"");
//! assert_eq!(
//!     clause.unnest(),
//!     "UNNEST($1::bigint[], $2::text[]) AS t(\"id\", \"level\")"
//! );
//! assert_eq!(clause.params_ref().len(), 2);
//! ```

use crate::ident::push_quoted;
use crate::param::{Param, ParamList};
use crate::pg_type::PgType;
use tokio_postgres::types::ToSql;

struct UnnestColumn<R> {
    name: String,
    ty: PgType,
    // Pivots a whole batch into one column-major array parameter.
    collect: Box<dyn Fn(&[R]) -> Param>,
}

/// A reusable column schema for `UNNEST`-based bulk inserts.
///
/// Column order is fixed at declaration time and determines both the
/// emitted column list and the index of each array placeholder. The schema
/// is pure configuration: declaring it touches no data.
pub struct UnnestSchema<R> {
    columns: Vec<UnnestColumn<R>>,
}

impl<R> UnnestSchema<R> {
    /// Create a schema with no columns.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Declare a column with its Postgres type tag and per-row transform.
    ///
    /// The transform extracts (or computes) the column's value from a row;
    /// plain field access is the common case. Return an `Option` to bind
    /// SQL NULL for rows where the value is absent.
    pub fn column<V, F>(mut self, name: &str, ty: PgType, transform: F) -> Self
    where
        V: ToSql + Send + Sync + 'static,
        F: Fn(&R) -> V + 'static,
    {
        self.columns.push(UnnestColumn {
            name: name.to_string(),
            ty,
            collect: Box::new(move |rows| Param::new(pivot(rows, &transform))),
        });
        self
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Pivot a batch of rows into an UNNEST clause.
    ///
    /// For each declared column, in schema order, every row is mapped
    /// through the column's transform into one array; `params[i]` binds
    /// placeholder `$i+1` as a single array-typed parameter (the arrays are
    /// not flattened).
    pub fn apply(&self, rows: &[R]) -> UnnestClause {
        use std::fmt::Write;

        let mut cols = String::new();
        let mut casts = String::new();
        let mut params = ParamList::new();

        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                cols.push_str(", ");
                casts.push_str(", ");
            }
            push_quoted(&mut cols, &column.name);
            let idx = params.push_param((column.collect)(rows));
            let _ = write!(&mut casts, "${}::{}[]", idx, column.ty);
        }

        let unnest = format!("UNNEST({}) AS t({})", casts, cols);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgfrag",
            unnest = %unnest,
            columns = self.columns.len(),
            rows = rows.len(),
            "built unnest clause"
        );

        UnnestClause {
            cols,
            unnest,
            params,
        }
    }
}

impl<R> Default for UnnestSchema<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// The output of [`UnnestSchema::apply`]: SQL pieces for splicing into an
/// INSERT plus the column-major array parameters.
#[derive(Debug, Clone)]
pub struct UnnestClause {
    cols: String,
    unnest: String,
    params: ParamList,
}

impl UnnestClause {
    /// The quoted, comma-joined column list, e.g. `"id", "level"`.
    pub fn cols(&self) -> &str {
        &self.cols
    }

    /// The `UNNEST($1::type[], ...) AS t(...)` clause.
    pub fn unnest(&self) -> &str {
        &self.unnest
    }

    /// The per-column array parameters, in column order.
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }
}

/// Pivot one column out of a row batch: row-major records in, one
/// column-major array out.
fn pivot<R, V>(rows: &[R], transform: impl Fn(&R) -> V) -> Vec<V> {
    rows.iter().map(transform).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct Event {
        id: Uuid,
        level: String,
        detail: Option<String>,
    }

    fn schema() -> UnnestSchema<Event> {
        UnnestSchema::new()
            .column("id", PgType::Uuid, |e: &Event| e.id)
            .column("level", PgType::Text, |e: &Event| e.level.clone())
            .column("detail", PgType::Text, |e: &Event| e.detail.clone())
    }

    fn rows() -> Vec<Event> {
        vec![
            Event {
                id: Uuid::nil(),
                level: "info".into(),
                detail: None,
            },
            Event {
                id: Uuid::nil(),
                level: "error".into(),
                detail: Some("boom".into()),
            },
        ]
    }

    #[test]
    fn renders_casts_in_schema_order() {
        let clause = schema().apply(&rows());
        assert_eq!(clause.cols(), "\"id\", \"level\", \"detail\"");
        assert_eq!(
            clause.unnest(),
            "UNNEST($1::uuid[], $2::text[], $3::text[]) AS t(\"id\", \"level\", \"detail\")"
        );
    }

    #[test]
    fn binds_one_array_param_per_column() {
        let clause = schema().apply(&rows());
        assert_eq!(clause.params_ref().len(), 3);
    }

    #[test]
    fn schema_is_reusable_across_batches() {
        let schema = schema();
        let a = schema.apply(&rows());
        let b = schema.apply(&[]);
        assert_eq!(a.unnest(), b.unnest());
        assert_eq!(b.params_ref().len(), 3);
    }

    #[test]
    fn pivot_keeps_row_order() {
        let values = pivot(&rows(), |e| e.level.clone());
        assert_eq!(values, vec!["info".to_string(), "error".to_string()]);
    }

    #[test]
    fn pivot_maps_absent_values_to_none() {
        let values = pivot(&rows(), |e| e.detail.clone());
        assert_eq!(values, vec![None, Some("boom".to_string())]);
    }

    #[test]
    fn computed_transform_is_applied_per_row() {
        let schema = UnnestSchema::new().column("level_upper", PgType::Text, |e: &Event| {
            e.level.to_uppercase()
        });
        let clause = schema.apply(&rows());
        assert_eq!(
            clause.unnest(),
            "UNNEST($1::text[]) AS t(\"level_upper\")"
        );
        assert_eq!(clause.params_ref().len(), 1);
    }

    #[test]
    fn array_element_type_renders_nested_suffix() {
        struct Tagged {
            tags: Vec<String>,
        }
        let schema = UnnestSchema::new().column(
            "tags",
            PgType::Array(Box::new(PgType::Text)),
            |t: &Tagged| t.tags.clone(),
        );
        let clause = schema.apply(&[Tagged { tags: vec!["a".into()] }]);
        assert_eq!(clause.unnest(), "UNNEST($1::text[][]) AS t(\"tags\")");
    }
}
