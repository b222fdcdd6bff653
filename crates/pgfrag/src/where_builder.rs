//! WHERE clause builder over ordered column/value maps.

use crate::error::{SqlError, SqlResult};
use crate::fragment::{trace_built, Fragment};
use crate::ident::push_quoted;
use crate::param::{BindValue, ParamList};
use tokio_postgres::types::ToSql;

/// An ordered map from column name to a scalar or list condition value.
///
/// Iteration order is insertion order, and it alone determines the rendered
/// clause order, so the same construction sequence always produces
/// byte-identical SQL text.
#[derive(Debug, Clone, Default)]
pub struct WhereMap {
    entries: Vec<(String, BindValue)>,
}

impl WhereMap {
    /// Create an empty condition map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an equality condition: `"column" = $n`.
    pub fn eq<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.entries
            .push((column.to_string(), BindValue::one(value)));
        self
    }

    /// Add a membership condition: `"column" IN ($n, ...)`.
    ///
    /// The list must be non-empty by the time the clause is built.
    pub fn in_list<T, I>(mut self, column: &str, values: I) -> Self
    where
        T: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        self.entries
            .push((column.to_string(), BindValue::many(values)));
        self
    }

    /// Add a pre-built condition value.
    pub fn entry(mut self, column: &str, value: BindValue) -> Self {
        self.entries.push((column.to_string(), value));
        self
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no conditions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Options for [`build_where_with`].
#[derive(Debug, Clone, Default)]
pub struct WhereOptions {
    /// Emit the literal `WHERE ` keyword ahead of the clause. Off by
    /// default, which is the form spliced into larger statements that carry
    /// their own `WHERE`.
    pub include_keyword: bool,
}

/// Build an `AND`-joined condition clause from a non-empty map.
///
/// Scalars render as `"col" = $n`, lists as `"col" IN ($n, ...)`, in map
/// order. The output carries no `WHERE ` prefix; see [`build_where_with`]
/// to emit one.
///
/// # Example
///
/// ```
/// use pgfrag::where_builder::{build_where, WhereMap};
///
/// let q = build_where(&WhereMap::new().eq("id", 1_i64).eq("role", "admin"))?;
/// assert_eq!(q.text(), "\"id\" = $1 AND \"role\" = $2");
/// assert_eq!(q.params_ref().len(), 2);
/// # Ok::<(), pgfrag::SqlError>(())
/// ```
pub fn build_where(where_map: &WhereMap) -> SqlResult<Fragment> {
    build_where_with(where_map, &WhereOptions::default())
}

/// Build a condition clause, optionally prefixed with the `WHERE ` keyword.
pub fn build_where_with(where_map: &WhereMap, options: &WhereOptions) -> SqlResult<Fragment> {
    let (clause, params) = where_clause(where_map, 0)?;

    let text = if options.include_keyword {
        format!("WHERE {}", clause)
    } else {
        clause
    };

    let fragment = Fragment::new(text, params);
    trace_built("where", &fragment);
    Ok(fragment)
}

/// Render the bare clause with placeholder numbering starting after
/// `start_index` already-allocated parameters. Shared with the UPDATE
/// builder, whose SET clause claims the leading indices.
pub(crate) fn where_clause(
    where_map: &WhereMap,
    start_index: usize,
) -> SqlResult<(String, ParamList)> {
    use std::fmt::Write;

    if where_map.is_empty() {
        return Err(SqlError::EmptyWhere);
    }

    let mut text = String::new();
    let mut params = ParamList::new();

    for (i, (column, value)) in where_map.entries.iter().enumerate() {
        if i > 0 {
            text.push_str(" AND ");
        }
        push_quoted(&mut text, column);

        match value {
            BindValue::One(p) => {
                let idx = start_index + params.push_param(p.clone());
                let _ = write!(&mut text, " = ${}", idx);
            }
            BindValue::Many(list) => {
                if list.is_empty() {
                    return Err(SqlError::EmptyArray);
                }
                text.push_str(" IN (");
                for (j, p) in list.iter().enumerate() {
                    if j > 0 {
                        text.push_str(", ");
                    }
                    let idx = start_index + params.push_param(p.clone());
                    let _ = write!(&mut text, "${}", idx);
                }
                text.push(')');
            }
        }
    }

    Ok((text, params))
}
