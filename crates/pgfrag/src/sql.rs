//! SQL-first dynamic builder.
//!
//! Two surfaces share one mechanism here:
//! - [`Sql`] is a push builder for composing SQL incrementally without
//!   manually tracking placeholder indices.
//! - [`template`] consumes a whole statement at once as literal segments plus
//!   typed expression nodes, the calling convention for source ecosystems
//!   with tagged template literals.
//!
//! # Example
//!
//! ```
//! use pgfrag::sql::sql;
//!
//! let mut q = sql("SELECT id, username FROM users WHERE 1=1");
//! q.push(" AND status = ").push_bind("active");
//! q.push(" ORDER BY created_at DESC");
//!
//! let fragment = q.into_fragment();
//! assert_eq!(
//!     fragment.text(),
//!     "SELECT id, username FROM users WHERE 1=1 AND status = $1 ORDER BY created_at DESC"
//! );
//! ```

use crate::error::{SqlError, SqlResult};
use crate::fragment::{trace_built, Fragment};
use crate::param::{BindValue, ParamList};
use tokio_postgres::types::ToSql;

#[derive(Debug)]
enum SqlPart {
    Text(String),
    Param,
}

/// A parameter-safe dynamic SQL builder.
///
/// `Sql` stores text pieces and parameters separately and generates
/// `$1, $2, ...` placeholders in the final SQL string, so fragments can be
/// appended in any order without index bookkeeping.
pub struct Sql {
    parts: Vec<SqlPart>,
    params: ParamList,
}

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

impl Sql {
    /// Create a new builder with an initial SQL piece.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            parts: vec![SqlPart::Text(initial_sql.into())],
            params: ParamList::new(),
        }
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            params: ParamList::new(),
        }
    }

    /// Append raw SQL text (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Text(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Text(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.parts.push(SqlPart::Param);
        self.params.push(value);
        self
    }

    /// Append a comma-separated list of placeholders and bind all values.
    ///
    /// Fails with [`SqlError::EmptyArray`] if `values` is empty: an empty
    /// `IN ()` is not valid SQL and cannot be bound.
    pub fn push_bind_list<T>(&mut self, values: impl IntoIterator<Item = T>) -> SqlResult<&mut Self>
    where
        T: ToSql + Send + Sync + 'static,
    {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return Err(SqlError::EmptyArray);
        };

        self.push_bind(first);
        for v in iter {
            self.push(", ");
            self.push_bind(v);
        }
        Ok(self)
    }

    /// Append another `Sql` fragment, consuming it.
    pub fn push_sql(&mut self, mut other: Sql) -> &mut Self {
        self.parts.append(&mut other.parts);
        self.params.extend(&other.params);
        self
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut idx: usize = 0;

        for part in &self.parts {
            match part {
                SqlPart::Text(s) => out.push_str(s),
                SqlPart::Param => {
                    idx += 1;
                    use std::fmt::Write;
                    let _ = write!(&mut out, "${}", idx);
                }
            }
        }
        out
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }

    /// Finish building and return the rendered fragment.
    pub fn into_fragment(self) -> Fragment {
        let text = self.to_sql();
        Fragment::new(text, self.params)
    }
}

/// A template expression node: the three categories an interpolated value
/// can fall into.
///
/// `Raw` is the trusted-SQL escape hatch: its text is spliced verbatim and
/// binds nothing. It is a proper variant, not a structural probe on value
/// shape, so an ordinary bound string can never be mistaken for raw SQL.
#[derive(Debug, Clone)]
pub enum SqlExpr {
    /// Splice this text verbatim; allocate no placeholder.
    Raw(String),
    /// Bind a scalar (one placeholder) or a list (one placeholder each).
    Bind(BindValue),
}

impl SqlExpr {
    /// Trusted raw SQL, spliced into the output verbatim.
    ///
    /// **Warning**: this bypasses parameter binding. Only use with SQL from
    /// trusted, non-user-controlled sources.
    pub fn raw(text: impl Into<String>) -> Self {
        SqlExpr::Raw(text.into())
    }

    /// Bind one scalar value.
    pub fn bind<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        SqlExpr::Bind(BindValue::one(value))
    }

    /// Bind a list, expanded to one placeholder per element.
    pub fn list<T, I>(values: I) -> Self
    where
        T: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        SqlExpr::Bind(BindValue::many(values))
    }
}

/// Build a fragment from literal segments with interpolated expressions.
///
/// `segments` and `exprs` interleave: segment 0, expression 0, segment 1,
/// expression 1, ... so `exprs.len()` must be exactly `segments.len() - 1`.
/// Literal segments are concatenated verbatim; the final text is trimmed of
/// leading and trailing whitespace only. Placeholder numbering starts at 1
/// and is local to one invocation.
///
/// # Example
///
/// ```
/// use pgfrag::sql::{template, SqlExpr};
///
/// let q = template(
///     &["SELECT * FROM logs WHERE level = ", " AND id IN (", ")"],
///     [SqlExpr::bind("error"), SqlExpr::list(vec![1_i64, 2, 3])],
/// )?;
/// assert_eq!(
///     q.text(),
///     "SELECT * FROM logs WHERE level = $1 AND id IN ($2, $3, $4)"
/// );
/// assert_eq!(q.params_ref().len(), 4);
/// # Ok::<(), pgfrag::SqlError>(())
/// ```
pub fn template(
    segments: &[&str],
    exprs: impl IntoIterator<Item = SqlExpr>,
) -> SqlResult<Fragment> {
    use std::fmt::Write;

    let exprs: Vec<SqlExpr> = exprs.into_iter().collect();
    if segments.is_empty() || exprs.len() != segments.len() - 1 {
        return Err(SqlError::mismatch(format!(
            "template has {} segments but {} expressions",
            segments.len(),
            exprs.len()
        )));
    }

    let mut text = String::new();
    let mut params = ParamList::new();

    for (seg, expr) in segments[..segments.len() - 1].iter().zip(exprs) {
        text.push_str(seg);
        match expr {
            SqlExpr::Raw(raw) => text.push_str(&raw),
            SqlExpr::Bind(BindValue::One(p)) => {
                let idx = params.push_param(p);
                let _ = write!(&mut text, "${}", idx);
            }
            SqlExpr::Bind(BindValue::Many(list)) => {
                if list.is_empty() {
                    return Err(SqlError::EmptyArray);
                }
                for (i, p) in list.into_iter().enumerate() {
                    if i > 0 {
                        text.push_str(", ");
                    }
                    let idx = params.push_param(p);
                    let _ = write!(&mut text, "${}", idx);
                }
            }
        }
    }
    text.push_str(segments[segments.len() - 1]);

    let fragment = Fragment::new(text.trim(), params);
    trace_built("template", &fragment);
    Ok(fragment)
}
