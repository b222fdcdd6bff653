//! Multi-clause SQL composer.
//!
//! [`SqlBuilder`] accumulates already-built fragments (or literal clause
//! strings with `?`/`??` markers) into one statement, renumbering incoming
//! placeholders so they stay globally consistent. Segments are joined with
//! newlines at [`SqlBuilder::build`] time.
//!
//! # Example
//!
//! ```
//! use pgfrag::builder::SqlBuilder;
//! use pgfrag::param::BindValue;
//!
//! let mut b = SqlBuilder::from_clause("SELECT * FROM users WHERE org = ?", vec![BindValue::one(7_i64)])?;
//! b.add_clause("AND id IN (??)", vec![BindValue::many(vec![1_i64, 2])])?;
//! let q = b.build();
//!
//! assert_eq!(q.text(), "SELECT * FROM users WHERE org = $1\nAND id IN ($2, $3)");
//! assert_eq!(q.params_ref().len(), 3);
//! # Ok::<(), pgfrag::SqlError>(())
//! ```

use crate::error::{SqlError, SqlResult};
use crate::fragment::{shift_placeholders, trace_built, Fragment};
use crate::param::{BindValue, ParamList};

/// Composes fragments into one statement with globally consistent
/// placeholder numbering.
///
/// The builder is single-use: once [`build`](SqlBuilder::build) has been
/// called, further `add` calls fail with [`SqlError::AfterBuild`]. `build`
/// itself may be called again and returns the same fragment.
pub struct SqlBuilder {
    parts: Vec<String>,
    params: ParamList,
    built: bool,
}

impl SqlBuilder {
    /// Start a composition from an initial fragment.
    pub fn new(initial: Fragment) -> Self {
        let (text, params) = initial.into_parts();
        Self {
            parts: vec![text],
            params,
            built: false,
        }
    }

    /// Start a composition from a clause string with `?`/`??` markers and a
    /// positional parameter list.
    pub fn from_clause(clause: &str, params: Vec<BindValue>) -> SqlResult<Self> {
        let (text, params) = transform_clause(clause, params, 0)?;
        Ok(Self {
            parts: vec![text],
            params,
            built: false,
        })
    }

    /// Append a fragment, shifting its placeholders past the parameters
    /// already accumulated.
    pub fn add(&mut self, fragment: Fragment) -> SqlResult<&mut Self> {
        if self.built {
            return Err(SqlError::AfterBuild);
        }
        let (text, params) = fragment.into_parts();
        self.parts.push(shift_placeholders(&text, self.params.len()));
        self.params.extend(&params);
        Ok(self)
    }

    /// Append a clause string with `?`/`??` markers and a positional
    /// parameter list.
    ///
    /// `?` consumes exactly one scalar parameter and emits one placeholder.
    /// `??` consumes exactly one list parameter, which must be non-empty,
    /// and expands to one placeholder per element. Marker and parameter
    /// counts must agree.
    pub fn add_clause(&mut self, clause: &str, params: Vec<BindValue>) -> SqlResult<&mut Self> {
        if self.built {
            return Err(SqlError::AfterBuild);
        }
        let (text, params) = transform_clause(clause, params, self.params.len())?;
        self.parts.push(text);
        self.params.extend(&params);
        Ok(self)
    }

    /// Close the composer and return the composed fragment.
    ///
    /// Segments are joined with a single newline; parameters keep their
    /// append order.
    pub fn build(&mut self) -> Fragment {
        self.built = true;
        let fragment = Fragment::new(self.parts.join("\n"), self.params.clone());
        trace_built("build", &fragment);
        fragment
    }
}

/// Render `?`/`??` markers as `$n` placeholders, numbering from
/// `start_index`, and collect the consumed parameters.
fn transform_clause(
    clause: &str,
    params: Vec<BindValue>,
    start_index: usize,
) -> SqlResult<(String, ParamList)> {
    use std::fmt::Write;

    let mut out = String::with_capacity(clause.len() + 8);
    let mut taken = ParamList::new();
    let mut counter = start_index;
    let mut supplied = params.into_iter();
    let mut chars = clause.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '?' {
            out.push(c);
            continue;
        }

        let expand = chars.peek() == Some(&'?');
        if expand {
            chars.next();
        }

        let Some(param) = supplied.next() else {
            return Err(SqlError::mismatch(format!(
                "clause {clause:?} has more markers than parameters"
            )));
        };

        match (expand, param) {
            (false, BindValue::One(p)) => {
                counter += 1;
                taken.push_param(p);
                let _ = write!(&mut out, "${}", counter);
            }
            (false, BindValue::Many(_)) => {
                return Err(SqlError::mismatch(format!(
                    "\"?\" in clause {clause:?} cannot bind a list; use \"??\" to expand it"
                )));
            }
            (true, BindValue::Many(list)) => {
                if list.is_empty() {
                    return Err(SqlError::EmptyArray);
                }
                for (i, p) in list.into_iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    counter += 1;
                    taken.push_param(p);
                    let _ = write!(&mut out, "${}", counter);
                }
            }
            (true, BindValue::One(_)) => {
                return Err(SqlError::mismatch(format!(
                    "\"??\" in clause {clause:?} expects a list parameter"
                )));
            }
        }
    }

    if supplied.next().is_some() {
        return Err(SqlError::mismatch(format!(
            "clause {clause:?} has fewer markers than parameters"
        )));
    }

    Ok((out.trim().to_string(), taken))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, values: Vec<i64>) -> Fragment {
        let mut params = ParamList::new();
        for v in values {
            params.push(v);
        }
        Fragment::new(text, params)
    }

    #[test]
    fn add_renumbers_by_running_value_count() {
        let mut b = SqlBuilder::new(fragment("SELECT 1", vec![]));
        b.add(fragment("WHERE x=$1", vec![5])).unwrap();
        b.add(fragment("AND y=$1", vec![9])).unwrap();
        let q = b.build();

        assert_eq!(q.text(), "SELECT 1\nWHERE x=$1\nAND y=$2");
        assert_eq!(q.params_ref().len(), 2);
    }

    #[test]
    fn add_preserves_param_order() {
        let mut b = SqlBuilder::new(fragment("a = $1 AND b = $2", vec![1, 2]));
        b.add(fragment("AND c IN ($1, $2)", vec![3, 4])).unwrap();
        let q = b.build();

        assert_eq!(q.text(), "a = $1 AND b = $2\nAND c IN ($3, $4)");
        assert_eq!(q.params_ref().len(), 4);
    }

    #[test]
    fn add_after_build_fails() {
        let mut b = SqlBuilder::new(fragment("SELECT 1", vec![]));
        b.build();
        assert!(matches!(
            b.add(fragment("WHERE x=$1", vec![5])),
            Err(SqlError::AfterBuild)
        ));
    }

    #[test]
    fn build_is_idempotent() {
        let mut b = SqlBuilder::new(fragment("SELECT x FROM t WHERE a = $1", vec![3]));
        let first = b.build();
        let second = b.build();
        assert_eq!(first.text(), second.text());
        assert_eq!(first.params_ref().len(), second.params_ref().len());
    }

    #[test]
    fn clause_markers_render_in_order() {
        let mut b = SqlBuilder::from_clause(
            "SELECT * FROM t WHERE a = ? AND b = ?",
            vec![BindValue::one(1_i64), BindValue::one("x")],
        )
        .unwrap();
        let q = b.build();
        assert_eq!(q.text(), "SELECT * FROM t WHERE a = $1 AND b = $2");
        assert_eq!(q.params_ref().len(), 2);
    }

    #[test]
    fn clause_expansion_continues_numbering() {
        let mut b = SqlBuilder::from_clause(
            "SELECT * FROM t WHERE org = ?",
            vec![BindValue::one(7_i64)],
        )
        .unwrap();
        b.add_clause("AND id IN (??)", vec![BindValue::many(vec![1_i64, 2, 3])])
            .unwrap();
        let q = b.build();
        assert_eq!(
            q.text(),
            "SELECT * FROM t WHERE org = $1\nAND id IN ($2, $3, $4)"
        );
        assert_eq!(q.params_ref().len(), 4);
    }

    #[test]
    fn clause_rejects_marker_param_count_mismatch() {
        assert!(matches!(
            SqlBuilder::from_clause("a = ? AND b = ?", vec![BindValue::one(1_i64)]),
            Err(SqlError::PlaceholderMismatch(_))
        ));
        assert!(matches!(
            SqlBuilder::from_clause(
                "a = ?",
                vec![BindValue::one(1_i64), BindValue::one(2_i64)]
            ),
            Err(SqlError::PlaceholderMismatch(_))
        ));
    }

    #[test]
    fn clause_rejects_scalar_for_expansion_marker() {
        assert!(matches!(
            SqlBuilder::from_clause("id IN (??)", vec![BindValue::one(1_i64)]),
            Err(SqlError::PlaceholderMismatch(_))
        ));
    }

    #[test]
    fn clause_rejects_list_for_scalar_marker() {
        assert!(matches!(
            SqlBuilder::from_clause("id = ?", vec![BindValue::many(vec![1_i64])]),
            Err(SqlError::PlaceholderMismatch(_))
        ));
    }

    #[test]
    fn clause_rejects_empty_expansion_list() {
        assert!(matches!(
            SqlBuilder::from_clause("id IN (??)", vec![BindValue::many(Vec::<i64>::new())]),
            Err(SqlError::EmptyArray)
        ));
    }

    #[test]
    fn clause_without_markers_takes_no_params() {
        let mut b = SqlBuilder::from_clause("SELECT * FROM audit_log", vec![]).unwrap();
        b.add_clause("ORDER BY at DESC", vec![]).unwrap();
        let q = b.build();
        assert_eq!(q.text(), "SELECT * FROM audit_log\nORDER BY at DESC");
        assert!(q.params_ref().is_empty());
    }

    #[test]
    fn mixed_fragment_and_clause_segments_stay_aligned() {
        let mut b = SqlBuilder::new(fragment("SELECT * FROM t WHERE a = $1", vec![10]));
        b.add_clause("AND b = ?", vec![BindValue::one(20_i64)])
            .unwrap();
        b.add(fragment("AND c = $1", vec![30])).unwrap();
        let q = b.build();
        assert_eq!(
            q.text(),
            "SELECT * FROM t WHERE a = $1\nAND b = $2\nAND c = $3"
        );
        assert_eq!(q.params_ref().len(), 3);
    }
}
