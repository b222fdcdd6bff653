//! The `(text, values)` pair every builder produces and consumes.

use crate::param::ParamList;
use tokio_postgres::types::ToSql;

/// A parameterized SQL fragment: query text plus the values bound to its
/// placeholders.
///
/// Invariant: the placeholders appearing in `text` are `$1..$N`, contiguous
/// and starting at 1, and `$i` binds `params[i - 1]`. Every builder in this
/// crate upholds this for fragments in isolation and for composed results;
/// hand-built fragments are expected to uphold it too.
#[derive(Clone, Debug)]
pub struct Fragment {
    text: String,
    params: ParamList,
}

impl Fragment {
    /// Create a fragment from text and an aligned parameter list.
    pub fn new(text: impl Into<String>, params: ParamList) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// The rendered SQL text with `$1, $2, ...` placeholders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The bound parameters, in placeholder order.
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }

    pub(crate) fn into_parts(self) -> (String, ParamList) {
        (self.text, self.params)
    }
}

/// Shift every `$n` placeholder reference in `text` by `offset`.
///
/// Used when appending a fragment to a composition that already holds
/// `offset` parameters. A `$` not followed by a digit is copied through
/// untouched, so dollar-quoted strings are unaffected.
pub(crate) fn shift_placeholders(text: &str, offset: usize) -> String {
    if offset == 0 {
        return text.to_string();
    }

    use std::fmt::Write;
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            let mut n: usize = 0;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                n = n * 10 + d as usize;
                chars.next();
            }
            let _ = write!(&mut out, "${}", n + offset);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(feature = "tracing")]
pub(crate) fn trace_built(op: &'static str, fragment: &Fragment) {
    tracing::debug!(
        target: "pgfrag",
        op,
        sql = %fragment.text(),
        params = fragment.params().len(),
        "built sql fragment"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_built(_op: &'static str, _fragment: &Fragment) {}
