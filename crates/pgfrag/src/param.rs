//! Parameter storage using Arc for clone-friendly fragments.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly parameter wrapper using Arc.
///
/// Fragments hold their bound values as `Param`s so they can be cloned,
/// composed, and renumbered without copying the underlying values. The value
/// itself is opaque: it is never interpreted, only positioned against a
/// `$n` placeholder.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        // Arc<dyn ToSql + Send + Sync> -> &(dyn ToSql + Sync)
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// An ordered collection of parameters aligned to `$1, $2, ...` placeholders.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based placeholder index.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.params.push(Param::new(value));
        self.params.len()
    }

    /// Add a pre-wrapped Param and return its 1-based placeholder index.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Extend this list with another list's parameters.
    pub fn extend(&mut self, other: &ParamList) {
        self.params.extend(other.params.iter().cloned());
    }

    /// Extend this list with parameters from an iterator.
    pub fn extend_params(&mut self, params: impl IntoIterator<Item = Param>) {
        self.params.extend(params);
    }
}

/// A bind site that is either one scalar or a list to be expanded.
///
/// WHERE maps and the `?`/`??` clause convention both accept scalars and
/// lists; this is the tagged distinction between them. A list always expands
/// to one placeholder per element. To bind a whole Rust `Vec` as a single
/// Postgres array parameter (e.g. for `= ANY($1)`), wrap it with
/// [`BindValue::one`] instead.
#[derive(Debug, Clone)]
pub enum BindValue {
    /// One scalar, one placeholder.
    One(Param),
    /// A list expanded to one placeholder per element.
    Many(Vec<Param>),
}

impl BindValue {
    /// Bind a single scalar value.
    pub fn one<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        BindValue::One(Param::new(value))
    }

    /// Bind a list of values, one placeholder per element.
    pub fn many<T, I>(values: I) -> Self
    where
        T: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        BindValue::Many(values.into_iter().map(Param::new).collect())
    }
}
