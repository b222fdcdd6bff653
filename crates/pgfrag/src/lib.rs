//! # pgfrag
//!
//! Composable parameterized SQL fragments for PostgreSQL.
//!
//! Every builder in this crate produces a [`Fragment`]: a query string with
//! positional `$1, $2, ...` placeholders and a value list aligned to them,
//! ready to hand to a parameterized-query API such as `tokio-postgres`.
//! Untrusted data never ends up concatenated into SQL text.
//!
//! ## Features
//!
//! - **Template building**: literal SQL plus interpolated scalars, lists,
//!   and trusted raw text (`sql()` / [`template`])
//! - **Composition**: concatenate fragments while renumbering placeholders
//!   to stay globally consistent ([`SqlBuilder`])
//! - **Structured builders**: WHERE / INSERT / INSERT-many / UPDATE derived
//!   from ordered column/value maps
//! - **Bulk arrays**: pivot row batches into column-major arrays for
//!   `UNNEST()` inserts ([`UnnestSchema`])
//! - **Deterministic text**: identical input key order yields byte-identical
//!   SQL, so driver-side prepared-statement caches stay warm
//!
//! ## Example
//!
//! ```
//! use pgfrag::{build_where_with, sql, BindValue, SqlBuilder, WhereMap, WhereOptions};
//!
//! let filter = build_where_with(
//!     &WhereMap::new().eq("org", 7_i64).eq("status", "active"),
//!     &WhereOptions { include_keyword: true },
//! )?;
//!
//! let mut b = SqlBuilder::new(sql("SELECT id, name FROM users").into_fragment());
//! b.add(filter)?;
//! b.add_clause("LIMIT ?", vec![BindValue::one(20_i64)])?;
//! let q = b.build();
//!
//! assert_eq!(
//!     q.text(),
//!     "SELECT id, name FROM users\nWHERE \"org\" = $1 AND \"status\" = $2\nLIMIT $3"
//! );
//! assert_eq!(q.params_ref().len(), 3);
//! # Ok::<(), pgfrag::SqlError>(())
//! ```
//!
//! Identifier names and raw SQL are spliced verbatim and must come from
//! trusted sources. Values are always bound, never rendered.

pub mod builder;
pub mod error;
pub mod fragment;
pub mod ident;
pub mod insert;
pub mod param;
pub mod pg_type;
pub mod sql;
pub mod unnest;
pub mod update;
pub mod where_builder;

pub use builder::SqlBuilder;
pub use error::{SqlError, SqlResult};
pub use fragment::Fragment;
pub use ident::quoted;
pub use insert::{build_insert, build_insert_many, Record, Returning};
pub use param::{BindValue, Param, ParamList};
pub use pg_type::PgType;
pub use sql::{sql, template, Sql, SqlExpr};
pub use unnest::{UnnestClause, UnnestSchema};
pub use update::build_update;
pub use where_builder::{build_where, build_where_with, WhereMap, WhereOptions};
