//! PostgreSQL type tags for UNNEST casts.

use std::fmt;

/// A PostgreSQL scalar type name, used verbatim in `::type[]` casts.
///
/// The tag is never validated against a live database; it is rendered into
/// the cast exactly as named here. [`PgType::Array`] appends a `[]` suffix
/// for element types that are themselves arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgType {
    Smallint,
    Integer,
    Bigint,
    Numeric,
    Real,
    DoublePrecision,
    Boolean,
    Text,
    Varchar,
    Char,
    Timestamp,
    Timestamptz,
    Date,
    Time,
    Interval,
    Bytea,
    Inet,
    Cidr,
    Macaddr,
    Json,
    Jsonb,
    Uuid,
    Money,
    Oid,
    Xml,
    Tsvector,
    Tsquery,
    /// An array of a base type, rendered with a `[]` suffix.
    Array(Box<PgType>),
}

impl fmt::Display for PgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgType::Smallint => f.write_str("smallint"),
            PgType::Integer => f.write_str("integer"),
            PgType::Bigint => f.write_str("bigint"),
            PgType::Numeric => f.write_str("numeric"),
            PgType::Real => f.write_str("real"),
            PgType::DoublePrecision => f.write_str("double precision"),
            PgType::Boolean => f.write_str("boolean"),
            PgType::Text => f.write_str("text"),
            PgType::Varchar => f.write_str("varchar"),
            PgType::Char => f.write_str("char"),
            PgType::Timestamp => f.write_str("timestamp"),
            PgType::Timestamptz => f.write_str("timestamptz"),
            PgType::Date => f.write_str("date"),
            PgType::Time => f.write_str("time"),
            PgType::Interval => f.write_str("interval"),
            PgType::Bytea => f.write_str("bytea"),
            PgType::Inet => f.write_str("inet"),
            PgType::Cidr => f.write_str("cidr"),
            PgType::Macaddr => f.write_str("macaddr"),
            PgType::Json => f.write_str("json"),
            PgType::Jsonb => f.write_str("jsonb"),
            PgType::Uuid => f.write_str("uuid"),
            PgType::Money => f.write_str("money"),
            PgType::Oid => f.write_str("oid"),
            PgType::Xml => f.write_str("xml"),
            PgType::Tsvector => f.write_str("tsvector"),
            PgType::Tsquery => f.write_str("tsquery"),
            PgType::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}
