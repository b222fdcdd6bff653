//! UPDATE statement builder.

use crate::error::{SqlError, SqlResult};
use crate::fragment::{trace_built, Fragment};
use crate::ident::push_quoted;
use crate::insert::{Record, Returning};
use crate::param::ParamList;
use crate::where_builder::{where_clause, WhereMap};

/// Build an UPDATE statement from a SET record and a WHERE map.
///
/// SET pairs render first and claim the leading placeholder indices; the
/// WHERE clause is rendered by the WHERE builder with its numbering
/// continuing immediately after the SET clause's highest index.
///
/// # Example
///
/// ```
/// use pgfrag::insert::{Record, Returning};
/// use pgfrag::update::build_update;
/// use pgfrag::where_builder::WhereMap;
///
/// let q = build_update(
///     "users",
///     &Record::new().set("status", "inactive"),
///     &WhereMap::new().eq("id", 7_i64),
///     &Returning::None,
/// )?;
/// assert_eq!(q.text(), "UPDATE \"users\" SET \"status\" = $1 WHERE \"id\" = $2");
/// assert_eq!(q.params_ref().len(), 2);
/// # Ok::<(), pgfrag::SqlError>(())
/// ```
pub fn build_update(
    table: &str,
    data: &Record,
    where_map: &WhereMap,
    returning: &Returning,
) -> SqlResult<Fragment> {
    use std::fmt::Write;

    if data.is_empty() {
        return Err(SqlError::EmptyData);
    }
    if where_map.is_empty() {
        return Err(SqlError::EmptyWhere);
    }

    let mut text = String::from("UPDATE ");
    push_quoted(&mut text, table);
    text.push_str(" SET ");

    let mut params = ParamList::new();
    for (i, (column, param)) in data.entries().iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        push_quoted(&mut text, column);
        let idx = params.push_param(param.clone());
        let _ = write!(&mut text, " = ${}", idx);
    }

    let (clause, where_params) = where_clause(where_map, params.len())?;
    text.push_str(" WHERE ");
    text.push_str(&clause);
    params.extend(&where_params);

    returning.push_to(&mut text);

    let fragment = Fragment::new(text, params);
    trace_built("update", &fragment);
    Ok(fragment)
}
