//! Field expansion: build a SELECT clause from object metadata
//!
//! The table lookup is a token scan, not a SOQL parser. It only recognises an
//! upper-case `FROM` token followed by the table token; lower-case `from`,
//! subqueries and `FROM` glued to punctuation are missed. Replace
//! [`find_table_name`] to support more.

use crate::api::errors::QueryError;
use crate::api::metadata::get_field_names;
use crate::api::session::Session;
use crate::api::transport::Transport;
use log::debug;

/// Token immediately after a literal `FROM` token, if any
pub fn find_table_name(query: &str) -> Option<&str> {
    let mut tokens = query.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "FROM" {
            return tokens.next();
        }
    }
    None
}

/// Prepend `SELECT <fields> ` to the query text verbatim.
///
/// A query that already has its own SELECT ends up with two; callers that
/// ask for expansion are expected to pass a SELECT-less query.
pub fn expand_fields(query: &str, fields: &[String]) -> String {
    format!("SELECT {} {}", fields.join(","), query)
}

/// Look up the table's fields and rewrite the query
pub(crate) async fn expand_query(
    transport: &dyn Transport,
    session: &Session,
    query: &str,
) -> Result<String, QueryError> {
    let table =
        find_table_name(query).ok_or_else(|| QueryError::MissingTable(query.to_string()))?;
    let fields = get_field_names(transport, session, table)
        .await
        .map_err(QueryError::Expansion)?;
    debug!("Expanding query on {} to {} fields", table, fields.len());
    Ok(expand_fields(query, &fields))
}
