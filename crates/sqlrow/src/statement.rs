//! Statement glue: render INSERT/UPDATE text for an assignment list, bind it, run it.
//!
//! The coder itself never touches storage; this is the hand-off point where an assignment list
//! meets a real connection.  Statements bind every column as a named `:column` parameter, so a
//! prepared statement can be reused across records of the same shape.  Connection management,
//! transactions and schema stay with the caller.
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::config::CoderConfig;
use crate::encode::{encode_record, ColumnAssignment};
use crate::errors::{Error, Result};

lazy_static::lazy_static! {
    static ref IDENTIFIER: regex::Regex =
        regex::Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex compiles");
}

/// Conflict clause for INSERT, mirroring the engine's OR variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    Abort,
    Fail,
    Ignore,
    Replace,
    Rollback,
}

impl OnConflict {
    fn keyword(self) -> &'static str {
        match self {
            OnConflict::Abort => "ABORT",
            OnConflict::Fail => "FAIL",
            OnConflict::Ignore => "IGNORE",
            OnConflict::Replace => "REPLACE",
            OnConflict::Rollback => "ROLLBACK",
        }
    }
}

fn check_identifier(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

fn checked_columns(assignments: &[ColumnAssignment]) -> Result<Vec<&str>> {
    let columns = assignments
        .iter()
        .map(|a| a.column.as_str())
        .collect_vec();
    for column in &columns {
        check_identifier(column)?;
    }
    Ok(columns)
}

const INSERT_TEMPLATE: &str = r#"
INSERT {% if conflict %}OR {{ conflict }} {% endif %}INTO {{ table }}(
    {{ columns | join(sep=", ") }}
) VALUES (
    {%- for c in columns -%}
    :{{ c }}{% if not loop.last %}, {% endif -%}
    {%- endfor -%}
)
"#;

const UPDATE_TEMPLATE: &str = r#"
UPDATE {{ table }} SET
    {% for c in columns %}{{ c }} = :{{ c }}{% if not loop.last %}, {% endif %}{% endfor %}
{%- if filter %} WHERE {{ filter }}{% endif %}
"#;

/// Render the INSERT for an assignment list.
pub fn insert_statement(
    table: &str,
    assignments: &[ColumnAssignment],
    on_conflict: Option<OnConflict>,
) -> Result<String> {
    check_identifier(table)?;
    let mut context = tera::Context::new();
    context.insert("table", table);
    context.insert("columns", &checked_columns(assignments)?);
    context.insert("conflict", &on_conflict.map(OnConflict::keyword));
    let sql = tera::Tera::one_off(INSERT_TEMPLATE, &context, false)?;
    debug!("Insert statement for {}: {}", table, sql);
    Ok(sql)
}

/// Render the UPDATE for an assignment list.
///
/// `filter` is a raw WHERE body supplied by the caller; with `None` the update touches every
/// row in the table.
pub fn update_statement(
    table: &str,
    assignments: &[ColumnAssignment],
    filter: Option<&str>,
) -> Result<String> {
    check_identifier(table)?;
    let mut context = tera::Context::new();
    context.insert("table", table);
    context.insert("columns", &checked_columns(assignments)?);
    context.insert("filter", &filter);
    let sql = tera::Tera::one_off(UPDATE_TEMPLATE, &context, false)?;
    debug!("Update statement for {}: {}", table, sql);
    Ok(sql)
}

/// Bind every assignment to its named parameter and run the statement once.
pub fn execute_assignments(
    conn: &rusqlite::Connection,
    sql: &str,
    assignments: &[ColumnAssignment],
) -> Result<usize> {
    let mut statement = conn.prepare_cached(sql)?;
    for assignment in assignments {
        let name = format!(":{}", assignment.column);
        let index = statement.parameter_index(&name)?.ok_or_else(|| {
            Error::Message(format!("statement has no parameter named {}", name))
        })?;
        statement.raw_bind_parameter(index, &assignment.value)?;
    }
    Ok(statement.raw_execute()?)
}

/// Encode a record and INSERT it.
pub fn insert_record<T: Serialize>(
    conn: &rusqlite::Connection,
    table: &str,
    record: &T,
    config: &CoderConfig,
) -> Result<usize> {
    insert_record_or(conn, table, record, config, None)
}

/// Encode a record and INSERT it with a conflict clause.
pub fn insert_record_or(
    conn: &rusqlite::Connection,
    table: &str,
    record: &impl Serialize,
    config: &CoderConfig,
    on_conflict: Option<OnConflict>,
) -> Result<usize> {
    let assignments = encode_record(record, config)?;
    let sql = insert_statement(table, &assignments, on_conflict)?;
    execute_assignments(conn, &sql, &assignments)
}

/// Encode a record and UPDATE the rows selected by `filter` with all of its fields.
pub fn update_record(
    conn: &rusqlite::Connection,
    table: &str,
    record: &impl Serialize,
    config: &CoderConfig,
    filter: Option<&str>,
) -> Result<usize> {
    let assignments = encode_record(record, config)?;
    let sql = update_statement(table, &assignments, filter)?;
    execute_assignments(conn, &sql, &assignments)
}
