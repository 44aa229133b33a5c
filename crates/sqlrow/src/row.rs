//! Rows as the decoder sees them.
//!
//! The decoder never talks to a statement directly; it reads from a [`RowAccess`], a read-only,
//! name-keyed view over one result row.  [`SqlRow`] is the shipped implementation: the row
//! materialized into a small name/value map.  Rows are built and dropped once per decode, so
//! this is a smallvec map rather than a hash map.
use smallvec::SmallVec;

use crate::column_value::{ColumnValue, SqlValue};
use crate::errors::{Error, Result};

/// One named cell.
#[derive(Debug, Clone)]
struct RowEntry {
    name: String,
    value: ColumnValue,
}

/// True when the names match ignoring ASCII case and any `_` separators, so `stringOptional`
/// finds `string_optional`.
fn loose_name_eq(a: &str, b: &str) -> bool {
    let squash = |s: &str| {
        s.chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect::<String>()
    };
    squash(a) == squash(b)
}

/// Read-only, name-keyed view over one result row.
pub trait RowAccess {
    fn column_count(&self) -> usize;

    /// Name of the column at `index`.  Indexes at or past `column_count` may panic.
    fn column_name(&self, index: usize) -> &str;

    /// Value of the column at `index`.  Indexes at or past `column_count` may panic.
    fn column_value(&self, index: usize) -> &ColumnValue;

    /// Resolve a field name to a column index.
    ///
    /// Exact spellings win.  Then an ASCII case-insensitive pass, then one which also ignores
    /// underscores.  A later pass never shadows an earlier hit, which keeps lookups unambiguous
    /// when both spellings exist as distinct columns.
    fn resolve(&self, field: &str) -> Option<usize> {
        let columns = 0..self.column_count();
        columns
            .clone()
            .find(|i| self.column_name(*i) == field)
            .or_else(|| {
                columns
                    .clone()
                    .find(|i| self.column_name(*i).eq_ignore_ascii_case(field))
            })
            .or_else(|| columns.clone().find(|i| loose_name_eq(self.column_name(*i), field)))
    }

    fn lookup(&self, field: &str) -> Option<&ColumnValue> {
        self.resolve(field).map(|i| self.column_value(i))
    }

    /// True when the field resolves to a column holding actual data; a stored NULL does not
    /// count.
    fn has_value(&self, field: &str) -> bool {
        self.lookup(field).map_or(false, |v| !v.is_null())
    }

    /// Fetch a column and convert it through the [`SqlValue`] contract.
    fn get<T: SqlValue>(&self, field: &str) -> Result<T> {
        let value = self
            .lookup(field)
            .ok_or_else(|| Error::MissingColumn(field.to_string()))?;
        T::from_column(value).ok_or_else(|| Error::TypeMismatch {
            column: field.to_string(),
            expected: T::STORAGE,
            found: value.storage_class(),
        })
    }
}

/// A result row, materialized.
#[derive(Debug, Clone, Default)]
pub struct SqlRow {
    entries: SmallVec<[RowEntry; 32]>,
}

impl SqlRow {
    pub fn new() -> SqlRow {
        Default::default()
    }

    /// Append a column.  Duplicate names are kept; lookups see the first.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ColumnValue>) {
        self.entries.push(RowEntry {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materialize a rusqlite result row.
    ///
    /// TEXT cells are read as UTF-8, lossily; a blob that needs a byte-exact text round trip
    /// goes through the configured fallback encoding instead, not through this path.
    pub fn from_rusqlite_row(row: &rusqlite::Row<'_>) -> Result<SqlRow> {
        let statement = row.as_ref();
        let mut out = SqlRow::new();
        for index in 0..statement.column_count() {
            let name = statement.column_name(index)?.to_string();
            let value = ColumnValue::from(row.get_ref(index)?);
            out.entries.push(RowEntry { name, value });
        }
        Ok(out)
    }
}

impl RowAccess for SqlRow {
    fn column_count(&self) -> usize {
        self.entries.len()
    }

    fn column_name(&self, index: usize) -> &str {
        &self.entries[index].name
    }

    fn column_value(&self, index: usize) -> &ColumnValue {
        &self.entries[index].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_value::StorageClass;

    fn sample() -> SqlRow {
        let mut row = SqlRow::new();
        row.push("id", 3i64);
        row.push("string_optional", "hello");
        row.push("Score", 0.5f64);
        row.push("gone", ColumnValue::Null);
        row
    }

    #[test]
    fn exact_match_wins_over_looser_passes() {
        let mut row = SqlRow::new();
        row.push("Name", "cased");
        row.push("name", "exact");
        assert_eq!(row.lookup("name"), Some(&ColumnValue::Text("exact".into())));
        assert_eq!(row.lookup("Name"), Some(&ColumnValue::Text("cased".into())));
    }

    #[test]
    fn lookup_ignores_case_then_underscores() {
        let row = sample();
        assert_eq!(row.resolve("score"), Some(2));
        assert_eq!(row.resolve("stringOptional"), Some(1));
        assert_eq!(row.resolve("missing"), None);
    }

    #[test]
    fn null_columns_have_no_value() {
        let row = sample();
        assert!(row.has_value("id"));
        assert!(!row.has_value("gone"));
        assert!(!row.has_value("missing"));
    }

    #[test]
    fn typed_fetch_reports_both_classes() {
        let row = sample();
        assert_eq!(row.get::<i64>("id").unwrap(), 3);
        match row.get::<i64>("Score") {
            Err(Error::TypeMismatch {
                expected: StorageClass::Integer,
                found: StorageClass::Real,
                ..
            }) => (),
            other => panic!("unexpected result: {:?}", other),
        }
        match row.get::<String>("missing") {
            Err(Error::MissingColumn(c)) => assert_eq!(c, "missing"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn reads_back_from_rusqlite() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t(a INTEGER, b TEXT, c REAL, d BLOB, e TEXT)")
            .unwrap();
        conn.execute(
            "INSERT INTO t VALUES (1, 'x', 2.5, x'00ff', NULL)",
            [],
        )
        .unwrap();
        let mut statement = conn.prepare("SELECT a, b, c, d, e FROM t").unwrap();
        let row = statement
            .query_row([], |r| Ok(SqlRow::from_rusqlite_row(r)))
            .unwrap()
            .unwrap();
        assert_eq!(row.get::<i64>("a").unwrap(), 1);
        assert_eq!(row.get::<String>("b").unwrap(), "x");
        assert_eq!(row.get::<f64>("c").unwrap(), 2.5);
        assert_eq!(row.get::<Vec<u8>>("d").unwrap(), vec![0u8, 0xff]);
        assert!(!row.has_value("e"));
    }
}
