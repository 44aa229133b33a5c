//! The column value domain.
//!
//! A stored cell holds one of four storage classes or null; that's the whole vocabulary the
//! engine gives us.  [`ColumnValue`] is the tagged union, and [`SqlValue`] is the contract a
//! field type implements to be stored as exactly one class and read back without surprises.
use rusqlite::types::{ToSqlOutput, ValueRef};

use crate::errors::Result;

/// Storage classes, mostly for mismatch reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StorageClass::Null => "NULL",
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
        })
    }
}

/// One stored cell.
///
/// `Null` is its own variant, distinct from an empty `Text` or `Blob`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    pub fn storage_class(&self) -> StorageClass {
        match self {
            ColumnValue::Null => StorageClass::Null,
            ColumnValue::Integer(_) => StorageClass::Integer,
            ColumnValue::Real(_) => StorageClass::Real,
            ColumnValue::Text(_) => StorageClass::Text,
            ColumnValue::Blob(_) => StorageClass::Blob,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }
}

/// A field type which maps to exactly one storage class.
///
/// The two conversions are the single source of truth for round-tripping: `from_column` must
/// accept everything `into_column` produces.
pub trait SqlValue: Sized {
    /// The class `into_column` writes.
    const STORAGE: StorageClass;

    fn into_column(self) -> ColumnValue;

    /// `None` when the stored class is incompatible.  The caller has the column name and both
    /// classes in hand, so it builds the error.
    fn from_column(value: &ColumnValue) -> Option<Self>;
}

impl SqlValue for bool {
    const STORAGE: StorageClass = StorageClass::Integer;

    fn into_column(self) -> ColumnValue {
        ColumnValue::Integer(i64::from(self))
    }

    // Any nonzero integer reads as true, the way the engine itself treats booleans.
    fn from_column(value: &ColumnValue) -> Option<bool> {
        match value {
            ColumnValue::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }
}

impl SqlValue for i64 {
    const STORAGE: StorageClass = StorageClass::Integer;

    fn into_column(self) -> ColumnValue {
        ColumnValue::Integer(self)
    }

    fn from_column(value: &ColumnValue) -> Option<i64> {
        match value {
            ColumnValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl SqlValue for f64 {
    const STORAGE: StorageClass = StorageClass::Real;

    fn into_column(self) -> ColumnValue {
        ColumnValue::Real(self)
    }

    fn from_column(value: &ColumnValue) -> Option<f64> {
        match value {
            ColumnValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// Stored widened to a real; narrowing back through f64 is exact for every f32.
impl SqlValue for f32 {
    const STORAGE: StorageClass = StorageClass::Real;

    fn into_column(self) -> ColumnValue {
        ColumnValue::Real(f64::from(self))
    }

    fn from_column(value: &ColumnValue) -> Option<f32> {
        match value {
            ColumnValue::Real(r) => Some(*r as f32),
            _ => None,
        }
    }
}

impl SqlValue for String {
    const STORAGE: StorageClass = StorageClass::Text;

    fn into_column(self) -> ColumnValue {
        ColumnValue::Text(self)
    }

    fn from_column(value: &ColumnValue) -> Option<String> {
        match value {
            ColumnValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl SqlValue for Vec<u8> {
    const STORAGE: StorageClass = StorageClass::Blob;

    fn into_column(self) -> ColumnValue {
        ColumnValue::Blob(self)
    }

    fn from_column(value: &ColumnValue) -> Option<Vec<u8>> {
        match value {
            ColumnValue::Blob(b) => Some(b.clone()),
            _ => None,
        }
    }
}

/// A byte buffer field.
///
/// Plain `Vec<u8>` fields walk as a sequence and would land in the JSON fallback; this wrapper
/// walks as a proper byte string, so the encoder can store it as a blob (and the decoder can
/// recover it from a blob, or from text via the configured fallback encoding).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Blob {
        Blob(bytes.into())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl std::ops::Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Blob {
        Blob(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Blob {
        Blob(bytes.to_vec())
    }
}

impl SqlValue for Blob {
    const STORAGE: StorageClass = StorageClass::Blob;

    fn into_column(self) -> ColumnValue {
        ColumnValue::Blob(self.0)
    }

    fn from_column(value: &ColumnValue) -> Option<Blob> {
        Vec::<u8>::from_column(value).map(Blob)
    }
}

impl serde::Serialize for Blob {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Blob {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Blob, D::Error> {
        struct BlobVisitor;

        impl<'de> serde::de::Visitor<'de> for BlobVisitor {
            type Value = Blob;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a byte buffer")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Blob, E> {
                Ok(Blob(v.to_vec()))
            }

            fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Blob, E> {
                Ok(Blob(v))
            }

            // JSON renders byte strings as an array of numbers.
            fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<Blob, A::Error> {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                Ok(Blob(bytes))
            }
        }

        deserializer.deserialize_byte_buf(BlobVisitor)
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> ColumnValue {
        v.into_column()
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> ColumnValue {
        ColumnValue::Integer(v)
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> ColumnValue {
        ColumnValue::Real(v)
    }
}

impl From<f32> for ColumnValue {
    fn from(v: f32) -> ColumnValue {
        ColumnValue::Real(f64::from(v))
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> ColumnValue {
        ColumnValue::Text(v.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> ColumnValue {
        ColumnValue::Text(v)
    }
}

impl From<&[u8]> for ColumnValue {
    fn from(v: &[u8]) -> ColumnValue {
        ColumnValue::Blob(v.to_vec())
    }
}

impl From<Vec<u8>> for ColumnValue {
    fn from(v: Vec<u8>) -> ColumnValue {
        ColumnValue::Blob(v)
    }
}

impl From<Blob> for ColumnValue {
    fn from(v: Blob) -> ColumnValue {
        ColumnValue::Blob(v.0)
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(v: Option<T>) -> ColumnValue {
        match v {
            Some(v) => v.into(),
            None => ColumnValue::Null,
        }
    }
}

impl From<ValueRef<'_>> for ColumnValue {
    fn from(value: ValueRef<'_>) -> ColumnValue {
        match value {
            ValueRef::Null => ColumnValue::Null,
            ValueRef::Integer(i) => ColumnValue::Integer(i),
            ValueRef::Real(r) => ColumnValue::Real(r),
            ValueRef::Text(t) => ColumnValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => ColumnValue::Blob(b.to_vec()),
        }
    }
}

impl rusqlite::ToSql for ColumnValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            ColumnValue::Null => ValueRef::Null,
            ColumnValue::Integer(i) => ValueRef::Integer(*i),
            ColumnValue::Real(r) => ValueRef::Real(*r),
            ColumnValue::Text(s) => ValueRef::Text(s.as_bytes()),
            ColumnValue::Blob(b) => ValueRef::Blob(b),
        }))
    }
}
