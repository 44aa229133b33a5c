//! The decoding engine: rebuild a typed record from a row.
//!
//! The target shape drives the walk: each declared field is offered in turn, resolved to a
//! column by name (case- and underscore-insensitive, exact spellings first), and decoded
//! according to the requested type.  Decoding carries the recovery logic the storage layer
//! forces on us: blobs that were written through TEXT columns, dates under several textual
//! formats, and nested values flattened into JSON documents.
//!
//! Optional fields have two distinct relaxations.  A missing or NULL column is always the
//! absent marker.  On top of that, the best-effort paths (strings rescued from blobs, blobs,
//! dates, complex values) turn their own failures into the absent marker too, but only inside
//! an `Option`; a required field always surfaces the failure.
use std::cell::Cell;

use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, Deserialize, DeserializeOwned, Visitor};

use crate::column_value::{ColumnValue, SqlValue, StorageClass};
use crate::config::CoderConfig;
use crate::datetime::{Timestamp, TIMESTAMP_TOKEN};
use crate::errors::{Error, Result};
use crate::row::RowAccess;

/// Decode one row into `T`.
///
/// `T` may also be an `Option<Record>`: the row either decodes or fails, because "no matching
/// row at all" is represented by the caller never having a row to pass in, not by this layer.
pub fn decode_row<T, R>(row: &R, config: &CoderConfig) -> Result<T>
where
    T: DeserializeOwned,
    R: RowAccess + ?Sized,
{
    T::deserialize(RowDecoder { row, config })
}

const TOP_LEVEL_KEYED: &str =
    "records must decode from a keyed structure; sequences and bare values carry no column names";

/// Top of the walk.  Hands the row to a keyed field walk, or refuses the shape.
struct RowDecoder<'de, R: ?Sized> {
    row: &'de R,
    config: &'de CoderConfig,
}

impl<'de, R: RowAccess + ?Sized> de::Deserializer<'de> for RowDecoder<'de, R> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::NestedStructureUnsupported(TOP_LEVEL_KEYED))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_map(FieldWalk::new(self.row, self.config, fields.to_vec()))
    }

    // The "all keys" case: every column in the row becomes an entry.
    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let names = (0..self.row.column_count())
            .map(|i| self.row.column_name(i))
            .collect();
        visitor.visit_map(FieldWalk::new(self.row, self.config, names))
    }

    // An optional record reports "not nil" unconditionally; whether a row exists at all is the
    // caller's single-row-lookup concern, not this layer's.
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string bytes byte_buf
        unit unit_struct seq tuple tuple_struct enum identifier ignored_any
    }
}

/// MapAccess over either the target's declared field list or the row's own column names.
struct FieldWalk<'de, R: ?Sized> {
    row: &'de R,
    config: &'de CoderConfig,
    names: Vec<&'de str>,
    next: usize,
    in_option: Cell<bool>,
    best_effort: Cell<bool>,
}

impl<'de, R: RowAccess + ?Sized> FieldWalk<'de, R> {
    fn new(row: &'de R, config: &'de CoderConfig, names: Vec<&'de str>) -> FieldWalk<'de, R> {
        FieldWalk {
            row,
            config,
            names,
            next: 0,
            in_option: Cell::new(false),
            best_effort: Cell::new(false),
        }
    }

    fn advance(&mut self) -> Result<&'de str> {
        let column = self
            .names
            .get(self.next)
            .copied()
            .ok_or_else(|| Error::Message("field value requested past the end".to_string()))?;
        self.next += 1;
        self.in_option.set(false);
        self.best_effort.set(false);
        Ok(column)
    }
}

impl<'de, R: RowAccess + ?Sized> de::MapAccess<'de> for FieldWalk<'de, R> {
    type Error = Error;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.names.get(self.next) {
            Some(name) => seed
                .deserialize(BorrowedStrDeserializer::new(*name))
                .map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<S: de::DeserializeSeed<'de>>(&mut self, seed: S) -> Result<S::Value> {
        let column = self.advance()?;
        seed.deserialize(FieldDecoder {
            row: self.row,
            config: self.config,
            column,
            in_option: &self.in_option,
            best_effort: &self.best_effort,
        })
    }

    // Derived impls land here.  This is where the optional relaxation lives: when the decode
    // entered an `Option` and then failed on a best-effort path, the field degrades to the
    // absent marker instead of failing the record.
    fn next_value<V: Deserialize<'de>>(&mut self) -> Result<V> {
        let column = self.advance()?;
        let decoder = FieldDecoder {
            row: self.row,
            config: self.config,
            column,
            in_option: &self.in_option,
            best_effort: &self.best_effort,
        };
        match V::deserialize(decoder) {
            Err(_) if self.in_option.get() && self.best_effort.get() => {
                V::deserialize(AbsentField)
            }
            other => other,
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.names.len() - self.next.min(self.names.len()))
    }
}

/// Stand-in deserializer producing the absent marker after a relaxed optional failure.
struct AbsentField;

impl<'de> de::Deserializer<'de> for AbsentField {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Message(
            "only optional fields can degrade to absent".to_string(),
        ))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_none()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string bytes byte_buf
        unit unit_struct newtype_struct seq tuple tuple_struct map struct enum identifier
        ignored_any
    }
}

/// Decodes one field from its resolved column.
struct FieldDecoder<'de, 'w, R: ?Sized> {
    row: &'de R,
    config: &'de CoderConfig,
    column: &'de str,
    in_option: &'w Cell<bool>,
    best_effort: &'w Cell<bool>,
}

impl<'de, 'w, R: ?Sized> Clone for FieldDecoder<'de, 'w, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'de, 'w, R: ?Sized> Copy for FieldDecoder<'de, 'w, R> {}

macro_rules! unsupported_width {
    ($($method:ident => $name:literal,)*) => {
        $(fn $method<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
            Err(Error::TypeUnsupported($name))
        })*
    };
}

impl<'de, 'w, R: RowAccess + ?Sized> FieldDecoder<'de, 'w, R> {
    fn fetch(&self) -> Result<&'de ColumnValue> {
        self.row
            .lookup(self.column)
            .ok_or_else(|| Error::MissingColumn(self.column.to_string()))
    }

    fn mismatch(&self, expected: StorageClass, found: &ColumnValue) -> Error {
        Error::TypeMismatch {
            column: self.column.to_string(),
            expected,
            found: found.storage_class(),
        }
    }

    fn get<T: SqlValue>(&self) -> Result<T> {
        let value = self.fetch()?;
        T::from_column(value).ok_or_else(|| self.mismatch(T::STORAGE, value))
    }

    /// Fetch the column as text and parse it as a JSON document.
    fn json_value(&self) -> Result<serde_json::Value> {
        self.best_effort.set(true);
        let value = self.fetch()?;
        let text = match value {
            ColumnValue::Text(text) => text,
            other => return Err(self.mismatch(StorageClass::Text, other)),
        };
        serde_json::from_str(text).map_err(|e| match e.classify() {
            serde_json::error::Category::Data => Error::Json(e),
            _ => Error::DataCorrupted {
                column: self.column.to_string(),
                source: e,
            },
        })
    }
}

impl<'de, 'w, R: RowAccess + ?Sized> de::Deserializer<'de> for FieldDecoder<'de, 'w, R> {
    type Error = Error;

    // Storage-driven, for self-describing targets.
    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.fetch()? {
            ColumnValue::Null => visitor.visit_unit(),
            ColumnValue::Integer(i) => visitor.visit_i64(*i),
            ColumnValue::Real(r) => visitor.visit_f64(*r),
            ColumnValue::Text(s) => visitor.visit_borrowed_str(s),
            ColumnValue::Blob(b) => visitor.visit_borrowed_bytes(b),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.get()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.get()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.get()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.get()?)
    }

    unsupported_width! {
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i128 => "i128",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_u128 => "u128",
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value = self.fetch()?;
        let text = match value {
            ColumnValue::Text(text) => text,
            other => return Err(self.mismatch(StorageClass::Text, other)),
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::Message(format!(
                "column {:?} does not hold a single character",
                self.column
            ))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value = self.fetch()?;
        match value {
            ColumnValue::Text(text) => visitor.visit_borrowed_str(text),
            // A string living in a BLOB column is only rescued for optional fields, matching
            // the strictness of required lookups.
            ColumnValue::Blob(bytes) if self.in_option.get() => {
                self.best_effort.set(true);
                match self.config.blob_text_encoding.text_from_bytes(bytes) {
                    Some(text) => visitor.visit_string(text),
                    None => Err(self.mismatch(StorageClass::Text, value)),
                }
            }
            other => Err(self.mismatch(StorageClass::Text, other)),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.best_effort.set(true);
        let value = self.fetch()?;
        match value {
            ColumnValue::Blob(bytes) => visitor.visit_borrowed_bytes(bytes),
            // The blob may have been written through a TEXT column; recover the bytes through
            // the configured encoding.
            ColumnValue::Text(text) => {
                match self.config.blob_text_encoding.bytes_from_text(text) {
                    Some(bytes) => visitor.visit_byte_buf(bytes),
                    None => Err(self.mismatch(StorageClass::Blob, value)),
                }
            }
            other => Err(self.mismatch(StorageClass::Blob, other)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.in_option.set(true);
        if self.row.has_value(self.column) {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name != TIMESTAMP_TOKEN {
            // Other newtype wrappers are transparent.
            return visitor.visit_newtype_struct(self);
        }

        self.best_effort.set(true);
        let value = self.fetch()?;
        let text = match value {
            ColumnValue::Text(text) => text,
            other => return Err(self.mismatch(StorageClass::Text, other)),
        };
        let parsed = self
            .config
            .date_formats
            .iter()
            .find_map(|format| format.parse(text))
            .or_else(|| Timestamp::parse_default(text));
        match parsed {
            Some(ts) => visitor.visit_newtype_struct(NanosField(ts.0.unix_timestamp_nanos())),
            None => Err(Error::DateParseFailure {
                column: self.column.to_string(),
                value: text.clone(),
            }),
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.json_value()?.deserialize_seq(visitor).map_err(Error::Json)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        self.json_value()?
            .deserialize_tuple(len, visitor)
            .map_err(Error::Json)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.json_value()?
            .deserialize_tuple_struct(name, len, visitor)
            .map_err(Error::Json)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.json_value()?.deserialize_map(visitor).map_err(Error::Json)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.json_value()?
            .deserialize_struct(name, fields, visitor)
            .map_err(Error::Json)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.json_value()?
            .deserialize_enum(name, variants, visitor)
            .map_err(Error::Json)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

/// Hands a parsed timestamp's nanosecond payload to [`Timestamp`]'s visitor.
struct NanosField(i128);

impl<'de> de::Deserializer<'de> for NanosField {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i128(self.0)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string bytes byte_buf
        option unit unit_struct newtype_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}
