//! The encoding engine: walk a serializable record, produce column assignments.
//!
//! A record walks as a keyed structure; each field value is probed once to find its storage
//! class.  Fields resolve in priority order: an explicit nil becomes a NULL assignment,
//! primitives map straight through the column value domain, byte buffers become blobs,
//! timestamps become text under the first configured format, and anything else falls back to a
//! JSON document stored as text.  The engine builds the assignment list and nothing else; it
//! never touches storage.
use serde::ser::{self, Impossible, Serialize};
use time::OffsetDateTime;

use crate::column_value::ColumnValue;
use crate::config::CoderConfig;
use crate::datetime::{Timestamp, TIMESTAMP_TOKEN};
use crate::errors::{Error, Result};

/// One `(column, value)` output of the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAssignment {
    pub column: String,
    pub value: ColumnValue,
}

impl ColumnAssignment {
    pub fn new(column: impl Into<String>, value: impl Into<ColumnValue>) -> ColumnAssignment {
        ColumnAssignment {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Encode a record into an ordered assignment list, one entry per field, in declaration order.
pub fn encode_record<T: Serialize + ?Sized>(
    record: &T,
    config: &CoderConfig,
) -> Result<Vec<ColumnAssignment>> {
    record.serialize(RecordSerializer { config })
}

/// Like [`encode_record`], with caller-built assignments appended after the record's own, in
/// the caller's order.
pub fn encode_record_with<T: Serialize + ?Sized>(
    record: &T,
    config: &CoderConfig,
    extra: impl IntoIterator<Item = ColumnAssignment>,
) -> Result<Vec<ColumnAssignment>> {
    let mut assignments = encode_record(record, config)?;
    assignments.extend(extra);
    Ok(assignments)
}

const KEYED_ONLY: &str =
    "records must encode as a keyed structure; sequences and bare values carry no column names";

macro_rules! not_a_record {
    ($($method:ident: $ty:ty,)*) => {
        $(fn $method(self, _value: $ty) -> Result<Self::Ok> {
            Err(Error::NestedStructureUnsupported(KEYED_ONLY))
        })*
    };
}

/// Top of the walk.  Only keyed shapes are allowed to proceed.
struct RecordSerializer<'a> {
    config: &'a CoderConfig,
}

impl<'a> ser::Serializer for RecordSerializer<'a> {
    type Ok = Vec<ColumnAssignment>;
    type Error = Error;

    type SerializeSeq = Impossible<Self::Ok, Error>;
    type SerializeTuple = Impossible<Self::Ok, Error>;
    type SerializeTupleStruct = Impossible<Self::Ok, Error>;
    type SerializeTupleVariant = Impossible<Self::Ok, Error>;
    type SerializeMap = RecordFields<'a>;
    type SerializeStruct = RecordFields<'a>;
    type SerializeStructVariant = Impossible<Self::Ok, Error>;

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<RecordFields<'a>> {
        Ok(RecordFields::with_capacity(self.config, len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<RecordFields<'a>> {
        Ok(RecordFields::with_capacity(self.config, len.unwrap_or(0)))
    }

    // Newtype wrappers around a record are transparent.
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Self::Ok> {
        value.serialize(self)
    }

    not_a_record! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::NestedStructureUnsupported(KEYED_ONLY))
    }
}

/// Accumulates the assignment list while the record's fields stream through.
struct RecordFields<'a> {
    config: &'a CoderConfig,
    assignments: Vec<ColumnAssignment>,
    pending_key: Option<String>,
}

impl<'a> RecordFields<'a> {
    fn with_capacity(config: &'a CoderConfig, len: usize) -> RecordFields<'a> {
        RecordFields {
            config,
            assignments: Vec::with_capacity(len),
            pending_key: None,
        }
    }

    fn push_field<T: Serialize + ?Sized>(&mut self, column: String, value: &T) -> Result<()> {
        let probed = value.serialize(FieldSerializer {
            config: self.config,
        })?;
        let stored = match probed {
            FieldValue::Column(stored) => stored,
            // Containers and enum payloads go through the interchange format.  A failure
            // inside the nested value surfaces as the JSON error itself.
            FieldValue::Complex => ColumnValue::Text(serde_json::to_string(value)?),
        };
        self.assignments.push(ColumnAssignment {
            column,
            value: stored,
        });
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for RecordFields<'a> {
    type Ok = Vec<ColumnAssignment>;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.push_field(key.to_string(), value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.assignments)
    }
}

impl<'a> ser::SerializeMap for RecordFields<'a> {
    type Ok = Vec<ColumnAssignment>;
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        self.pending_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::Message("map value arrived before its key".to_string()))?;
        self.push_field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.assignments)
    }
}

/// What probing a field value found.
enum FieldValue {
    /// The value maps directly onto one storage class.
    Column(ColumnValue),
    /// The value needs the JSON fallback; the caller re-serializes the original.
    Complex,
}

macro_rules! unsupported_width {
    ($($method:ident: $ty:ty => $name:literal,)*) => {
        $(fn $method(self, _value: $ty) -> Result<Self::Ok> {
            Err(Error::TypeUnsupported($name))
        })*
    };
}

/// Classifies one field value.
struct FieldSerializer<'a> {
    config: &'a CoderConfig,
}

impl<'a> ser::Serializer for FieldSerializer<'a> {
    type Ok = FieldValue;
    type Error = Error;

    type SerializeSeq = ComplexProbe;
    type SerializeTuple = ComplexProbe;
    type SerializeTupleStruct = ComplexProbe;
    type SerializeTupleVariant = ComplexProbe;
    type SerializeMap = ComplexProbe;
    type SerializeStruct = ComplexProbe;
    type SerializeStructVariant = ComplexProbe;

    fn serialize_bool(self, value: bool) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Integer(i64::from(value))))
    }

    fn serialize_i64(self, value: i64) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Integer(value)))
    }

    fn serialize_f32(self, value: f32) -> Result<FieldValue> {
        // Widened; narrowing back through f64 is exact for every f32.
        Ok(FieldValue::Column(ColumnValue::Real(f64::from(value))))
    }

    fn serialize_f64(self, value: f64) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Real(value)))
    }

    fn serialize_char(self, value: char) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Text(value.to_string())))
    }

    fn serialize_str(self, value: &str) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Text(value.to_string())))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Blob(value.to_vec())))
    }

    unsupported_width! {
        serialize_i8: i8 => "i8",
        serialize_i16: i16 => "i16",
        serialize_i32: i32 => "i32",
        serialize_i128: i128 => "i128",
        serialize_u8: u8 => "u8",
        serialize_u16: u16 => "u16",
        serialize_u32: u32 => "u32",
        serialize_u64: u64 => "u64",
        serialize_u128: u128 => "u128",
    }

    fn serialize_none(self) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Null))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<FieldValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Null))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<FieldValue> {
        Ok(FieldValue::Column(ColumnValue::Null))
    }

    // Enum values of every shape round-trip through the interchange format, including bare
    // variants, which JSON renders as a quoted string.
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<FieldValue> {
        if name == TIMESTAMP_TOKEN {
            let nanos = value.serialize(NanosCapture)?;
            let ts = OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map(Timestamp)
                .map_err(|e| Error::Message(e.to_string()))?;
            let text = match self.config.date_formats.first() {
                Some(format) => format.format(ts)?,
                None => ts.format_default()?,
            };
            Ok(FieldValue::Column(ColumnValue::Text(text)))
        } else {
            // Other newtype wrappers are transparent.
            value.serialize(self)
        }
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<ComplexProbe> {
        Ok(ComplexProbe)
    }

    fn serialize_tuple(self, _len: usize) -> Result<ComplexProbe> {
        Ok(ComplexProbe)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<ComplexProbe> {
        Ok(ComplexProbe)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<ComplexProbe> {
        Ok(ComplexProbe)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<ComplexProbe> {
        Ok(ComplexProbe)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<ComplexProbe> {
        Ok(ComplexProbe)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<ComplexProbe> {
        Ok(ComplexProbe)
    }
}

/// Sink for container contents during the probe.  The elements are ignored; the probe's only
/// job is to answer "this field is complex", after which the caller re-serializes the whole
/// value through JSON.
struct ComplexProbe;

impl ser::SerializeSeq for ComplexProbe {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }
}

impl ser::SerializeTuple for ComplexProbe {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }
}

impl ser::SerializeTupleStruct for ComplexProbe {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }
}

impl ser::SerializeTupleVariant for ComplexProbe {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }
}

impl ser::SerializeMap for ComplexProbe {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, _key: &T) -> Result<()> {
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }
}

impl ser::SerializeStruct for ComplexProbe {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }
}

impl ser::SerializeStructVariant for ComplexProbe {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Complex)
    }
}

/// Receives the nanosecond payload a [`Timestamp`] sends through its token.
struct NanosCapture;

macro_rules! not_nanos {
    ($($method:ident: $ty:ty,)*) => {
        $(fn $method(self, _value: $ty) -> Result<i128> {
            Err(Error::Message("timestamp token must carry nanoseconds".to_string()))
        })*
    };
}

impl ser::Serializer for NanosCapture {
    type Ok = i128;
    type Error = Error;

    type SerializeSeq = Impossible<i128, Error>;
    type SerializeTuple = Impossible<i128, Error>;
    type SerializeTupleStruct = Impossible<i128, Error>;
    type SerializeTupleVariant = Impossible<i128, Error>;
    type SerializeMap = Impossible<i128, Error>;
    type SerializeStruct = Impossible<i128, Error>;
    type SerializeStructVariant = Impossible<i128, Error>;

    fn serialize_i128(self, value: i128) -> Result<i128> {
        Ok(value)
    }

    fn serialize_i64(self, value: i64) -> Result<i128> {
        Ok(i128::from(value))
    }

    not_nanos! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
    }

    fn serialize_none(self) -> Result<i128> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<i128> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<i128> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<i128> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<i128> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<i128> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<i128> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::Message(
            "timestamp token must carry nanoseconds".to_string(),
        ))
    }
}

/// Accepts string-ish map keys and nothing else.
struct KeySerializer;

macro_rules! not_a_key {
    ($($method:ident: $ty:ty,)*) => {
        $(fn $method(self, _value: $ty) -> Result<String> {
            Err(Error::Message("column names must be strings".to_string()))
        })*
    };
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_str(self, value: &str) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_char(self, value: char) -> Result<String> {
        Ok(value.to_string())
    }

    not_a_key! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_bytes: &[u8],
    }

    fn serialize_none(self) -> Result<String> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::Message("column names must be strings".to_string()))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::Message("column names must be strings".to_string()))
    }
}
