//! Structured records in and out of SQL rows.
//!
//! The storage engine gives every cell one of four storage classes plus null; application
//! records want booleans, timestamps, byte buffers and nested structures.  This crate closes
//! that gap without per-field marshaling code: any serde-serializable record encodes into an
//! ordered list of `(column, value)` assignments, and any deserializable record rebuilds from
//! a name-keyed row view, with the recovery heuristics the weak storage model forces (blobs
//! written through TEXT columns, dates under several textual formats, nested values flattened
//! to JSON) applied without ever silently producing wrong data.
//!
//! The pieces:
//!
//! - [`ColumnValue`] / [`SqlValue`]: the storage domain and the per-type mapping contract.
//! - [`RowAccess`] / [`SqlRow`]: the read-only row view the decoder consumes.
//! - [`encode_record`] / [`decode_row`]: the two engines, configured per call by
//!   [`CoderConfig`].
//! - The statement helpers ([`insert_record`], [`update_record`] and friends): glue that
//!   renders and runs the SQL for an assignment list on a caller-owned connection.
//!
//! Both engines are pure transforms: no storage access, no shared state, no retries.  Each
//! call either completes or fails with a typed [`Error`].
mod column_value;
mod config;
mod datetime;
mod decode;
mod encode;
mod errors;
mod row;
mod statement;

pub use column_value::*;
pub use config::*;
pub use datetime::*;
pub use decode::*;
pub use encode::*;
pub use errors::*;
pub use row::*;
pub use statement::*;
