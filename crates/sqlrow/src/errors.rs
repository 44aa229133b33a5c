use crate::column_value::StorageClass;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required field resolved to no column in the row.
    #[error("Row has no column matching field {0:?}")]
    MissingColumn(String),

    /// The column exists but holds the wrong storage class.
    #[error("Column {column:?} holds {found} where {expected} was requested")]
    TypeMismatch {
        column: String,
        expected: StorageClass,
        found: StorageClass,
    },

    /// Integer widths other than i64 are refused outright rather than risking
    /// silent truncation on the way back out of the row.
    #[error("{0} fields cannot be stored; widen to i64")]
    TypeUnsupported(&'static str),

    #[error("{0}")]
    NestedStructureUnsupported(&'static str),

    #[error("Column {column:?} text {value:?} did not parse under any configured date format")]
    DateParseFailure { column: String, value: String },

    /// The column's text is not a wellformed JSON document.
    #[error("Column {column:?} does not hold valid JSON: {source}")]
    DataCorrupted {
        column: String,
        source: serde_json::Error,
    },

    /// A nested value's own JSON encode/decode failure, passed through as-is.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0:?} is not a usable SQL identifier")]
    InvalidIdentifier(String),

    #[error("Couldn't format timestamp: {0}")]
    Format(#[from] time::error::Format),

    #[error("Bad date format description: {0}")]
    InvalidFormatDescription(#[from] time::error::InvalidFormatDescription),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Template(#[from] tera::Error),

    #[error("{0}")]
    Message(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// The engines sit behind serde's Serializer/Deserializer traits, which hand
// derived impls this type for their own reporting.
impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
