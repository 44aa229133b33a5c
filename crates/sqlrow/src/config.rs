//! Per-call coder configuration.
//!
//! There is deliberately no process-wide default: callers own the formatter list and the
//! fallback encoding and pass them into every encode/decode call.
use crate::datetime::DateFormat;

/// Text encoding used when a blob turns out to live in a TEXT column, or the reverse.
///
/// Latin-1 maps every byte to the code point of the same value, so arbitrary blobs survive a
/// text round trip; it is the default for exactly that reason.  UTF-8 refuses input that is not
/// valid UTF-8 on either side of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Latin1,
    Utf8,
}

impl TextEncoding {
    /// Render stored blob bytes as text.
    pub fn text_from_bytes(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Latin1 => Some(bytes.iter().map(|b| char::from(*b)).collect()),
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
        }
    }

    /// Recover the bytes a stored text was written from.
    pub fn bytes_from_text(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
            TextEncoding::Utf8 => Some(text.as_bytes().to_vec()),
        }
    }
}

/// Configuration consulted on every encode/decode call.
#[derive(Debug, Clone, Default)]
pub struct CoderConfig {
    /// Date formats in priority order.  Encoding uses the first and only the first; decoding
    /// tries all of them in order before falling back to the default representation.
    pub date_formats: Vec<DateFormat>,
    /// Encoding for the blob-as-text / text-as-blob fallback.
    pub blob_text_encoding: TextEncoding,
}

impl CoderConfig {
    pub fn new() -> CoderConfig {
        Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_is_total_over_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = TextEncoding::Latin1.text_from_bytes(&bytes).unwrap();
        assert_eq!(TextEncoding::Latin1.bytes_from_text(&text).unwrap(), bytes);
    }

    #[test]
    fn latin1_refuses_wide_characters() {
        assert_eq!(TextEncoding::Latin1.bytes_from_text("snowman \u{2603}"), None);
    }

    #[test]
    fn utf8_round_trips_valid_text_only() {
        assert_eq!(
            TextEncoding::Utf8.text_from_bytes("héllo".as_bytes()).unwrap(),
            "héllo"
        );
        assert_eq!(TextEncoding::Utf8.text_from_bytes(&[0xff, 0xfe]), None);
    }
}
