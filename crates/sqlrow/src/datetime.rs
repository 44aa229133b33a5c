//! Timestamps and their textual formats.
//!
//! The storage layer has no date class; timestamps travel as TEXT.  [`Timestamp`] wraps
//! [`time::OffsetDateTime`] so the coder can recognize date fields during the record walk
//! (plain `OffsetDateTime` fields would walk as an ordinary nested value), and [`DateFormat`]
//! is one caller-supplied textual format for the [`crate::CoderConfig`] list.
use time::format_description::OwnedFormatItem;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::errors::Result;

/// Serde newtype name the coder keys on to recognize timestamp fields.  The payload is the unix
/// timestamp in nanoseconds, which is also what a timestamp looks like inside a JSON document.
pub(crate) const TIMESTAMP_TOKEN: &str = "$sqlrow::Timestamp";

lazy_static::lazy_static! {
    // The representation used when no formatter list is configured: UTC, millisecond
    // precision, truncating.
    static ref DEFAULT_FORMAT: OwnedFormatItem = time::format_description::parse_owned::<2>(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]",
    )
    .expect("the default format description parses");
}

/// A date/time field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    pub fn now() -> Timestamp {
        Timestamp(OffsetDateTime::now_utc())
    }

    /// Render with the default representation.
    pub fn format_default(&self) -> Result<String> {
        Ok(self.0.to_offset(UtcOffset::UTC).format(&*DEFAULT_FORMAT)?)
    }

    /// Parse the default representation.
    pub fn parse_default(text: &str) -> Option<Timestamp> {
        PrimitiveDateTime::parse(text, &*DEFAULT_FORMAT)
            .ok()
            .map(|naive| Timestamp(naive.assume_utc()))
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Timestamp {
        Timestamp(value)
    }
}

impl From<Timestamp> for OffsetDateTime {
    fn from(value: Timestamp) -> OffsetDateTime {
        value.0
    }
}

impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(TIMESTAMP_TOKEN, &self.0.unix_timestamp_nanos())
    }
}

impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        use serde::de;

        struct TimestampVisitor;

        fn from_nanos<E: de::Error>(nanos: i128) -> Result<Timestamp, E> {
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map(Timestamp)
                .map_err(E::custom)
        }

        impl<'de> de::Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a unix timestamp in nanoseconds")
            }

            fn visit_newtype_struct<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<Timestamp, D::Error> {
                let nanos = <i128 as serde::Deserialize>::deserialize(deserializer)?;
                from_nanos(nanos)
            }

            fn visit_i128<E: de::Error>(self, v: i128) -> Result<Timestamp, E> {
                from_nanos(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
                from_nanos(i128::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
                from_nanos(i128::from(v))
            }
        }

        deserializer.deserialize_newtype_struct(TIMESTAMP_TOKEN, TimestampVisitor)
    }
}

#[derive(Debug, Clone)]
enum Repr {
    Description(OwnedFormatItem),
    UnixSeconds,
}

/// One entry in the caller's formatter list.
///
/// Encoding uses the first list entry only; decoding walks the whole list in order and takes
/// the first format that parses.
#[derive(Debug, Clone)]
pub struct DateFormat(Repr);

impl DateFormat {
    /// Build from a `time` format description, e.g.
    /// `"[year]-[month]-[day] [hour]:[minute]:[second]"`.
    pub fn new(description: &str) -> Result<DateFormat> {
        let items = time::format_description::parse_owned::<2>(description)?;
        Ok(DateFormat(Repr::Description(items)))
    }

    /// Decimal seconds since the unix epoch, fractional part allowed.
    pub fn unix_seconds() -> DateFormat {
        DateFormat(Repr::UnixSeconds)
    }

    pub fn format(&self, ts: Timestamp) -> Result<String> {
        match &self.0 {
            Repr::Description(items) => Ok(ts.0.to_offset(UtcOffset::UTC).format(items)?),
            Repr::UnixSeconds => {
                // Decimal arithmetic, not float: nanoseconds don't survive an f64.
                let nanos = ts.0.unix_timestamp_nanos();
                let sign = if nanos < 0 { "-" } else { "" };
                let magnitude = nanos.unsigned_abs();
                let seconds = magnitude / 1_000_000_000;
                let fraction = magnitude % 1_000_000_000;
                if fraction == 0 {
                    Ok(format!("{}{}", sign, seconds))
                } else {
                    let digits = format!("{:09}", fraction);
                    Ok(format!("{}{}.{}", sign, seconds, digits.trim_end_matches('0')))
                }
            }
        }
    }

    /// `None` when the text doesn't match this format.
    ///
    /// Descriptions without an offset component are read as naive timestamps in UTC; date-only
    /// descriptions land on midnight.
    pub fn parse(&self, text: &str) -> Option<Timestamp> {
        match &self.0 {
            Repr::Description(items) => {
                if let Ok(instant) = OffsetDateTime::parse(text, items) {
                    return Some(Timestamp(instant));
                }
                if let Ok(naive) = PrimitiveDateTime::parse(text, items) {
                    return Some(Timestamp(naive.assume_utc()));
                }
                time::Date::parse(text, items)
                    .ok()
                    .map(|date| Timestamp(date.midnight().assume_utc()))
            }
            Repr::UnixSeconds => {
                let text = text.trim();
                let (sign, text) = match text.strip_prefix('-') {
                    Some(rest) => (-1i128, rest),
                    None => (1i128, text),
                };
                let (seconds, fraction) = match text.split_once('.') {
                    Some((seconds, fraction)) => (seconds, fraction),
                    None => (text, ""),
                };
                if seconds.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                let seconds: u64 = seconds.parse().ok()?;
                // Pad or truncate the fractional digits to nanosecond precision.
                let mut nanos: u128 = 0;
                for digit in (0..9).map(|i| fraction.as_bytes().get(i)) {
                    nanos = nanos * 10 + u128::from(digit.map_or(0, |d| *d - b'0'));
                }
                let total = sign * (i128::from(seconds) * 1_000_000_000 + nanos as i128);
                OffsetDateTime::from_unix_timestamp_nanos(total).ok().map(Timestamp)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(nanos: i128) -> Timestamp {
        Timestamp(OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap())
    }

    #[test]
    fn default_format_truncates_to_milliseconds() {
        // 2021-12-12T01:02:03.123456789Z
        let ts = instant(1_639_270_923_123_456_789);
        let text = ts.format_default().unwrap();
        assert_eq!(text, "2021-12-12T01:02:03.123");
        let back = Timestamp::parse_default(&text).unwrap();
        assert_eq!(back, instant(1_639_270_923_123_000_000));
    }

    #[test]
    fn default_parse_rejects_other_shapes() {
        assert!(Timestamp::parse_default("2021-12-12 01:02:03").is_none());
        assert!(Timestamp::parse_default("not a date").is_none());
    }

    #[test]
    fn description_formats_parse_what_they_print() {
        let format = DateFormat::new("[year]-[month]-[day] [hour]:[minute]:[second]").unwrap();
        let ts = instant(1_639_270_923_000_000_000);
        let text = format.format(ts).unwrap();
        assert_eq!(text, "2021-12-12 01:02:03");
        assert_eq!(format.parse(&text), Some(ts));
        assert_eq!(format.parse("2021-12-12T01:02:03"), None);
    }

    #[test]
    fn date_only_descriptions_land_on_midnight() {
        let format = DateFormat::new("[year]-[month]-[day]").unwrap();
        let parsed = format.parse("2021-12-12").unwrap();
        assert_eq!(parsed, instant(1_639_267_200_000_000_000));
    }

    #[test]
    fn unix_seconds_round_trip() {
        let format = DateFormat::unix_seconds();
        let ts = instant(1_639_270_923_000_000_000);
        let text = format.format(ts).unwrap();
        assert_eq!(text, "1639270923");
        assert_eq!(format.parse(&text), Some(ts));
        assert!(format.parse("eleven").is_none());
    }

    #[test]
    fn serde_representation_is_nanoseconds() {
        let ts = instant(1_639_270_923_123_456_789);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "1639270923123456789");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
