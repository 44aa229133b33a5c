//! End-to-end round trips: encode a record, run it through a real database, decode it back.
use std::collections::HashMap;

use proptest::prelude::*;
use sqlrow::{
    decode_row, encode_record, insert_record, Blob, CoderConfig, ColumnValue, DateFormat, SqlRow,
    TextEncoding, Timestamp,
};
use time::OffsetDateTime;

fn timestamp_millis(nanos: i128) -> Timestamp {
    Timestamp(OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap())
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Profile {
    id: i64,
    username: String,
    karma: f64,
    verified: bool,
    avatar: Option<Blob>,
    joined: Timestamp,
    settings: HashMap<String, String>,
}

fn sample_profile() -> Profile {
    let mut settings = HashMap::new();
    settings.insert("theme".to_string(), "dark".to_string());
    settings.insert("volume".to_string(), "11".to_string());
    Profile {
        id: 1,
        username: "ferris".into(),
        karma: 1000.5,
        verified: true,
        avatar: Some(Blob::new(vec![0u8, 1, 2, 254, 255])),
        // Whole milliseconds, since the default date representation stores no finer.
        joined: timestamp_millis(1_639_270_923_123_000_000),
        settings,
    }
}

fn open_profiles_table() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"CREATE TABLE profiles(
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            karma REAL NOT NULL,
            verified INTEGER NOT NULL,
            avatar BLOB,
            joined TEXT NOT NULL,
            settings TEXT NOT NULL
        )"#,
    )
    .unwrap();
    conn
}

fn load_profiles(conn: &rusqlite::Connection, config: &CoderConfig) -> Vec<Profile> {
    let mut statement = conn.prepare("SELECT * FROM profiles ORDER BY id").unwrap();
    let mut rows = statement.query([]).unwrap();
    let mut profiles = vec![];
    while let Some(row) = rows.next().unwrap() {
        let row = SqlRow::from_rusqlite_row(row).unwrap();
        profiles.push(decode_row(&row, config).unwrap());
    }
    profiles
}

#[test]
fn full_record_survives_a_database_round_trip() -> anyhow::Result<()> {
    sqlrow_logging::log_to_stderr();

    let config = CoderConfig::new();
    let conn = open_profiles_table();
    let profile = sample_profile();
    insert_record(&conn, "profiles", &profile, &config)?;

    let mut absent = profile.clone();
    absent.id = 2;
    absent.avatar = None;
    insert_record(&conn, "profiles", &absent, &config)?;

    pretty_assertions::assert_eq!(load_profiles(&conn, &config), vec![profile, absent]);
    Ok(())
}

#[test]
fn records_survive_closing_and_reopening_the_database() -> anyhow::Result<()> {
    sqlrow_logging::log_to_stderr();

    let tdir = tempfile::TempDir::new()?;
    let path = tdir.path().join("round_trip.sqlite");
    let config = CoderConfig::new();
    let profile = sample_profile();

    {
        let conn = rusqlite::Connection::open(&path)?;
        conn.execute_batch(
            r#"CREATE TABLE profiles(
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                karma REAL NOT NULL,
                verified INTEGER NOT NULL,
                avatar BLOB,
                joined TEXT NOT NULL,
                settings TEXT NOT NULL
            )"#,
        )?;
        insert_record(&conn, "profiles", &profile, &config)?;
    }

    let conn = rusqlite::Connection::open(&path)?;
    pretty_assertions::assert_eq!(load_profiles(&conn, &config), vec![profile]);
    Ok(())
}

#[test]
fn dates_written_by_a_later_format_still_decode() {
    sqlrow_logging::log_to_stderr();

    let f1 = DateFormat::new("[year]/[month]/[day] [hour]:[minute]:[second]").unwrap();
    let f2 = DateFormat::new("[year]-[month]-[day] [hour]:[minute]:[second]").unwrap();
    let config = CoderConfig {
        date_formats: vec![f1, f2.clone(), DateFormat::unix_seconds()],
        ..Default::default()
    };

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Event {
        id: i64,
        at: Timestamp,
    }

    let at = timestamp_millis(1_639_270_923_000_000_000);
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE events(id INTEGER PRIMARY KEY, at TEXT NOT NULL)")
        .unwrap();

    // A row written by an older deployment that used the second format.
    conn.execute(
        "INSERT INTO events(id, at) VALUES (1, ?)",
        [f2.format(at).unwrap()],
    )
    .unwrap();

    let mut statement = conn.prepare("SELECT * FROM events").unwrap();
    let row = statement
        .query_row([], |r| Ok(SqlRow::from_rusqlite_row(r)))
        .unwrap()
        .unwrap();
    let event: Event = decode_row(&row, &config).unwrap();
    assert_eq!(event, Event { id: 1, at });
}

#[test]
fn blob_written_as_text_reads_back_byte_exact() {
    sqlrow_logging::log_to_stderr();

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Packet {
        id: i64,
        payload: Blob,
    }

    let payload: Vec<u8> = (0..=255).collect();
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    // The caller's schema declared the column TEXT, so the bytes went in through the
    // fallback encoding.
    conn.execute_batch("CREATE TABLE packets(id INTEGER PRIMARY KEY, payload TEXT NOT NULL)")
        .unwrap();
    conn.execute(
        "INSERT INTO packets(id, payload) VALUES (1, ?)",
        [TextEncoding::Latin1.text_from_bytes(&payload).unwrap()],
    )
    .unwrap();

    let mut statement = conn.prepare("SELECT * FROM packets").unwrap();
    let row = statement
        .query_row([], |r| Ok(SqlRow::from_rusqlite_row(r)))
        .unwrap()
        .unwrap();
    let packet: Packet = decode_row(&row, &CoderConfig::new()).unwrap();
    assert_eq!(&packet.payload[..], &payload[..]);
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Primitives {
    int: i64,
    float: f64,
    single: f32,
    flag: bool,
    text: String,
    maybe: Option<i64>,
}

fn encode_to_row(record: &Primitives) -> SqlRow {
    let config = CoderConfig::new();
    let mut row = SqlRow::new();
    for assignment in encode_record(record, &config).unwrap() {
        row.push(assignment.column, assignment.value);
    }
    row
}

proptest! {
    #[test]
    fn primitive_records_round_trip(
        int in any::<i64>(),
        float in -1e300f64..1e300,
        single in -1e30f32..1e30,
        flag in any::<bool>(),
        text in any::<String>(),
        maybe in proptest::option::of(any::<i64>()),
    ) {
        let record = Primitives { int, float, single, flag, text, maybe };
        let row = encode_to_row(&record);
        let back: Primitives = decode_row(&row, &CoderConfig::new()).unwrap();
        prop_assert_eq!(back, record);
    }

    #[test]
    fn blobs_round_trip_through_either_storage_class(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            data: Blob,
        }

        let config = CoderConfig::new();
        let record = Wrapper { data: Blob::new(bytes.clone()) };
        let assignments = encode_record(&record, &config).unwrap();
        prop_assert_eq!(&assignments[0].value, &ColumnValue::Blob(bytes.clone()));

        // Stored as the blob it encoded to.
        let mut row = SqlRow::new();
        row.push("data", ColumnValue::Blob(bytes.clone()));
        let back: Wrapper = decode_row(&row, &config).unwrap();
        prop_assert_eq!(&back, &record);

        // Stored as text under the default fallback encoding.
        let mut row = SqlRow::new();
        row.push(
            "data",
            ColumnValue::Text(TextEncoding::Latin1.text_from_bytes(&bytes).unwrap()),
        );
        let back: Wrapper = decode_row(&row, &config).unwrap();
        prop_assert_eq!(&back, &record);
    }

    #[test]
    fn lookups_survive_case_mangling(
        int in any::<i64>(),
        flag in any::<bool>(),
    ) {
        #[derive(Debug, serde::Deserialize)]
        struct Mangled {
            #[serde(rename = "someValue")]
            some_value: i64,
            #[serde(rename = "OTHER_FLAG")]
            other_flag: bool,
        }

        let mut row = SqlRow::new();
        row.push("some_value", int);
        row.push("other_flag", flag);
        let back: Mangled = decode_row(&row, &CoderConfig::new()).unwrap();
        prop_assert_eq!(back.some_value, int);
        prop_assert_eq!(back.other_flag, flag);
    }
}
