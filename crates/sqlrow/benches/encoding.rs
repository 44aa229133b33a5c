use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sqlrow::{decode_row, encode_record, CoderConfig, SqlRow};

#[derive(serde::Serialize, serde::Deserialize)]
struct BenchRow {
    primary_key: i64,
    string_col: String,
    f64_col: Option<f64>,
    flag: bool,
    json_col: HashMap<String, String>,
}

fn build_row(i: i64) -> BenchRow {
    let mut json_col = HashMap::new();
    json_col.insert("a".into(), "b".into());
    json_col.insert("iteration".into(), format!("{}", i));

    BenchRow {
        primary_key: i,
        string_col: format!("string{}", i),
        f64_col: Some(i as f64),
        flag: i % 2 == 0,
        json_col,
    }
}

pub fn benchmarks(c: &mut Criterion) {
    let config = CoderConfig::new();

    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Elements(1));
    group.bench_function("encode_record", |b| {
        let row = build_row(7);
        b.iter(|| encode_record(black_box(&row), &config).unwrap());
    });
    group.bench_function("decode_row", |b| {
        let mut stored = SqlRow::new();
        for assignment in encode_record(&build_row(7), &config).unwrap() {
            stored.push(assignment.column, assignment.value);
        }
        b.iter(|| decode_row::<BenchRow, _>(black_box(&stored), &config).unwrap());
    });
    group.finish();
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
