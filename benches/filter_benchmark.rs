//! Benchmark for filter parsing and serialization

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filter_expr_core::filter::{cache, FilterBuilder};
use serde_json::{json, Value};

/// Create a realistic filter: 50 top-level groups mixing every operation
fn create_test_filter() -> Value {
    let mut conditions = Vec::with_capacity(50);

    for i in 0..50 {
        let condition = match i % 5 {
            0 => json!({"operation": "=", "property": format!("field_{}", i), "value": i}),
            1 => json!({"operation": "IN", "property": "type", "values": ["page", "link", "snippet", i]}),
            2 => json!({
                "operation": "OR",
                "children": [
                    {"operation": ">", "property": "age", "value": i},
                    {"operation": "LIKE", "property": "name", "value": format!("A{}%", i)}
                ]
            }),
            3 => json!({
                "operation": "AND",
                "children": [
                    {"operation": "<", "property": "price", "value": i as f64 + 0.99},
                    {"operation": "OR", "children": [
                        {"operation": "=", "property": "published", "value": true},
                        {"operation": "IN", "property": "pid", "values": [1, 2, 3, 5, 8, 13]}
                    ]}
                ]
            }),
            _ => json!({"operation": "LIKE", "property": "path", "value": format!("/en/{}/%", i)}),
        };
        conditions.push(condition);
    }

    Value::Array(conditions)
}

fn bench_parse(c: &mut Criterion) {
    let filter = create_test_filter();

    c.bench_function("parse_filter_array", |b| {
        b.iter(|| FilterBuilder::from_array(black_box(&filter)).unwrap())
    });
}

fn bench_serialize(c: &mut Criterion) {
    let builder = FilterBuilder::from_array_for_root(&create_test_filter()).unwrap();

    c.bench_function("get_all_as_array", |b| {
        b.iter(|| black_box(&builder).get_all_as_array())
    });

    c.bench_function("to_json", |b| b.iter(|| black_box(&builder).to_json().unwrap()));
}

fn bench_cached_parse(c: &mut Criterion) {
    let text = create_test_filter().to_string();

    c.bench_function("parse_json_uncached", |b| {
        b.iter(|| FilterBuilder::from_json(black_box(&text), false).unwrap())
    });

    c.bench_function("parse_json_cached", |b| {
        b.iter(|| cache::get_or_parse(black_box(&text), false).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_serialize, bench_cached_parse);
criterion_main!(benches);
