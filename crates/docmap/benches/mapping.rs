//! Mapper throughput benchmarks.
//!
//! Measures composite to_tree / from_tree over batches of records, and the
//! lenient coercion path of the value tree.
//!
//! Run with: cargo bench --bench mapping

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docmap::{Composite, FieldSet, Mappable, Mapper, NamingPolicy, Shape, Value};

#[derive(Debug, Default, Clone)]
struct Order {
    order_id: u64,
    customer_name: String,
    total_cents: i64,
    express: bool,
    line_items: Vec<String>,
    coupon: Option<String>,
}

impl Mappable for Order {
    fn shape() -> Shape {
        Shape::composite::<Self>()
    }
}

impl Composite for Order {
    fn describe(fields: &mut FieldSet<Self>) {
        fields.field("order_id", |o| &o.order_id, |o| &mut o.order_id);
        fields.field("customer_name", |o| &o.customer_name, |o| &mut o.customer_name);
        fields.field("total_cents", |o| &o.total_cents, |o| &mut o.total_cents);
        fields.field("express", |o| &o.express, |o| &mut o.express);
        fields.field("line_items", |o| &o.line_items, |o| &mut o.line_items);
        fields.field("coupon", |o| &o.coupon, |o| &mut o.coupon);
    }
}

fn orders(n: usize) -> Vec<Order> {
    (0..n)
        .map(|i| Order {
            order_id: i as u64,
            customer_name: format!("customer-{i}"),
            total_cents: (i as i64) * 199,
            express: i % 3 == 0,
            line_items: (0..4).map(|j| format!("sku-{i}-{j}")).collect(),
            coupon: (i % 5 == 0).then(|| "SPRING".to_string()),
        })
        .collect()
}

fn bench_to_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_tree");
    let mut mapper = Mapper::new();
    mapper.naming_policy(NamingPolicy::CamelCase);

    for size in [10, 100, 1000] {
        let batch = orders(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &batch, |b, batch| {
            b.iter(|| black_box(mapper.to_tree(black_box(batch))).ok());
        });
    }
    group.finish();
}

fn bench_from_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_tree");
    let mut mapper = Mapper::new();
    mapper.naming_policy(NamingPolicy::CamelCase);

    for size in [10, 100, 1000] {
        let Ok(tree) = mapper.to_tree(&orders(size)) else {
            continue;
        };
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &tree, |b, tree| {
            b.iter(|| black_box(mapper.from_tree::<Vec<Order>>(black_box(tree))).ok());
        });
    }
    group.finish();
}

fn bench_coercion(c: &mut Criterion) {
    let numeric = Value::from("12345.5");
    let flag = Value::from("yes");
    c.bench_function("coerce_string_to_number", |b| {
        b.iter(|| black_box(&numeric).as_number(false).ok());
    });
    c.bench_function("coerce_string_to_boolean", |b| {
        b.iter(|| black_box(&flag).as_boolean(false).ok());
    });
}

criterion_group!(benches, bench_to_tree, bench_from_tree, bench_coercion);
criterion_main!(benches);
