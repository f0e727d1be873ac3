use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use billeo::core::*;

fn build_items(count: usize) -> Vec<LineItem> {
    (1..=count)
        .map(|i| {
            LineItemBuilder::new(format!("Item {i}"), dec!(2), dec!(9.99))
                .tax_rate(if i % 3 == 0 { 10 } else { 21 })
                .build()
        })
        .collect()
}

/// Items as a form delivers them: every numeric field is text.
fn build_form_items(count: usize) -> Vec<LineItem> {
    (1..=count)
        .map(|i| {
            LineItemBuilder::new(format!("Item {i}"), "2", "9.99")
                .tax_rate("21")
                .build()
        })
        .collect()
}

fn taxes() -> Vec<AdditionalTax> {
    vec![
        AdditionalTax::percentage("IRPF", -15),
        AdditionalTax::flat("Envío", dec!(4.95)),
    ]
}

fn bench_compute_10_lines(c: &mut Criterion) {
    let items = build_items(10);
    let taxes = taxes();
    c.bench_function("compute_totals_10_lines", |b| {
        b.iter(|| black_box(compute_totals(black_box(&items), black_box(&taxes))));
    });
}

fn bench_compute_1000_lines(c: &mut Criterion) {
    let items = build_items(1000);
    let taxes = taxes();
    c.bench_function("compute_totals_1000_lines", |b| {
        b.iter(|| black_box(compute_totals(black_box(&items), black_box(&taxes))));
    });
}

fn bench_in_place_1000_text_lines(c: &mut Criterion) {
    let mut items = build_form_items(1000);
    let taxes = taxes();
    c.bench_function("calculate_totals_1000_text_lines", |b| {
        b.iter(|| black_box(calculate_totals(black_box(&mut items), black_box(&taxes))));
    });
}

fn bench_parse_decimal(c: &mut Criterion) {
    c.bench_function("parse_decimal", |b| {
        b.iter(|| black_box(parse_decimal(black_box("  1234.5678e-2 EUR"))));
    });
}

fn bench_tax_breakdown(c: &mut Criterion) {
    let items = build_items(1000);
    c.bench_function("tax_breakdown_1000_lines", |b| {
        b.iter(|| black_box(tax_breakdown(black_box(&items))));
    });
}

criterion_group!(
    benches,
    bench_compute_10_lines,
    bench_compute_1000_lines,
    bench_in_place_1000_text_lines,
    bench_parse_decimal,
    bench_tax_breakdown,
);
criterion_main!(benches);
