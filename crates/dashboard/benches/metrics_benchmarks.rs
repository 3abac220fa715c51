use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use pizzapos_core::{InvoiceId, ItemId, Money, TaxRate};
use pizzapos_dashboard::{recent_orders, summarize, top_selling_items};
use pizzapos_invoicing::{Customer, Invoice, InvoiceLine, InvoiceNumber};

const NAMES: [&str; 8] = [
    "Margherita Pizza",
    "Pepperoni Pizza",
    "Supreme Pizza",
    "Extra Cheese",
    "Mushrooms",
    "Pepperoni",
    "Coca Cola",
    "Bottled Water",
];

fn synthetic_invoices(n: usize) -> Vec<Invoice> {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let lines = (0..3)
                .map(|j| {
                    InvoiceLine::new(
                        ItemId::new(),
                        NAMES[(i + j) % NAMES.len()],
                        Money::from_cents(199 + (j as u64) * 300),
                        1 + (i % 4) as u32,
                    )
                    .unwrap()
                })
                .collect();
            Invoice::assemble(
                InvoiceId::new(),
                InvoiceNumber::from_sequence(i as u64 + 1),
                start + Duration::minutes(i as i64 * 17),
                Customer::new("Walk-in", None, None).unwrap(),
                lines,
                TaxRate::from_basis_points(825).unwrap(),
            )
            .unwrap()
        })
        .collect()
}

fn bench_dashboard_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_recompute");
    let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    for size in [100usize, 1_000, 10_000] {
        let invoices = synthetic_invoices(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("summarize", size), &invoices, |b, inv| {
            b.iter(|| summarize(black_box(inv), 8, today, 0.0));
        });
        group.bench_with_input(BenchmarkId::new("top_selling", size), &invoices, |b, inv| {
            b.iter(|| top_selling_items(black_box(inv), 5));
        });
        group.bench_with_input(BenchmarkId::new("recent_orders", size), &invoices, |b, inv| {
            b.iter(|| recent_orders(black_box(inv), 5));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dashboard_recompute);
criterion_main!(benches);
