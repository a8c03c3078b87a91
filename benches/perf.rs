use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use tradedesk::draft_curve::{CurveParams, DraftSample, FitOptions, fit_decay_curve};
use tradedesk::draft_value::DraftValueEngine;
use tradedesk::lottery::LotteryOddsTable;
use tradedesk::player::PlayerStats;
use tradedesk::portfolio::Portfolio;
use tradedesk::trade::compare;
use tradedesk::valuation::evaluate;

fn sample_draft_class() -> Vec<DraftSample> {
    let truth = CurveParams {
        anchor: 6.8,
        decay_rate: 0.26,
        floor: 0.3,
    };
    let mut out = Vec::new();
    for pick in 1..=14u32 {
        let per_pick = if pick == 1 { 14 } else { 12 };
        for k in 0..per_pick {
            let noise = (((pick * 7 + k * 13) % 9) as f64 - 4.0) * 0.3;
            let value = (truth.value_at(pick as f64) + noise).max(0.0);
            out.push(DraftSample::new(pick, value).expect("valid sample"));
        }
    }
    out
}

fn sample_side(prefix: &str, n: usize) -> Portfolio {
    (0..n)
        .map(|idx| {
            let stats = PlayerStats::new(
                &format!("{prefix} {idx}"),
                1.0 + idx as f64 * 0.7,
                0.30 + (idx % 5) as f64 * 0.02,
                1.2 + (idx % 3) as f64 * 0.5,
                74.0 + (idx % 10) as f64,
                185.0 + (idx % 8) as f64 * 9.0,
                78.0 + (idx % 10) as f64,
            )
            .expect("valid player");
            evaluate(stats)
        })
        .collect()
}

fn bench_curve_fit(c: &mut Criterion) {
    let samples = sample_draft_class();
    let opts = FitOptions::default();
    c.bench_function("draft_curve_fit", |b| {
        b.iter(|| {
            let report = fit_decay_curve(black_box(&samples), &opts).unwrap();
            black_box(report.params.decay_rate);
        })
    });
}

fn bench_seed_table(c: &mut Criterion) {
    let mut engine = DraftValueEngine::new();
    engine
        .fit(&sample_draft_class(), &FitOptions::default())
        .unwrap();
    let table = LotteryOddsTable::standard().unwrap();
    c.bench_function("lottery_expected_value_table", |b| {
        b.iter(|| {
            let rows = engine.expected_value_table(black_box(table)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_trade_compare(c: &mut Criterion) {
    let outgoing = sample_side("Out", 8);
    let incoming = sample_side("In", 8);
    c.bench_function("trade_compare", |b| {
        b.iter(|| {
            let eval = compare(black_box(&outgoing), black_box(&incoming));
            black_box(eval.difference);
        })
    });
}

criterion_group!(benches, bench_curve_fit, bench_seed_table, bench_trade_compare);
criterion_main!(benches);
