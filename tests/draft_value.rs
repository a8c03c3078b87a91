use std::path::PathBuf;

use tradedesk::draft_curve::{DraftSample, FitOptions};
use tradedesk::draft_dataset::{DraftFilter, load_draft_samples};
use tradedesk::draft_value::{DraftValueEngine, EngineStatus};
use tradedesk::error::{DraftError, FitError};
use tradedesk::lottery::LotteryOddsTable;
use tradedesk::persist::{self, DraftCurveArtifact};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn fitted_engine() -> DraftValueEngine {
    let samples = load_draft_samples(&fixture_path("draft_sample.csv"), &DraftFilter::default())
        .expect("fixture csv should load");
    let mut engine = DraftValueEngine::new();
    engine
        .fit(&samples, &FitOptions::default())
        .expect("fixture should fit");
    engine
}

#[test]
fn fixture_fit_respects_filters_and_bounds() {
    let engine = fitted_engine();
    assert_eq!(engine.status(), EngineStatus::Fitted);

    let report = engine.report().unwrap();
    assert_eq!(report.sample_count, 64);
    assert_eq!(report.anchor_samples, 12);
    // Best nine of the twelve first picks.
    assert!((report.params.anchor - 52.7 / 9.0).abs() < 1e-9);
    assert!(report.params.floor >= 0.0 && report.params.floor <= 0.5);
    assert!(report.params.decay_rate > 0.0 && report.params.decay_rate <= 2.0);
    assert_eq!(
        report.params.amplitude(),
        report.params.anchor - report.params.floor
    );
}

#[test]
fn first_pick_value_is_the_anchor() {
    let engine = fitted_engine();
    let anchor = engine.params().unwrap().anchor;
    assert_eq!(engine.value_at_pick(1).unwrap(), anchor);
}

#[test]
fn pick_value_decays_monotonically() {
    let engine = fitted_engine();
    let values: Vec<f64> = (1..=14).map(|p| engine.value_at_pick(p).unwrap()).collect();
    for pair in values.windows(2) {
        assert!(pair[1] < pair[0], "{values:?}");
    }
}

#[test]
fn expected_value_is_bounded_by_listed_picks() {
    let engine = fitted_engine();
    let table = LotteryOddsTable::standard().unwrap();
    for seed in [1u8, 10, 11, 14] {
        let odds = table.odds(seed).unwrap();
        let values: Vec<f64> = odds
            .keys()
            .map(|&pick| engine.value_at_pick(pick as u32).unwrap())
            .collect();
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ev = engine.expected_value_for_seed(seed, table).unwrap();
        assert!(ev >= lo - 1e-9 && ev <= hi + 1e-9, "seed {seed}: {lo} <= {ev} <= {hi}");
    }
}

#[test]
fn worse_records_project_more_value() {
    let engine = fitted_engine();
    let table = LotteryOddsTable::standard().unwrap();
    let rows = engine.expected_value_table(table).unwrap();
    assert_eq!(rows.len(), 14);
    assert_eq!(rows.first().map(|r| r.seed), Some(1));
    assert!(rows[0].expected_value > rows[13].expected_value);
}

#[test]
fn seeds_outside_the_table_are_errors() {
    let engine = fitted_engine();
    let table = LotteryOddsTable::standard().unwrap();
    assert_eq!(
        engine.expected_value_for_seed(0, table),
        Err(DraftError::UnknownSeed(0))
    );
    assert_eq!(
        engine.expected_value_for_seed(15, table),
        Err(DraftError::UnknownSeed(15))
    );
}

#[test]
fn eight_first_picks_are_not_enough() {
    let mut samples: Vec<DraftSample> = (0..8)
        .map(|i| DraftSample::new(1, 5.0 + i as f64).unwrap())
        .collect();
    for pick in 2..=14 {
        samples.push(DraftSample::new(pick, 1.0).unwrap());
    }
    let mut engine = DraftValueEngine::new();
    let err = engine.fit(&samples, &FitOptions::default()).unwrap_err();
    assert_eq!(
        err,
        DraftError::Fit(FitError::InsufficientTopPicks {
            required: 9,
            found: 8
        })
    );
    assert_eq!(engine.status(), EngineStatus::FitFailed);
}

#[test]
fn persisted_curve_restores_the_same_answers() {
    let engine = fitted_engine();
    let report = *engine.report().unwrap();
    let artifact = DraftCurveArtifact::from_report(&report, Some("fixture".to_string()));

    let dir = std::env::temp_dir().join(format!("tradedesk_test_{}", std::process::id()));
    let path = dir.join("draft_curve_v1.json");
    persist::save_curve(&path, &artifact).unwrap();
    let restored = persist::load_curve(&path)
        .unwrap()
        .into_engine(&FitOptions::default())
        .unwrap();
    let _ = std::fs::remove_dir_all(&dir);

    let table = LotteryOddsTable::standard().unwrap();
    for seed in 1..=14u8 {
        let a = restored.expected_value_for_seed(seed, table).unwrap();
        let b = engine.expected_value_for_seed(seed, table).unwrap();
        assert!((a - b).abs() < 1e-12, "seed {seed}: {a} vs {b}");
    }
}

#[test]
fn restored_curve_outside_bounds_is_refused() {
    let engine = fitted_engine();
    let mut report = *engine.report().unwrap();
    report.params.floor = 3.0;
    let artifact = DraftCurveArtifact::from_report(&report, None);

    let dir = std::env::temp_dir().join(format!("tradedesk_bounds_{}", std::process::id()));
    let path = dir.join("draft_curve_v1.json");
    persist::save_curve(&path, &artifact).unwrap();
    let loaded = persist::load_curve(&path).unwrap();
    let _ = std::fs::remove_dir_all(&dir);

    assert!(matches!(
        loaded.into_engine(&FitOptions::default()),
        Err(DraftError::InvalidCurve { .. })
    ));
}
