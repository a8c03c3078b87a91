use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use tradedesk::config::DraftModelConfig;
use tradedesk::draft_dataset;
use tradedesk::draft_value::DraftValueEngine;
use tradedesk::logging;
use tradedesk::lottery::LotteryOddsTable;
use tradedesk::persist::{self, DraftCurveArtifact};

fn main() -> Result<()> {
    logging::load_dotenv();
    logging::init_tracing()?;

    let cfg = DraftModelConfig::from_env();
    let csv_path = parse_path_arg("--csv").unwrap_or_else(|| cfg.csv_path.clone());
    let out_path = parse_path_arg("--out")
        .or_else(|| cfg.curve_path.clone())
        .ok_or_else(|| anyhow!("no output path: pass --out or set DRAFT_CURVE_PATH"))?;

    let samples = draft_dataset::load_draft_samples(&csv_path, &cfg.filter)?;
    info!(
        samples = samples.len(),
        path = %csv_path.display(),
        "draft samples loaded"
    );

    let mut engine = DraftValueEngine::new();
    let report = *engine
        .fit(&samples, &cfg.fit)
        .context("fit draft value curve")?;
    let params = report.params;

    println!(
        ">>> Anchor: first-pick ceiling is {:.2} wins (mean of top {} No.1 picks)",
        params.anchor, cfg.fit.top_pick_count
    );
    println!("Fitted parameters (per-player points):");
    println!("A (anchored gain): {:.2} wins", params.amplitude());
    println!("lambda (decay rate): {:.3}", params.decay_rate);
    println!("C (floor): {:.2} wins", params.floor);
    println!(
        "samples={} iterations={} rss={:.4}",
        report.sample_count, report.iterations, report.rss
    );

    if !has_flag("--no-table") {
        match LotteryOddsTable::standard_with_tolerance(cfg.lottery_sum_tolerance) {
            Ok(table) => {
                println!();
                for row in engine.expected_value_table(&table)? {
                    println!("seed {:>2}: {:.2} wins", row.seed, row.expected_value);
                }
            }
            Err(err) => warn!(error = %err, "lottery table rejected; skipping projection table"),
        }
    }

    let artifact = DraftCurveArtifact::from_report(&report, Some(csv_path.display().to_string()));
    persist::save_curve(&out_path, &artifact)?;
    println!("draft curve written: {}", out_path.display());
    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&prefix)
            && !v.trim().is_empty()
        {
            return Some(PathBuf::from(v));
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|a| a == flag)
}
