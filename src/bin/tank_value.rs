use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use tradedesk::config::DraftModelConfig;
use tradedesk::logging;
use tradedesk::lottery::LotteryOddsTable;
use tradedesk::persist;
use tradedesk::player::parse_field;

fn main() -> Result<()> {
    logging::load_dotenv();
    logging::init_tracing()?;

    let cfg = DraftModelConfig::from_env();
    let curve_path = parse_curve_arg()
        .or_else(|| cfg.curve_path.clone())
        .ok_or_else(|| anyhow!("no curve path: pass --curve or set DRAFT_CURVE_PATH"))?;
    let engine = persist::load_curve(&curve_path)?
        .into_engine(&cfg.fit)
        .with_context(|| format!("restore draft curve {}", curve_path.display()))?;
    let table = LotteryOddsTable::standard_with_tolerance(cfg.lottery_sum_tolerance)
        .context("lottery odds table")?;

    if has_flag("--all") {
        for row in engine.expected_value_table(&table)? {
            println!("seed {:>2}: {:.2} wins", row.seed, row.expected_value);
        }
        return Ok(());
    }

    let raw = match positional_seed() {
        Some(raw) => raw,
        None => prompt_seed()?,
    };
    let seed = parse_seed(&raw)?;
    let expected = engine.expected_value_for_seed(seed, &table)?;
    println!(
        "Finishing {} from the bottom projects a {:.2}-win increment two seasons out",
        seed, expected
    );
    Ok(())
}

fn parse_seed(raw: &str) -> Result<u8> {
    let value = parse_field("seed", raw)?;
    if value.fract() != 0.0 || !(0.0..=u8::MAX as f64).contains(&value) {
        return Err(anyhow!("seed must be a whole number between 1 and 14, got {raw}"));
    }
    Ok(value as u8)
}

fn prompt_seed() -> Result<String> {
    print!("Standings position from the bottom (1-14): ");
    io::stdout().flush().context("flush prompt")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read seed")?;
    Ok(line)
}

fn positional_seed() -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--curve" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        return Some(arg.clone());
    }
    None
}

fn parse_curve_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix("--curve=")
            && !v.trim().is_empty()
        {
            return Some(PathBuf::from(v));
        }
        if arg == "--curve"
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
