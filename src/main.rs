use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;

use tradedesk::logging;
use tradedesk::player::{PlayerInput, PlayerStats};
use tradedesk::portfolio::Portfolio;
use tradedesk::trade;
use tradedesk::valuation::evaluate;

#[derive(Debug, Deserialize)]
struct TradeCase {
    #[serde(default)]
    outgoing: Vec<PlayerInput>,
    #[serde(default)]
    incoming: Vec<PlayerInput>,
}

fn main() -> Result<()> {
    logging::load_dotenv();
    logging::init_tracing()?;

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: tradedesk <trade_case.json>");
        bail!("missing trade case path");
    };

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let case: TradeCase =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;

    let outgoing = build_side(case.outgoing).context("outgoing side")?;
    let incoming = build_side(case.incoming).context("incoming side")?;
    info!(
        outgoing = outgoing.len(),
        incoming = incoming.len(),
        "trade case loaded"
    );

    print_side("Outgoing Assets", &outgoing);
    print_side("Incoming Assets", &incoming);

    let evaluation = trade::compare(&outgoing, &incoming);
    println!("{}", evaluation.summary());
    Ok(())
}

fn build_side(players: Vec<PlayerInput>) -> Result<Portfolio> {
    let mut side = Portfolio::new();
    for raw in players {
        let name = raw.name.clone();
        let stats = PlayerStats::try_from(raw).with_context(|| format!("player `{name}`"))?;
        side.push(evaluate(stats));
    }
    Ok(side)
}

fn print_side(title: &str, side: &Portfolio) {
    println!("{title}");
    println!("{:<24} {:>12} {:>12} {:>8}", "Name", "Pe (Contrib)", "Ss (Switch)", "WS");
    for p in side {
        println!(
            "{:<24} {:>12.4} {:>12.4} {:>8}",
            p.name(),
            p.contribution_score(),
            p.switchability_score(),
            p.stats().win_shares()
        );
    }
    println!();
}
