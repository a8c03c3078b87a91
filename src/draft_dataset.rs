use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::draft_curve::DraftSample;

const REQUIRED_COLUMNS: [&str; 4] = ["year", "overall_pick", "years_active", "win_shares"];

/// One row of the draft history extract. Columns not named here are ignored;
/// empty cells in the optional columns read as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DraftRecord {
    pub year: i32,
    pub overall_pick: u32,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub years_active: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub win_shares: Option<f64>,
}

impl DraftRecord {
    /// Career win shares per season, if both inputs are present and usable.
    pub fn annual_win_share(&self) -> Option<f64> {
        let years = self.years_active?;
        let ws = self.win_shares?;
        if years <= 0.0 {
            return None;
        }
        let avg = ws / years;
        avg.is_finite().then_some(avg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftFilter {
    pub min_year: i32,
    pub max_pick: u32,
    pub min_years_active: f64,
}

impl Default for DraftFilter {
    fn default() -> Self {
        Self {
            min_year: 2011,
            max_pick: 14,
            min_years_active: 1.0,
        }
    }
}

impl DraftFilter {
    pub fn keeps(&self, record: &DraftRecord) -> bool {
        record.year >= self.min_year
            && (1..=self.max_pick).contains(&record.overall_pick)
            && record
                .years_active
                .is_some_and(|y| y >= self.min_years_active)
    }
}

/// Reads every well-formed row. A missing required column, or a file where no
/// row parses, is an error; individual bad rows are skipped with a warning.
pub fn read_draft_records<R: Read>(rdr: R) -> Result<Vec<DraftRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let headers = reader.headers().context("read csv header")?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("draft csv is missing column(s): {}", missing.join(", "));
    }

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (idx, row) in reader.deserialize::<DraftRecord>().enumerate() {
        match row {
            Ok(record) => out.push(record),
            Err(err) => {
                skipped += 1;
                warn!("skipping malformed draft row {}: {}", idx + 1, err);
            }
        }
    }
    if out.is_empty() && skipped > 0 {
        bail!("none of the {skipped} draft rows could be parsed");
    }
    Ok(out)
}

pub fn load_draft_records(path: &Path) -> Result<Vec<DraftRecord>> {
    let file = File::open(path).with_context(|| format!("open draft csv {}", path.display()))?;
    read_draft_records(file).with_context(|| format!("read draft csv {}", path.display()))
}

/// Applies the filter and turns surviving rows into fit samples. Rows without
/// win shares, or with a negative per-season average, are dropped.
pub fn samples_from_records(records: &[DraftRecord], filter: &DraftFilter) -> Vec<DraftSample> {
    let mut negative = 0usize;
    let mut missing = 0usize;
    let mut out = Vec::new();
    for record in records.iter().filter(|r| filter.keeps(r)) {
        let Some(avg) = record.annual_win_share() else {
            missing += 1;
            continue;
        };
        match DraftSample::new(record.overall_pick, avg) {
            Ok(sample) => out.push(sample),
            Err(_) => negative += 1,
        }
    }
    debug!(
        records = records.len(),
        kept = out.len(),
        missing,
        negative,
        "draft samples prepared"
    );
    out
}

pub fn load_draft_samples(path: &Path, filter: &DraftFilter) -> Result<Vec<DraftSample>> {
    let records = load_draft_records(path)?;
    Ok(samples_from_records(&records, filter))
}
