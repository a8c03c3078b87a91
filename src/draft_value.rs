use serde::Serialize;
use tracing::{info, warn};

use crate::draft_curve::{CurveParams, DraftSample, FitOptions, FitReport, fit_decay_curve};
use crate::error::{DraftError, FitError};
use crate::lottery::LotteryOddsTable;

#[derive(Debug, Clone, PartialEq)]
enum EngineState {
    Unfitted,
    Fitting,
    Fitted(FitReport),
    FitFailed(FitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineStatus {
    Unfitted,
    Fitting,
    Fitted,
    FitFailed,
}

impl EngineStatus {
    pub fn label(self) -> &'static str {
        match self {
            EngineStatus::Unfitted => "unfitted",
            EngineStatus::Fitting => "fitting",
            EngineStatus::Fitted => "fitted",
            EngineStatus::FitFailed => "fit-failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeedProjection {
    pub seed: u8,
    pub expected_value: f64,
}

/// Owns one fitted draft-value curve and answers pick and lottery queries.
///
/// Lifecycle: unfitted -> fitting -> fitted | fit-failed. Both outcomes are
/// final for the instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftValueEngine {
    state: EngineState,
}

impl Default for DraftValueEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftValueEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Unfitted,
        }
    }

    /// Restores a fitted engine from a persisted report. The parameters must
    /// be finite and lie inside the bounds of `opts`.
    pub fn from_report(report: FitReport, opts: &FitOptions) -> Result<Self, DraftError> {
        let p = report.params;
        let in_range = p.anchor.is_finite()
            && p.anchor >= 0.0
            && p.decay_rate.is_finite()
            && p.floor.is_finite()
            && (opts.decay_rate_bounds.lower..=opts.decay_rate_bounds.upper).contains(&p.decay_rate)
            && (opts.floor_bounds.lower..=opts.floor_bounds.upper).contains(&p.floor);
        if !in_range {
            return Err(DraftError::InvalidCurve {
                anchor: p.anchor,
                decay_rate: p.decay_rate,
                floor: p.floor,
            });
        }
        Ok(Self {
            state: EngineState::Fitted(report),
        })
    }

    pub fn status(&self) -> EngineStatus {
        match self.state {
            EngineState::Unfitted => EngineStatus::Unfitted,
            EngineState::Fitting => EngineStatus::Fitting,
            EngineState::Fitted(_) => EngineStatus::Fitted,
            EngineState::FitFailed(_) => EngineStatus::FitFailed,
        }
    }

    pub fn fit(&mut self, samples: &[DraftSample], opts: &FitOptions) -> Result<&FitReport, DraftError> {
        if !matches!(self.state, EngineState::Unfitted) {
            return Err(DraftError::EngineSealed(self.status().label()));
        }
        self.state = EngineState::Fitting;

        match fit_decay_curve(samples, opts) {
            Ok(report) => {
                info!(
                    samples = report.sample_count,
                    anchor = report.params.anchor,
                    decay_rate = report.params.decay_rate,
                    floor = report.params.floor,
                    iterations = report.iterations,
                    "draft curve fitted"
                );
                self.state = EngineState::Fitted(report);
                self.report()
            }
            Err(err) => {
                warn!(error = %err, samples = samples.len(), "draft curve fit failed");
                self.state = EngineState::FitFailed(err.clone());
                Err(DraftError::Fit(err))
            }
        }
    }

    pub fn report(&self) -> Result<&FitReport, DraftError> {
        match &self.state {
            EngineState::Fitted(report) => Ok(report),
            EngineState::FitFailed(err) => Err(DraftError::FitFailed(err.clone())),
            EngineState::Unfitted | EngineState::Fitting => Err(DraftError::NotFitted),
        }
    }

    pub fn params(&self) -> Result<CurveParams, DraftError> {
        self.report().map(|r| r.params)
    }

    pub fn value_at_pick(&self, pick: u32) -> Result<f64, DraftError> {
        let params = self.params()?;
        if pick == 0 {
            return Err(DraftError::InvalidPick(pick));
        }
        Ok(params.value_at(pick as f64))
    }

    /// Probability-weighted pick value for a standings seed. Odds are used as
    /// published, without renormalising seeds that total 99.9 or 100.1.
    pub fn expected_value_for_seed(
        &self,
        seed: u8,
        odds_table: &LotteryOddsTable,
    ) -> Result<f64, DraftError> {
        let params = self.params()?;
        let odds = odds_table.odds(seed).ok_or(DraftError::UnknownSeed(seed))?;
        let mut expected_gain = 0.0;
        for (&pick, &probability) in odds {
            expected_gain += (probability / 100.0) * params.value_at(pick as f64);
        }
        Ok(expected_gain)
    }

    pub fn expected_value_table(
        &self,
        odds_table: &LotteryOddsTable,
    ) -> Result<Vec<SeedProjection>, DraftError> {
        odds_table
            .seeds()
            .map(|seed| {
                self.expected_value_for_seed(seed, odds_table)
                    .map(|expected_value| SeedProjection {
                        seed,
                        expected_value,
                    })
            })
            .collect()
    }
}
