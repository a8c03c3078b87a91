use thiserror::Error;

/// A player or sample field that cannot feed the models.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("no draft samples to fit")]
    NoSamples,

    #[error("anchor needs {required} first-pick samples, found {found}")]
    InsufficientTopPicks { required: usize, found: usize },

    #[error("optimizer did not converge within {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("non-finite residual at lambda={decay_rate}, floor={floor}")]
    NumericalFailure { decay_rate: f64, floor: f64 },

    #[error("invalid fit options: {0}")]
    InvalidOptions(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("draft value engine has not been fitted")]
    NotFitted,

    #[error("draft value engine fit failed: {0}")]
    FitFailed(FitError),

    #[error("draft value engine is already {0}; build a new engine to refit")]
    EngineSealed(&'static str),

    #[error("seed {0} is not in the lottery odds table")]
    UnknownSeed(u8),

    #[error("draft pick must be >= 1, got {0}")]
    InvalidPick(u32),

    #[error("curve parameters out of range: anchor={anchor}, lambda={decay_rate}, floor={floor}")]
    InvalidCurve {
        anchor: f64,
        decay_rate: f64,
        floor: f64,
    },

    #[error(transparent)]
    Fit(#[from] FitError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OddsTableError {
    #[error("seed {0} outside 1..=14")]
    SeedOutOfRange(u8),

    #[error("seed {seed}: pick {pick} outside 1..=14")]
    PickOutOfRange { seed: u8, pick: u8 },

    #[error("seed {seed}: pick {pick} probability {probability} outside 0..=100")]
    InvalidProbability { seed: u8, pick: u8, probability: f64 },

    #[error("seed {0} has no pick probabilities")]
    EmptySeed(u8),

    #[error("sum tolerance must be finite and >= 0, got {0}")]
    InvalidTolerance(f64),

    #[error("seed {seed}: probabilities sum to {total:.3}, expected 100 (+/- {tolerance})")]
    SumMismatch {
        seed: u8,
        total: f64,
        tolerance: f64,
    },
}
