use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::OddsTableError;

pub const MIN_SEED: u8 = 1;
pub const MAX_SEED: u8 = 14;
pub const MIN_PICK: u8 = 1;
pub const MAX_PICK: u8 = 14;

/// Published odds are rounded to one decimal, so a seed may total 99.9 or 100.1.
pub const DEFAULT_SUM_TOLERANCE: f64 = 0.25;

// Seed (1 = worst record) -> [(pick, percent)].
const STANDARD_ODDS: [(u8, &[(u8, f64)]); 14] = [
    (1, &[(1, 14.0), (2, 13.4), (3, 12.7), (4, 12.0), (5, 47.9)]),
    (2, &[(1, 14.0), (2, 13.4), (3, 12.7), (4, 12.0), (5, 27.8), (6, 20.0)]),
    (3, &[(1, 14.0), (2, 13.4), (3, 12.7), (4, 12.0), (5, 14.8), (6, 26.0), (7, 7.0)]),
    (4, &[(1, 12.5), (2, 12.2), (3, 11.9), (4, 11.5), (5, 7.2), (6, 25.7), (7, 16.7), (8, 2.2)]),
    (5, &[(1, 10.5), (2, 10.5), (3, 10.6), (4, 10.5), (5, 2.2), (6, 19.6), (7, 26.7), (8, 8.7), (9, 0.6)]),
    (6, &[(1, 9.0), (2, 9.2), (3, 9.4), (4, 9.6), (6, 8.6), (7, 29.8), (8, 20.5), (9, 3.7), (10, 0.1)]),
    (7, &[(1, 7.5), (2, 7.8), (3, 8.1), (4, 8.5), (7, 19.7), (8, 34.1), (9, 12.9), (10, 1.3)]),
    (8, &[(1, 6.0), (2, 6.3), (3, 6.7), (4, 7.2), (8, 34.5), (9, 32.1), (10, 6.7), (11, 0.4)]),
    (9, &[(1, 4.5), (2, 4.8), (3, 5.2), (4, 5.7), (9, 50.7), (10, 25.9), (11, 3.0), (12, 0.1)]),
    (10, &[(1, 3.0), (2, 3.3), (3, 3.6), (4, 4.0), (10, 65.9), (11, 19.0), (12, 1.2)]),
    (11, &[(1, 2.0), (2, 2.2), (3, 2.4), (4, 2.8), (11, 77.6), (12, 12.6), (13, 0.4)]),
    (12, &[(1, 1.5), (2, 1.7), (3, 1.9), (4, 2.1), (12, 86.1), (13, 6.7), (14, 0.1)]),
    (13, &[(1, 1.0), (2, 1.1), (3, 1.2), (4, 1.4), (13, 92.9), (14, 2.3)]),
    (14, &[(1, 0.5), (2, 0.6), (3, 0.6), (4, 0.7), (14, 97.6)]),
];

static STANDARD: Lazy<Result<LotteryOddsTable, OddsTableError>> =
    Lazy::new(|| LotteryOddsTable::new(standard_entries(), DEFAULT_SUM_TOLERANCE));

/// Standings seed -> draft pick -> probability in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotteryOddsTable {
    seeds: BTreeMap<u8, BTreeMap<u8, f64>>,
}

impl LotteryOddsTable {
    /// Builds a table after checking ranges and that each seed totals 100
    /// within `tolerance` percentage points. Probabilities are kept as given.
    pub fn new(
        seeds: BTreeMap<u8, BTreeMap<u8, f64>>,
        tolerance: f64,
    ) -> Result<Self, OddsTableError> {
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(OddsTableError::InvalidTolerance(tolerance));
        }
        for (&seed, picks) in &seeds {
            if !(MIN_SEED..=MAX_SEED).contains(&seed) {
                return Err(OddsTableError::SeedOutOfRange(seed));
            }
            if picks.is_empty() {
                return Err(OddsTableError::EmptySeed(seed));
            }
            let mut total = 0.0;
            for (&pick, &probability) in picks {
                if !(MIN_PICK..=MAX_PICK).contains(&pick) {
                    return Err(OddsTableError::PickOutOfRange { seed, pick });
                }
                if !probability.is_finite() || !(0.0..=100.0).contains(&probability) {
                    return Err(OddsTableError::InvalidProbability {
                        seed,
                        pick,
                        probability,
                    });
                }
                total += probability;
            }
            if (total - 100.0).abs() > tolerance {
                return Err(OddsTableError::SumMismatch {
                    seed,
                    total,
                    tolerance,
                });
            }
        }
        Ok(Self { seeds })
    }

    /// The NBA lottery table, validated at the default tolerance.
    pub fn standard() -> Result<&'static LotteryOddsTable, OddsTableError> {
        STANDARD.as_ref().map_err(Clone::clone)
    }

    pub fn standard_with_tolerance(tolerance: f64) -> Result<Self, OddsTableError> {
        Self::new(standard_entries(), tolerance)
    }

    pub fn odds(&self, seed: u8) -> Option<&BTreeMap<u8, f64>> {
        self.seeds.get(&seed)
    }

    pub fn seeds(&self) -> impl Iterator<Item = u8> + '_ {
        self.seeds.keys().copied()
    }

    pub fn total(&self, seed: u8) -> Option<f64> {
        self.odds(seed).map(|picks| picks.values().sum())
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

fn standard_entries() -> BTreeMap<u8, BTreeMap<u8, f64>> {
    STANDARD_ODDS
        .iter()
        .map(|(seed, picks)| (*seed, picks.iter().copied().collect()))
        .collect()
}
