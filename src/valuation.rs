use serde::Serialize;

use crate::player::PlayerStats;

// Switchability regression.
const SS_INTERCEPT: f64 = -1.132;
const SS_LENGTH: f64 = 0.0692;
const SS_HEIGHT: f64 = 0.0218;
const SS_WEIGHT: f64 = 0.00117;
const SS_BIG_PENALTY: f64 = 0.25;

// Big-man penalty applies at or above both thresholds.
const BIG_HEIGHT_INCHES: f64 = 82.0;
const BIG_WEIGHT_LBS: f64 = 245.0;

// Contribution regression.
const PE_INTERCEPT: f64 = -0.58024;
const PE_WS: f64 = 0.47267;
const PE_WS_SS: f64 = 0.23633;
const PE_WS_3P: f64 = 0.67623;
const PE_WS_AST_TO: f64 = 0.01185;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationResult {
    pub switchability_score: f64,
    pub contribution_score: f64,
}

/// A player together with the scores derived from their stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedPlayer {
    stats: PlayerStats,
    valuation: ValuationResult,
}

impl ValuedPlayer {
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn valuation(&self) -> ValuationResult {
        self.valuation
    }

    pub fn name(&self) -> &str {
        self.stats.name()
    }

    pub fn switchability_score(&self) -> f64 {
        self.valuation.switchability_score
    }

    pub fn contribution_score(&self) -> f64 {
        self.valuation.contribution_score
    }
}

/// Positional-flexibility proxy from body measurements.
///
/// Inputs are not range-checked: a negative height produces a number, not an
/// error. Callers own plausibility.
pub fn calculate_switchability(height_inches: f64, weight_lbs: f64, wingspan_inches: f64) -> f64 {
    let length = wingspan_inches - height_inches;
    let penalty = if height_inches >= BIG_HEIGHT_INCHES && weight_lbs >= BIG_WEIGHT_LBS {
        1.0
    } else {
        0.0
    };
    SS_INTERCEPT + SS_LENGTH * length + SS_HEIGHT * height_inches
        - SS_WEIGHT * weight_lbs
        - SS_BIG_PENALTY * penalty
}

pub fn calculate_contribution(
    win_shares: f64,
    switchability: f64,
    three_point_pct: f64,
    assist_to_turnover: f64,
) -> f64 {
    PE_INTERCEPT
        + PE_WS * win_shares
        + PE_WS_SS * win_shares * switchability
        + PE_WS_3P * win_shares * three_point_pct
        + PE_WS_AST_TO * win_shares * assist_to_turnover
}

pub fn valuate(stats: &PlayerStats) -> ValuationResult {
    let switchability_score = calculate_switchability(
        stats.height_inches(),
        stats.weight_lbs(),
        stats.wingspan_inches(),
    );
    let contribution_score = calculate_contribution(
        stats.win_shares(),
        switchability_score,
        stats.three_point_pct(),
        stats.assist_to_turnover_ratio(),
    );
    ValuationResult {
        switchability_score,
        contribution_score,
    }
}

pub fn evaluate(stats: PlayerStats) -> ValuedPlayer {
    let valuation = valuate(&stats);
    ValuedPlayer { stats, valuation }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_penalty_is_inclusive() {
        let with = calculate_switchability(82.0, 245.0, 86.0);
        let without = calculate_switchability(82.0, 244.9, 86.0);
        // 0.1 lb lighter removes the penalty and adds back 0.1 * SS_WEIGHT.
        assert!((without - with - (0.25 + 0.1 * SS_WEIGHT)).abs() < 1e-9);
    }

    #[test]
    fn zero_win_shares_gives_intercept() {
        assert_eq!(calculate_contribution(0.0, 1.3, 0.4, 2.5), PE_INTERCEPT);
    }

    #[test]
    fn evaluate_keeps_stats() {
        let stats = PlayerStats::new("Wing", 6.0, 0.37, 1.8, 79.0, 215.0, 83.5).unwrap();
        let valued = evaluate(stats.clone());
        assert_eq!(valued.stats(), &stats);
        assert_eq!(valued.valuation(), valuate(&stats));
    }
}
