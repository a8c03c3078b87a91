use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Raw box-score and measurement inputs for one player.
///
/// Only constructible through [`PlayerStats::new`], so every instance carries a
/// non-empty name and finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    name: String,
    win_shares: f64,
    three_point_pct: f64,
    assist_to_turnover_ratio: f64,
    height_inches: f64,
    weight_lbs: f64,
    wingspan_inches: f64,
}

/// Unvalidated player record as it arrives from a case file or form.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInput {
    pub name: String,
    pub win_shares: f64,
    #[serde(alias = "three_p")]
    pub three_point_pct: f64,
    #[serde(alias = "ast_to")]
    pub assist_to_turnover_ratio: f64,
    #[serde(alias = "height")]
    pub height_inches: f64,
    #[serde(alias = "weight")]
    pub weight_lbs: f64,
    #[serde(alias = "wingspan")]
    pub wingspan_inches: f64,
}

impl PlayerStats {
    pub fn new(
        name: &str,
        win_shares: f64,
        three_point_pct: f64,
        assist_to_turnover_ratio: f64,
        height_inches: f64,
        weight_lbs: f64,
        wingspan_inches: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("name", "name is required"));
        }
        Ok(Self {
            name: name.to_string(),
            win_shares: finite("win_shares", win_shares)?,
            three_point_pct: finite("three_point_pct", three_point_pct)?,
            assist_to_turnover_ratio: finite("assist_to_turnover_ratio", assist_to_turnover_ratio)?,
            height_inches: finite("height_inches", height_inches)?,
            weight_lbs: finite("weight_lbs", weight_lbs)?,
            wingspan_inches: finite("wingspan_inches", wingspan_inches)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn win_shares(&self) -> f64 {
        self.win_shares
    }

    pub fn three_point_pct(&self) -> f64 {
        self.three_point_pct
    }

    pub fn assist_to_turnover_ratio(&self) -> f64 {
        self.assist_to_turnover_ratio
    }

    pub fn height_inches(&self) -> f64 {
        self.height_inches
    }

    pub fn weight_lbs(&self) -> f64 {
        self.weight_lbs
    }

    pub fn wingspan_inches(&self) -> f64 {
        self.wingspan_inches
    }
}

impl TryFrom<PlayerInput> for PlayerStats {
    type Error = ValidationError;

    fn try_from(raw: PlayerInput) -> Result<Self, Self::Error> {
        PlayerStats::new(
            &raw.name,
            raw.win_shares,
            raw.three_point_pct,
            raw.assist_to_turnover_ratio,
            raw.height_inches,
            raw.weight_lbs,
            raw.wingspan_inches,
        )
    }
}

/// Parses one free-text form field into a finite real.
pub fn parse_field(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "value is required"));
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::new(field, format!("`{trimmed}` is not a number")))?;
    finite(field, value)
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::new(field, format!("{value} is not finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        let err = PlayerStats::new("   ", 5.0, 0.38, 2.0, 78.0, 210.0, 82.0).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let err = PlayerStats::new("A", f64::NAN, 0.38, 2.0, 78.0, 210.0, 82.0).unwrap_err();
        assert_eq!(err.field, "win_shares");
        let err =
            PlayerStats::new("A", 1.0, 0.38, 2.0, 78.0, f64::INFINITY, 82.0).unwrap_err();
        assert_eq!(err.field, "weight_lbs");
    }

    #[test]
    fn parse_field_handles_text() {
        assert_eq!(parse_field("height_inches", " 79.5 ").unwrap(), 79.5);
        assert!(parse_field("height_inches", "six-eight").is_err());
        assert!(parse_field("height_inches", "").is_err());
        assert!(parse_field("height_inches", "inf").is_err());
    }

    #[test]
    fn input_aliases_match_form_labels() {
        let raw = r#"{"name":"X","win_shares":4.0,"three_p":0.4,"ast_to":1.5,"height":80,"weight":220,"wingspan":84}"#;
        let input: PlayerInput = serde_json::from_str(raw).unwrap();
        let stats = PlayerStats::try_from(input).unwrap();
        assert_eq!(stats.wingspan_inches(), 84.0);
    }
}
