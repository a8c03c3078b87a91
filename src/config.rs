use std::env;
use std::path::PathBuf;

use crate::draft_curve::FitOptions;
use crate::draft_dataset::DraftFilter;
use crate::lottery::DEFAULT_SUM_TOLERANCE;

const CACHE_DIR: &str = "tradedesk";
const CURVE_FILE: &str = "draft_curve_v1.json";
const DEFAULT_CSV_PATH: &str = "data/nbaplayersdraft.csv";

/// Draft model settings, read from the environment with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftModelConfig {
    pub csv_path: PathBuf,
    pub curve_path: Option<PathBuf>,
    pub filter: DraftFilter,
    pub fit: FitOptions,
    pub lottery_sum_tolerance: f64,
}

impl Default for DraftModelConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            curve_path: default_curve_path(),
            filter: DraftFilter::default(),
            fit: FitOptions::default(),
            lottery_sum_tolerance: DEFAULT_SUM_TOLERANCE,
        }
    }
}

impl DraftModelConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparsable values fall back to
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(path) = non_empty("DRAFT_CSV_PATH") {
            cfg.csv_path = PathBuf::from(path);
        }
        if let Some(path) = non_empty("DRAFT_CURVE_PATH") {
            cfg.curve_path = Some(PathBuf::from(path));
        }
        if let Some(year) = non_empty("DRAFT_MIN_YEAR").and_then(|v| v.parse::<i32>().ok()) {
            cfg.filter.min_year = year;
        }
        if let Some(pick) = non_empty("DRAFT_MAX_PICK").and_then(|v| v.parse::<u32>().ok()) {
            cfg.filter.max_pick = pick.clamp(1, 60);
        }
        if let Some(years) = non_empty("DRAFT_MIN_YEARS_ACTIVE")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
        {
            cfg.filter.min_years_active = years.max(0.0);
        }
        if let Some(count) = non_empty("DRAFT_TOP_PICK_COUNT").and_then(|v| v.parse::<usize>().ok())
        {
            cfg.fit.top_pick_count = count.max(1);
        }
        if let Some(iters) = non_empty("DRAFT_FIT_MAX_ITERS").and_then(|v| v.parse::<usize>().ok()) {
            cfg.fit.max_iterations = iters.clamp(10, 10_000);
        }
        if let Some(tol) = non_empty("LOTTERY_SUM_TOLERANCE")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
        {
            cfg.lottery_sum_tolerance = tol.clamp(0.0, 5.0);
        }
        cfg
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn default_curve_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CURVE_FILE))
}
