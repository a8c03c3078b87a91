use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::draft_curve::{CurveParams, FitOptions, FitReport};
use crate::draft_value::DraftValueEngine;
use crate::error::DraftError;

pub const ARTIFACT_VERSION: u32 = 1;

/// On-disk form of a fitted draft curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftCurveArtifact {
    pub version: u32,
    pub generated_at: String,
    #[serde(default)]
    pub source: Option<String>,
    pub sample_count: usize,
    pub anchor_samples: usize,
    pub iterations: usize,
    pub rss: f64,
    pub params: CurveParams,
}

impl DraftCurveArtifact {
    pub fn from_report(report: &FitReport, source: Option<String>) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            source,
            sample_count: report.sample_count,
            anchor_samples: report.anchor_samples,
            iterations: report.iterations,
            rss: report.rss,
            params: report.params,
        }
    }

    pub fn report(&self) -> FitReport {
        FitReport {
            params: self.params,
            sample_count: self.sample_count,
            anchor_samples: self.anchor_samples,
            iterations: self.iterations,
            rss: self.rss,
        }
    }

    /// Rebuilds the engine, rejecting params outside the bounds of `opts`.
    pub fn into_engine(self, opts: &FitOptions) -> Result<DraftValueEngine, DraftError> {
        DraftValueEngine::from_report(self.report(), opts)
    }
}

pub fn save_curve(path: &Path, artifact: &DraftCurveArtifact) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(artifact).context("serialize draft curve")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

pub fn load_curve(path: &Path) -> Result<DraftCurveArtifact> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read draft curve {}", path.display()))?;
    let artifact = serde_json::from_str::<DraftCurveArtifact>(&raw)
        .with_context(|| format!("parse draft curve {}", path.display()))?;
    if artifact.version != ARTIFACT_VERSION {
        bail!(
            "draft curve {} has version {}, expected {}",
            path.display(),
            artifact.version,
            ARTIFACT_VERSION
        );
    }
    let p = artifact.params;
    if !(p.anchor.is_finite() && p.decay_rate.is_finite() && p.floor.is_finite()) {
        bail!("draft curve {} has non-finite parameters", path.display());
    }
    Ok(artifact)
}
