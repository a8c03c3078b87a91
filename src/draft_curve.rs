use serde::{Deserialize, Serialize};

use crate::error::{FitError, ValidationError};

/// One historical observation: draft slot and per-season win shares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DraftSample {
    pick: u32,
    annual_win_share: f64,
}

impl DraftSample {
    pub fn new(pick: u32, annual_win_share: f64) -> Result<Self, ValidationError> {
        if pick == 0 {
            return Err(ValidationError::new("pick", "draft picks start at 1"));
        }
        if !annual_win_share.is_finite() || annual_win_share < 0.0 {
            return Err(ValidationError::new(
                "annual_win_share",
                format!("{annual_win_share} is not a finite non-negative value"),
            ));
        }
        Ok(Self {
            pick,
            annual_win_share,
        })
    }

    pub fn pick(&self) -> u32 {
        self.pick
    }

    pub fn annual_win_share(&self) -> f64 {
        self.annual_win_share
    }
}

/// `f(r) = (anchor - C) * exp(-lambda * (r - 1)) + C`, with `C` the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    pub anchor: f64,
    pub decay_rate: f64,
    pub floor: f64,
}

impl CurveParams {
    pub fn amplitude(&self) -> f64 {
        self.anchor - self.floor
    }

    /// Curve value at `pick`. Pick 1 returns the anchor exactly.
    pub fn value_at(&self, pick: f64) -> f64 {
        let offset = pick - 1.0;
        if offset == 0.0 {
            return self.anchor;
        }
        self.amplitude() * (-self.decay_rate * offset).exp() + self.floor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.lower, self.upper)
    }

    fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower <= self.upper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub top_pick_count: usize,
    pub initial_decay_rate: f64,
    pub initial_floor: f64,
    pub decay_rate_bounds: Bounds,
    pub floor_bounds: Bounds,
    pub max_iterations: usize,
    /// Relative drop in residual sum of squares below which the fit has converged.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            top_pick_count: 9,
            initial_decay_rate: 0.1,
            initial_floor: 0.2,
            decay_rate_bounds: Bounds::new(0.0, 2.0),
            floor_bounds: Bounds::new(0.0, 0.5),
            max_iterations: 200,
            tolerance: 1e-10,
        }
    }
}

impl FitOptions {
    fn validate(&self) -> Result<(), FitError> {
        if self.top_pick_count == 0 {
            return Err(FitError::InvalidOptions("top_pick_count must be >= 1".into()));
        }
        if !self.decay_rate_bounds.is_valid() || !self.floor_bounds.is_valid() {
            return Err(FitError::InvalidOptions("bounds must be finite with lower <= upper".into()));
        }
        if self.max_iterations == 0 {
            return Err(FitError::InvalidOptions("max_iterations must be >= 1".into()));
        }
        if !self.initial_decay_rate.is_finite() || !self.initial_floor.is_finite() {
            return Err(FitError::InvalidOptions("initial guess must be finite".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(FitError::InvalidOptions("tolerance must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub params: CurveParams,
    pub sample_count: usize,
    pub anchor_samples: usize,
    pub iterations: usize,
    pub rss: f64,
}

/// Mean of the `top_pick_count` best annual win shares among first overall
/// picks.
pub fn top_pick_anchor(samples: &[DraftSample], top_pick_count: usize) -> Result<f64, FitError> {
    if top_pick_count == 0 {
        return Err(FitError::InvalidOptions("top_pick_count must be >= 1".into()));
    }
    let mut firsts: Vec<f64> = samples
        .iter()
        .filter(|s| s.pick == 1)
        .map(|s| s.annual_win_share)
        .collect();
    if firsts.len() < top_pick_count {
        return Err(FitError::InsufficientTopPicks {
            required: top_pick_count,
            found: firsts.len(),
        });
    }
    firsts.sort_by(|a, b| b.total_cmp(a));
    let sum: f64 = firsts[..top_pick_count].iter().sum();
    Ok(sum / top_pick_count as f64)
}

pub fn fit_decay_curve(samples: &[DraftSample], opts: &FitOptions) -> Result<FitReport, FitError> {
    opts.validate()?;
    if samples.is_empty() {
        return Err(FitError::NoSamples);
    }
    let anchor = top_pick_anchor(samples, opts.top_pick_count)?;

    let bounds = [opts.decay_rate_bounds, opts.floor_bounds];
    let mut theta = [
        bounds[0].clamp(opts.initial_decay_rate),
        bounds[1].clamp(opts.initial_floor),
    ];
    let mut rss = residual_sum_of_squares(samples, anchor, theta)?;
    let mut damping = 1e-3;

    for iter in 1..=opts.max_iterations {
        let (jtj, grad) = normal_equations(samples, anchor, theta);

        // Parameters pinned at a bound whose descent direction points outward stay put.
        let mut free = [true; 2];
        for k in 0..2 {
            let at_lower = theta[k] <= bounds[k].lower && grad[k] < 0.0;
            let at_upper = theta[k] >= bounds[k].upper && grad[k] > 0.0;
            free[k] = !(at_lower || at_upper);
        }

        let projected_grad = (0..2)
            .filter(|&k| free[k])
            .map(|k| grad[k] * grad[k])
            .sum::<f64>()
            .sqrt();
        if projected_grad <= GRADIENT_TOLERANCE {
            return Ok(report(anchor, theta, samples, iter, rss));
        }

        let Some(step) = damped_step(jtj, grad, free, damping) else {
            return Ok(report(anchor, theta, samples, iter, rss));
        };
        let trial = [
            bounds[0].clamp(theta[0] + step[0]),
            bounds[1].clamp(theta[1] + step[1]),
        ];
        let trial_rss = residual_sum_of_squares(samples, anchor, trial)?;

        if trial_rss < rss {
            let improvement = rss - trial_rss;
            let moved = (trial[0] - theta[0]).abs() + (trial[1] - theta[1]).abs();
            theta = trial;
            rss = trial_rss;
            damping = (damping * 0.3).max(1e-12);
            if improvement <= opts.tolerance * rss || moved <= STEP_TOLERANCE {
                return Ok(report(anchor, theta, samples, iter, rss));
            }
        } else {
            damping *= 10.0;
            if damping > MAX_DAMPING {
                // No downhill step exists at any scale: theta is a (bounded) minimum.
                return Ok(report(anchor, theta, samples, iter, rss));
            }
        }

        if iter % 25 == 0 {
            tracing::trace!(iter, rss, decay_rate = theta[0], floor = theta[1], "fit progress");
        }
    }

    Err(FitError::NonConvergence {
        iterations: opts.max_iterations,
    })
}

const GRADIENT_TOLERANCE: f64 = 1e-12;
const STEP_TOLERANCE: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e12;

fn report(
    anchor: f64,
    theta: [f64; 2],
    samples: &[DraftSample],
    iterations: usize,
    rss: f64,
) -> FitReport {
    FitReport {
        params: CurveParams {
            anchor,
            decay_rate: theta[0],
            floor: theta[1],
        },
        sample_count: samples.len(),
        anchor_samples: samples.iter().filter(|s| s.pick == 1).count(),
        iterations,
        rss,
    }
}

fn curve(anchor: f64, theta: [f64; 2], pick: u32) -> f64 {
    CurveParams {
        anchor,
        decay_rate: theta[0],
        floor: theta[1],
    }
    .value_at(pick as f64)
}

fn residual_sum_of_squares(
    samples: &[DraftSample],
    anchor: f64,
    theta: [f64; 2],
) -> Result<f64, FitError> {
    let rss = samples
        .iter()
        .map(|s| {
            let r = s.annual_win_share - curve(anchor, theta, s.pick);
            r * r
        })
        .sum::<f64>();
    if rss.is_finite() {
        Ok(rss)
    } else {
        Err(FitError::NumericalFailure {
            decay_rate: theta[0],
            floor: theta[1],
        })
    }
}

/// Returns `J^T J` and `J^T r` for residuals `r = y - f`.
fn normal_equations(samples: &[DraftSample], anchor: f64, theta: [f64; 2]) -> ([[f64; 2]; 2], [f64; 2]) {
    let [lambda, floor] = theta;
    let mut jtj = [[0.0; 2]; 2];
    let mut grad = [0.0; 2];
    for s in samples {
        let offset = s.pick as f64 - 1.0;
        let decay = (-lambda * offset).exp();
        let j = [-(anchor - floor) * offset * decay, 1.0 - decay];
        let r = s.annual_win_share - curve(anchor, theta, s.pick);
        for a in 0..2 {
            grad[a] += j[a] * r;
            for b in 0..2 {
                jtj[a][b] += j[a] * j[b];
            }
        }
    }
    (jtj, grad)
}

/// Solves `(J^T J + mu * diag(J^T J)) delta = J^T r` over the free parameters.
fn damped_step(jtj: [[f64; 2]; 2], grad: [f64; 2], free: [bool; 2], damping: f64) -> Option<[f64; 2]> {
    let mut a = jtj;
    for k in 0..2 {
        a[k][k] += damping * jtj[k][k].max(1e-12);
    }
    match free {
        [true, true] => {
            let det = a[0][0] * a[1][1] - a[0][1] * a[1][0];
            if det.abs() < 1e-300 {
                return None;
            }
            Some([
                (grad[0] * a[1][1] - grad[1] * a[0][1]) / det,
                (a[0][0] * grad[1] - a[1][0] * grad[0]) / det,
            ])
        }
        [true, false] => Some([grad[0] / a[0][0], 0.0]),
        [false, true] => Some([0.0, grad[1] / a[1][1]]),
        [false, false] => None,
    }
}
