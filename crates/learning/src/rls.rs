//! Exponentially-weighted recursive least squares.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Forgetting factor; older observations decay by this much per update.
pub const FORGETTING: f64 = 0.995;
/// Initial covariance diagonal: a diffuse prior.
pub const INITIAL_COVARIANCE: f64 = 1000.0;
/// Observations needed before the count no longer limits confidence.
const CONFIDENCE_RAMP_N: f64 = 20.0;
const MAX_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LearningError {
    #[error("feature vector has {got} entries, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("non-finite value in learning input")]
    NonFinite,
}

/// Linear residual model with its covariance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleModel {
    pub w: Vec<f64>,
    /// Row-major `dim × dim` covariance.
    pub p: Vec<f64>,
    pub n: u64,
    pub confidence: f64,
}

impl VehicleModel {
    /// Zero weights with a diffuse prior.
    pub fn new(dim: usize) -> Self {
        let mut p = vec![0.0; dim * dim];
        for i in 0..dim {
            p[i * dim + i] = INITIAL_COVARIANCE;
        }
        Self {
            w: vec![0.0; dim],
            p,
            n: 0,
            confidence: 0.0,
        }
    }

    pub fn dim(&self) -> usize {
        self.w.len()
    }

    /// Predicted residual `w·x`.
    pub fn apply(&self, x: &[f64]) -> Result<f64, LearningError> {
        self.check_dim(x)?;
        Ok(self.w.iter().zip(x).map(|(w, x)| w * x).sum())
    }

    /// Fold in one observation of residual `y` at features `x`.
    pub fn update(&mut self, x: &[f64], y: f64) -> Result<(), LearningError> {
        self.check_dim(x)?;
        if !y.is_finite() || x.iter().any(|v| !v.is_finite()) {
            return Err(LearningError::NonFinite);
        }
        let dim = self.dim();
        let px: Vec<f64> = (0..dim)
            .map(|i| (0..dim).map(|j| self.p[i * dim + j] * x[j]).sum())
            .collect();
        let denom = FORGETTING + x.iter().zip(&px).map(|(a, b)| a * b).sum::<f64>();
        let gain: Vec<f64> = px.iter().map(|v| v / denom).collect();
        let err = y - self.apply(x)?;
        for (w, k) in self.w.iter_mut().zip(&gain) {
            *w += k * err;
        }
        for i in 0..dim {
            for j in 0..dim {
                let idx = i * dim + j;
                self.p[idx] = (self.p[idx] - gain[i] * px[j]) / FORGETTING;
            }
        }
        self.n += 1;
        self.confidence = self.compute_confidence();
        Ok(())
    }

    pub fn covariance_trace(&self) -> f64 {
        let dim = self.dim();
        (0..dim).map(|i| self.p[i * dim + i]).sum()
    }

    fn compute_confidence(&self) -> f64 {
        let dim = self.dim().max(1) as f64;
        let count = (self.n as f64 / CONFIDENCE_RAMP_N).min(1.0);
        let spread = (1.0 - self.covariance_trace() / dim / INITIAL_COVARIANCE).max(0.0);
        (count * spread).min(MAX_CONFIDENCE)
    }

    fn check_dim(&self, x: &[f64]) -> Result<(), LearningError> {
        if x.len() != self.dim() {
            return Err(LearningError::DimensionMismatch {
                expected: self.dim(),
                got: x.len(),
            });
        }
        Ok(())
    }
}
