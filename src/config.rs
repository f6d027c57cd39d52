//! Sweep configuration: parameter grids, per-run parameter bundles, and the
//! fail-fast validation performed before any simulation work starts.

use crate::dynamics::{HorizonPolicy, SimParams, ThresholdComparison, TransmissionMode};
use crate::graph::target_edge_count;
use thiserror::Error;

/// Half-open numeric grid [start, stop) with a fixed step.
///
/// Values accumulate by repeated addition, so grid lengths match runs that
/// were configured the same way elsewhere (float drift included).
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl GridSpec {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    pub fn values(&self) -> Vec<f64> {
        let mut out = Vec::new();
        if self.step <= 0.0 {
            return out;
        }
        let mut x = self.start;
        while x < self.stop {
            out.push(x);
            x += self.step;
        }
        out
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("graph needs at least 2 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("target edge count {m} exceeds the simple-graph maximum {max} for n = {n}")]
    TooManyEdges { n: usize, m: usize, max: usize },
    #[error("{name} = {value} is outside [0, 1]")]
    FractionOutOfRange { name: &'static str, value: f64 },
    #[error("{name} grid [{start}, {stop}) with step {step} is empty")]
    EmptyGrid {
        name: &'static str,
        start: f64,
        stop: f64,
        step: f64,
    },
    #[error("{name} must be positive")]
    ZeroCount { name: &'static str },
}

/// Full description of one sweep, shared by every batch.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub n_vertices: usize,
    pub average_degree: f64,
    pub max_time: usize,
    pub batches: usize,
    pub network_repeats: usize,
    pub sim_repeats: usize,
    pub activist_fraction: f64,
    pub threshold_low: u32,
    pub threshold_high: u32,
    pub initial_fraction: f64,
    pub gamma: f64,
    pub alpha_grid: GridSpec,
    pub lambda_grid: GridSpec,
    pub transmission: TransmissionMode,
    pub comparison: ThresholdComparison,
    pub horizon: HorizonPolicy,
    /// Attempt budget for the generate-until-connected loop.
    pub max_graph_attempts: usize,
}

impl SweepConfig {
    /// Repeat slots per grid point.
    pub fn total_repeats(&self) -> usize {
        self.network_repeats * self.sim_repeats
    }

    /// Engine parameters for one (α, λ) grid point.
    pub fn sim_params(&self, alpha: f64, lambda: f64) -> SimParams {
        SimParams {
            alpha,
            lambda,
            activist_fraction: self.activist_fraction,
            threshold_low: self.threshold_low,
            threshold_high: self.threshold_high,
            initial_fraction: self.initial_fraction,
            gamma: self.gamma,
            max_time: self.max_time,
            transmission: self.transmission,
            comparison: self.comparison,
            horizon: self.horizon,
        }
    }

    /// Reject impossible or degenerate configurations before any graph is
    /// generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.n_vertices;
        if n < 2 {
            return Err(ConfigError::TooFewVertices(n));
        }
        let m = target_edge_count(n, self.average_degree);
        let max = n * (n - 1) / 2;
        if m > max {
            return Err(ConfigError::TooManyEdges { n, m, max });
        }
        for (name, value) in [
            ("activist fraction", self.activist_fraction),
            ("initial adoption fraction", self.initial_fraction),
            ("gamma", self.gamma),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange { name, value });
            }
        }
        for (name, grid) in [("alpha", self.alpha_grid), ("lambda", self.lambda_grid)] {
            if grid.step <= 0.0 || grid.values().is_empty() {
                return Err(ConfigError::EmptyGrid {
                    name,
                    start: grid.start,
                    stop: grid.stop,
                    step: grid.step,
                });
            }
        }
        for (name, count) in [
            ("batch count", self.batches),
            ("network repeat count", self.network_repeats),
            ("simulation repeat count", self.sim_repeats),
            ("graph attempt budget", self.max_graph_attempts),
        ] {
            if count == 0 {
                return Err(ConfigError::ZeroCount { name });
            }
        }
        Ok(())
    }
}
