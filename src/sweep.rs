//! Sweep orchestration: batches over the (α, λ) grid, network repeats, and
//! simulation repeats, with one independently seeded RNG stream per α row.

use crate::config::{ConfigError, SweepConfig};
use crate::dynamics::{self, Census};
use crate::graph;
use crate::utils::rng::worker_rng;
use rayon::prelude::*;

/// Four-dimensional count store, indexed [α][λ][repeat][time], one per
/// compartment. Flat row-major storage so a whole repeat series is one
/// contiguous slice.
#[derive(Debug, Clone)]
pub struct ResultTensor {
    n_alpha: usize,
    n_lambda: usize,
    n_rep: usize,
    n_time: usize,
    data: Vec<u32>,
}

impl ResultTensor {
    pub fn new(n_alpha: usize, n_lambda: usize, n_rep: usize, n_time: usize) -> Self {
        Self {
            n_alpha,
            n_lambda,
            n_rep,
            n_time,
            data: vec![0; n_alpha * n_lambda * n_rep * n_time],
        }
    }

    pub fn dims(&self) -> (usize, usize, usize, usize) {
        (self.n_alpha, self.n_lambda, self.n_rep, self.n_time)
    }

    #[inline]
    fn offset(&self, a: usize, l: usize, rep: usize) -> usize {
        ((a * self.n_lambda + l) * self.n_rep + rep) * self.n_time
    }

    pub fn get(&self, a: usize, l: usize, rep: usize, t: usize) -> u32 {
        self.data[self.offset(a, l, rep) + t]
    }

    /// Time series of one repeat.
    pub fn series(&self, a: usize, l: usize, rep: usize) -> &[u32] {
        let base = self.offset(a, l, rep);
        &self.data[base..base + self.n_time]
    }

    fn series_mut(&mut self, a: usize, l: usize, rep: usize) -> &mut [u32] {
        let base = self.offset(a, l, rep);
        &mut self.data[base..base + self.n_time]
    }
}

/// Everything one batch produces: one tensor per compartment plus the grid
/// points abandoned because no connected graph appeared within the attempt
/// budget (their tensor cells stay zero).
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub susceptible: ResultTensor,
    pub adopted_a: ResultTensor,
    pub adopted_b: ResultTensor,
    pub recovered_a: ResultTensor,
    pub recovered_b: ResultTensor,
    pub skipped: Vec<(usize, usize)>,
}

/// Work product of one α row, assembled into tensors on the calling thread.
struct AlphaRow {
    /// `censuses[l * total_repeats + rep]`, `None` for abandoned grid points.
    censuses: Vec<Option<Census>>,
    skipped_lambda: Vec<usize>,
}

fn run_alpha_row(
    cfg: &SweepConfig,
    alpha: f64,
    lambda_values: &[f64],
    seed: u64,
    a_idx: usize,
    on_grid_point: &(dyn Fn() + Sync),
) -> AlphaRow {
    let mut rng = worker_rng(seed, a_idx);
    let total = cfg.total_repeats();
    let mut censuses: Vec<Option<Census>> = Vec::with_capacity(lambda_values.len() * total);
    let mut skipped_lambda = Vec::new();

    for (l_idx, &lambda) in lambda_values.iter().enumerate() {
        let params = cfg.sim_params(alpha, lambda);
        let mut point: Vec<Option<Census>> = vec![None; total];
        let mut abandoned = false;

        'network: for net in 0..cfg.network_repeats {
            let g = match graph::generate_connected(
                &mut rng,
                cfg.n_vertices,
                cfg.average_degree,
                cfg.max_graph_attempts,
            ) {
                Ok(g) => g,
                Err(_) => {
                    abandoned = true;
                    break 'network;
                }
            };
            for sim in 0..cfg.sim_repeats {
                let census = dynamics::run(&g, &params, &mut rng);
                point[net * cfg.sim_repeats + sim] = Some(census);
            }
        }

        if abandoned {
            // Abort the whole grid point, partial repeats included.
            point = vec![None; total];
            skipped_lambda.push(l_idx);
        }
        censuses.extend(point);
        on_grid_point();
    }

    AlphaRow {
        censuses,
        skipped_lambda,
    }
}

/// One batch over the full grid. α rows run in parallel; each derives its own
/// RNG stream from `master_seed` and `batch_index`, so results are
/// reproducible regardless of thread scheduling.
pub fn run_batch(
    cfg: &SweepConfig,
    alpha_values: &[f64],
    lambda_values: &[f64],
    master_seed: u64,
    batch_index: usize,
    on_grid_point: &(dyn Fn() + Sync),
) -> BatchResult {
    let batch_seed = master_seed.wrapping_add((batch_index as u64).wrapping_mul(0xA24BAED4963EE407));
    let rows: Vec<AlphaRow> = alpha_values
        .par_iter()
        .enumerate()
        .map(|(a_idx, &alpha)| {
            run_alpha_row(cfg, alpha, lambda_values, batch_seed, a_idx, on_grid_point)
        })
        .collect();

    let (n_alpha, n_lambda) = (alpha_values.len(), lambda_values.len());
    let total = cfg.total_repeats();
    let n_time = cfg.max_time + 1;
    let mut result = BatchResult {
        susceptible: ResultTensor::new(n_alpha, n_lambda, total, n_time),
        adopted_a: ResultTensor::new(n_alpha, n_lambda, total, n_time),
        adopted_b: ResultTensor::new(n_alpha, n_lambda, total, n_time),
        recovered_a: ResultTensor::new(n_alpha, n_lambda, total, n_time),
        recovered_b: ResultTensor::new(n_alpha, n_lambda, total, n_time),
        skipped: Vec::new(),
    };

    for (a_idx, row) in rows.into_iter().enumerate() {
        for l_idx in row.skipped_lambda {
            result.skipped.push((a_idx, l_idx));
        }
        for (slot, census) in row.censuses.into_iter().enumerate() {
            let census = match census {
                Some(c) => c,
                None => continue,
            };
            let (l_idx, rep) = (slot / total, slot % total);
            result
                .susceptible
                .series_mut(a_idx, l_idx, rep)
                .copy_from_slice(&census.susceptible);
            result
                .adopted_a
                .series_mut(a_idx, l_idx, rep)
                .copy_from_slice(&census.adopted_a);
            result
                .adopted_b
                .series_mut(a_idx, l_idx, rep)
                .copy_from_slice(&census.adopted_b);
            result
                .recovered_a
                .series_mut(a_idx, l_idx, rep)
                .copy_from_slice(&census.recovered_a);
            result
                .recovered_b
                .series_mut(a_idx, l_idx, rep)
                .copy_from_slice(&census.recovered_b);
        }
    }
    result
}

/// Validate, then run every batch in sequence. Convenience entry point used
/// by tests and simple callers; the driver binary loops batches itself so it
/// can write each one out before starting the next.
pub fn run_sweep(cfg: &SweepConfig, master_seed: u64) -> Result<Vec<BatchResult>, ConfigError> {
    cfg.validate()?;
    let alpha_values = cfg.alpha_grid.values();
    let lambda_values = cfg.lambda_grid.values();
    let mut batches = Vec::with_capacity(cfg.batches);
    for batch in 1..=cfg.batches {
        batches.push(run_batch(
            cfg,
            &alpha_values,
            &lambda_values,
            master_seed,
            batch,
            &|| {},
        ));
    }
    Ok(batches)
}
