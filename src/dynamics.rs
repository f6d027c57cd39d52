//! Discrete-time SAR contagion on a fixed contact network.
//!
//! One `run` evolves the five-state process (Susceptible, AdoptedA, AdoptedB,
//! RecoveredA, RecoveredB) synchronously: all transitions for a step are
//! decided from the state at step start and applied together at step end.

use crate::graph::Graph;
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

/// Per-vertex compartment. The recovered states are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Susceptible,
    AdoptedA,
    AdoptedB,
    RecoveredA,
    RecoveredB,
}

/// Whether an adopted vertex reaches every susceptible neighbor each step or
/// only those passing a per-edge draw against λ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionMode {
    Unconditional,
    Gated,
}

/// Peer-threshold crossing test: distinct informers strictly above the
/// threshold, or at least equal to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdComparison {
    Strict,
    AtLeast,
}

/// Whether a run always walks the full horizon or stops once no adopted
/// vertex remains (the census is tail-filled either way).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonPolicy {
    FixedHorizon,
    EarlyStop,
}

/// Everything one simulation repeat needs besides the graph and the RNG.
#[derive(Debug, Clone)]
pub struct SimParams {
    /// Global influence rate: a susceptible vertex adopts with probability
    /// α · (total adopted)/n per step.
    pub alpha: f64,
    /// Peer transmission rate, used only in `TransmissionMode::Gated`.
    pub lambda: f64,
    /// Fraction of vertices assigned the low threshold.
    pub activist_fraction: f64,
    pub threshold_low: u32,
    pub threshold_high: u32,
    /// Fraction of vertices starting adopted.
    pub initial_fraction: f64,
    /// Per-step recovery probability for adopted vertices.
    pub gamma: f64,
    pub max_time: usize,
    pub transmission: TransmissionMode,
    pub comparison: ThresholdComparison,
    pub horizon: HorizonPolicy,
}

/// Population counts per time step, exactly `max_time + 1` rows after a run.
/// Every row sums to n.
#[derive(Debug, Clone)]
pub struct Census {
    pub susceptible: Vec<u32>,
    pub adopted_a: Vec<u32>,
    pub adopted_b: Vec<u32>,
    pub recovered_a: Vec<u32>,
    pub recovered_b: Vec<u32>,
}

impl Census {
    fn with_capacity(cap: usize) -> Self {
        Self {
            susceptible: Vec::with_capacity(cap),
            adopted_a: Vec::with_capacity(cap),
            adopted_b: Vec::with_capacity(cap),
            recovered_a: Vec::with_capacity(cap),
            recovered_b: Vec::with_capacity(cap),
        }
    }

    fn push_row(&mut self, s: u32, aa: u32, ab: u32, ra: u32, rb: u32) {
        self.susceptible.push(s);
        self.adopted_a.push(aa);
        self.adopted_b.push(ab);
        self.recovered_a.push(ra);
        self.recovered_b.push(rb);
    }

    /// Number of recorded time steps (rows).
    pub fn len(&self) -> usize {
        self.susceptible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.susceptible.is_empty()
    }

    /// Row `t` as (S, AA, AB, RA, RB).
    pub fn row(&self, t: usize) -> (u32, u32, u32, u32, u32) {
        (
            self.susceptible[t],
            self.adopted_a[t],
            self.adopted_b[t],
            self.recovered_a[t],
            self.recovered_b[t],
        )
    }

    fn replicate_last_until(&mut self, rows: usize) {
        while self.len() < rows {
            let t = self.len() - 1;
            let (s, aa, ab, ra, rb) = self.row(t);
            self.push_row(s, aa, ab, ra, rb);
        }
    }
}

#[inline]
fn crossed(count: u32, threshold: u32, cmp: ThresholdComparison) -> bool {
    match cmp {
        ThresholdComparison::Strict => count > threshold,
        ThresholdComparison::AtLeast => count >= threshold,
    }
}

/// One stochastic run of the contagion over `graph`.
///
/// Initialization draws ⌊p·n⌋ activists (threshold_low) and, independently,
/// ⌊ρ·n⌋ initial adopters, each adopting A or B according to its own
/// threshold class. The per-vertex informer sets accumulate distinct adopted
/// neighbors and are never reset within the run.
pub fn run(graph: &Graph, params: &SimParams, rng: &mut impl Rng) -> Census {
    let n = graph.n();

    let mut thresholds = vec![params.threshold_high; n];
    let n_activists = (params.activist_fraction * n as f64) as usize;
    for i in index::sample(rng, n, n_activists) {
        thresholds[i] = params.threshold_low;
    }

    let mut states = vec![NodeState::Susceptible; n];
    let mut adopted_a = 0u32;
    let mut adopted_b = 0u32;
    let n_initial = (params.initial_fraction * n as f64) as usize;
    for i in index::sample(rng, n, n_initial) {
        if thresholds[i] == params.threshold_low {
            states[i] = NodeState::AdoptedA;
            adopted_a += 1;
        } else {
            states[i] = NodeState::AdoptedB;
            adopted_b += 1;
        }
    }

    let mut informed: Vec<HashSet<u32>> = vec![HashSet::new(); n];

    let mut census = Census::with_capacity(params.max_time + 1);
    census.push_row(n as u32 - adopted_a - adopted_b, adopted_a, adopted_b, 0, 0);

    // Pending transition sets, rebuilt each step. A vertex queued by both the
    // global-field and the peer path lands in the same set, so application is
    // idempotent by construction.
    let mut to_a: HashSet<u32> = HashSet::new();
    let mut to_b: HashSet<u32> = HashSet::new();
    let mut to_ra: HashSet<u32> = HashSet::new();
    let mut to_rb: HashSet<u32> = HashSet::new();

    for _ in 0..params.max_time {
        if params.horizon == HorizonPolicy::EarlyStop && adopted_a == 0 && adopted_b == 0 {
            break;
        }

        to_a.clear();
        to_b.clear();
        to_ra.clear();
        to_rb.clear();

        let total_adopted = adopted_a + adopted_b;
        let field = params.alpha * total_adopted as f64 / n as f64;

        for node in 0..n {
            match states[node] {
                NodeState::Susceptible => {
                    if rng.gen::<f64>() < field {
                        if thresholds[node] == params.threshold_low {
                            to_a.insert(node as u32);
                        } else {
                            to_b.insert(node as u32);
                        }
                    }
                }
                NodeState::AdoptedA | NodeState::AdoptedB => {
                    for &nb in graph.neighbors(node) {
                        let nb = nb as usize;
                        if states[nb] != NodeState::Susceptible {
                            continue;
                        }
                        if params.transmission == TransmissionMode::Gated
                            && rng.gen::<f64>() >= params.lambda
                        {
                            continue;
                        }
                        informed[nb].insert(node as u32);
                        if crossed(informed[nb].len() as u32, thresholds[nb], params.comparison) {
                            if thresholds[nb] == params.threshold_low {
                                to_a.insert(nb as u32);
                            } else {
                                to_b.insert(nb as u32);
                            }
                        }
                    }
                    if rng.gen::<f64>() < params.gamma {
                        if states[node] == NodeState::AdoptedA {
                            to_ra.insert(node as u32);
                        } else {
                            to_rb.insert(node as u32);
                        }
                    }
                }
                NodeState::RecoveredA | NodeState::RecoveredB => {}
            }
        }

        for &v in &to_a {
            states[v as usize] = NodeState::AdoptedA;
        }
        for &v in &to_b {
            states[v as usize] = NodeState::AdoptedB;
        }
        for &v in &to_ra {
            states[v as usize] = NodeState::RecoveredA;
        }
        for &v in &to_rb {
            states[v as usize] = NodeState::RecoveredB;
        }

        adopted_a = adopted_a + to_a.len() as u32 - to_ra.len() as u32;
        adopted_b = adopted_b + to_b.len() as u32 - to_rb.len() as u32;

        let t = census.len() - 1;
        let (s, _, _, ra, rb) = census.row(t);
        census.push_row(
            s - to_a.len() as u32 - to_b.len() as u32,
            adopted_a,
            adopted_b,
            ra + to_ra.len() as u32,
            rb + to_rb.len() as u32,
        );
    }

    census.replicate_last_until(params.max_time + 1);
    census
}
