use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sarscan::dynamics::{
    self, HorizonPolicy, SimParams, ThresholdComparison, TransmissionMode,
};
use sarscan::graph::Graph;

fn base_params(max_time: usize) -> SimParams {
    SimParams {
        alpha: 0.3,
        lambda: 0.5,
        activist_fraction: 0.2,
        threshold_low: 1,
        threshold_high: 4,
        initial_fraction: 0.05,
        gamma: 0.3,
        max_time,
        transmission: TransmissionMode::Unconditional,
        comparison: ThresholdComparison::Strict,
        horizon: HorizonPolicy::EarlyStop,
    }
}

fn path_graph(n: u32) -> Graph {
    let pairs: Vec<(u32, u32)> = (0..n - 1).map(|i| (i, i + 1)).collect();
    Graph::from_edges(n as usize, &pairs)
}

#[test]
fn census_conserves_population_and_has_full_length() {
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let g = Graph::erdos_renyi(&mut rng, 200, 8.0);
    let census = dynamics::run(&g, &base_params(50), &mut rng);

    assert_eq!(census.len(), 51, "census must have max_time + 1 rows");
    for t in 0..census.len() {
        let (s, aa, ab, ra, rb) = census.row(t);
        assert_eq!(
            s + aa + ab + ra + rb,
            200,
            "compartments must sum to n at t = {t}"
        );
    }
}

#[test]
fn recovered_grows_and_susceptible_shrinks() {
    let mut rng = ChaCha20Rng::seed_from_u64(22);
    let g = Graph::erdos_renyi(&mut rng, 300, 10.0);
    let census = dynamics::run(&g, &base_params(80), &mut rng);

    for t in 1..census.len() {
        assert!(
            census.recovered_a[t] >= census.recovered_a[t - 1],
            "recovered A dropped at t = {t}"
        );
        assert!(
            census.recovered_b[t] >= census.recovered_b[t - 1],
            "recovered B dropped at t = {t}"
        );
        assert!(
            census.susceptible[t] <= census.susceptible[t - 1],
            "susceptible grew at t = {t}"
        );
    }
}

#[test]
fn frozen_parameters_leave_susceptibles_untouched() {
    // alpha = 0 kills the global field, lambda = 0 under gating kills peer
    // influence, p = 0 puts every vertex in the high-threshold class.
    let mut rng = ChaCha20Rng::seed_from_u64(23);
    let g = Graph::erdos_renyi(&mut rng, 100, 6.0);
    let params = SimParams {
        alpha: 0.0,
        lambda: 0.0,
        activist_fraction: 0.0,
        initial_fraction: 0.05,
        gamma: 0.5,
        transmission: TransmissionMode::Gated,
        horizon: HorizonPolicy::FixedHorizon,
        ..base_params(40)
    };
    let census = dynamics::run(&g, &params, &mut rng);

    let init = 5u32;
    assert_eq!(census.row(0), (95, 0, init, 0, 0));
    for t in 0..census.len() {
        let (s, aa, ab, _, rb) = census.row(t);
        assert_eq!(s, 95, "no adoption path exists, S must stay constant");
        assert_eq!(aa, 0, "p = 0 assigns every initial adopter to B");
        assert_eq!(ab + rb, init, "adopted B only drains into recovered B");
        if t > 0 {
            assert!(census.adopted_b[t] <= census.adopted_b[t - 1]);
        }
    }
}

#[test]
fn gamma_one_recovers_every_adopter_after_one_step() {
    let mut rng = ChaCha20Rng::seed_from_u64(24);
    let g = Graph::erdos_renyi(&mut rng, 250, 8.0);
    let params = SimParams {
        alpha: 0.6,
        gamma: 1.0,
        initial_fraction: 0.04,
        horizon: HorizonPolicy::FixedHorizon,
        ..base_params(60)
    };
    let census = dynamics::run(&g, &params, &mut rng);

    for t in 1..census.len() {
        assert_eq!(
            census.recovered_a[t],
            census.recovered_a[t - 1] + census.adopted_a[t - 1],
            "every A adopter must recover exactly one step later (t = {t})"
        );
        assert_eq!(
            census.recovered_b[t],
            census.recovered_b[t - 1] + census.adopted_b[t - 1],
            "every B adopter must recover exactly one step later (t = {t})"
        );
    }
}

#[test]
fn early_stop_tail_replicates_the_stopping_row() {
    // One initial adopter, no global field, strict threshold of 1 with a
    // single informer available: adoption dies at t = 1 and the tail must be
    // a pure copy of that row.
    let mut rng = ChaCha20Rng::seed_from_u64(25);
    let g = Graph::erdos_renyi(&mut rng, 100, 6.0);
    let params = SimParams {
        alpha: 0.0,
        activist_fraction: 0.0,
        initial_fraction: 0.01,
        gamma: 1.0,
        ..base_params(30)
    };
    let census = dynamics::run(&g, &params, &mut rng);

    assert_eq!(census.len(), 31);
    assert_eq!(census.row(1), (99, 0, 0, 0, 1));
    for t in 2..census.len() {
        assert_eq!(census.row(t), census.row(1), "tail row {t} differs");
    }
}

#[test]
fn strict_comparison_blocks_spread_on_a_path() {
    // Every vertex is an activist with threshold 1. On a path a susceptible
    // vertex can hear from at most one adopted side at a time, so a strict
    // crossing (count > 1) never fires and the single seed stays alone.
    let g = path_graph(50);
    let params = SimParams {
        alpha: 0.0,
        activist_fraction: 1.0,
        initial_fraction: 0.02,
        gamma: 0.0,
        horizon: HorizonPolicy::FixedHorizon,
        ..base_params(60)
    };
    let mut rng = ChaCha20Rng::seed_from_u64(26);
    let census = dynamics::run(&g, &params, &mut rng);

    for t in 0..census.len() {
        assert_eq!(census.adopted_a[t], 1, "strict crossing must not spread");
    }
}

#[test]
fn at_least_comparison_sweeps_the_whole_path() {
    let g = path_graph(50);
    let params = SimParams {
        alpha: 0.0,
        activist_fraction: 1.0,
        initial_fraction: 0.02,
        gamma: 0.0,
        comparison: ThresholdComparison::AtLeast,
        horizon: HorizonPolicy::FixedHorizon,
        ..base_params(60)
    };
    let mut rng = ChaCha20Rng::seed_from_u64(27);
    let census = dynamics::run(&g, &params, &mut rng);

    assert_eq!(
        census.adopted_a[60], 50,
        "count >= 1 must carry adoption across the whole path"
    );
    assert_eq!(census.susceptible[60], 0);
}

#[test]
fn gated_transmission_with_zero_lambda_never_spreads() {
    let g = path_graph(40);
    let params = SimParams {
        alpha: 0.0,
        lambda: 0.0,
        activist_fraction: 1.0,
        initial_fraction: 0.025,
        gamma: 0.0,
        transmission: TransmissionMode::Gated,
        comparison: ThresholdComparison::AtLeast,
        horizon: HorizonPolicy::FixedHorizon,
        ..base_params(30)
    };
    let mut rng = ChaCha20Rng::seed_from_u64(28);
    let census = dynamics::run(&g, &params, &mut rng);

    for t in 0..census.len() {
        assert_eq!(census.adopted_a[t], 1, "lambda = 0 must gate every edge");
    }
}
