//! SAR adoption sweep over an (α, λ) grid on random contact networks.
//!
//! Each batch runs the full grid × network repeats × simulation repeats and
//! writes five compartment CSVs before the next batch starts.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sarscan::config::{GridSpec, SweepConfig};
use sarscan::dynamics::{HorizonPolicy, ThresholdComparison, TransmissionMode};
use sarscan::{output, sweep};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(about = "Two-state adoption contagion sweep on random networks")]
struct Cli {
    /// Number of vertices
    #[arg(long, short, default_value = "10000")]
    nodes: usize,

    /// Average degree of the generated network
    #[arg(long, default_value = "10.0")]
    degree: f64,

    /// Time horizon (census has max-time + 1 rows)
    #[arg(long, default_value = "100")]
    max_time: usize,

    /// Independent repetitions of the whole sweep
    #[arg(long, default_value = "5")]
    batches: usize,

    /// Fresh networks per grid point
    #[arg(long, default_value = "1")]
    network_repeats: usize,

    /// Simulation repeats per network
    #[arg(long, default_value = "20")]
    sim_repeats: usize,

    /// Activist fraction p (low-threshold vertices)
    #[arg(long, default_value = "0.2")]
    activists: f64,

    /// Low adoption threshold
    #[arg(long, default_value = "1")]
    threshold_low: u32,

    /// High adoption threshold
    #[arg(long, default_value = "4")]
    threshold_high: u32,

    /// Initial adopter fraction ρ (default 1/n)
    #[arg(long)]
    initial_fraction: Option<f64>,

    /// Recovery probability γ
    #[arg(long, default_value = "1.0")]
    gamma: f64,

    #[arg(long, default_value = "0.0")]
    alpha_start: f64,
    #[arg(long, default_value = "1.11")]
    alpha_stop: f64,
    #[arg(long, default_value = "0.01")]
    alpha_step: f64,

    #[arg(long, default_value = "0.0")]
    lambda_start: f64,
    #[arg(long, default_value = "1.01")]
    lambda_stop: f64,
    #[arg(long, default_value = "0.01")]
    lambda_step: f64,

    /// Peer transmission: "unconditional" or "gated" (per-edge λ draw)
    #[arg(long, default_value = "unconditional", value_parser = parse_transmission)]
    transmission: TransmissionMode,

    /// Threshold crossing: "strict" (>) or "at-least" (>=)
    #[arg(long, default_value = "strict", value_parser = parse_comparison)]
    comparison: ThresholdComparison,

    /// Horizon: "early-stop" or "fixed"
    #[arg(long, default_value = "early-stop", value_parser = parse_horizon)]
    horizon: HorizonPolicy,

    /// Connectivity retry budget per network repeat
    #[arg(long, default_value = "1000")]
    max_graph_attempts: usize,

    /// Master seed; omitted means seeded from OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the CSV files
    #[arg(long, short, default_value = "simulation_results")]
    output: PathBuf,
}

fn parse_transmission(s: &str) -> Result<TransmissionMode, String> {
    match s {
        "unconditional" => Ok(TransmissionMode::Unconditional),
        "gated" => Ok(TransmissionMode::Gated),
        _ => Err(format!("unknown transmission mode `{s}`")),
    }
}

fn parse_comparison(s: &str) -> Result<ThresholdComparison, String> {
    match s {
        "strict" => Ok(ThresholdComparison::Strict),
        "at-least" => Ok(ThresholdComparison::AtLeast),
        _ => Err(format!("unknown threshold comparison `{s}`")),
    }
}

fn parse_horizon(s: &str) -> Result<HorizonPolicy, String> {
    match s {
        "fixed" => Ok(HorizonPolicy::FixedHorizon),
        "early-stop" => Ok(HorizonPolicy::EarlyStop),
        _ => Err(format!("unknown horizon policy `{s}`")),
    }
}

fn main() {
    let cli = Cli::parse();
    let start = Instant::now();

    let cfg = SweepConfig {
        n_vertices: cli.nodes,
        average_degree: cli.degree,
        max_time: cli.max_time,
        batches: cli.batches,
        network_repeats: cli.network_repeats,
        sim_repeats: cli.sim_repeats,
        activist_fraction: cli.activists,
        threshold_low: cli.threshold_low,
        threshold_high: cli.threshold_high,
        initial_fraction: cli
            .initial_fraction
            .unwrap_or(1.0 / cli.nodes as f64),
        gamma: cli.gamma,
        alpha_grid: GridSpec::new(cli.alpha_start, cli.alpha_stop, cli.alpha_step),
        lambda_grid: GridSpec::new(cli.lambda_start, cli.lambda_stop, cli.lambda_step),
        transmission: cli.transmission,
        comparison: cli.comparison,
        horizon: cli.horizon,
        max_graph_attempts: cli.max_graph_attempts,
    };
    if let Err(e) = cfg.validate() {
        eprintln!("configuration error: {e}");
        std::process::exit(1);
    }

    let master_seed = cli
        .seed
        .unwrap_or_else(|| ChaCha20Rng::from_entropy().next_u64());
    println!("Running sweep with configuration:\n{cfg:#?}");
    println!("Master seed: {master_seed}");

    let alpha_values = cfg.alpha_grid.values();
    let lambda_values = cfg.lambda_grid.values();

    std::fs::create_dir_all(&cli.output).expect("cannot create output directory");
    output::write_parameters_csv(
        &cli.output.join("parameters.csv"),
        &cfg,
        &alpha_values,
        &lambda_values,
    )
    .expect("cannot write parameters.csv");

    let grid_points = alpha_values.len() * lambda_values.len();
    let bar = ProgressBar::new((cfg.batches * grid_points) as u64);
    bar.set_style(
        ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
            .unwrap(),
    );

    for batch in 1..=cfg.batches {
        let result = sweep::run_batch(
            &cfg,
            &alpha_values,
            &lambda_values,
            master_seed,
            batch,
            &|| bar.inc(1),
        );
        for &(a_idx, l_idx) in &result.skipped {
            bar.println(format!(
                "batch {batch}: no connected graph for alpha = {:.4}, lambda = {:.4}, grid point skipped",
                alpha_values[a_idx], lambda_values[l_idx]
            ));
        }
        output::write_batch_csv(&cli.output, batch, &result).expect("cannot write batch results");
        bar.println(format!("batch {batch} written to {}", cli.output.display()));
    }
    bar.finish();

    let elapsed = start.elapsed();
    let secs = elapsed.as_secs();
    println!(
        "Sweep complete in {} hours {} minutes {} seconds",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    );
}
