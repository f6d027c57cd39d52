use sarscan::config::{GridSpec, SweepConfig};
use sarscan::dynamics::{HorizonPolicy, ThresholdComparison, TransmissionMode};
use sarscan::{output, sweep};
use std::fs;
use std::path::PathBuf;

fn tiny_config() -> SweepConfig {
    SweepConfig {
        n_vertices: 40,
        average_degree: 6.0,
        max_time: 10,
        batches: 1,
        network_repeats: 1,
        sim_repeats: 2,
        activist_fraction: 0.2,
        threshold_low: 1,
        threshold_high: 4,
        initial_fraction: 0.05,
        gamma: 0.5,
        alpha_grid: GridSpec::new(0.0, 0.02, 0.01),
        lambda_grid: GridSpec::new(0.0, 0.02, 0.01),
        transmission: TransmissionMode::Unconditional,
        comparison: ThresholdComparison::Strict,
        horizon: HorizonPolicy::EarlyStop,
        max_graph_attempts: 200,
    }
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sarscan_{tag}_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("cannot create scratch dir");
    dir
}

#[test]
fn batch_files_hold_one_value_per_tensor_cell() {
    let cfg = tiny_config();
    let batches = sweep::run_sweep(&cfg, 55).expect("valid config");
    let dir = scratch_dir("batch");

    output::write_batch_csv(&dir, 1, &batches[0]).expect("write batch");

    // 2 alpha x 2 lambda x 2 repeats x 11 time rows, plus the header.
    let expected = 2 * 2 * 2 * 11 + 1;
    for tag in ["s", "aa", "ab", "ra", "rb"] {
        let path = dir.join(format!("{tag}_all_results1.csv"));
        let text = fs::read_to_string(&path).expect("batch file missing");
        assert_eq!(
            text.lines().count(),
            expected,
            "wrong row count in {tag} file"
        );
        assert_eq!(text.lines().next(), Some("value"));
    }
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn parameters_file_records_every_setting() {
    let cfg = tiny_config();
    let dir = scratch_dir("params");
    let path = dir.join("parameters.csv");

    let alpha_values = cfg.alpha_grid.values();
    let lambda_values = cfg.lambda_grid.values();
    output::write_parameters_csv(&path, &cfg, &alpha_values, &lambda_values)
        .expect("write parameters");

    let text = fs::read_to_string(&path).expect("parameters file missing");
    assert_eq!(text.lines().next(), Some("Parameter,Type,Value"));
    for key in [
        "numVertices",
        "averageDegree",
        "maxTime",
        "thresholdPair",
        "gamma",
        "alphaValues",
        "lambdaValues",
        "transmissionMode",
    ] {
        assert!(
            text.lines().any(|l| l.starts_with(key)),
            "missing parameter row {key}"
        );
    }
    fs::remove_dir_all(&dir).ok();
}
