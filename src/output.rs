//! CSV writers for sweep results and the parameters record.
//!
//! Layout matches the downstream analysis tooling: per batch, one file per
//! compartment (`s_all_results<batch>.csv`, `aa_...`, `ab_...`, `ra_...`,
//! `rb_...`) holding a single `value` column in nested α, λ, repeat, time
//! order, plus one `parameters.csv` written once per sweep.

use crate::config::SweepConfig;
use crate::dynamics::{HorizonPolicy, ThresholdComparison, TransmissionMode};
use crate::sweep::{BatchResult, ResultTensor};
use csv::WriterBuilder;
use std::path::Path;

fn write_tensor_csv(path: &Path, tensor: &ResultTensor) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["value"])?;
    let (n_alpha, n_lambda, n_rep, n_time) = tensor.dims();
    for a in 0..n_alpha {
        for l in 0..n_lambda {
            for rep in 0..n_rep {
                for t in 0..n_time {
                    wtr.write_record([tensor.get(a, l, rep, t).to_string()])?;
                }
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Write the five compartment tensors of one batch into `dir`.
pub fn write_batch_csv(dir: &Path, batch: usize, result: &BatchResult) -> Result<(), csv::Error> {
    let files = [
        ("s", &result.susceptible),
        ("aa", &result.adopted_a),
        ("ab", &result.adopted_b),
        ("ra", &result.recovered_a),
        ("rb", &result.recovered_b),
    ];
    for (tag, tensor) in files {
        let path = dir.join(format!("{tag}_all_results{batch}.csv"));
        write_tensor_csv(&path, tensor)?;
    }
    Ok(())
}

/// One `Parameter,Type,Value` record per sweep setting.
pub fn write_parameters_csv(
    path: &Path,
    cfg: &SweepConfig,
    alpha_values: &[f64],
    lambda_values: &[f64],
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["Parameter", "Type", "Value"])?;

    let transmission = match cfg.transmission {
        TransmissionMode::Unconditional => "unconditional",
        TransmissionMode::Gated => "gated",
    };
    let comparison = match cfg.comparison {
        ThresholdComparison::Strict => "strict",
        ThresholdComparison::AtLeast => "at-least",
    };
    let horizon = match cfg.horizon {
        HorizonPolicy::FixedHorizon => "fixed",
        HorizonPolicy::EarlyStop => "early-stop",
    };

    let rows: Vec<(&str, &str, String)> = vec![
        ("Network", "String", "ER".to_string()),
        ("numVertices", "Integer", cfg.n_vertices.to_string()),
        ("averageDegree", "Double", cfg.average_degree.to_string()),
        ("maxTime", "Integer", cfg.max_time.to_string()),
        ("batches", "Integer", cfg.batches.to_string()),
        ("iterations", "Integer", cfg.total_repeats().to_string()),
        ("p", "Double", cfg.activist_fraction.to_string()),
        (
            "thresholdPair",
            "String",
            format!("[{}, {}]", cfg.threshold_low, cfg.threshold_high),
        ),
        (
            "initialAdoptionRate",
            "Double",
            cfg.initial_fraction.to_string(),
        ),
        ("gamma", "Double", cfg.gamma.to_string()),
        ("transmissionMode", "String", transmission.to_string()),
        ("thresholdComparison", "String", comparison.to_string()),
        ("horizonPolicy", "String", horizon.to_string()),
        ("lambdaValues", "String", format_grid(lambda_values)),
        ("alphaValues", "String", format_grid(alpha_values)),
    ];
    for (name, ty, value) in rows {
        wtr.write_record([name, ty, value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_grid(values: &[f64]) -> String {
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
