//! # wdiv
//!
//! Command-line interface for the W divergence kernel and the windowed
//! distribution-shift monitors.

use clap::{Parser, Subcommand};
use divergence::{
    hellinger, jensen_shannon, kl, validate_shapes, w, w_decomposition, DivergenceConfig, Metric,
};
use monitor::{
    AnomalyConfig, AnomalyDetector, DriftConfig, DriftMonitor, RangePolicy, RegimeConfig,
    RegimeMonitor,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "wdiv")]
#[command(about = "Distribution divergence and shift monitoring CLI", long_about = None)]
struct Cli {
    /// JSON file with divergence parameters (epsilon, lambda)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two probability vectors
    Score {
        /// First vector as comma-separated values
        #[arg(long)]
        p: String,

        /// Second vector as comma-separated values
        #[arg(long)]
        q: String,

        /// Probability floor (overrides --config)
        #[arg(long)]
        epsilon: Option<f64>,

        /// Smoothing exponent (overrides --config)
        #[arg(long)]
        lambda: Option<f64>,
    },

    /// Detect distribution shifts with two sliding windows
    Detect {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Column name or index for the series values
        #[arg(short, long)]
        column: Option<String>,

        /// Window size W
        #[arg(short, long, default_value = "50")]
        window: usize,

        /// Score threshold
        #[arg(short, long, default_value = "0.1")]
        threshold: f64,

        /// Metric (w, kl, js, hellinger)
        #[arg(short, long, default_value = "w")]
        metric: String,

        /// Histogram bins per window
        #[arg(long, default_value = "10")]
        bins: usize,

        /// Bin range policy (per_window, pooled)
        #[arg(long, default_value = "per_window")]
        range_policy: String,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a batch for drift against a baseline
    Drift {
        /// Baseline file (CSV or JSON)
        #[arg(long)]
        baseline: PathBuf,

        /// Batch file (CSV or JSON)
        #[arg(long)]
        batch: PathBuf,

        /// Column name or index in both files
        #[arg(short, long)]
        column: Option<String>,

        /// Histogram bins over the baseline range
        #[arg(long, default_value = "20")]
        bins: usize,

        /// Clamp batch samples outside the baseline range instead of dropping them
        #[arg(long)]
        clamp: bool,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan daily prices for regime changes
    Regime {
        /// Input file with price data
        #[arg(short, long)]
        input: PathBuf,

        /// Column name for price data
        #[arg(short, long)]
        column: Option<String>,

        /// Recent window length
        #[arg(long, default_value = "21")]
        short_window: usize,

        /// Baseline window length
        #[arg(long, default_value = "252")]
        long_window: usize,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Load divergence parameters from a JSON file, or the defaults.
fn load_config(path: Option<&PathBuf>) -> CliResult<DivergenceConfig> {
    let config = match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| format!("Failed to open config: {}", e))?;
            serde_json::from_reader(BufReader::new(file))
                .map_err(|e| format!("Failed to parse config: {}", e))?
        }
        None => DivergenceConfig::default(),
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Parse a comma-separated list of numbers
fn parse_vector(text: &str) -> CliResult<Vec<f64>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|e| format!("Invalid number '{}': {}", s, e))
        })
        .collect()
}

/// Load a series from a CSV file
fn load_csv_data(path: &PathBuf, column: Option<&str>) -> CliResult<Vec<f64>> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read headers: {}", e))?
        .clone();

    let col_idx = if let Some(col) = column {
        // Try to parse as index first
        if let Ok(idx) = col.parse::<usize>() {
            idx
        } else {
            headers
                .iter()
                .position(|h| h == col)
                .ok_or_else(|| format!("Column '{}' not found", col))?
        }
    } else {
        0
    };

    let mut data = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("Failed to read record: {}", e))?;
        if let Some(value) = record.get(col_idx) {
            if let Ok(num) = value.trim().parse::<f64>() {
                data.push(num);
            }
        }
    }

    if data.is_empty() {
        return Err("No numeric data found in the specified column".to_string());
    }

    Ok(data)
}

/// Extract a one-dimensional series from parsed JSON.
///
/// Nested numeric arrays are rejected as multi-dimensional input.
fn extract_json_series(json: &serde_json::Value, column: Option<&str>) -> CliResult<Vec<f64>> {
    if let Some(arr) = json.as_array() {
        if arr.iter().all(|v| v.is_number()) {
            return Ok(arr.iter().filter_map(|v| v.as_f64()).collect());
        }

        if let Some(inner) = arr.first().and_then(|v| v.as_array()) {
            let shape = [arr.len(), inner.len()];
            validate_shapes(&shape, &shape).map_err(|e| e.to_string())?;
        }

        if let Some(col) = column {
            let data: Vec<f64> = arr
                .iter()
                .filter_map(|obj| obj.get(col).and_then(|v| v.as_f64()))
                .collect();
            if !data.is_empty() {
                return Ok(data);
            }
        }

        for key in &["value", "values", "price", "close", "y"] {
            let data: Vec<f64> = arr
                .iter()
                .filter_map(|obj| obj.get(*key).and_then(|v| v.as_f64()))
                .collect();
            if !data.is_empty() {
                return Ok(data);
            }
        }
    }

    // Handle object with data array
    if let Some(obj) = json.as_object() {
        for key in &["data", "values", "series", "prices"] {
            if let Some(value) = obj.get(*key) {
                if value.is_array() {
                    return extract_json_series(value, column);
                }
            }
        }
    }

    Err("Could not extract numeric data from JSON".to_string())
}

/// Load a series from a JSON file
fn load_json_data(path: &PathBuf, column: Option<&str>) -> CliResult<Vec<f64>> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse JSON: {}", e))?;
    extract_json_series(&json, column)
}

/// Load data from file (auto-detect format)
fn load_data(path: &PathBuf, column: Option<&str>) -> CliResult<Vec<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let data = match ext.as_str() {
        "csv" => load_csv_data(path, column),
        "json" => load_json_data(path, column),
        _ => load_csv_data(path, column).or_else(|_| load_json_data(path, column)),
    }?;
    info!(points = data.len(), path = %path.display(), "series loaded");
    Ok(data)
}

/// Print JSON results, or write them to a file
fn write_results(json: &serde_json::Value, output: Option<&PathBuf>) -> CliResult<()> {
    if let Some(path) = output {
        let mut file = File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Results written to {:?}", path);
    } else {
        let text = serde_json::to_string_pretty(json)
            .map_err(|e| format!("Failed to encode JSON: {}", e))?;
        println!("{}", text);
    }
    Ok(())
}

/// Run score command
fn run_score(
    p: String,
    q: String,
    epsilon: Option<f64>,
    lambda: Option<f64>,
    config: DivergenceConfig,
) -> CliResult<()> {
    let p = parse_vector(&p)?;
    let q = parse_vector(&q)?;

    let mut config = config;
    if let Some(epsilon) = epsilon {
        config = config.with_epsilon(epsilon);
    }
    if let Some(lambda) = lambda {
        config = config.with_lambda(lambda);
    }
    config.validate().map_err(|e| e.to_string())?;
    let (eps, lam) = (config.epsilon, config.lambda);

    let err = |e: divergence::DivergenceError| e.to_string();
    let decomposition = w_decomposition(&p, &q, eps, lam).map_err(err)?;

    let json = serde_json::json!({
        "epsilon": eps,
        "lambda": lam,
        "w": w(&p, &q, eps, lam, true).map_err(err)?,
        "kl_pq": kl(&p, &q, eps, true).map_err(err)?,
        "kl_qp": kl(&q, &p, eps, true).map_err(err)?,
        "jensen_shannon": jensen_shannon(&p, &q, eps).map_err(err)?,
        "hellinger": hellinger(&p, &q, eps).map_err(err)?,
        "decomposition": decomposition,
    });
    write_results(&json, None)
}

/// Parse a detect range policy name.
fn parse_range_policy(name: &str) -> CliResult<RangePolicy> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "per_window" => Ok(RangePolicy::PerWindow),
        "pooled" => Ok(RangePolicy::Pooled),
        other => Err(format!(
            "Unknown range policy '{}'. Use per_window or pooled",
            other
        )),
    }
}

/// Run detect command
#[allow(clippy::too_many_arguments)]
fn run_detect(
    input: PathBuf,
    column: Option<String>,
    window: usize,
    threshold: f64,
    metric: String,
    bins: usize,
    range_policy: String,
    output: Option<PathBuf>,
    config: DivergenceConfig,
) -> CliResult<()> {
    let data = load_data(&input, column.as_deref())?;
    let metric: Metric = metric.parse().map_err(|e: divergence::DivergenceError| e.to_string())?;
    let range_policy = parse_range_policy(&range_policy)?;

    let detector_config = AnomalyConfig::new(window, threshold)
        .with_metric(metric)
        .with_bins(bins)
        .with_range_policy(range_policy)
        .with_divergence(config);
    let detector = AnomalyDetector::new(detector_config).map_err(|e| e.to_string())?;
    let report = detector.detect(&data).map_err(|e| e.to_string())?;

    info!(
        metric = %metric,
        window,
        anomalies = report.anomaly_count(),
        "detection finished"
    );

    let json = serde_json::json!({
        "metric": metric.as_str(),
        "window": window,
        "threshold": threshold,
        "total_points": data.len(),
        "anomaly_count": report.anomaly_count(),
        "anomaly_indices": report.anomalies,
        "anomalies": report.anomalies.iter().map(|&i| {
            serde_json::json!({
                "index": i,
                "value": data[i],
                "score": report.scores[i]
            })
        }).collect::<Vec<_>>(),
        "scores": report.scores,
    });
    write_results(&json, output.as_ref())
}

/// Run drift command
fn run_drift(
    baseline: PathBuf,
    batch: PathBuf,
    column: Option<String>,
    bins: usize,
    clamp: bool,
    output: Option<PathBuf>,
    config: DivergenceConfig,
) -> CliResult<()> {
    let baseline_data = load_data(&baseline, column.as_deref())?;
    let batch_data = load_data(&batch, column.as_deref())?;

    let drift_config = DriftConfig {
        bins,
        ..DriftConfig::default()
    }
    .with_clamp_outliers(clamp)
    .with_divergence(config);
    let monitor = DriftMonitor::new(&baseline_data, drift_config).map_err(|e| e.to_string())?;
    let report = monitor.check(&batch_data).map_err(|e| e.to_string())?;

    info!(level = %report.level, w = report.w_score, "drift check finished");

    // Infinite KL is not representable in JSON.
    let kl_score = if report.kl_score.is_finite() {
        serde_json::json!(report.kl_score)
    } else {
        serde_json::json!("inf")
    };
    let json = serde_json::json!({
        "baseline_size": monitor.baseline_size(),
        "sample_size": report.sample_size,
        "w_score": report.w_score,
        "kl_score": kl_score,
        "level": report.level.label(),
    });
    write_results(&json, output.as_ref())
}

/// Run regime command
fn run_regime(
    input: PathBuf,
    column: Option<String>,
    short_window: usize,
    long_window: usize,
    output: Option<PathBuf>,
    config: DivergenceConfig,
) -> CliResult<()> {
    let prices = load_data(&input, column.as_deref())?;

    let regime_config = RegimeConfig::new(short_window, long_window).with_divergence(config);
    let monitor = RegimeMonitor::new(regime_config).map_err(|e| e.to_string())?;
    let report = monitor.scan_prices(&prices).map_err(|e| e.to_string())?;

    info!(prices = prices.len(), scored = report.len(), "regime scan finished");

    let json = serde_json::json!({
        "short_window": short_window,
        "long_window": long_window,
        "total_points": prices.len(),
        "indices": report.indices,
        "scores": report.scores,
    });
    write_results(&json, output.as_ref())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wdiv=info".into()))
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Score {
            p,
            q,
            epsilon,
            lambda,
        } => run_score(p, q, epsilon, lambda, config),

        Commands::Detect {
            input,
            column,
            window,
            threshold,
            metric,
            bins,
            range_policy,
            output,
        } => run_detect(
            input,
            column,
            window,
            threshold,
            metric,
            bins,
            range_policy,
            output,
            config,
        ),

        Commands::Drift {
            baseline,
            batch,
            column,
            bins,
            clamp,
            output,
        } => run_drift(baseline, batch, column, bins, clamp, output, config),

        Commands::Regime {
            input,
            column,
            short_window,
            long_window,
            output,
        } => run_regime(input, column, short_window, long_window, output, config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
