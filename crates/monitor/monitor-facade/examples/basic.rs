//! Basic example demonstrating the three monitors
//!
//! Run with: cargo run --example basic -p monitor-facade

use monitor::{
    AnomalyConfig, AnomalyDetector, AnomalyStream, DriftConfig, DriftMonitor, MonitoringStream,
    RegimeConfig, RegimeMonitor,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Windowed Monitor Basic Examples ===\n");

    // A periodic signal that jumps to a new level halfway through
    let mut series: Vec<f64> = (0..300).map(|i| (i as f64 * 0.7).sin()).collect();
    series.extend((0..100).map(|i| 4.0 + (i as f64 * 0.7).sin() * 2.0));

    // 1. Batch anomaly detection
    println!("1. Anomaly detector (window=50, threshold=0.1)");
    let detector = AnomalyDetector::new(AnomalyConfig::default())?;
    let report = detector.detect(&series)?;
    println!("   Anomalies: {}", report.anomaly_count());
    if let Some((index, score)) = report.peak() {
        println!("   Peak score {:.4} at index {}\n", score, index);
    }

    // 2. Streaming detection
    println!("2. Streaming monitor");
    let mut stream = AnomalyStream::new(AnomalyConfig::default())?;
    for &value in &series {
        if let Some(alert) = stream.push(value)? {
            println!("   [{}] {}", alert.severity, alert.message);
            break;
        }
    }
    println!();

    // 3. Drift against a baseline
    println!("3. Drift monitor");
    let drift = DriftMonitor::new(&series[..300], DriftConfig::default())?;
    for (name, batch) in [("same", &series[100..300]), ("shifted", &series[300..])] {
        let r = drift.check(batch)?;
        println!("   {:8} W={:.4} KL={:.4} level={}", name, r.w_score, r.kl_score, r.level);
    }
    println!();

    // 4. Regime scan over synthetic prices
    println!("4. Regime monitor");
    let prices: Vec<f64> = (0..400)
        .map(|i| {
            let vol = if i < 320 { 0.005 } else { 0.04 };
            100.0 * (1.0 + vol * (i as f64 * 1.3).sin())
        })
        .collect();
    let regime = RegimeMonitor::new(RegimeConfig::default())?;
    let report = regime.scan_prices(&prices)?;
    for (index, score) in report.iter().step_by(25) {
        println!("   t={} W={:.4}", index, score);
    }

    Ok(())
}
