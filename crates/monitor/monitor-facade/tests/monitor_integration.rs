//! Integration tests for the monitor crate

use monitor::{
    AlertSeverity, AnomalyConfig, AnomalyDetector, AnomalyStream, ComparatorConfig,
    DivergenceConfig, DriftConfig, DriftLevel, DriftMonitor, Metric, MonitorError,
    MonitoringStream, RangePolicy, WindowComparator, WindowedComparator,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn noisy_series(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(0.0, 1.0).unwrap();
    let mut series: Vec<f64> = (0..n).map(|_| dist.sample(&mut rng)).collect();
    for v in series.iter_mut().skip(n / 2).take(n / 10) {
        *v += 6.0;
    }
    series
}

#[test]
fn test_stream_agrees_with_batch_on_noise() {
    let series = noisy_series(3, 400);
    let config = AnomalyConfig::new(25, 0.3);
    let report = AnomalyDetector::new(config.clone()).unwrap().detect(&series).unwrap();

    let mut stream = AnomalyStream::new(config).unwrap();
    let mut alerted = Vec::new();
    for &v in &series {
        if let Some(alert) = stream.push(v).unwrap() {
            alerted.push(alert.index);
        }
    }
    assert_eq!(stream.scores(), report.scores.as_slice());
    assert_eq!(alerted, report.anomalies);
}

#[test]
fn test_stream_alert_severity() {
    let config = AnomalyConfig::new(10, 0.1);
    let mut stream = AnomalyStream::new(config).unwrap();
    let mut alerts = Vec::new();
    for i in 0..40 {
        let value = if i < 20 { (i % 2) as f64 } else { 50.0 + (i % 2) as f64 };
        if let Some(alert) = stream.push(value).unwrap() {
            alerts.push(alert);
        }
    }
    assert!(!alerts.is_empty());
    for alert in &alerts {
        let expected = if alert.score >= 0.2 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        assert_eq!(alert.severity, expected);
    }
    assert!(alerts.iter().any(|a| a.severity == AlertSeverity::Critical));
}

#[test]
fn test_every_metric_scores_finite() {
    let series = noisy_series(5, 300);
    for metric in [Metric::W, Metric::Kl, Metric::JensenShannon, Metric::Hellinger] {
        let config = AnomalyConfig::new(20, 0.1).with_metric(metric);
        let report = AnomalyDetector::new(config).unwrap().detect(&series).unwrap();
        assert!(
            report.scores.iter().all(|s| s.is_finite() && *s >= -1e-12),
            "{} produced a bad score",
            metric
        );
    }
}

#[test]
fn test_range_policies() {
    let reference: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
    let test: Vec<f64> = reference.iter().map(|x| x + 20.0).collect();

    let pooled = WindowedComparator::new(ComparatorConfig::new(10, RangePolicy::Pooled)).unwrap();
    let per_window =
        WindowedComparator::new(ComparatorConfig::new(10, RangePolicy::PerWindow)).unwrap();

    // Each window on its own range sees the same shape.
    assert!(per_window.compare(&reference, &test).unwrap().abs() < 1e-12);
    assert!(pooled.compare(&reference, &test).unwrap() > 0.5);

    let fixed = WindowedComparator::new(ComparatorConfig::new(
        10,
        RangePolicy::Fixed { lo: 0.0, hi: 30.0 },
    ))
    .unwrap();
    assert!(fixed.compare(&reference, &test).unwrap() > 0.5);
}

#[test]
fn test_check_many_matches_sequential() {
    let baseline = noisy_series(9, 1000);
    let monitor = DriftMonitor::new(&baseline, DriftConfig::default()).unwrap();
    let batches: Vec<Vec<f64>> = (0..8).map(|s| noisy_series(100 + s, 200)).collect();

    let parallel = monitor.check_many(&batches).unwrap();
    let sequential: Vec<_> = batches.iter().map(|b| monitor.check(b).unwrap()).collect();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_check_many_surfaces_errors() {
    let monitor = DriftMonitor::new(&[0.0, 1.0, 2.0], DriftConfig::default()).unwrap();
    let batches = vec![vec![1.0], vec![f64::NAN]];
    assert_eq!(
        monitor.check_many(&batches).unwrap_err(),
        MonitorError::NonFiniteInput { index: 0 }
    );
}

#[test]
fn test_drift_levels_grow_with_shift() {
    let baseline: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.618).fract() * 10.0).collect();
    let monitor = DriftMonitor::new(&baseline, DriftConfig::default()).unwrap();
    let levels: Vec<DriftLevel> = [0.0, 3.0, 8.0]
        .iter()
        .map(|shift| {
            let batch: Vec<f64> = baseline.iter().take(500).map(|x| x + shift).collect();
            monitor.check(&batch).unwrap().level
        })
        .collect();
    assert_eq!(levels[0], DriftLevel::Normal);
    assert!(levels[1] > levels[0]);
    assert_eq!(levels[2], DriftLevel::Critical);
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "window_size": 30,
        "threshold": 0.2,
        "comparator": {
            "bins": 12,
            "metric": "hellinger",
            "range_policy": {"kind": "per_window"},
            "divergence": {"lambda": 1.0}
        }
    }"#;
    let config: AnomalyConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.comparator.metric, Metric::Hellinger);
    assert_eq!(config.comparator.range_policy, RangePolicy::PerWindow);
    assert_eq!(config.comparator.divergence, DivergenceConfig::new(1e-10, 1.0));
    assert!(AnomalyDetector::new(config).is_ok());
}

#[test]
fn test_invalid_divergence_config_rejected() {
    let config = AnomalyConfig::default().with_divergence(DivergenceConfig::new(-1.0, 0.5));
    assert!(matches!(
        AnomalyDetector::new(config),
        Err(MonitorError::Divergence(_))
    ));
}
