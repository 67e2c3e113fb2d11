//! Streaming form of the sliding-window anomaly detector.

use std::collections::VecDeque;

use monitor_api::AnomalyConfig;
use monitor_spi::{Alert, MonitorError, MonitoringStream, Result};
use tracing::trace;

use crate::alerting::create_alert;
use crate::anomaly::AnomalyDetector;

/// Anomaly monitor fed one value at a time.
///
/// Keeps the last `2W` values and an append-only score history. The score
/// recorded for the i-th pushed value equals `detect(series)[i]` on the
/// full series.
#[derive(Debug, Clone)]
pub struct AnomalyStream {
    detector: AnomalyDetector,
    buffer: VecDeque<f64>,
    scores: Vec<f64>,
}

impl AnomalyStream {
    pub fn new(config: AnomalyConfig) -> Result<Self> {
        Ok(Self::from_detector(AnomalyDetector::new(config)?))
    }

    pub fn from_detector(detector: AnomalyDetector) -> Self {
        let capacity = detector.config().warmup();
        Self {
            detector,
            buffer: VecDeque::with_capacity(capacity + 1),
            scores: Vec::new(),
        }
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    /// The last `2W` values, oldest first.
    pub fn buffer(&self) -> &VecDeque<f64> {
        &self.buffer
    }

    /// Indices whose score exceeded the threshold so far.
    pub fn anomalies(&self) -> Vec<usize> {
        let threshold = self.detector.config().threshold;
        self.scores
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s > threshold)
            .map(|(i, _)| i)
            .collect()
    }
}

impl MonitoringStream for AnomalyStream {
    fn push(&mut self, value: f64) -> Result<Option<Alert>> {
        let index = self.scores.len();
        if !value.is_finite() {
            return Err(MonitorError::NonFiniteInput { index });
        }

        let warmup = self.detector.config().warmup();
        let score = if self.buffer.len() == warmup {
            self.detector.score_at(self.buffer.make_contiguous())?
        } else {
            0.0
        };

        self.buffer.push_back(value);
        if self.buffer.len() > warmup {
            self.buffer.pop_front();
        }
        self.scores.push(score);
        trace!(index, score, "stream value scored");

        let threshold = self.detector.config().threshold;
        if score > threshold {
            return Ok(Some(create_alert(index, value, score, threshold)));
        }
        Ok(None)
    }

    fn scores(&self) -> &[f64] {
        &self.scores
    }

    fn len(&self) -> usize {
        self.scores.len()
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.scores.clear();
    }
}
