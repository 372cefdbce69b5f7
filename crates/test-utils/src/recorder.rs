//! In-memory metrics recorder for asserting on counters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use metrics::{
    Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};

type Totals = Arc<Mutex<HashMap<String, u64>>>;

/// Recorder that keeps counter totals keyed by `name{label=value,...}`.
///
/// Install it for a closure with [`metrics::with_local_recorder`].
#[derive(Debug, Default)]
pub struct CountingRecorder {
    totals: Totals,
}

impl CountingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current total of a series, e.g. `ows_admission_total{outcome=admitted}`.
    pub fn count(&self, series: &str) -> u64 {
        self.totals
            .lock()
            .unwrap()
            .get(series)
            .copied()
            .unwrap_or(0)
    }
}

struct CounterSlot {
    series: String,
    totals: Totals,
}

impl CounterFn for CounterSlot {
    fn increment(&self, value: u64) {
        *self
            .totals
            .lock()
            .unwrap()
            .entry(self.series.clone())
            .or_default() += value;
    }

    fn absolute(&self, value: u64) {
        self.totals
            .lock()
            .unwrap()
            .insert(self.series.clone(), value);
    }
}

fn series(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|label| format!("{}={}", label.key(), label.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CounterSlot {
            series: series(key),
            totals: Arc::clone(&self.totals),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_labelled_series() {
        let recorder = CountingRecorder::new();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("requests_total", "outcome" => "ok").increment(2);
            metrics::counter!("requests_total", "outcome" => "ok").increment(1);
            metrics::counter!("plain_total").increment(1);
        });

        assert_eq!(recorder.count("requests_total{outcome=ok}"), 3);
        assert_eq!(recorder.count("plain_total"), 1);
        assert_eq!(recorder.count("requests_total{outcome=failed}"), 0);
    }
}
