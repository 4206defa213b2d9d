//! Minimal run‑time metrics sink.
//!
//! No exporter is bundled; instead the host process may register a plain
//! callback that receives every name/value update emitted by the trie.

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Recorder, SharedString, Unit};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Signature for external collectors.
pub type StatsCallback = fn(name: &str, value: u64);

static CALLBACK: OnceCell<StatsCallback> = OnceCell::new();

/// Register the process-wide stats callback. Returns `false` if one was already set.
pub fn register_stats_callback(cb: StatsCallback) -> bool {
    init();
    CALLBACK.set(cb).is_ok()
}

fn forward(key: &Key, value: u64) {
    if let Some(cb) = CALLBACK.get() {
        cb(key.name(), value);
    }
}

/// Forwarding recorder. Uses the callback **if** it was registered.
struct CallbackRecorder;

#[derive(Clone)]
struct ForwardingCounter {
    key: Key,
}
#[derive(Clone)]
struct ForwardingGauge {
    key: Key,
}
#[derive(Clone)]
struct ForwardingHistogram {
    key: Key,
}

impl Recorder for CallbackRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &metrics::Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(ForwardingCounter { key: key.clone() }))
    }
    fn register_gauge(&self, key: &Key, _metadata: &metrics::Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(ForwardingGauge { key: key.clone() }))
    }
    fn register_histogram(&self, key: &Key, _metadata: &metrics::Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(ForwardingHistogram { key: key.clone() }))
    }
}

impl metrics::CounterFn for ForwardingCounter {
    fn increment(&self, value: u64) {
        forward(&self.key, value);
    }
    fn absolute(&self, value: u64) {
        forward(&self.key, value);
    }
}
impl metrics::GaugeFn for ForwardingGauge {
    fn set(&self, value: f64) {
        forward(&self.key, value as u64);
    }
    // only absolute gauge values are forwarded
    fn increment(&self, _value: f64) {}
    fn decrement(&self, _value: f64) {}
}
impl metrics::HistogramFn for ForwardingHistogram {
    fn record(&self, value: f64) {
        forward(&self.key, value as u64);
    }
}

/// Install exactly **once**. Leaves an already-installed global recorder alone.
pub fn init() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = metrics::set_global_recorder(CallbackRecorder);
    });
}
