use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("parley.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("parley.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("parley.client.request_duration_seconds");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("parley.stream.chunks");
pub(crate) static STREAM_BYTES: Counter = Counter::new("parley.stream.bytes");

pub(crate) static PANEL_SUBMISSIONS: Counter = Counter::new("parley.panel.submissions");
pub(crate) static PANEL_UPLOAD_REJECTIONS: Counter =
    Counter::new("parley.panel.upload_rejections");
pub(crate) static PANEL_FAILURES: Counter = Counter::new("parley.panel.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_BYTES);

    collector.register_counter(&PANEL_SUBMISSIONS);
    collector.register_counter(&PANEL_UPLOAD_REJECTIONS);
    collector.register_counter(&PANEL_FAILURES);
}
