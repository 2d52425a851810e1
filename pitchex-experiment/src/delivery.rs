use crate::error::{ExperimentError, SinkFailure};
use pitchex_core::{ResultSink, SessionResult};
use tracing::{info, warn};

/// Per-sink outcome of handing a result to every configured sink
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    pub failures: Vec<SinkFailure>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turns any failure into a typed error for the operator.
    pub fn into_result(self) -> Result<Vec<String>, ExperimentError> {
        if self.failures.is_empty() {
            return Ok(self.delivered);
        }
        Err(ExperimentError::Sink {
            attempted: self.attempted(),
            failures: self.failures,
        })
    }
}

/// Delivers `result` to every sink in order. A failing sink is logged and
/// reported but never stops delivery to the rest; `result` is left untouched
/// so failed sinks can be retried.
pub fn deliver_all(result: &SessionResult, sinks: &[Box<dyn ResultSink>]) -> DeliveryReport {
    deliver_each(result, sinks.iter())
}

/// Retries only the sinks that failed in `previous`.
pub fn retry_failed(
    result: &SessionResult,
    sinks: &[Box<dyn ResultSink>],
    previous: &DeliveryReport,
) -> DeliveryReport {
    deliver_each(
        result,
        sinks
            .iter()
            .filter(|s| previous.failures.iter().any(|f| f.sink == s.name())),
    )
}

fn deliver_each<'a>(
    result: &SessionResult,
    sinks: impl Iterator<Item = &'a Box<dyn ResultSink>>,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for sink in sinks {
        let name = sink.name().to_string();
        match sink.deliver(result) {
            Ok(()) => {
                info!(sink = %name, "session result delivered");
                report.delivered.push(name);
            }
            Err(error) => {
                warn!(sink = %name, %error, "session result delivery failed");
                report.failures.push(SinkFailure { sink: name, error });
            }
        }
    }
    report
}
