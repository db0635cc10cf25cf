//! Progress reporting for long running imports and exports.
//!
//! Sinks are called synchronously on the thread that runs the import or
//! export. Marshalling onto a UI thread is up to the sink.

/// Receives a completion percentage in `0.0..=100.0`.
pub trait Progress {
    fn report(&mut self, percent: f32);
}

impl<F> Progress for F
where
    F: FnMut(f32),
{
    fn report(&mut self, percent: f32) {
        self(percent)
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _percent: f32) {}
}

/// Logs at debug level whenever a new multiple of ten percent is reached.
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
    last_step: Option<u32>,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_step: None,
        }
    }
}

impl Progress for LogProgress {
    fn report(&mut self, percent: f32) {
        let step = (percent / 10.0).floor() as u32;
        if self.last_step != Some(step) {
            self.last_step = Some(step);
            log::debug!("{}: {:.0}%", self.label, percent);
        }
    }
}

/// `done` out of `total` as a percentage; an empty workload counts as finished.
pub(crate) fn percent(done: usize, total: usize) -> f32 {
    if total == 0 {
        100.0
    } else {
        done as f32 * 100.0 / total as f32
    }
}
