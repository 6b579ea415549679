//! Monitoring seam for rejected requests.
//!
//! Every rejection is handed to an [`ErrorReporter`] before being echoed to
//! the caller; nothing is silently swallowed. The reporter is an injected
//! collaborator, not a process-wide global, so deployments can forward to an
//! external collector.

use keyclaim_core::UpdateError;
use tracing::error;

/// Receives every rejected request.
pub trait ErrorReporter: Send + Sync {
    /// Report a rejection observed in `context`.
    fn report(&self, context: &str, error: &UpdateError);
}

/// Reporter that emits structured `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl LogReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, error: &UpdateError) {
        error!(context, status = error.status_code(), %error, "request rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Reporter that records what it saw, for assertions.
    #[derive(Default)]
    pub struct RecordingReporter {
        pub seen: Mutex<Vec<String>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, _context: &str, error: &UpdateError) {
            self.seen.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn test_recording_reporter_collects() {
        let reporter = RecordingReporter::default();
        reporter.report("update", &UpdateError::SignatureInvalid);
        assert_eq!(reporter.seen.lock().unwrap().len(), 1);
    }
}
