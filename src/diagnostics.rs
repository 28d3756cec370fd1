//! Injected diagnostics capability.
//!
//! Every fallible buffer operation reports recoverable failures through a
//! [`Diagnostics`] value supplied by the caller instead of a process-wide
//! logger. The default implementation forwards to the `log` facade, so a
//! pipeline that initializes `env_logger` sees the messages as usual.

use std::sync::Mutex;

/// Diagnostics sink for buffer operations.
///
/// `warn` carries recoverable-failure notices (an edit was skipped and the
/// buffer returned unchanged), `debug` carries progress counts.
pub trait Diagnostics {
    fn warn(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Forwards diagnostics to the `log` crate facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }
}

/// Collects diagnostics in memory.
///
/// Lets callers (and this crate's own tests) assert on which recoverable
/// failures an operation reported.
#[derive(Debug, Default)]
pub struct CaptureDiagnostics {
    warnings: Mutex<Vec<String>>,
    debugs: Mutex<Vec<String>>,
}

impl CaptureDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All warning messages recorded so far
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    /// All debug messages recorded so far
    pub fn debugs(&self) -> Vec<String> {
        self.debugs.lock().unwrap().clone()
    }
}

impl Diagnostics for CaptureDiagnostics {
    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn debug(&self, message: &str) {
        self.debugs.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_both_levels() {
        let diag = CaptureDiagnostics::new();
        diag.warn("something was skipped");
        diag.debug("resolved 2 markers");
        diag.warn("another skip");

        assert_eq!(diag.warnings().len(), 2);
        assert_eq!(diag.debugs(), vec!["resolved 2 markers".to_string()]);
    }

    #[test]
    fn test_log_diagnostics_forwards() {
        let _ = env_logger::builder().is_test(true).try_init();
        let diag = LogDiagnostics;
        // No panic and no output capture needed; the facade swallows the
        // calls when no logger is active.
        diag.warn("warning through log facade");
        diag.debug("debug through log facade");
    }
}
