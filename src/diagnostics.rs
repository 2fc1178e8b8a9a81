use crate::form::FieldErrors;

pub const INVALID_SUBMISSION: &str = "invalid form submission";

/// Sink for operational diagnostics raised by the views
pub trait Diagnostics: Send + Sync {
    /// Called once per rejected form submission.
    fn invalid_submission(&self, route: &str, errors: &FieldErrors);
}

/// Emits diagnostics as `tracing` events
#[derive(Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn invalid_submission(&self, route: &str, errors: &FieldErrors) {
        let fields: Vec<&str> = errors.fields().collect();
        tracing::warn!(route, fields = ?fields, "{}", INVALID_SUBMISSION);
    }
}
