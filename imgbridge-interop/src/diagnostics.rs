//! Diagnostic channel for recovered errors.

use crate::error::Error;

/// Receives errors a conversion recovered from.
pub trait DiagnosticListener {
    fn roi_recovered(&mut self, error: &Error);
}

impl<F> DiagnosticListener for F
where
    F: FnMut(&Error),
{
    fn roi_recovered(&mut self, error: &Error) {
        self(error);
    }
}

/// Logs `error` with the action taken and forwards it to `listener`.
pub(crate) fn report(listener: Option<&mut dyn DiagnosticListener>, error: &Error, action: &str) {
    log::warn!("{error}; {action}");
    if let Some(listener) = listener {
        listener.roi_recovered(error);
    }
}
