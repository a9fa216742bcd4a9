//! Progress reporting for long conversions.

/// Receives `(current, total)` progress updates.
///
/// Updates arrive synchronously on the converting thread, before the unit
/// of work they describe.
pub trait ProgressListener {
    /// Called with the zero-based index of the unit about to be processed.
    fn notify_progress(&mut self, current: usize, total: usize);
}

impl<F> ProgressListener for F
where
    F: FnMut(usize, usize),
{
    fn notify_progress(&mut self, current: usize, total: usize) {
        self(current, total);
    }
}
