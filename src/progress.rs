// src/progress.rs
/// Lightweight progress reporting for a pipeline run.
/// Frontends implement this to surface status to users; the engine itself
/// logs through `tracing` regardless.
pub trait Progress {
    /// Called at the start with the number of tables to process.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one table has been merged and saved.
    fn item_done(&mut self, _label: &str) {}

    /// Called when one table was aborted; the others still run.
    fn item_failed(&mut self, _label: &str, _error: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
