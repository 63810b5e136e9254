use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Knobs for `lower_module`.
#[derive(Debug, Clone)]
pub struct LoweringOptions {
    /// Number of worker threads functions are spread across.
    pub workers: usize,
    /// Checked between functions; once set, no further function is started.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        LoweringOptions { workers, cancel: None }
    }
}

impl LoweringOptions {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}
