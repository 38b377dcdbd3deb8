//! Cooperative shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

/// Process-wide shutdown signal shared by every worker.
///
/// Raising it is one-way. Workers poll it at their safe points.
#[derive(Debug, Clone, Default)]
pub struct QuitFlag(Arc<AtomicBool>);

impl QuitFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        if !self.0.swap(true, Ordering::AcqRel) {
            info!("quit requested");
        }
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = QuitFlag::new();
        let b = a.clone();
        assert!(!b.is_requested());
        a.request();
        a.request();
        assert!(b.is_requested());
    }
}
