use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pauz_core::sources::{SourceError, SourceResult};

/// Shared on/off switch simulating connectivity loss for in-process backends.
#[derive(Debug, Clone)]
pub struct Availability {
    source_name: &'static str,
    up: Arc<AtomicBool>,
}

impl Availability {
    pub fn new(source_name: &'static str) -> Self {
        Self {
            source_name,
            up: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.up.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.up.load(Ordering::SeqCst)
    }

    /// Fails with `SourceError::Unavailable` while the switch is off.
    pub fn check(&self) -> SourceResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(SourceError::unavailable(
                self.source_name,
                "backend is not reachable",
            ))
        }
    }
}
