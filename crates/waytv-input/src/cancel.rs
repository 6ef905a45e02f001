//! Shared stop signal for the input loops

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One boolean shared by the device loop and the terminal loop
///
/// Either loop sets it when it sees quit; the other observes it within one
/// poll timeout. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every loop holding a clone to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
