//! Interrupt handling
//!
//! The first Ctrl-C asks the run to stop before its next step; a second one
//! exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Route Ctrl-C to this flag
    pub fn install_ctrlc_handler(&self) {
        let flag = self.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            if flag.is_cancelled() {
                std::process::exit(130);
            }
            flag.cancel();
            eprintln!("\ninterrupt received, stopping after the current step...");
        }) {
            tracing::warn!("Could not install interrupt handler: {e}");
        }
    }
}
