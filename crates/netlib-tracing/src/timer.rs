//! Timing of one-time backend resolution
//!
//! Resolution is the only step that may block (it can touch the filesystem to
//! materialize a native library), so its duration is worth a debug event.

use std::time::Instant;

/// RAII guard that logs how long a facade took to resolve when dropped
#[derive(Debug)]
pub struct ResolutionTimer {
    facade: String,
    start: Instant,
    span: tracing::Span,
}

impl ResolutionTimer {
    pub fn start(facade: &str) -> Self {
        Self {
            facade: facade.to_string(),
            start: Instant::now(),
            span: tracing::debug_span!("resolve", facade = facade),
        }
    }

    /// Microseconds since the timer started
    pub fn elapsed_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Drop for ResolutionTimer {
    fn drop(&mut self) {
        let duration_us = self.elapsed_us();
        let _entered = self.span.enter();
        tracing::debug!(facade = %self.facade, duration_us, "Resolution finished");
    }
}
