//! Millisecond clock sources
//!
//! Tweens sample the clock when they start and on every tick. The registry
//! owns the clock and hands it to each tween it creates.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic, millisecond-resolution timestamp source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`, measured from its creation
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test or offline driver can keep one copy
/// and hand another to the registry.
///
/// ```rust
/// use tweenkit_animation::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let shared = clock.clone();
/// clock.advance(16.0);
/// assert_eq!(shared.now_ms(), 16.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
