//! Tween update registry
//!
//! Holds every live tween and advances them once per frame. The registry is
//! owned by whatever drives the frame loop; tweens and sequencers only keep a
//! weak `RegistryHandle` to it.
//!
//! Each `tick()` first runs the one-shot frame requests queued since the last
//! frame, then updates every registered tween.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::clock::{Clock, MonotonicClock};
use crate::properties::Properties;
use crate::tween::{Tween, TweenConfig, TweenState};

new_key_type! {
    /// Handle to a registered tween
    pub struct TweenId;
}

/// Handle to a pending frame request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(u64);

/// One-shot callback run at the start of the next frame
pub type FrameCallback = Box<dyn FnOnce()>;

struct RegistryInner {
    tweens: SlotMap<TweenId, Tween>,
    frame_requests: Vec<(FrameRequestId, FrameCallback)>,
    /// Requests of the batch currently being run that were not cancelled yet
    draining: SmallVec<[FrameRequestId; 4]>,
    next_frame_request: u64,
}

impl RegistryInner {
    fn request_frame(&mut self, callback: FrameCallback) -> FrameRequestId {
        let id = FrameRequestId(self.next_frame_request);
        self.next_frame_request += 1;
        self.frame_requests.push((id, callback));
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        if let Some(pos) = self.frame_requests.iter().position(|(req, _)| *req == id) {
            drop(self.frame_requests.remove(pos));
        } else if let Some(pos) = self.draining.iter().position(|req| *req == id) {
            self.draining.swap_remove(pos);
        }
    }
}

/// The registry that ticks all live tweens
///
/// ```rust
/// use tweenkit_animation::{Easing, ManualClock, TweenConfig, TweenRegistry};
///
/// let clock = ManualClock::new();
/// let registry = TweenRegistry::with_clock(clock.clone());
///
/// let tween = registry.tween(
///     [("x", 0.0)],
///     [("x", 100.0)],
///     TweenConfig::default().with_duration(100.0).with_easing(Easing::Linear),
/// );
/// tween.start();
///
/// clock.advance(50.0);
/// registry.tick();
/// assert!((tween.values().get("x").unwrap() - 50.0).abs() < 0.01);
/// ```
pub struct TweenRegistry {
    inner: Rc<RefCell<RegistryInner>>,
    clock: Rc<dyn Clock>,
}

impl TweenRegistry {
    /// Create a registry timed by the process monotonic clock
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }

    /// Create a registry timed by a custom clock
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                tweens: SlotMap::with_key(),
                frame_requests: Vec::new(),
                draining: SmallVec::new(),
                next_frame_request: 0,
            })),
            clock: Rc::new(clock),
        }
    }

    /// Get a handle to this registry for passing to tweens and sequencers
    pub fn handle(&self) -> RegistryHandle {
        RegistryHandle {
            inner: Rc::downgrade(&self.inner),
            clock: Rc::clone(&self.clock),
        }
    }

    /// Create and register a tween
    pub fn tween(
        &self,
        origin: impl Into<Properties>,
        target: impl Into<Properties>,
        config: TweenConfig,
    ) -> Tween {
        Tween::new(&self.handle(), origin, target, config)
    }

    /// Register a tween under a fresh id
    ///
    /// A finished tween comes back in the `Created` state and can be started
    /// again.
    pub fn register(&self, tween: &Tween) -> TweenId {
        register(&self.inner, tween)
    }

    /// Remove a tween, dropping its callbacks. Unknown ids are ignored.
    pub fn unregister(&self, id: TweenId) {
        unregister(&self.inner, id);
    }

    /// Advance one frame
    ///
    /// Runs pending frame requests, then updates every registered tween.
    /// Returns false iff no tween was registered when the call began.
    pub fn tick(&self) -> bool {
        let (had_tweens, frames) = {
            let mut inner = self.inner.borrow_mut();
            let frames = std::mem::take(&mut inner.frame_requests);
            inner.draining = frames.iter().map(|(id, _)| *id).collect();
            (!inner.tweens.is_empty(), frames)
        };

        for (id, callback) in frames {
            let live = {
                let mut inner = self.inner.borrow_mut();
                match inner.draining.iter().position(|req| *req == id) {
                    Some(pos) => {
                        inner.draining.swap_remove(pos);
                        true
                    }
                    None => false,
                }
            };
            if live {
                callback();
            }
        }

        // Snapshot so tweens may add or remove entries while updating
        let tweens: SmallVec<[Tween; 16]> = self.inner.borrow().tweens.values().cloned().collect();
        tracing::trace!(count = tweens.len(), "tick");
        for tween in &tweens {
            tween.update();
        }

        had_tweens
    }

    /// Remove every tween, whoever registered it
    ///
    /// Cleared tweens end up `Removed` with their callbacks dropped.
    pub fn clear(&self) {
        clear(&self.inner);
    }

    /// Queue a callback for the start of the next `tick()`
    pub fn request_frame(&self, callback: impl FnOnce() + 'static) -> FrameRequestId {
        self.inner.borrow_mut().request_frame(Box::new(callback))
    }

    /// Drop a pending frame request
    pub fn cancel_frame(&self, id: FrameRequestId) {
        self.inner.borrow_mut().cancel_frame(id);
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.inner.borrow().tweens.contains_key(id)
    }

    /// Get the number of registered tweens
    pub fn len(&self) -> usize {
        self.inner.borrow().tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().tweens.is_empty()
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }
}

impl Default for TweenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn register(inner: &RefCell<RegistryInner>, tween: &Tween) -> TweenId {
    let stale = tween.is_registered().then(|| tween.id());
    let id = {
        let mut inner = inner.borrow_mut();
        if let Some(stale) = stale {
            inner.tweens.remove(stale);
        }
        inner.tweens.insert(tween.clone())
    };
    tween.attach(id);
    tracing::debug!(?id, "tween registered");
    id
}

fn unregister(inner: &RefCell<RegistryInner>, id: TweenId) {
    let removed = inner.borrow_mut().tweens.remove(id);
    if let Some(tween) = removed {
        tween.detach(TweenState::Removed);
        tracing::debug!(?id, "tween unregistered");
    }
}

fn clear(inner: &RefCell<RegistryInner>) {
    let drained: Vec<Tween> = inner.borrow_mut().tweens.drain().map(|(_, t)| t).collect();
    tracing::debug!(count = drained.len(), "registry cleared");
    for tween in drained {
        tween.detach(TweenState::Removed);
    }
}

/// Weak handle to a `TweenRegistry`
///
/// Operations become no-ops once the registry is dropped. The clock stays
/// readable so tweens can still report timing.
#[derive(Clone)]
pub struct RegistryHandle {
    inner: Weak<RefCell<RegistryInner>>,
    clock: Rc<dyn Clock>,
}

impl RegistryHandle {
    /// Check if the registry is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Register a tween under a fresh id (see `TweenRegistry::register`)
    pub fn register(&self, tween: &Tween) -> Option<TweenId> {
        let inner = self.inner.upgrade()?;
        Some(register(&inner, tween))
    }

    /// Remove a tween (see `TweenRegistry::unregister`)
    pub fn unregister(&self, id: TweenId) {
        if let Some(inner) = self.inner.upgrade() {
            unregister(&inner, id);
        }
    }

    /// Empty the whole registry (see `TweenRegistry::clear`)
    pub fn clear(&self) {
        if let Some(inner) = self.inner.upgrade() {
            clear(&inner);
        }
    }

    pub fn request_frame(&self, callback: impl FnOnce() + 'static) -> Option<FrameRequestId> {
        let inner = self.inner.upgrade()?;
        let id = inner.borrow_mut().request_frame(Box::new(callback));
        Some(id)
    }

    pub fn cancel_frame(&self, id: FrameRequestId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().cancel_frame(id);
        }
    }

    pub fn contains(&self, id: TweenId) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                let found = inner.borrow().tweens.contains_key(id);
                found
            }
            None => false,
        }
    }

    /// Insert a freshly built tween, letting it learn its own id
    pub(crate) fn insert_with_key(&self, build: impl FnOnce(TweenId) -> Tween) -> Option<Tween> {
        let inner = self.inner.upgrade()?;
        let mut inner = inner.borrow_mut();
        let key = inner.tweens.insert_with_key(build);
        inner.tweens.get(key).cloned()
    }

    /// Drop the registry entry without touching the tween itself
    pub(crate) fn remove_entry(&self, id: TweenId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().tweens.remove(id);
        }
    }
}
