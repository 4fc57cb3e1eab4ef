//! Tweens
//!
//! A tween interpolates a set of named numeric properties from an origin
//! snapshot to a target over a fixed duration, following an easing curve.
//!
//! Lifecycle: `Created -> Playing -> Complete`, with `Removed` reachable from
//! any state through `stop()` or the registry. A tween is ticked by the
//! registry it was created with; it never schedules itself.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::properties::{fixed_precision, Properties};
use crate::registry::{RegistryHandle, TweenId};

/// Callback fired on start or completion
pub type TweenCallback = Rc<dyn Fn()>;

/// Callback fired with the freshly written values on every update
pub type UpdateCallback = Rc<dyn Fn(&Properties)>;

/// Lifecycle state of a tween
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenState {
    /// Registered, waiting for `start()`
    Created,
    /// Started; interpolating once the delay has passed
    Playing,
    /// Reached its target and left the registry
    Complete,
    /// Stopped or cleared before completing
    Removed,
}

/// Timing configuration for a tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenConfig {
    /// Duration in milliseconds
    pub duration: f64,
    /// Easing curve
    pub easing: Easing,
    /// Delay in milliseconds before interpolation starts
    pub delay: f64,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            duration: 200.0,
            easing: Easing::Linear,
            delay: 0.0,
        }
    }
}

impl TweenConfig {
    /// Builder: set duration (ms)
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: set easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: set delay (ms)
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

struct TweenInner {
    id: TweenId,
    /// Snapshot of the starting values, never written after construction
    origin: Properties,
    target: Properties,
    /// Shared with the update callback for the duration of the call
    current: Rc<Properties>,
    config: TweenConfig,
    state: TweenState,
    start_time: f64,
    start_fired: bool,
    on_start: Option<TweenCallback>,
    on_update: Option<UpdateCallback>,
    on_complete: Option<TweenCallback>,
}

impl TweenInner {
    /// Write eased values for effective time `t` into the current buffer
    fn interpolate(&mut self, t: f64, duration: f64) {
        let TweenInner {
            origin,
            target,
            current,
            config,
            ..
        } = self;

        let current = Rc::make_mut(current);
        for (key, end) in target.iter() {
            let start = origin.get(key).unwrap_or(f64::NAN);
            let value = if duration > 0.0 {
                config.easing.ease(t, start, end - start, duration)
            } else {
                end
            };
            current.write(key, fixed_precision(value));
        }
    }

    fn clear_callbacks(&mut self) {
        self.on_start = None;
        self.on_update = None;
        self.on_complete = None;
    }
}

/// A timed interpolation of named numeric properties
///
/// Cloning yields another handle to the same tween.
#[derive(Clone)]
pub struct Tween {
    inner: Rc<RefCell<TweenInner>>,
    registry: RegistryHandle,
}

impl Tween {
    /// Create a tween and register it with the registry behind `registry`
    ///
    /// Key sets and values are not checked; a property missing from `origin`
    /// animates as NaN. Use `try_new` to validate up front.
    pub fn new(
        registry: &RegistryHandle,
        origin: impl Into<Properties>,
        target: impl Into<Properties>,
        config: TweenConfig,
    ) -> Self {
        let origin = origin.into();
        let target = target.into();
        let build = |id: TweenId| Tween {
            inner: Rc::new(RefCell::new(TweenInner {
                id,
                current: Rc::new(origin.clone()),
                origin: origin.clone(),
                target: target.clone(),
                config,
                state: TweenState::Created,
                start_time: 0.0,
                start_fired: false,
                on_start: None,
                on_update: None,
                on_complete: None,
            })),
            registry: registry.clone(),
        };

        match registry.insert_with_key(&build) {
            Some(tween) => {
                tracing::debug!(id = ?tween.id(), "tween created");
                tween
            }
            None => {
                tracing::warn!("tween created against a dropped registry; it will never tick");
                let tween = build(TweenId::default());
                tween.inner.borrow_mut().state = TweenState::Removed;
                tween
            }
        }
    }

    /// Create a tween after checking that `origin` and `target` share a key
    /// set and hold only finite values
    pub fn try_new(
        registry: &RegistryHandle,
        origin: impl Into<Properties>,
        target: impl Into<Properties>,
        config: TweenConfig,
    ) -> Result<Self> {
        let origin = origin.into();
        let target = target.into();

        let missing: Vec<String> = target
            .keys()
            .filter(|k| !origin.contains_key(k))
            .map(str::to_string)
            .collect();
        let extra: Vec<String> = origin
            .keys()
            .filter(|k| !target.contains_key(k))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() || !extra.is_empty() {
            return Err(TweenError::MismatchedKeys { missing, extra });
        }

        if let Some((key, _)) = origin
            .iter()
            .chain(target.iter())
            .find(|(_, v)| !v.is_finite())
        {
            return Err(TweenError::NonFiniteValue {
                key: key.to_string(),
            });
        }

        Ok(Self::new(registry, origin, target, config))
    }

    /// Start playing from the current clock time
    pub fn start(&self) -> &Self {
        let now = self.registry.now_ms();
        let mut inner = self.inner.borrow_mut();
        if matches!(inner.state, TweenState::Complete | TweenState::Removed) {
            tracing::warn!(id = ?inner.id, "starting a tween that left the registry; re-register it first");
        }
        inner.start_time = now;
        inner.state = TweenState::Playing;
        self
    }

    /// Stop and remove the tween, whatever its state
    ///
    /// No callback fires afterwards.
    pub fn stop(&self) -> &Self {
        let was_registered = self.is_registered();
        let id = self.detach(TweenState::Removed);
        if was_registered {
            self.registry.remove_entry(id);
        }
        tracing::debug!(?id, "tween stopped");
        self
    }

    /// Set the start callback, replacing any previous one
    pub fn on_start<F: Fn() + 'static>(&self, callback: F) -> &Self {
        self.inner.borrow_mut().on_start = Some(Rc::new(callback));
        self
    }

    /// Set the update callback, replacing any previous one
    pub fn on_update<F: Fn(&Properties) + 'static>(&self, callback: F) -> &Self {
        self.inner.borrow_mut().on_update = Some(Rc::new(callback));
        self
    }

    /// Set the completion callback, replacing any previous one
    pub fn on_complete<F: Fn() + 'static>(&self, callback: F) -> &Self {
        self.inner.borrow_mut().on_complete = Some(Rc::new(callback));
        self
    }

    pub fn id(&self) -> TweenId {
        self.inner.borrow().id
    }

    /// Get the effective configuration
    pub fn setting(&self) -> TweenConfig {
        self.inner.borrow().config
    }

    pub fn state(&self) -> TweenState {
        self.inner.borrow().state
    }

    pub fn is_playing(&self) -> bool {
        self.state() == TweenState::Playing
    }

    /// Check if the tween completed or was removed
    pub fn is_finished(&self) -> bool {
        matches!(self.state(), TweenState::Complete | TweenState::Removed)
    }

    pub(crate) fn is_registered(&self) -> bool {
        matches!(self.state(), TweenState::Created | TweenState::Playing)
    }

    /// Snapshot of the most recently written values
    pub fn values(&self) -> Properties {
        Properties::clone(&self.inner.borrow().current)
    }

    pub fn origin(&self) -> Properties {
        self.inner.borrow().origin.clone()
    }

    pub fn target(&self) -> Properties {
        self.inner.borrow().target.clone()
    }

    /// Take a fresh registry id and return to `Created`
    pub(crate) fn attach(&self, id: TweenId) {
        let mut inner = self.inner.borrow_mut();
        inner.id = id;
        inner.state = TweenState::Created;
        inner.start_fired = false;
    }

    /// Move to a terminal state and drop all callbacks. Returns the id the
    /// tween was registered under.
    pub(crate) fn detach(&self, state: TweenState) -> TweenId {
        let mut inner = self.inner.borrow_mut();
        inner.state = state;
        inner.clear_callbacks();
        inner.id
    }

    /// Advance one frame. Called by the registry.
    pub(crate) fn update(&self) {
        let now = self.registry.now_ms();

        let (t, duration, on_start) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != TweenState::Playing {
                return;
            }

            let delay = inner.config.delay.max(0.0);
            let begin = inner.start_time + delay;
            if now < begin {
                return;
            }

            // Compare absolute times so fractional timestamps cannot leave the
            // final frame a rounding error short of the duration
            let duration = inner.config.duration.max(0.0);
            let t = if now >= begin + duration {
                duration
            } else {
                (now - begin).clamp(0.0, duration)
            };

            let on_start = if inner.start_fired {
                None
            } else {
                inner.start_fired = true;
                inner.on_start.clone()
            };
            (t, duration, on_start)
        };

        if let Some(callback) = on_start {
            callback();
            if !self.is_playing() {
                return;
            }
        }

        let (on_update, values) = {
            let mut inner = self.inner.borrow_mut();
            inner.interpolate(t, duration);
            let on_update = inner.on_update.clone();
            let values = on_update.as_ref().map(|_| Rc::clone(&inner.current));
            (on_update, values)
        };

        if let (Some(callback), Some(values)) = (on_update, values) {
            callback(&*values);
        }

        if t == duration {
            self.complete();
        }
    }

    fn complete(&self) {
        let on_complete = {
            let inner = self.inner.borrow();
            if inner.state != TweenState::Playing {
                return;
            }
            inner.on_complete.clone()
        };

        if let Some(callback) = on_complete {
            callback();
        }

        // The callback may have stopped the tween already
        if self.is_playing() {
            let id = self.detach(TweenState::Complete);
            self.registry.remove_entry(id);
            tracing::debug!(?id, "tween complete");
        }
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Tween")
            .field("id", &inner.id)
            .field("state", &inner.state)
            .field("config", &inner.config)
            .field("current", &inner.current)
            .finish()
    }
}
