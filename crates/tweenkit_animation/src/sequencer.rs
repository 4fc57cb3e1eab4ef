//! Sequencer
//!
//! Chains groups of tweens into ordered steps. The tweens of one step play
//! together; the next step starts only once every tween of the active step
//! has finished. Progress is checked by a poll the sequencer re-queues on its
//! registry every frame while steps remain.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::properties::Properties;
use crate::registry::{FrameRequestId, RegistryHandle};
use crate::tween::{Tween, TweenConfig, TweenState};

/// Callback fired once after a step's tweens all finish
pub type StepCallback = Box<dyn FnOnce()>;

/// Callback fired whenever the sequencer runs out of steps
pub type SequenceCallback = Rc<dyn Fn()>;

type Step = SmallVec<[Tween; 4]>;

struct SequencerInner {
    steps: VecDeque<Step>,
    /// Parallel to `steps`, one entry per step
    callbacks: VecDeque<Option<StepCallback>>,
    active: Step,
    running: bool,
    on_complete: Option<SequenceCallback>,
    poll: Option<FrameRequestId>,
}

/// Ordered queue of tween groups
///
/// ```rust
/// use tweenkit_animation::{ManualClock, Sequencer, TweenConfig, TweenRegistry};
///
/// let clock = ManualClock::new();
/// let registry = TweenRegistry::with_clock(clock.clone());
/// let config = TweenConfig::default().with_duration(100.0);
///
/// let fade = registry.tween([("opacity", 0.0)], [("opacity", 1.0)], config);
/// let slide = registry.tween([("x", 0.0)], [("x", 40.0)], config);
///
/// let sequencer = Sequencer::new(&registry.handle());
/// sequencer.add_step([fade]).add_step([slide.clone()]).run();
///
/// for _ in 0..20 {
///     clock.advance(16.0);
///     registry.tick();
/// }
/// assert_eq!(slide.values().get("x"), Some(40.0));
/// assert!(!sequencer.is_running());
/// ```
#[derive(Clone)]
pub struct Sequencer {
    inner: Rc<RefCell<SequencerInner>>,
    registry: RegistryHandle,
}

impl Sequencer {
    pub fn new(registry: &RegistryHandle) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SequencerInner {
                steps: VecDeque::new(),
                callbacks: VecDeque::new(),
                active: SmallVec::new(),
                running: false,
                on_complete: None,
                poll: None,
            })),
            registry: registry.clone(),
        }
    }

    /// Append a step of tweens that play together
    pub fn add_step<I>(&self, tweens: I) -> &Self
    where
        I: IntoIterator<Item = Tween>,
    {
        self.push_step(tweens.into_iter().collect(), None);
        self
    }

    /// Append a step and a callback fired once all its tweens finish
    pub fn add_step_then<I, F>(&self, tweens: I, callback: F) -> &Self
    where
        I: IntoIterator<Item = Tween>,
        F: FnOnce() + 'static,
    {
        self.push_step(tweens.into_iter().collect(), Some(Box::new(callback)));
        self
    }

    /// Append a pause of `duration` ms
    pub fn add_delay(&self, duration: f64) -> &Self {
        let tween = self.delay_tween(duration);
        self.add_step([tween])
    }

    /// Append a pause of `duration` ms followed by `callback`
    pub fn add_delay_then<F>(&self, duration: f64, callback: F) -> &Self
    where
        F: FnOnce() + 'static,
    {
        let tween = self.delay_tween(duration);
        let callback = RefCell::new(Some(callback));
        tween.on_complete(move || {
            if let Some(callback) = callback.borrow_mut().take() {
                callback();
            }
        });
        self.add_step([tween])
    }

    /// Set the callback fired when the queue runs empty
    pub fn on_complete<F: Fn() + 'static>(&self, callback: F) -> &Self {
        self.inner.borrow_mut().on_complete = Some(Rc::new(callback));
        self
    }

    /// Activate the front step and keep polling until the queue drains
    ///
    /// Safe to call repeatedly: tweens already started are left alone and
    /// the poll is never queued twice. With an empty queue this fires the
    /// completion callback.
    pub fn run(&self) -> &Self {
        activate(&self.inner, &self.registry);
        self
    }

    /// Drop every queued step and clear the whole registry
    ///
    /// This removes all tweens of the registry, including ones this
    /// sequencer never saw.
    pub fn reset(&self) -> &Self {
        let poll = {
            let mut inner = self.inner.borrow_mut();
            inner.steps.clear();
            inner.callbacks.clear();
            inner.active.clear();
            inner.running = false;
            inner.poll.take()
        };
        if let Some(id) = poll {
            self.registry.cancel_frame(id);
        }
        self.registry.clear();
        tracing::debug!("sequencer reset");
        self
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Get the number of steps not yet finished, the active one included
    pub fn len(&self) -> usize {
        self.inner.borrow().steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().steps.is_empty()
    }

    fn push_step(&self, step: Step, callback: Option<StepCallback>) {
        let mut inner = self.inner.borrow_mut();
        inner.steps.push_back(step);
        inner.callbacks.push_back(callback);
    }

    /// A tween with no properties that only lets time pass
    fn delay_tween(&self, duration: f64) -> Tween {
        Tween::new(
            &self.registry,
            Properties::new(),
            Properties::new(),
            TweenConfig::default().with_duration(duration),
        )
    }
}

fn activate(inner: &Rc<RefCell<SequencerInner>>, registry: &RegistryHandle) {
    let front = {
        let mut seq = inner.borrow_mut();
        let front = seq.steps.front().cloned();
        if let Some(step) = &front {
            seq.active = step.clone();
        }
        front
    };

    match front {
        Some(step) => {
            for tween in &step {
                if tween.state() == TweenState::Created {
                    tween.start();
                }
            }

            let needs_poll = {
                let mut seq = inner.borrow_mut();
                let needs_poll = !seq.running;
                seq.running = true;
                needs_poll
            };
            if needs_poll {
                schedule_poll(inner, registry);
            }
        }
        None => {
            let (poll, on_complete) = {
                let mut seq = inner.borrow_mut();
                seq.running = false;
                seq.active.clear();
                (seq.poll.take(), seq.on_complete.clone())
            };
            if let Some(id) = poll {
                registry.cancel_frame(id);
            }
            tracing::debug!("sequence complete");
            if let Some(callback) = on_complete {
                callback();
            }
        }
    }
}

fn schedule_poll(inner: &Rc<RefCell<SequencerInner>>, registry: &RegistryHandle) {
    let seq = Rc::clone(inner);
    let reg = registry.clone();
    let id = registry.request_frame(move || poll(&seq, &reg));
    if id.is_none() {
        tracing::warn!("sequencer registry is gone; steps will not advance");
    }
    inner.borrow_mut().poll = id;
}

fn poll(inner: &Rc<RefCell<SequencerInner>>, registry: &RegistryHandle) {
    let step_done = {
        let mut seq = inner.borrow_mut();
        seq.poll = None;
        seq.active.iter().all(Tween::is_finished)
    };

    if step_done {
        let callback = {
            let mut seq = inner.borrow_mut();
            seq.steps.pop_front();
            seq.callbacks.pop_front().flatten()
        };
        tracing::debug!(remaining = inner.borrow().steps.len(), "sequence step complete");
        if let Some(callback) = callback {
            callback();
        }
        activate(inner, registry);
    }

    let reschedule = {
        let seq = inner.borrow();
        seq.running && seq.poll.is_none() && !seq.steps.is_empty()
    };
    if reschedule {
        schedule_poll(inner, registry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::registry::TweenRegistry;
    use std::cell::Cell;

    fn setup() -> (TweenRegistry, ManualClock) {
        let clock = ManualClock::new();
        (TweenRegistry::with_clock(clock.clone()), clock)
    }

    fn tween(registry: &TweenRegistry, duration: f64) -> Tween {
        registry.tween(
            [("x", 0.0)],
            [("x", 1.0)],
            TweenConfig::default().with_duration(duration),
        )
    }

    fn frame(registry: &TweenRegistry, clock: &ManualClock, ms: f64) {
        clock.advance(ms);
        registry.tick();
    }

    #[test]
    fn test_run_starts_front_step_only() {
        let (registry, _clock) = setup();
        let a = tween(&registry, 100.0);
        let b = tween(&registry, 100.0);
        let c = tween(&registry, 100.0);

        let sequencer = Sequencer::new(&registry.handle());
        sequencer.add_step([a.clone(), b.clone()]).add_step([c.clone()]).run();

        assert!(a.is_playing());
        assert!(b.is_playing());
        assert_eq!(c.state(), TweenState::Created);
        assert!(sequencer.is_running());
        assert_eq!(sequencer.len(), 2);
    }

    #[test]
    fn test_next_step_waits_for_slowest_tween() {
        let (registry, clock) = setup();
        let fast = tween(&registry, 50.0);
        let slow = tween(&registry, 100.0);
        let next = tween(&registry, 10.0);

        let sequencer = Sequencer::new(&registry.handle());
        sequencer.add_step([fast.clone(), slow.clone()]).add_step([next.clone()]).run();

        frame(&registry, &clock, 50.0);
        assert!(fast.is_finished());
        frame(&registry, &clock, 10.0);
        assert_eq!(next.state(), TweenState::Created);

        frame(&registry, &clock, 40.0);
        assert!(slow.is_finished());
        assert_eq!(next.state(), TweenState::Created);

        frame(&registry, &clock, 1.0);
        assert!(next.is_playing());
    }

    #[test]
    fn test_step_callbacks_then_completion_in_order() {
        let (registry, clock) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        let sequencer = Sequencer::new(&registry.handle());
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        sequencer
            .add_step_then([tween(&registry, 10.0)], move || l1.borrow_mut().push("first"))
            .add_step_then([tween(&registry, 10.0)], move || l2.borrow_mut().push("second"))
            .on_complete(move || l3.borrow_mut().push("done"))
            .run();

        for _ in 0..10 {
            frame(&registry, &clock, 5.0);
        }

        assert_eq!(*log.borrow(), vec!["first", "second", "done"]);
        assert!(!sequencer.is_running());
        assert!(sequencer.is_empty());
    }

    #[test]
    fn test_completion_fires_once() {
        let (registry, clock) = setup();
        let done = Rc::new(Cell::new(0));
        let d = done.clone();

        let sequencer = Sequencer::new(&registry.handle());
        sequencer
            .add_step([tween(&registry, 10.0)])
            .on_complete(move || d.set(d.get() + 1))
            .run();

        for _ in 0..20 {
            frame(&registry, &clock, 5.0);
        }
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn test_empty_step_advances_on_next_poll() {
        let (registry, clock) = setup();
        let after = tween(&registry, 10.0);

        let sequencer = Sequencer::new(&registry.handle());
        sequencer.add_step(Vec::new()).add_step([after.clone()]).run();
        assert_eq!(after.state(), TweenState::Created);

        frame(&registry, &clock, 1.0);
        assert!(after.is_playing());
    }

    #[test]
    fn test_run_on_empty_queue_completes_immediately() {
        let (registry, _clock) = setup();
        let done = Rc::new(Cell::new(false));
        let d = done.clone();

        let sequencer = Sequencer::new(&registry.handle());
        sequencer.on_complete(move || d.set(true)).run();

        assert!(done.get());
        assert!(!sequencer.is_running());
    }

    #[test]
    fn test_repeated_run_does_not_restart_or_double_poll() {
        let (registry, clock) = setup();
        let a = tween(&registry, 100.0);
        let done = Rc::new(Cell::new(0));
        let d = done.clone();

        let sequencer = Sequencer::new(&registry.handle());
        sequencer
            .add_step([a.clone()])
            .on_complete(move || d.set(d.get() + 1))
            .run();

        frame(&registry, &clock, 60.0);
        sequencer.run();
        sequencer.run();

        // Still on the original clock: 40ms more finishes it
        frame(&registry, &clock, 40.0);
        assert!(a.is_finished());

        frame(&registry, &clock, 1.0);
        frame(&registry, &clock, 1.0);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn test_delay_step() {
        let (registry, clock) = setup();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let after = tween(&registry, 10.0);

        let sequencer = Sequencer::new(&registry.handle());
        sequencer
            .add_delay_then(100.0, move || f.set(true))
            .add_step([after.clone()])
            .run();

        frame(&registry, &clock, 99.0);
        assert!(!fired.get());

        frame(&registry, &clock, 1.0);
        assert!(fired.get());
        assert_eq!(after.state(), TweenState::Created);

        frame(&registry, &clock, 1.0);
        assert!(after.is_playing());
    }

    #[test]
    fn test_plain_delay_step() {
        let (registry, clock) = setup();
        let after = tween(&registry, 10.0);

        let sequencer = Sequencer::new(&registry.handle());
        sequencer.add_delay(30.0).add_step([after.clone()]).run();

        frame(&registry, &clock, 30.0);
        frame(&registry, &clock, 1.0);
        assert!(after.is_playing());
    }

    #[test]
    fn test_reset_clears_unrelated_tweens() {
        let (registry, clock) = setup();
        let unrelated = tween(&registry, 1000.0);
        unrelated.start();

        let sequencer = Sequencer::new(&registry.handle());
        sequencer.add_step([tween(&registry, 100.0)]).run();

        frame(&registry, &clock, 10.0);
        sequencer.reset();

        assert!(sequencer.is_empty());
        assert!(!sequencer.is_running());
        assert!(!registry.tick());
        assert_eq!(unrelated.state(), TweenState::Removed);
    }

    #[test]
    fn test_reset_then_reuse() {
        let (registry, clock) = setup();
        let sequencer = Sequencer::new(&registry.handle());
        sequencer.add_step([tween(&registry, 100.0)]).run();
        sequencer.reset();

        let done = Rc::new(Cell::new(false));
        let d = done.clone();
        sequencer
            .add_step([tween(&registry, 10.0)])
            .on_complete(move || d.set(true))
            .run();

        frame(&registry, &clock, 10.0);
        frame(&registry, &clock, 1.0);
        assert!(done.get());
    }

    #[test]
    fn test_stopped_tween_counts_as_finished() {
        let (registry, clock) = setup();
        let a = tween(&registry, 1000.0);
        let b = tween(&registry, 10.0);

        let sequencer = Sequencer::new(&registry.handle());
        sequencer.add_step([a.clone()]).add_step([b.clone()]).run();

        frame(&registry, &clock, 1.0);
        a.stop();
        frame(&registry, &clock, 1.0);
        assert!(b.is_playing());
    }

    #[test]
    fn test_step_callback_can_extend_queue() {
        let (registry, clock) = setup();
        let extra = tween(&registry, 10.0);

        let sequencer = Sequencer::new(&registry.handle());
        let seq = sequencer.clone();
        let e = extra.clone();
        sequencer
            .add_step_then([tween(&registry, 10.0)], move || {
                seq.add_step([e]);
            })
            .run();

        frame(&registry, &clock, 10.0);
        frame(&registry, &clock, 1.0);
        assert!(extra.is_playing());
        assert!(sequencer.is_running());
    }
}
