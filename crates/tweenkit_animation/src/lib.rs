//! Tweenkit Animation
//!
//! Frame-driven tweening and sequencing.
//!
//! # Features
//!
//! - **Easing Library**: 31 Penner-style curves evaluated as `(t, b, c, d)`
//! - **Tweens**: Interpolate named numeric properties with delay and callbacks
//! - **Update Registry**: One explicit context that ticks every live tween per frame
//! - **Sequencer**: Chain groups of tweens into strictly ordered steps
//!
//! Nothing here owns a thread or a timer. The host calls
//! `TweenRegistry::tick()` once per frame.

pub mod clock;
pub mod easing;
pub mod error;
pub mod properties;
pub mod registry;
pub mod sequencer;
pub mod tween;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use easing::Easing;
pub use error::{Result, TweenError};
pub use properties::Properties;
pub use registry::{FrameRequestId, RegistryHandle, TweenId, TweenRegistry};
pub use sequencer::Sequencer;
pub use tween::{Tween, TweenConfig, TweenState};
