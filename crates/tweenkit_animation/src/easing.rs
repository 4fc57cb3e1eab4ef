//! Easing functions for tweens
//!
//! Every curve maps `(t, b, c, d)` to a value, where `t` is the time elapsed
//! inside the active duration, `b` the start value, `c` the delta
//! (`end - start`) and `d` the total duration. All curves satisfy
//! `f(0, b, c, d) == b` and `f(d, b, c, d) == b + c`; the elastic, back and
//! bounce families overshoot in between and hit their end points through an
//! explicit branch.
//!
//! See <https://easings.net> for plots of each curve.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::TweenError;

/// Default overshoot of the back family.
pub const BACK_OVERSHOOT: f64 = 1.70158;

/// Overshoot scale applied by `ease_in_out_back`.
const BACK_IN_OUT_SCALE: f64 = 1.525;

/// Easing curve selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl Easing {
    /// Every curve, in declaration order
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInElastic,
        Easing::EaseOutElastic,
        Easing::EaseInOutElastic,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseInOutBack,
        Easing::EaseInBounce,
        Easing::EaseOutBounce,
        Easing::EaseInOutBounce,
    ];

    /// Canonical name of the curve (`"linear"`, `"easeInQuad"`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInQuint => "easeInQuint",
            Easing::EaseOutQuint => "easeOutQuint",
            Easing::EaseInOutQuint => "easeInOutQuint",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseInOutSine => "easeInOutSine",
            Easing::EaseInExpo => "easeInExpo",
            Easing::EaseOutExpo => "easeOutExpo",
            Easing::EaseInOutExpo => "easeInOutExpo",
            Easing::EaseInCirc => "easeInCirc",
            Easing::EaseOutCirc => "easeOutCirc",
            Easing::EaseInOutCirc => "easeInOutCirc",
            Easing::EaseInElastic => "easeInElastic",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::EaseInOutElastic => "easeInOutElastic",
            Easing::EaseInBack => "easeInBack",
            Easing::EaseOutBack => "easeOutBack",
            Easing::EaseInOutBack => "easeInOutBack",
            Easing::EaseInBounce => "easeInBounce",
            Easing::EaseOutBounce => "easeOutBounce",
            Easing::EaseInOutBounce => "easeInOutBounce",
        }
    }

    /// Evaluate the curve at time `t` for a tween from `b` by `c` over `d`
    pub fn ease(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Easing::Linear => linear(t, b, c, d),
            Easing::EaseInQuad => ease_in_quad(t, b, c, d),
            Easing::EaseOutQuad => ease_out_quad(t, b, c, d),
            Easing::EaseInOutQuad => ease_in_out_quad(t, b, c, d),
            Easing::EaseInCubic => ease_in_cubic(t, b, c, d),
            Easing::EaseOutCubic => ease_out_cubic(t, b, c, d),
            Easing::EaseInOutCubic => ease_in_out_cubic(t, b, c, d),
            Easing::EaseInQuart => ease_in_quart(t, b, c, d),
            Easing::EaseOutQuart => ease_out_quart(t, b, c, d),
            Easing::EaseInOutQuart => ease_in_out_quart(t, b, c, d),
            Easing::EaseInQuint => ease_in_quint(t, b, c, d),
            Easing::EaseOutQuint => ease_out_quint(t, b, c, d),
            Easing::EaseInOutQuint => ease_in_out_quint(t, b, c, d),
            Easing::EaseInSine => ease_in_sine(t, b, c, d),
            Easing::EaseOutSine => ease_out_sine(t, b, c, d),
            Easing::EaseInOutSine => ease_in_out_sine(t, b, c, d),
            Easing::EaseInExpo => ease_in_expo(t, b, c, d),
            Easing::EaseOutExpo => ease_out_expo(t, b, c, d),
            Easing::EaseInOutExpo => ease_in_out_expo(t, b, c, d),
            Easing::EaseInCirc => ease_in_circ(t, b, c, d),
            Easing::EaseOutCirc => ease_out_circ(t, b, c, d),
            Easing::EaseInOutCirc => ease_in_out_circ(t, b, c, d),
            Easing::EaseInElastic => ease_in_elastic(t, b, c, d),
            Easing::EaseOutElastic => ease_out_elastic(t, b, c, d),
            Easing::EaseInOutElastic => ease_in_out_elastic(t, b, c, d),
            Easing::EaseInBack => ease_in_back(t, b, c, d, BACK_OVERSHOOT),
            Easing::EaseOutBack => ease_out_back(t, b, c, d, BACK_OVERSHOOT),
            Easing::EaseInOutBack => ease_in_out_back(t, b, c, d, BACK_OVERSHOOT),
            Easing::EaseInBounce => ease_in_bounce(t, b, c, d),
            Easing::EaseOutBounce => ease_out_bounce(t, b, c, d),
            Easing::EaseInOutBounce => ease_in_out_bounce(t, b, c, d),
        }
    }

    /// Apply the curve to a normalized progress value (0.0 to 1.0)
    pub fn progress(&self, p: f64) -> f64 {
        self.ease(p, 0.0, 1.0, 1.0)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .iter()
            .copied()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| TweenError::UnknownEasing(s.to_string()))
    }
}

// ============================================================================
// Polynomial curves
// ============================================================================

pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * t / d + b
}

pub fn ease_in_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

pub fn ease_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    let t = t - 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

pub fn ease_in_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t * t + b
}

pub fn ease_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * t + 1.0) + b
}

pub fn ease_in_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t * t + 2.0) + b
}

pub fn ease_in_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t.powi(4) + b
}

pub fn ease_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    -c * (t.powi(4) - 1.0) + b
}

pub fn ease_in_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(4) + b;
    }
    let t = t - 2.0;
    -c / 2.0 * (t.powi(4) - 2.0) + b
}

pub fn ease_in_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t.powi(5) + b
}

pub fn ease_out_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t.powi(5) + 1.0) + b
}

pub fn ease_in_out_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(5) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t.powi(5) + 2.0) + b
}

// ============================================================================
// Trigonometric, exponential and circular curves
// ============================================================================

pub fn ease_in_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c * (t / d * (PI / 2.0)).cos() + c + b
}

pub fn ease_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (t / d * (PI / 2.0)).sin() + b
}

pub fn ease_in_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c / 2.0 * ((PI * t / d).cos() - 1.0) + b
}

pub fn ease_in_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    c * 2f64.powf(10.0 * (t / d - 1.0)) + b
}

pub fn ease_out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == d {
        return b + c;
    }
    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
}

pub fn ease_in_out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b;
    }
    c / 2.0 * (-(2f64.powf(-10.0 * (t - 1.0))) + 2.0) + b
}

pub fn ease_in_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * ((1.0 - t * t).sqrt() - 1.0) + b
}

pub fn ease_out_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (1.0 - t * t).sqrt() + b
}

pub fn ease_in_out_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b;
    }
    let t = t - 2.0;
    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
}

// ============================================================================
// Elastic curves
// ============================================================================

/// Resolve amplitude and phase shift for an elastic curve.
///
/// The amplitude never drops below `|c|`; a zero delta keeps the phase finite.
fn elastic_shape(amplitude: f64, c: f64, period: f64) -> (f64, f64) {
    if c == 0.0 || amplitude < c.abs() {
        (c, period / 4.0)
    } else {
        (amplitude, period / (2.0 * PI) * (c / amplitude).asin())
    }
}

pub fn ease_in_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    ease_in_elastic_with(t, b, c, d, c, d * 0.3)
}

/// `ease_in_elastic` with an explicit amplitude and period
pub fn ease_in_elastic_with(t: f64, b: f64, c: f64, d: f64, amplitude: f64, period: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let (a, s) = elastic_shape(amplitude, c, period);
    let t = t - 1.0;
    -(a * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / period).sin()) + b
}

pub fn ease_out_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    ease_out_elastic_with(t, b, c, d, c, d * 0.3)
}

/// `ease_out_elastic` with an explicit amplitude and period
pub fn ease_out_elastic_with(t: f64, b: f64, c: f64, d: f64, amplitude: f64, period: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let (a, s) = elastic_shape(amplitude, c, period);
    a * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / period).sin() + c + b
}

pub fn ease_in_out_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    ease_in_out_elastic_with(t, b, c, d, c, d * (0.3 * 1.5))
}

/// `ease_in_out_elastic` with an explicit amplitude and period
pub fn ease_in_out_elastic_with(
    t: f64,
    b: f64,
    c: f64,
    d: f64,
    amplitude: f64,
    period: f64,
) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / (d / 2.0);
    if t == 2.0 {
        return b + c;
    }
    let (a, s) = elastic_shape(amplitude, c, period);
    let wave = |t: f64| ((t * d - s) * (2.0 * PI) / period).sin();
    if t < 1.0 {
        let t = t - 1.0;
        return -0.5 * (a * 2f64.powf(10.0 * t) * wave(t)) + b;
    }
    let t = t - 1.0;
    a * 2f64.powf(-10.0 * t) * wave(t) * 0.5 + c + b
}

// ============================================================================
// Back curves
// ============================================================================

pub fn ease_in_back(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    if t == d {
        return b + c;
    }
    let t = t / d;
    c * t * t * ((s + 1.0) * t - s) + b
}

pub fn ease_out_back(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    if t == d {
        return b + c;
    }
    let t = t / d - 1.0;
    c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
}

pub fn ease_in_out_back(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    if t == d {
        return b + c;
    }
    let s = s * BACK_IN_OUT_SCALE;
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
}

// ============================================================================
// Bounce curves
// ============================================================================

pub fn ease_out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == d {
        return b + c;
    }
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

/// Time-reversed, value-reflected `ease_out_bounce`
pub fn ease_in_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    c - ease_out_bounce(d - t, 0.0, c, d) + b
}

pub fn ease_in_out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == d {
        return b + c;
    }
    if t < d / 2.0 {
        return ease_in_bounce(t * 2.0, 0.0, c, d) * 0.5 + b;
    }
    ease_out_bounce(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
}
