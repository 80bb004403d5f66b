//! Easing curves applied to normalized command progress.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Named easing curves, numbered as the osb format encodes them.
///
/// `Out` and `In` are the historical aliases for `OutQuad` and `InQuad`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Easing {
    /// The identity curve; the only easing safe to cut mid-command.
    #[default]
    None = 0,
    Out = 1,
    In = 2,
    InQuad = 3,
    OutQuad = 4,
    InOutQuad = 5,
    InCubic = 6,
    OutCubic = 7,
    InOutCubic = 8,
    InQuart = 9,
    OutQuart = 10,
    InOutQuart = 11,
    InQuint = 12,
    OutQuint = 13,
    InOutQuint = 14,
    InSine = 15,
    OutSine = 16,
    InOutSine = 17,
    InExpo = 18,
    OutExpo = 19,
    InOutExpo = 20,
    InCirc = 21,
    OutCirc = 22,
    InOutCirc = 23,
    InElastic = 24,
    OutElastic = 25,
    OutElasticHalf = 26,
    OutElasticQuarter = 27,
    InOutElastic = 28,
    InBack = 29,
    OutBack = 30,
    InOutBack = 31,
    InBounce = 32,
    OutBounce = 33,
    InOutBounce = 34,
}

impl Easing {
    pub const ALL: [Easing; 35] = [
        Easing::None,
        Easing::Out,
        Easing::In,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::OutElasticHalf,
        Easing::OutElasticQuarter,
        Easing::InOutElastic,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    /// The numeric index written to the wire.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Applies the curve to `progress`. Input is clamped to `[0, 1]`, and
    /// every curve maps 0 to 0 and 1 to 1; overshooting curves exceed the
    /// range in between.
    pub fn ease(self, progress: f64) -> f64 {
        if progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::None => progress,
            Easing::In | Easing::InQuad => quad_in(progress),
            Easing::Out | Easing::OutQuad => reverse(quad_in, progress),
            Easing::InOutQuad => in_out(quad_in, progress),
            Easing::InCubic => cubic_in(progress),
            Easing::OutCubic => reverse(cubic_in, progress),
            Easing::InOutCubic => in_out(cubic_in, progress),
            Easing::InQuart => quart_in(progress),
            Easing::OutQuart => reverse(quart_in, progress),
            Easing::InOutQuart => in_out(quart_in, progress),
            Easing::InQuint => quint_in(progress),
            Easing::OutQuint => reverse(quint_in, progress),
            Easing::InOutQuint => in_out(quint_in, progress),
            Easing::InSine => sine_in(progress),
            Easing::OutSine => reverse(sine_in, progress),
            Easing::InOutSine => in_out(sine_in, progress),
            Easing::InExpo => expo_in(progress),
            Easing::OutExpo => reverse(expo_in, progress),
            Easing::InOutExpo => in_out(expo_in, progress),
            Easing::InCirc => circ_in(progress),
            Easing::OutCirc => reverse(circ_in, progress),
            Easing::InOutCirc => in_out(circ_in, progress),
            Easing::InElastic => elastic_in(progress),
            Easing::OutElastic => elastic_out(progress),
            Easing::OutElasticHalf => elastic_out_half(progress),
            Easing::OutElasticQuarter => elastic_out_quarter(progress),
            Easing::InOutElastic => in_out(elastic_in, progress),
            Easing::InBack => back_in(progress),
            Easing::OutBack => reverse(back_in, progress),
            Easing::InOutBack => in_out(back_in, progress),
            Easing::InBounce => bounce_in(progress),
            Easing::OutBounce => bounce_out(progress),
            Easing::InOutBounce => in_out(bounce_in, progress),
        }
    }
}

/// Turns an In curve into its Out mirror.
#[inline]
fn reverse(curve: fn(f64) -> f64, t: f64) -> f64 {
    1.0 - curve(1.0 - t)
}

/// Runs an In curve over the first half and its mirror over the second.
#[inline]
fn in_out(curve: fn(f64) -> f64, t: f64) -> f64 {
    if t < 0.5 {
        0.5 * curve(2.0 * t)
    } else {
        1.0 - 0.5 * curve(2.0 - 2.0 * t)
    }
}

#[inline]
fn quad_in(t: f64) -> f64 {
    t * t
}

#[inline]
fn cubic_in(t: f64) -> f64 {
    t * t * t
}

#[inline]
fn quart_in(t: f64) -> f64 {
    t * t * t * t
}

#[inline]
fn quint_in(t: f64) -> f64 {
    t * t * t * t * t
}

#[inline]
fn sine_in(t: f64) -> f64 {
    1.0 - (t * PI / 2.0).cos()
}

#[inline]
fn expo_in(t: f64) -> f64 {
    2f64.powf(10.0 * (t - 1.0))
}

#[inline]
fn circ_in(t: f64) -> f64 {
    1.0 - (1.0 - t * t).sqrt()
}

#[inline]
fn back_in(t: f64) -> f64 {
    const C: f64 = 1.70158;
    t * t * ((C + 1.0) * t - C)
}

#[inline]
fn bounce_in(t: f64) -> f64 {
    reverse(bounce_out, t)
}

#[inline]
fn bounce_out(t: f64) -> f64 {
    if t < 4.0 / 11.0 {
        7.5625 * t * t
    } else if t < 8.0 / 11.0 {
        let t = t - 6.0 / 11.0;
        7.5625 * t * t + 0.75
    } else if t < 10.0 / 11.0 {
        let t = t - 9.0 / 11.0;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 21.0 / 22.0;
        7.5625 * t * t + 0.984375
    }
}

#[inline]
fn elastic_in(t: f64) -> f64 {
    reverse(elastic_out, t)
}

#[inline]
fn elastic_out(t: f64) -> f64 {
    2f64.powf(-10.0 * t) * ((t - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
}

/// Like [`elastic_out`] with the oscillation slowed to half frequency.
#[inline]
fn elastic_out_half(t: f64) -> f64 {
    2f64.powf(-10.0 * t) * ((0.5 * t - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
}

/// Like [`elastic_out`] with the oscillation slowed to quarter frequency.
#[inline]
fn elastic_out_quarter(t: f64) -> f64 {
    2f64.powf(-10.0 * t) * ((0.25 * t - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
}
