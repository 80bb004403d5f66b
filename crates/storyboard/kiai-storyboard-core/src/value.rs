//! Value kinds animated by storyboard commands.

use serde::{Deserialize, Serialize};

use crate::config::ExportSettings;

/// A value a command can interpolate between.
///
/// Implementations provide linear blending and their osb field encoding.
/// Discrete kinds opt out of blending entirely: a command carrying one
/// evaluates to its start value at every progress.
pub trait CommandValue: Copy + PartialEq + std::fmt::Debug {
    /// Discrete values never blend and never hold backward in a timeline.
    const DISCRETE: bool = false;

    fn lerp(a: Self, b: Self, t: f64) -> Self;

    /// Comma-separated osb fields for this value, without a leading comma.
    fn to_osb_fields(&self, settings: &ExportSettings) -> String;
}

#[inline]
pub(crate) fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl CommandValue for f64 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        lerp_f64(a, b, t)
    }

    fn to_osb_fields(&self, _settings: &ExportSettings) -> String {
        self.to_string()
    }
}

/// A screen-space position in osu!pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl CommandValue for Position {
    #[inline]
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            x: lerp_f64(a.x, b.x, t),
            y: lerp_f64(a.y, b.y, t),
        }
    }

    fn to_osb_fields(&self, settings: &ExportSettings) -> String {
        if settings.use_float_for_move {
            format!("{},{}", self.x, self.y)
        } else {
            format!("{},{}", self.x.round() as i32, self.y.round() as i32)
        }
    }
}

/// Per-axis scale factors.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl CommandValue for Scale {
    #[inline]
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            x: lerp_f64(a.x, b.x, t),
            y: lerp_f64(a.y, b.y, t),
        }
    }

    fn to_osb_fields(&self, _settings: &ExportSettings) -> String {
        format!("{},{}", self.x, self.y)
    }
}

/// A uniform scale factor. Blending clamps to zero; sizes cannot go negative.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleFactor(pub f64);

impl CommandValue for ScaleFactor {
    #[inline]
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self(lerp_f64(a.0, b.0, t).max(0.0))
    }

    fn to_osb_fields(&self, _settings: &ExportSettings) -> String {
        self.0.to_string()
    }
}

/// An RGB color with components in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Component scaled to the 0-255 byte range used on the wire.
    #[inline]
    fn to_byte(component: f64) -> u8 {
        (component * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

impl CommandValue for Color {
    #[inline]
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            r: lerp_f64(a.r, b.r, t),
            g: lerp_f64(a.g, b.g, t),
            b: lerp_f64(a.b, b.b, t),
        }
    }

    fn to_osb_fields(&self, _settings: &ExportSettings) -> String {
        format!(
            "{},{},{}",
            Self::to_byte(self.r),
            Self::to_byte(self.g),
            Self::to_byte(self.b)
        )
    }
}

/// Sprite render flags toggled by parameter commands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// No flag; the timeline default, never written to the wire.
    #[default]
    None,
    FlipHorizontal,
    FlipVertical,
    AdditiveBlending,
}

impl CommandValue for Parameter {
    const DISCRETE: bool = true;

    #[inline]
    fn lerp(a: Self, _b: Self, _t: f64) -> Self {
        a
    }

    fn to_osb_fields(&self, _settings: &ExportSettings) -> String {
        match self {
            Parameter::FlipHorizontal => "H".to_owned(),
            Parameter::FlipVertical => "V".to_owned(),
            Parameter::AdditiveBlending => "A".to_owned(),
            Parameter::None => panic!("parameter command with no active flag"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ExportSettings {
        ExportSettings::default()
    }

    /// it should blend positions componentwise
    #[test]
    fn position_lerp() {
        let a = Position::new(0.0, 100.0);
        let b = Position::new(10.0, 200.0);
        assert_eq!(Position::lerp(a, b, 0.5), Position::new(5.0, 150.0));
        assert_eq!(Position::lerp(a, b, 0.0), a);
        assert_eq!(Position::lerp(a, b, 1.0), b);
    }

    /// it should clamp blended scale factors at zero
    #[test]
    fn scale_factor_clamps() {
        let a = ScaleFactor(1.0);
        let b = ScaleFactor(-1.0);
        assert_eq!(ScaleFactor::lerp(a, b, 0.75), ScaleFactor(0.0));
        assert_eq!(ScaleFactor::lerp(a, b, 0.25), ScaleFactor(0.5));
    }

    /// it should round move coordinates when float moves are disabled
    #[test]
    fn position_fields_respect_settings() {
        let position = Position::new(120.4, 99.6);
        assert_eq!(position.to_osb_fields(&settings()), "120.4,99.6");

        let rounded = ExportSettings {
            use_float_for_move: false,
            ..settings()
        };
        assert_eq!(position.to_osb_fields(&rounded), "120,100");
    }

    /// it should write colors as rounded bytes, saturating out-of-range components
    #[test]
    fn color_fields_are_bytes() {
        assert_eq!(Color::WHITE.to_osb_fields(&settings()), "255,255,255");
        assert_eq!(
            Color::new(0.5, 0.0, 1.2).to_osb_fields(&settings()),
            "128,0,255"
        );
        assert_eq!(
            Color::new(-0.5, 0.998, 0.002).to_osb_fields(&settings()),
            "0,254,1"
        );
    }

    /// it should keep the start flag when blending parameters
    #[test]
    fn parameter_is_discrete() {
        assert!(Parameter::DISCRETE);
        assert_eq!(
            Parameter::lerp(Parameter::FlipHorizontal, Parameter::AdditiveBlending, 0.9),
            Parameter::FlipHorizontal
        );
        assert_eq!(
            Parameter::AdditiveBlending.to_osb_fields(&settings()),
            "A"
        );
    }
}
