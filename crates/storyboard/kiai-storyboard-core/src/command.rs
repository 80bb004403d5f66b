//! Timed interpolation commands and the channel dispatch over them.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::group::{LoopCommand, TriggerCommand};
use crate::value::{Color, CommandValue, Parameter, Position, Scale, ScaleFactor};

/// Rounds a time to the whole milliseconds used by the wire format.
#[inline]
pub fn round_time(time: f64) -> i32 {
    time.round() as i32
}

/// One interpolation between two values over a time window.
///
/// Equal start and end times form an instantaneous set. Only instantaneous
/// commands and commands with no easing can be cut at an interior time:
/// re-deriving an eased curve's slice from two sampled endpoints would not
/// reproduce its shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypedCommand<V: CommandValue> {
    pub easing: Easing,
    pub start_time: f64,
    pub end_time: f64,
    pub start_value: V,
    pub end_value: V,
}

impl<V: CommandValue> TypedCommand<V> {
    #[inline]
    pub fn new(easing: Easing, start_time: f64, end_time: f64, start_value: V, end_value: V) -> Self {
        Self {
            easing,
            start_time,
            end_time,
            start_value,
            end_value,
        }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    #[inline]
    pub fn is_instant(&self) -> bool {
        self.start_time == self.end_time
    }

    /// Whether a slice of this command can be re-derived from sampled
    /// endpoints.
    #[inline]
    pub fn is_fragmentable(&self) -> bool {
        self.start_time == self.end_time || self.easing == Easing::None
    }

    pub fn value_at_progress(&self, progress: f64) -> V {
        if V::DISCRETE {
            return self.start_value;
        }
        V::lerp(self.start_value, self.end_value, progress)
    }

    /// Samples the command, holding the start value before the window and the
    /// end value after it. The discrete-value window rules live in the
    /// timeline, not here.
    pub fn value_at_time(&self, time: f64) -> V {
        if time < self.start_time {
            return self.value_at_progress(0.0);
        }
        if time > self.end_time {
            return self.value_at_progress(1.0);
        }
        let duration = self.duration();
        let progress = if duration > 0.0 {
            self.easing.ease((time - self.start_time) / duration)
        } else {
            0.0
        };
        self.value_at_progress(progress)
    }

    /// Blends this command's start value toward `other`'s end value. Used for
    /// continuity checks between adjacent commands; never exported.
    pub fn midpoint(&self, other: &Self, progress: f64) -> V {
        V::lerp(self.start_value, other.end_value, progress)
    }

    /// Returns a copy covering `[from, to]` with its endpoint values sampled
    /// from this command, or an unchanged copy when the command cannot be
    /// cut.
    pub fn fragment(&self, from: f64, to: f64) -> Self {
        if !self.is_fragmentable() {
            return self.clone();
        }
        Self {
            easing: self.easing,
            start_time: from,
            end_time: to,
            start_value: self.value_at_time(from),
            end_value: self.value_at_time(to),
        }
    }

    /// Integer times strictly inside the window where no cut may land.
    /// Empty for fragmentable commands.
    pub fn non_fragmentable_times(&self) -> Vec<i32> {
        if self.is_fragmentable() {
            return Vec::new();
        }
        (round_time(self.start_time) + 1..round_time(self.end_time)).collect()
    }
}

/// A leaf command on one of the nine animatable channels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DisplayCommand {
    Move(TypedCommand<Position>),
    MoveX(TypedCommand<f64>),
    MoveY(TypedCommand<f64>),
    Scale(TypedCommand<ScaleFactor>),
    VectorScale(TypedCommand<Scale>),
    Rotate(TypedCommand<f64>),
    Fade(TypedCommand<f64>),
    Color(TypedCommand<Color>),
    Parameter(TypedCommand<Parameter>),
}

impl DisplayCommand {
    /// The record tag the wire format uses for this channel.
    pub fn tag(&self) -> &'static str {
        match self {
            DisplayCommand::Move(_) => "M",
            DisplayCommand::MoveX(_) => "MX",
            DisplayCommand::MoveY(_) => "MY",
            DisplayCommand::Scale(_) => "S",
            DisplayCommand::VectorScale(_) => "V",
            DisplayCommand::Rotate(_) => "R",
            DisplayCommand::Fade(_) => "F",
            DisplayCommand::Color(_) => "C",
            DisplayCommand::Parameter(_) => "P",
        }
    }

    pub fn easing(&self) -> Easing {
        match self {
            DisplayCommand::Move(c) => c.easing,
            DisplayCommand::MoveX(c) => c.easing,
            DisplayCommand::MoveY(c) => c.easing,
            DisplayCommand::Scale(c) => c.easing,
            DisplayCommand::VectorScale(c) => c.easing,
            DisplayCommand::Rotate(c) => c.easing,
            DisplayCommand::Fade(c) => c.easing,
            DisplayCommand::Color(c) => c.easing,
            DisplayCommand::Parameter(c) => c.easing,
        }
    }

    pub fn start_time(&self) -> f64 {
        match self {
            DisplayCommand::Move(c) => c.start_time,
            DisplayCommand::MoveX(c) => c.start_time,
            DisplayCommand::MoveY(c) => c.start_time,
            DisplayCommand::Scale(c) => c.start_time,
            DisplayCommand::VectorScale(c) => c.start_time,
            DisplayCommand::Rotate(c) => c.start_time,
            DisplayCommand::Fade(c) => c.start_time,
            DisplayCommand::Color(c) => c.start_time,
            DisplayCommand::Parameter(c) => c.start_time,
        }
    }

    pub fn end_time(&self) -> f64 {
        match self {
            DisplayCommand::Move(c) => c.end_time,
            DisplayCommand::MoveX(c) => c.end_time,
            DisplayCommand::MoveY(c) => c.end_time,
            DisplayCommand::Scale(c) => c.end_time,
            DisplayCommand::VectorScale(c) => c.end_time,
            DisplayCommand::Rotate(c) => c.end_time,
            DisplayCommand::Fade(c) => c.end_time,
            DisplayCommand::Color(c) => c.end_time,
            DisplayCommand::Parameter(c) => c.end_time,
        }
    }

    pub fn is_fragmentable(&self) -> bool {
        match self {
            DisplayCommand::Move(c) => c.is_fragmentable(),
            DisplayCommand::MoveX(c) => c.is_fragmentable(),
            DisplayCommand::MoveY(c) => c.is_fragmentable(),
            DisplayCommand::Scale(c) => c.is_fragmentable(),
            DisplayCommand::VectorScale(c) => c.is_fragmentable(),
            DisplayCommand::Rotate(c) => c.is_fragmentable(),
            DisplayCommand::Fade(c) => c.is_fragmentable(),
            DisplayCommand::Color(c) => c.is_fragmentable(),
            DisplayCommand::Parameter(c) => c.is_fragmentable(),
        }
    }

    /// Shifts the whole window, keeping duration and values.
    pub(crate) fn shift(&mut self, offset: f64) {
        match self {
            DisplayCommand::Move(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::MoveX(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::MoveY(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::Scale(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::VectorScale(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::Rotate(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::Fade(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::Color(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
            DisplayCommand::Parameter(c) => {
                c.start_time += offset;
                c.end_time += offset;
            }
        }
    }

    pub fn fragment(&self, from: f64, to: f64) -> DisplayCommand {
        match self {
            DisplayCommand::Move(c) => DisplayCommand::Move(c.fragment(from, to)),
            DisplayCommand::MoveX(c) => DisplayCommand::MoveX(c.fragment(from, to)),
            DisplayCommand::MoveY(c) => DisplayCommand::MoveY(c.fragment(from, to)),
            DisplayCommand::Scale(c) => DisplayCommand::Scale(c.fragment(from, to)),
            DisplayCommand::VectorScale(c) => DisplayCommand::VectorScale(c.fragment(from, to)),
            DisplayCommand::Rotate(c) => DisplayCommand::Rotate(c.fragment(from, to)),
            DisplayCommand::Fade(c) => DisplayCommand::Fade(c.fragment(from, to)),
            DisplayCommand::Color(c) => DisplayCommand::Color(c.fragment(from, to)),
            DisplayCommand::Parameter(c) => DisplayCommand::Parameter(c.fragment(from, to)),
        }
    }

    pub fn non_fragmentable_times(&self) -> Vec<i32> {
        match self {
            DisplayCommand::Move(c) => c.non_fragmentable_times(),
            DisplayCommand::MoveX(c) => c.non_fragmentable_times(),
            DisplayCommand::MoveY(c) => c.non_fragmentable_times(),
            DisplayCommand::Scale(c) => c.non_fragmentable_times(),
            DisplayCommand::VectorScale(c) => c.non_fragmentable_times(),
            DisplayCommand::Rotate(c) => c.non_fragmentable_times(),
            DisplayCommand::Fade(c) => c.non_fragmentable_times(),
            DisplayCommand::Color(c) => c.non_fragmentable_times(),
            DisplayCommand::Parameter(c) => c.non_fragmentable_times(),
        }
    }
}

/// A top-level entry in a sprite's command list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Display(DisplayCommand),
    Loop(LoopCommand),
    Trigger(TriggerCommand),
}

impl Command {
    pub fn start_time(&self) -> f64 {
        match self {
            Command::Display(c) => c.start_time(),
            Command::Loop(c) => c.start_time,
            Command::Trigger(c) => c.start_time,
        }
    }

    pub fn end_time(&self) -> f64 {
        match self {
            Command::Display(c) => c.end_time(),
            Command::Loop(c) => c.end_time(),
            Command::Trigger(c) => c.end_time,
        }
    }

    /// Triggers replay only on an external game event and are excluded from
    /// the sprite's active time bounds.
    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self, Command::Trigger(_))
    }

    /// How many output commands this entry contributes to a split budget.
    pub fn cost(&self) -> usize {
        match self {
            Command::Display(_) => 1,
            Command::Loop(c) => c.commands.len(),
            Command::Trigger(c) => c.commands.len(),
        }
    }

    pub fn is_fragmentable(&self) -> bool {
        match self {
            Command::Display(c) => c.is_fragmentable(),
            Command::Loop(c) => c.is_fragmentable(),
            Command::Trigger(_) => false,
        }
    }

    pub fn fragment(&self, from: f64, to: f64) -> Command {
        match self {
            Command::Display(c) => Command::Display(c.fragment(from, to)),
            Command::Loop(c) => c.fragment(from, to),
            Command::Trigger(_) => self.clone(),
        }
    }

    pub fn non_fragmentable_times(&self) -> Vec<i32> {
        match self {
            Command::Display(c) => c.non_fragmentable_times(),
            Command::Loop(c) => c.non_fragmentable_times(),
            Command::Trigger(c) => c.non_fragmentable_times(),
        }
    }

    /// Sort key ordering commands by rounded start, then rounded end.
    #[inline]
    pub fn compare_key(&self) -> (i32, i32) {
        (round_time(self.start_time()), round_time(self.end_time()))
    }
}
