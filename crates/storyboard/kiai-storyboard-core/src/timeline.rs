//! Per-channel timelines merging one channel's commands into a value lookup.

use serde::{Deserialize, Serialize};

use crate::command::{round_time, Command, DisplayCommand, TypedCommand};
use crate::value::{Color, CommandValue, Parameter, Position, Scale, ScaleFactor};

/// One channel's commands in start order, with the default value used when
/// no command governs a time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Timeline<V: CommandValue> {
    default_value: V,
    commands: Vec<TypedCommand<V>>,
    has_overlap: bool,
}

impl<V: CommandValue> Timeline<V> {
    pub fn new(default_value: V) -> Self {
        Self {
            default_value,
            commands: Vec::new(),
            has_overlap: false,
        }
    }

    #[inline]
    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    #[inline]
    pub fn commands(&self) -> &[TypedCommand<V>] {
        &self.commands
    }

    #[inline]
    pub fn default_value(&self) -> V {
        self.default_value
    }

    /// Two commands competing over the same rounded interval make the value
    /// at a boundary ambiguous; overlap disables sprite splitting.
    #[inline]
    pub fn has_overlap(&self) -> bool {
        self.has_overlap
    }

    /// Inserts in start order, after any command with the same start.
    pub fn add(&mut self, command: TypedCommand<V>) {
        let index = self
            .commands
            .partition_point(|c| c.start_time <= command.start_time);
        // A zero-duration command inside a ranged one counts as overlap even
        // though its own half-open window is empty: the merge hands the
        // range's tail to the later start, so the two still compete.
        if index > 0 {
            let previous = &self.commands[index - 1];
            self.has_overlap |= round_time(previous.end_time) > round_time(command.start_time);
        }
        if let Some(next) = self.commands.get(index) {
            self.has_overlap |= round_time(command.end_time) > round_time(next.start_time);
        }
        self.commands.insert(index, command);
    }

    /// The channel's value at `time`.
    ///
    /// Continuous values hold their nearest endpoint outside command windows.
    /// Discrete values apply forward only: before the first command the
    /// default applies, a ranged command reverts to the default after its
    /// end, and only an instantaneous command holds onward.
    pub fn value_at(&self, time: f64) -> V {
        let index = self.commands.partition_point(|c| c.start_time <= time);
        if index == 0 {
            return match self.commands.first() {
                Some(first) if !V::DISCRETE => first.value_at_progress(0.0),
                _ => self.default_value,
            };
        }
        let current = &self.commands[index - 1];
        if time <= current.end_time {
            return current.value_at_time(time);
        }
        if !V::DISCRETE || current.is_instant() {
            current.value_at_progress(1.0)
        } else {
            self.default_value
        }
    }
}

/// Every channel timeline of one sprite.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpriteTimelines {
    pub position: Timeline<Position>,
    pub position_x: Timeline<f64>,
    pub position_y: Timeline<f64>,
    pub scale: Timeline<ScaleFactor>,
    pub scale_vec: Timeline<Scale>,
    pub rotation: Timeline<f64>,
    pub opacity: Timeline<f64>,
    pub color: Timeline<Color>,
    pub flip_h: Timeline<Parameter>,
    pub flip_v: Timeline<Parameter>,
    pub additive: Timeline<Parameter>,
}

impl SpriteTimelines {
    /// Builds every channel from `commands`. Loops contribute one shifted
    /// copy of each child per repetition; triggers contribute nothing.
    pub fn build(commands: &[Command], initial_position: Position) -> Self {
        let mut timelines = Self {
            position: Timeline::new(initial_position),
            position_x: Timeline::new(initial_position.x),
            position_y: Timeline::new(initial_position.y),
            scale: Timeline::new(ScaleFactor(1.0)),
            scale_vec: Timeline::new(Scale::new(1.0, 1.0)),
            rotation: Timeline::new(0.0),
            opacity: Timeline::new(1.0),
            color: Timeline::new(Color::WHITE),
            flip_h: Timeline::new(Parameter::None),
            flip_v: Timeline::new(Parameter::None),
            additive: Timeline::new(Parameter::None),
        };
        for command in commands {
            match command {
                Command::Display(display) => timelines.add(display),
                Command::Loop(group) => {
                    let iteration = group.commands_end_time();
                    for repetition in 0..group.loop_count {
                        let offset = group.start_time + iteration * f64::from(repetition);
                        for child in &group.commands {
                            let mut unrolled = child.clone();
                            unrolled.shift(offset);
                            timelines.add(&unrolled);
                        }
                    }
                }
                Command::Trigger(_) => {}
            }
        }
        timelines
    }

    fn add(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::Move(c) => self.position.add(c.clone()),
            DisplayCommand::MoveX(c) => self.position_x.add(c.clone()),
            DisplayCommand::MoveY(c) => self.position_y.add(c.clone()),
            DisplayCommand::Scale(c) => self.scale.add(c.clone()),
            DisplayCommand::VectorScale(c) => self.scale_vec.add(c.clone()),
            DisplayCommand::Rotate(c) => self.rotation.add(c.clone()),
            DisplayCommand::Fade(c) => self.opacity.add(c.clone()),
            DisplayCommand::Color(c) => self.color.add(c.clone()),
            DisplayCommand::Parameter(c) => match c.start_value {
                Parameter::FlipHorizontal => self.flip_h.add(c.clone()),
                Parameter::FlipVertical => self.flip_v.add(c.clone()),
                Parameter::AdditiveBlending => self.additive.add(c.clone()),
                Parameter::None => {}
            },
        }
    }

    pub fn any_overlap(&self) -> bool {
        self.position.has_overlap()
            || self.position_x.has_overlap()
            || self.position_y.has_overlap()
            || self.scale.has_overlap()
            || self.scale_vec.has_overlap()
            || self.rotation.has_overlap()
            || self.opacity.has_overlap()
            || self.color.has_overlap()
            || self.flip_h.has_overlap()
            || self.flip_v.has_overlap()
            || self.additive.has_overlap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    fn mk_fade(start_time: f64, end_time: f64, from: f64, to: f64) -> TypedCommand<f64> {
        TypedCommand::new(Easing::None, start_time, end_time, from, to)
    }

    /// it should fall back to the default before any command exists
    #[test]
    fn empty_timeline_uses_default() {
        let timeline: Timeline<f64> = Timeline::new(0.75);
        assert_eq!(timeline.value_at(123.0), 0.75);
        assert!(!timeline.has_commands());
    }

    /// it should hold the first and last values outside the command span
    #[test]
    fn continuous_values_hold() {
        let mut timeline = Timeline::new(1.0);
        timeline.add(mk_fade(100.0, 200.0, 0.0, 0.5));
        timeline.add(mk_fade(300.0, 400.0, 0.5, 1.0));

        assert_eq!(timeline.value_at(0.0), 0.0);
        assert_eq!(timeline.value_at(150.0), 0.25);
        // In the gap the first command's end value holds.
        assert_eq!(timeline.value_at(250.0), 0.5);
        assert_eq!(timeline.value_at(400.0), 1.0);
        assert_eq!(timeline.value_at(1000.0), 1.0);
    }

    /// it should keep discrete flags inside their window only
    #[test]
    fn discrete_values_do_not_hold() {
        let mut timeline = Timeline::new(Parameter::None);
        timeline.add(TypedCommand::new(
            Easing::None,
            100.0,
            200.0,
            Parameter::FlipHorizontal,
            Parameter::FlipHorizontal,
        ));

        assert_eq!(timeline.value_at(50.0), Parameter::None);
        assert_eq!(timeline.value_at(150.0), Parameter::FlipHorizontal);
        assert_eq!(timeline.value_at(200.0), Parameter::FlipHorizontal);
        assert_eq!(timeline.value_at(201.0), Parameter::None);
    }

    /// it should hold an instantaneous discrete flag onward
    #[test]
    fn instant_discrete_value_holds_forward() {
        let mut timeline = Timeline::new(Parameter::None);
        timeline.add(TypedCommand::new(
            Easing::None,
            100.0,
            100.0,
            Parameter::AdditiveBlending,
            Parameter::AdditiveBlending,
        ));

        assert_eq!(timeline.value_at(99.0), Parameter::None);
        assert_eq!(timeline.value_at(100.0), Parameter::AdditiveBlending);
        assert_eq!(timeline.value_at(10_000.0), Parameter::AdditiveBlending);
    }

    /// it should flag commands competing over the same interval
    #[test]
    fn overlapping_commands_are_detected() {
        let mut timeline = Timeline::new(1.0);
        timeline.add(mk_fade(0.0, 1000.0, 0.0, 1.0));
        assert!(!timeline.has_overlap());
        timeline.add(mk_fade(500.0, 1500.0, 1.0, 0.0));
        assert!(timeline.has_overlap());
    }

    /// it should not flag commands that merely touch at a boundary
    #[test]
    fn adjacent_commands_do_not_overlap() {
        let mut timeline = Timeline::new(1.0);
        timeline.add(mk_fade(0.0, 500.0, 0.0, 1.0));
        timeline.add(mk_fade(500.0, 1000.0, 1.0, 0.0));
        assert!(!timeline.has_overlap());
    }

    /// it should flag an instantaneous command inside a ranged one
    #[test]
    fn instant_inside_range_overlaps() {
        let mut timeline = Timeline::new(1.0);
        timeline.add(mk_fade(0.0, 1000.0, 0.0, 1.0));
        timeline.add(mk_fade(500.0, 500.0, 0.2, 0.2));
        assert!(timeline.has_overlap());
    }
}
