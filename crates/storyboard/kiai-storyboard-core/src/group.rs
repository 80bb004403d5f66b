//! Loop and trigger command groups.

use serde::{Deserialize, Serialize};

use crate::command::{round_time, Command, DisplayCommand};

/// Replays its children `loop_count` times. Child times are relative to
/// `start_time`, and one repetition lasts until the latest child end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoopCommand {
    pub start_time: f64,
    pub loop_count: u32,
    pub commands: Vec<DisplayCommand>,
}

impl LoopCommand {
    #[inline]
    pub fn new(start_time: f64, loop_count: u32) -> Self {
        Self {
            start_time,
            loop_count,
            commands: Vec::new(),
        }
    }

    pub fn add(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Earliest child start, relative to the group.
    pub fn commands_start_time(&self) -> f64 {
        if self.commands.is_empty() {
            return 0.0;
        }
        self.commands
            .iter()
            .map(|c| c.start_time())
            .fold(f64::MAX, f64::min)
    }

    /// Latest child end, relative to the group; the length of one repetition
    /// once the group is normalized.
    pub fn commands_end_time(&self) -> f64 {
        if self.commands.is_empty() {
            return 0.0;
        }
        self.commands
            .iter()
            .map(|c| c.end_time())
            .fold(f64::MIN, f64::max)
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.commands_end_time() * f64::from(self.loop_count)
    }

    /// Shifts children so the earliest starts at offset zero, moving the
    /// group's own start forward to compensate. Repetitions replay from the
    /// first child on, so leading dead time would otherwise change timing.
    pub fn normalize(&mut self) {
        let offset = self.commands_start_time();
        if offset > 0.0 {
            self.start_time += offset;
            for command in &mut self.commands {
                command.shift(-offset);
            }
        }
    }

    /// A single-repetition loop cannot be cut at all; a repeated loop only at
    /// exact repetition boundaries.
    #[inline]
    pub fn is_fragmentable(&self) -> bool {
        self.loop_count > 1
    }

    /// Cuts the loop down to the repetitions between `from` and `to` when
    /// both land exactly on repetition boundaries; otherwise returns it
    /// unchanged.
    pub fn fragment(&self, from: f64, to: f64) -> Command {
        if self.is_fragmentable() {
            let iteration = round_time(self.commands_end_time());
            let total = iteration * self.loop_count as i32;
            // Offsets are measured from the rounded start so they land on the
            // same grid as `non_fragmentable_times`.
            let base = round_time(self.start_time);
            let from_offset = round_time(from) - base;
            let to_offset = round_time(to) - base;
            if iteration > 0
                && from_offset >= 0
                && to_offset <= total
                && to_offset > from_offset
                && from_offset % iteration == 0
                && to_offset % iteration == 0
            {
                let mut fragment = LoopCommand::new(from, ((to_offset - from_offset) / iteration) as u32);
                fragment.commands = self.commands.clone();
                return Command::Loop(fragment);
            }
        }
        Command::Loop(self.clone())
    }

    /// Interior integer times of every repetition. Cuts may only land on
    /// repetition boundaries, including for loops that cannot be cut at all.
    pub fn non_fragmentable_times(&self) -> Vec<i32> {
        let iteration = round_time(self.commands_end_time());
        if iteration <= 1 {
            return Vec::new();
        }
        let base = round_time(self.start_time);
        let mut times = Vec::with_capacity((iteration as usize - 1) * self.loop_count as usize);
        for repetition in 0..self.loop_count as i32 {
            let rep_start = base + iteration * repetition;
            times.extend(rep_start + 1..rep_start + iteration);
        }
        times
    }
}

/// Replays its children whenever the named game event fires inside the
/// window. Activation is event-driven, so a trigger can never be reproduced
/// by re-sampling and is excluded from the always-on timelines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerCommand {
    pub trigger_name: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Trigger group number; 0 is the unnamed default group.
    pub group: i32,
    pub commands: Vec<DisplayCommand>,
}

impl TriggerCommand {
    pub fn new(trigger_name: impl Into<String>, start_time: f64, end_time: f64, group: i32) -> Self {
        Self {
            trigger_name: trigger_name.into(),
            start_time,
            end_time,
            group,
            commands: Vec::new(),
        }
    }

    pub fn add(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// The whole trigger window resists cutting.
    pub fn non_fragmentable_times(&self) -> Vec<i32> {
        (round_time(self.start_time) + 1..round_time(self.end_time)).collect()
    }
}
