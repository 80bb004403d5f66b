//! Splitting a sprite's command list into self-sufficient slices.
//!
//! Rendering engines cull whole sprites by their active time span; a sprite
//! animated for a few seconds out of several minutes still costs its full
//! command list every frame. Splitting it into several output sprites with
//! short spans keeps the rendered result identical while letting the engine
//! skip the inactive slices.

use std::collections::BTreeSet;

use crate::command::{round_time, Command, DisplayCommand, TypedCommand};
use crate::easing::Easing;
use crate::sprite::Sprite;
use crate::timeline::SpriteTimelines;
use crate::value::Parameter;

/// One contiguous slice of a split sprite's commands.
#[derive(Clone, Debug)]
pub struct CommandSegment {
    pub start_time: i32,
    pub end_time: i32,
    pub commands: Vec<Command>,
}

/// Splits `sprite`'s commands into slices of bounded cost.
///
/// Returns `None` when the sprite is under its split threshold or no safe
/// split exists: a trigger's event-driven activation cannot be partitioned
/// by time, and an overlapped channel makes boundary values ambiguous.
/// Callers fall back to writing the sprite whole.
pub fn split_sprite_commands(sprite: &Sprite) -> Option<Vec<CommandSegment>> {
    let threshold = sprite.command_split_threshold;
    if threshold == 0 || sprite.command_cost() <= threshold {
        return None;
    }
    if sprite
        .commands()
        .iter()
        .any(|c| matches!(c, Command::Trigger(_)))
    {
        log::debug!(
            "not splitting \"{}\": trigger commands present",
            sprite.texture_path
        );
        return None;
    }
    let timelines = sprite.timelines();
    if timelines.any_overlap() {
        log::warn!(
            "not splitting \"{}\": overlapping commands",
            sprite.texture_path
        );
        return None;
    }

    let mut times = cut_times(sprite);
    let mut pool = sprite.commands().to_vec();
    let mut segments = Vec::new();

    while !pool.is_empty() {
        let seg_start = match times.first() {
            Some(&time) => time,
            None => break,
        };
        let seg_end = segment_end_time(&times, &pool, threshold, seg_start);

        let mut members = Vec::new();
        let mut kept = Vec::with_capacity(pool.len());
        for command in pool.drain(..) {
            let start = round_time(command.start_time());
            let end = round_time(command.end_time());
            if start >= seg_end {
                kept.push(command);
                continue;
            }
            let from = start.max(seg_start);
            let to = end.min(seg_end);
            if from == start && to == end {
                members.push(command);
            } else {
                members.push(command.fragment(f64::from(from), f64::from(to)));
                if to != end {
                    kept.push(command);
                }
            }
        }
        pool = kept;

        let mut commands = boundary_pins(&timelines, &members, seg_start);
        commands.extend(members);

        times.retain(|&time| time >= seg_end);
        segments.push(CommandSegment {
            start_time: seg_start,
            end_time: seg_end,
            commands,
        });
    }

    Some(segments)
}

/// Integer times a slice boundary may land on: every rounded millisecond of
/// the sprite's span minus the interiors its commands protect.
fn cut_times(sprite: &Sprite) -> BTreeSet<i32> {
    let mut times: BTreeSet<i32> =
        (round_time(sprite.start_time())..=round_time(sprite.end_time())).collect();
    for command in sprite.commands() {
        for time in command.non_fragmentable_times() {
            times.remove(&time);
        }
    }
    times
}

/// Picks where the current slice ends: the latest safe cut whose consumed
/// commands still fit the slice budget, or one past the final command end
/// when the remainder fits whole.
fn segment_end_time(times: &BTreeSet<i32>, pool: &[Command], threshold: usize, seg_start: i32) -> i32 {
    let run_to_end = pool
        .iter()
        .map(|c| round_time(c.end_time()))
        .max()
        .unwrap_or(seg_start)
        + 1;

    let remaining: usize = pool.iter().map(Command::cost).sum();
    if remaining <= threshold {
        return run_to_end;
    }
    // Splitting the tail roughly in half avoids a last slice with almost
    // nothing in it.
    let max_cost = if remaining < threshold * 2 {
        (remaining + 1) / 2
    } else {
        threshold
    };

    // The time at which each entry's consumption becomes unavoidable: any
    // cut at or past it pulls the whole entry into the slice. Loops weigh
    // in with their full child count.
    let mut consumption = Vec::with_capacity(remaining);
    for command in pool {
        let time = round_time(command.end_time()).max(round_time(command.start_time()) + 1);
        for _ in 0..command.cost() {
            consumption.push(time);
        }
    }
    consumption.sort_unstable();
    let first_over_budget = consumption[max_cost];

    if let Some(&cut) = times.range(seg_start + 1..first_over_budget).next_back() {
        return cut;
    }
    // Every available cut overruns the budget; take the earliest one to keep
    // the overshoot as small as possible.
    match times.range(first_over_budget..).next() {
        Some(&cut) => cut,
        None => run_to_end,
    }
}

/// Zero-duration commands pinning every animated channel to its running
/// value at the slice start, so the slice renders correctly on its own.
/// Channels whose own command already starts the slice need no pin.
fn boundary_pins(timelines: &SpriteTimelines, members: &[Command], seg_start: i32) -> Vec<Command> {
    let time = f64::from(seg_start);
    let mut pins = Vec::new();

    if timelines.position.has_commands()
        && !starts_here(members, seg_start, |c| matches!(c, DisplayCommand::Move(_)))
    {
        let value = timelines.position.value_at(time);
        pins.push(Command::Display(DisplayCommand::Move(TypedCommand::new(
            Easing::None,
            time,
            time,
            value,
            value,
        ))));
    }
    if timelines.position_x.has_commands()
        && !starts_here(members, seg_start, |c| matches!(c, DisplayCommand::MoveX(_)))
    {
        let value = timelines.position_x.value_at(time);
        pins.push(Command::Display(DisplayCommand::MoveX(TypedCommand::new(
            Easing::None,
            time,
            time,
            value,
            value,
        ))));
    }
    if timelines.position_y.has_commands()
        && !starts_here(members, seg_start, |c| matches!(c, DisplayCommand::MoveY(_)))
    {
        let value = timelines.position_y.value_at(time);
        pins.push(Command::Display(DisplayCommand::MoveY(TypedCommand::new(
            Easing::None,
            time,
            time,
            value,
            value,
        ))));
    }
    if timelines.scale.has_commands()
        && !starts_here(members, seg_start, |c| matches!(c, DisplayCommand::Scale(_)))
    {
        let value = timelines.scale.value_at(time);
        pins.push(Command::Display(DisplayCommand::Scale(TypedCommand::new(
            Easing::None,
            time,
            time,
            value,
            value,
        ))));
    }
    if timelines.scale_vec.has_commands()
        && !starts_here(members, seg_start, |c| {
            matches!(c, DisplayCommand::VectorScale(_))
        })
    {
        let value = timelines.scale_vec.value_at(time);
        pins.push(Command::Display(DisplayCommand::VectorScale(
            TypedCommand::new(Easing::None, time, time, value, value),
        )));
    }
    if timelines.rotation.has_commands()
        && !starts_here(members, seg_start, |c| matches!(c, DisplayCommand::Rotate(_)))
    {
        let value = timelines.rotation.value_at(time);
        pins.push(Command::Display(DisplayCommand::Rotate(TypedCommand::new(
            Easing::None,
            time,
            time,
            value,
            value,
        ))));
    }
    if timelines.opacity.has_commands()
        && !starts_here(members, seg_start, |c| matches!(c, DisplayCommand::Fade(_)))
    {
        let value = timelines.opacity.value_at(time);
        pins.push(Command::Display(DisplayCommand::Fade(TypedCommand::new(
            Easing::None,
            time,
            time,
            value,
            value,
        ))));
    }
    if timelines.color.has_commands()
        && !starts_here(members, seg_start, |c| matches!(c, DisplayCommand::Color(_)))
    {
        let value = timelines.color.value_at(time);
        pins.push(Command::Display(DisplayCommand::Color(TypedCommand::new(
            Easing::None,
            time,
            time,
            value,
            value,
        ))));
    }

    // An inactive flag is the default state; pinning it would write a
    // parameter with nothing to say.
    for (timeline, flag) in [
        (&timelines.flip_h, Parameter::FlipHorizontal),
        (&timelines.flip_v, Parameter::FlipVertical),
        (&timelines.additive, Parameter::AdditiveBlending),
    ] {
        if timeline.has_commands()
            && !starts_here(members, seg_start, |c| {
                matches!(c, DisplayCommand::Parameter(p) if p.start_value == flag)
            })
        {
            let value = timeline.value_at(time);
            if value != Parameter::None {
                pins.push(Command::Display(DisplayCommand::Parameter(
                    TypedCommand::new(Easing::None, time, time, value, value),
                )));
            }
        }
    }

    pins
}

/// Whether the slice already carries a top-level command of the channel
/// starting exactly at the boundary.
fn starts_here(
    members: &[Command],
    seg_start: i32,
    matches_channel: impl Fn(&DisplayCommand) -> bool,
) -> bool {
    members.iter().any(|command| match command {
        Command::Display(display) => {
            matches_channel(display) && round_time(display.start_time()) == seg_start
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{Origin, Sprite};
    use crate::value::Position;

    fn mk_split_sprite() -> Sprite {
        let mut sprite =
            Sprite::with_origin("sb/dot.png", Origin::Centre, Position::new(320.0, 240.0));
        sprite.command_split_threshold = 1;
        sprite.fade(Easing::None, 0.0, 1000.0, 0.0, 1.0);
        for step in 0..9 {
            let time = f64::from(step) * 100.0;
            let position = Position::new(300.0 + f64::from(step), 240.0);
            sprite.move_to(Easing::None, time, time, position, position);
        }
        sprite
    }

    /// it should cut so each slice's consumed commands fit the budget
    #[test]
    fn slices_follow_the_budget() {
        let segments = split_sprite_commands(&mk_split_sprite()).expect("splittable");
        assert_eq!(segments.len(), 10);

        let spans: Vec<(i32, i32)> = segments.iter().map(|s| (s.start_time, s.end_time)).collect();
        let expected: Vec<(i32, i32)> = (0..8)
            .map(|k| (k * 100, (k + 1) * 100))
            .chain([(800, 999), (999, 1001)])
            .collect();
        assert_eq!(spans, expected);
    }

    /// it should leave uncuttable spans alone even over budget
    #[test]
    fn eased_command_is_never_cut() {
        let mut sprite = Sprite::new("sb/dot.png");
        sprite.command_split_threshold = 1;
        sprite.fade(Easing::OutQuad, 0.0, 1000.0, 0.0, 1.0);
        sprite.fade(Easing::None, 2000.0, 2000.0, 1.0, 0.0);

        let segments = split_sprite_commands(&sprite).expect("splittable");
        assert_eq!(segments.len(), 2);
        // The first slice runs to the next pending command, keeping the
        // eased fade whole.
        assert_eq!((segments[0].start_time, segments[0].end_time), (0, 2000));
        assert_eq!(segments[0].commands.len(), 1);
        assert_eq!((segments[1].start_time, segments[1].end_time), (2000, 2001));
    }

    /// it should refuse to split sprites with triggers
    #[test]
    fn triggers_disable_splitting() {
        let mut sprite = mk_split_sprite();
        sprite.start_trigger_group("HitSound", 0.0, 100.0, 0);
        sprite.fade(Easing::None, 0.0, 50.0, 1.0, 0.0);
        sprite.end_group();
        assert!(split_sprite_commands(&sprite).is_none());
    }

    /// it should refuse to split sprites below their threshold
    #[test]
    fn threshold_gates_splitting() {
        let mut sprite = mk_split_sprite();
        sprite.command_split_threshold = 100;
        assert!(split_sprite_commands(&sprite).is_none());
        sprite.command_split_threshold = 0;
        assert!(split_sprite_commands(&sprite).is_none());
    }
}
