//! Line-oriented osb emission.
//!
//! Everything funnels into [`write_segment`]; the per-object entry points
//! are public for callers emitting a single sprite into an existing file.

use std::fmt::Write;

use crate::command::{round_time, Command, DisplayCommand};
use crate::config::ExportSettings;
use crate::error::StoryboardError;
use crate::fragment::split_sprite_commands;
use crate::segment::{Element, Segment, StoryboardTransform};
use crate::sprite::{Animation, Layer, LoopType, Origin, Sample, Sprite};
use crate::value::{CommandValue, Parameter, Position};

/// Writes `segment` and every element under it onto one layer.
pub fn write_segment<W: Write>(
    out: &mut W,
    segment: &Segment,
    layer: Layer,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    write_segment_under(out, segment, layer, None, settings)
}

fn write_segment_under<W: Write>(
    out: &mut W,
    segment: &Segment,
    layer: Layer,
    parent: Option<&StoryboardTransform>,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    let transform = segment.transform(parent);
    for element in segment.elements() {
        match element {
            Element::Sprite(sprite) => write_sprite(out, sprite, layer, &transform, settings)?,
            Element::Animation(animation) => {
                write_animation(out, animation, layer, &transform, settings)?
            }
            Element::Sample(sample) => write_sample(out, sample, layer, settings)?,
            Element::Segment(child) => {
                write_segment_under(out, child, layer, Some(&transform), settings)?
            }
        }
    }
    Ok(())
}

/// Writes one sprite, splitting it into several output sprites when allowed
/// and worthwhile.
pub fn write_sprite<W: Write>(
    out: &mut W,
    sprite: &Sprite,
    layer: Layer,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    if sprite.has_open_group() {
        return Err(StoryboardError::UnclosedGroup {
            texture_path: sprite.texture_path.clone(),
        });
    }
    if sprite.has_incompatible_commands() {
        log::warn!(
            "\"{}\" has both Move and MoveX/MoveY commands",
            sprite.texture_path
        );
    }
    if settings.optimise_sprites {
        if let Some(segments) = split_sprite_commands(sprite) {
            for segment in &segments {
                write_sprite_header(out, sprite, &segment.commands, layer, transform, settings)?;
                write_commands(out, &segment.commands, transform, settings)?;
            }
            return Ok(());
        }
    }
    write_sprite_header(out, sprite, sprite.commands(), layer, transform, settings)?;
    write_commands(out, sprite.commands(), transform, settings)
}

/// Writes one animation. Slices past a play-once animation's last frame
/// degrade to plain sprites showing that frame.
pub fn write_animation<W: Write>(
    out: &mut W,
    animation: &Animation,
    layer: Layer,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    if animation.has_open_group() {
        return Err(StoryboardError::UnclosedGroup {
            texture_path: animation.texture_path.clone(),
        });
    }
    if animation.has_incompatible_commands() {
        log::warn!(
            "\"{}\" has both Move and MoveX/MoveY commands",
            animation.texture_path
        );
    }
    if settings.optimise_sprites {
        if let Some(segments) = split_sprite_commands(animation) {
            let frames_end = animation.animation_end_time();
            for segment in &segments {
                if animation.loop_type == LoopType::LoopOnce
                    && f64::from(segment.start_time) >= frames_end
                {
                    let path = animation.frame_path_at(frames_end);
                    write_header(
                        out,
                        "Sprite",
                        &path,
                        animation.origin,
                        animation.initial_position(),
                        &segment.commands,
                        layer,
                        transform,
                        settings,
                    )?;
                } else {
                    write_animation_header(out, animation, &segment.commands, layer, transform, settings)?;
                }
                write_commands(out, &segment.commands, transform, settings)?;
            }
            return Ok(());
        }
    }
    write_animation_header(out, animation, animation.commands(), layer, transform, settings)?;
    write_commands(out, animation.commands(), transform, settings)
}

/// Writes one sample record.
pub fn write_sample<W: Write>(
    out: &mut W,
    sample: &Sample,
    layer: Layer,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    writeln!(
        out,
        "Sample,{},{},\"{}\",{}",
        time_field(sample.time, settings),
        layer.name(),
        sample.audio_path.trim(),
        sample.volume
    )?;
    Ok(())
}

fn write_sprite_header<W: Write>(
    out: &mut W,
    sprite: &Sprite,
    commands: &[Command],
    layer: Layer,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    write_header(
        out,
        "Sprite",
        &sprite.texture_path,
        sprite.origin,
        sprite.initial_position(),
        commands,
        layer,
        transform,
        settings,
    )
}

fn write_animation_header<W: Write>(
    out: &mut W,
    animation: &Animation,
    commands: &[Command],
    layer: Layer,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    let position = header_position(animation.initial_position(), commands, transform);
    writeln!(
        out,
        "Animation,{},{},\"{}\",{},{},{},{}",
        layer.name(),
        animation.origin.name(),
        animation.texture_path.trim(),
        position.to_osb_fields(settings),
        animation.frame_count,
        animation.frame_delay,
        animation.loop_type.name()
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn write_header<W: Write>(
    out: &mut W,
    record: &str,
    texture_path: &str,
    origin: Origin,
    initial_position: Position,
    commands: &[Command],
    layer: Layer,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    let position = header_position(initial_position, commands, transform);
    writeln!(
        out,
        "{},{},{},\"{}\",{}",
        record,
        layer.name(),
        origin.name(),
        texture_path.trim(),
        position.to_osb_fields(settings)
    )?;
    Ok(())
}

/// Header position fields. An axis driven by a move command is written as
/// zero; its real value travels with the command.
fn header_position(
    initial_position: Position,
    commands: &[Command],
    transform: &StoryboardTransform,
) -> Position {
    let (has_x, has_y) = move_presence(commands);
    let transformed = transform.apply_to_position(initial_position);
    Position::new(
        if has_x { 0.0 } else { transformed.x },
        if has_y { 0.0 } else { transformed.y },
    )
}

fn move_presence(commands: &[Command]) -> (bool, bool) {
    let mut has_x = false;
    let mut has_y = false;
    let mut scan = |display: &DisplayCommand| match display {
        DisplayCommand::Move(_) => {
            has_x = true;
            has_y = true;
        }
        DisplayCommand::MoveX(_) => has_x = true,
        DisplayCommand::MoveY(_) => has_y = true,
        _ => {}
    };
    for command in commands {
        match command {
            Command::Display(display) => scan(display),
            Command::Loop(group) => group.commands.iter().for_each(&mut scan),
            // A trigger may never fire; the sprite keeps its real initial
            // position until it does.
            Command::Trigger(_) => {}
        }
    }
    (has_x, has_y)
}

fn write_commands<W: Write>(
    out: &mut W,
    commands: &[Command],
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    for command in commands {
        write_command(out, command, 1, transform, settings)?;
    }
    Ok(())
}

fn write_command<W: Write>(
    out: &mut W,
    command: &Command,
    indent: usize,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    match command {
        Command::Display(display) => write_display_command(out, display, indent, transform, settings),
        Command::Loop(group) => {
            writeln!(
                out,
                "{}L,{},{}",
                " ".repeat(indent),
                time_field(group.start_time, settings),
                group.loop_count
            )?;
            for child in &group.commands {
                write_display_command(out, child, indent + 1, transform, settings)?;
            }
            Ok(())
        }
        Command::Trigger(group) => {
            let indent_text = " ".repeat(indent);
            let start = time_field(group.start_time, settings);
            let end = time_field(group.end_time, settings);
            if group.group != 0 {
                writeln!(
                    out,
                    "{indent_text}T,{},{},{},{}",
                    group.trigger_name, start, end, group.group
                )?;
            } else {
                writeln!(out, "{indent_text}T,{},{},{}", group.trigger_name, start, end)?;
            }
            for child in &group.commands {
                write_display_command(out, child, indent + 1, transform, settings)?;
            }
            Ok(())
        }
    }
}

fn write_display_command<W: Write>(
    out: &mut W,
    command: &DisplayCommand,
    indent: usize,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> Result<(), StoryboardError> {
    // A parameter with no flag has no wire encoding; the timelines drop
    // them the same way.
    if matches!(command, DisplayCommand::Parameter(c) if c.start_value == Parameter::None) {
        return Ok(());
    }
    let indent_text = " ".repeat(indent);
    let tag = command.tag();
    let easing = command.easing().index();
    let start_field = time_field(command.start_time(), settings);
    let mut end_field = time_field(command.end_time(), settings);
    // An end time equal to the start is left empty on the wire.
    if end_field == start_field {
        end_field.clear();
    }

    let (start_value, end_value) = command_value_fields(command, transform, settings);
    match end_value {
        Some(end_value) if end_value != start_value => writeln!(
            out,
            "{indent_text}{tag},{easing},{start_field},{end_field},{start_value},{end_value}"
        )?,
        _ => writeln!(
            out,
            "{indent_text}{tag},{easing},{start_field},{end_field},{start_value}"
        )?,
    }
    Ok(())
}

/// Formats a command's value fields with the segment transform applied.
/// Parameters carry no end value; fades and colors are untransformed.
fn command_value_fields(
    command: &DisplayCommand,
    transform: &StoryboardTransform,
    settings: &ExportSettings,
) -> (String, Option<String>) {
    match command {
        DisplayCommand::Move(c) => (
            transform.apply_to_position(c.start_value).to_osb_fields(settings),
            Some(transform.apply_to_position(c.end_value).to_osb_fields(settings)),
        ),
        DisplayCommand::MoveX(c) => (
            transform.apply_to_position_x(c.start_value).to_osb_fields(settings),
            Some(transform.apply_to_position_x(c.end_value).to_osb_fields(settings)),
        ),
        DisplayCommand::MoveY(c) => (
            transform.apply_to_position_y(c.start_value).to_osb_fields(settings),
            Some(transform.apply_to_position_y(c.end_value).to_osb_fields(settings)),
        ),
        DisplayCommand::Scale(c) => (
            transform.apply_to_scale(c.start_value.0).to_osb_fields(settings),
            Some(transform.apply_to_scale(c.end_value.0).to_osb_fields(settings)),
        ),
        DisplayCommand::VectorScale(c) => (
            transform.apply_to_scale_vec(c.start_value).to_osb_fields(settings),
            Some(transform.apply_to_scale_vec(c.end_value).to_osb_fields(settings)),
        ),
        DisplayCommand::Rotate(c) => (
            transform.apply_to_rotation(c.start_value).to_osb_fields(settings),
            Some(transform.apply_to_rotation(c.end_value).to_osb_fields(settings)),
        ),
        DisplayCommand::Fade(c) => (
            c.start_value.to_osb_fields(settings),
            Some(c.end_value.to_osb_fields(settings)),
        ),
        DisplayCommand::Color(c) => (
            c.start_value.to_osb_fields(settings),
            Some(c.end_value.to_osb_fields(settings)),
        ),
        DisplayCommand::Parameter(c) => (c.start_value.to_osb_fields(settings), None),
    }
}

fn time_field(time: f64, settings: &ExportSettings) -> String {
    if settings.use_float_for_time {
        time.to_string()
    } else {
        round_time(time).to_string()
    }
}
