//! Sprites, animations and samples, and the builder API that populates them.

use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::command::{Command, DisplayCommand, TypedCommand};
use crate::easing::Easing;
use crate::group::{LoopCommand, TriggerCommand};
use crate::timeline::SpriteTimelines;
use crate::value::{Color, Parameter, Position, Scale, ScaleFactor};

/// Render layers, back to front.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    #[default]
    Background,
    Fail,
    Pass,
    Foreground,
    Overlay,
}

impl Layer {
    pub fn name(self) -> &'static str {
        match self {
            Layer::Background => "Background",
            Layer::Fail => "Fail",
            Layer::Pass => "Pass",
            Layer::Foreground => "Foreground",
            Layer::Overlay => "Overlay",
        }
    }
}

/// Texture anchor a sprite is positioned, rotated and scaled around.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    TopLeft,
    TopCentre,
    TopRight,
    CentreLeft,
    #[default]
    Centre,
    CentreRight,
    BottomLeft,
    BottomCentre,
    BottomRight,
}

impl Origin {
    pub fn name(self) -> &'static str {
        match self {
            Origin::TopLeft => "TopLeft",
            Origin::TopCentre => "TopCentre",
            Origin::TopRight => "TopRight",
            Origin::CentreLeft => "CentreLeft",
            Origin::Centre => "Centre",
            Origin::CentreRight => "CentreRight",
            Origin::BottomLeft => "BottomLeft",
            Origin::BottomCentre => "BottomCentre",
            Origin::BottomRight => "BottomRight",
        }
    }
}

/// How an animation plays through its frames.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopType {
    #[default]
    LoopForever,
    LoopOnce,
}

impl LoopType {
    pub fn name(self) -> &'static str {
        match self {
            LoopType::LoopForever => "LoopForever",
            LoopType::LoopOnce => "LoopOnce",
        }
    }
}

/// The playfield centre, where sprites land when no position is given.
pub const DEFAULT_POSITION: Position = Position { x: 320.0, y: 240.0 };

/// An image with a command set describing how it displays over time.
///
/// Commands are added through the builder methods. Opening a loop or trigger
/// group redirects display commands into that group until
/// [`Sprite::end_group`] closes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub texture_path: String,
    pub origin: Origin,
    initial_position: Position,
    /// Command cost above which export may split this sprite; 0 never splits.
    pub command_split_threshold: usize,
    commands: Vec<Command>,
    #[serde(skip)]
    open_group: Option<OpenGroup>,
    #[serde(skip)]
    bounds: Cell<Option<(f64, f64)>>,
    #[serde(skip)]
    timeline_cache: RefCell<Option<SpriteTimelines>>,
}

#[derive(Debug, Clone)]
enum OpenGroup {
    Loop(LoopCommand),
    Trigger(TriggerCommand),
}

impl Sprite {
    /// A sprite at the playfield centre with no commands.
    pub fn new(texture_path: impl Into<String>) -> Self {
        Self::with_origin(texture_path, Origin::Centre, DEFAULT_POSITION)
    }

    pub fn with_origin(
        texture_path: impl Into<String>,
        origin: Origin,
        initial_position: Position,
    ) -> Self {
        Self {
            texture_path: texture_path.into(),
            origin,
            initial_position,
            command_split_threshold: 0,
            commands: Vec::new(),
            open_group: None,
            bounds: Cell::new(None),
            timeline_cache: RefCell::new(None),
        }
    }

    #[inline]
    pub fn initial_position(&self) -> Position {
        self.initial_position
    }

    /// The fallback the position timelines report when no move command runs.
    pub fn set_initial_position(&mut self, position: Position) {
        self.initial_position = position;
        self.invalidate();
    }

    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[inline]
    pub fn has_open_group(&self) -> bool {
        self.open_group.is_some()
    }

    /// Total output commands, counting each loop or trigger child once.
    pub fn command_cost(&self) -> usize {
        self.commands.iter().map(Command::cost).sum()
    }

    pub fn move_to(
        &mut self,
        easing: Easing,
        start_time: f64,
        end_time: f64,
        start: Position,
        end: Position,
    ) {
        self.push_display(DisplayCommand::Move(TypedCommand::new(
            easing, start_time, end_time, start, end,
        )));
    }

    pub fn move_x(&mut self, easing: Easing, start_time: f64, end_time: f64, start: f64, end: f64) {
        self.push_display(DisplayCommand::MoveX(TypedCommand::new(
            easing, start_time, end_time, start, end,
        )));
    }

    pub fn move_y(&mut self, easing: Easing, start_time: f64, end_time: f64, start: f64, end: f64) {
        self.push_display(DisplayCommand::MoveY(TypedCommand::new(
            easing, start_time, end_time, start, end,
        )));
    }

    /// Scales uniformly; negative inputs stay as authored but blend no lower
    /// than zero.
    pub fn scale(&mut self, easing: Easing, start_time: f64, end_time: f64, start: f64, end: f64) {
        self.push_display(DisplayCommand::Scale(TypedCommand::new(
            easing,
            start_time,
            end_time,
            ScaleFactor(start),
            ScaleFactor(end),
        )));
    }

    /// Scales each axis separately.
    pub fn scale_vec(
        &mut self,
        easing: Easing,
        start_time: f64,
        end_time: f64,
        start: Scale,
        end: Scale,
    ) {
        self.push_display(DisplayCommand::VectorScale(TypedCommand::new(
            easing, start_time, end_time, start, end,
        )));
    }

    /// Rotates around the origin; angles are radians.
    pub fn rotate(&mut self, easing: Easing, start_time: f64, end_time: f64, start: f64, end: f64) {
        self.push_display(DisplayCommand::Rotate(TypedCommand::new(
            easing, start_time, end_time, start, end,
        )));
    }

    pub fn fade(&mut self, easing: Easing, start_time: f64, end_time: f64, start: f64, end: f64) {
        self.push_display(DisplayCommand::Fade(TypedCommand::new(
            easing, start_time, end_time, start, end,
        )));
    }

    pub fn color(
        &mut self,
        easing: Easing,
        start_time: f64,
        end_time: f64,
        start: Color,
        end: Color,
    ) {
        self.push_display(DisplayCommand::Color(TypedCommand::new(
            easing, start_time, end_time, start, end,
        )));
    }

    /// Toggles a render flag over a window; equal times apply it from
    /// `start_time` onward.
    pub fn parameter(&mut self, easing: Easing, start_time: f64, end_time: f64, parameter: Parameter) {
        self.push_display(DisplayCommand::Parameter(TypedCommand::new(
            easing, start_time, end_time, parameter, parameter,
        )));
    }

    pub fn flip_h(&mut self, start_time: f64, end_time: f64) {
        self.parameter(Easing::None, start_time, end_time, Parameter::FlipHorizontal);
    }

    pub fn flip_v(&mut self, start_time: f64, end_time: f64) {
        self.parameter(Easing::None, start_time, end_time, Parameter::FlipVertical);
    }

    pub fn additive(&mut self, start_time: f64, end_time: f64) {
        self.parameter(Easing::None, start_time, end_time, Parameter::AdditiveBlending);
    }

    /// Opens a loop group; display commands added until
    /// [`Sprite::end_group`] repeat `loop_count` times.
    ///
    /// # Panics
    /// Panics when a group is already open.
    pub fn start_loop_group(&mut self, start_time: f64, loop_count: u32) {
        assert!(self.open_group.is_none(), "a command group is already open");
        self.open_group = Some(OpenGroup::Loop(LoopCommand::new(start_time, loop_count)));
    }

    /// Opens a trigger group replaying its commands whenever `trigger_name`
    /// fires within the window.
    ///
    /// # Panics
    /// Panics when a group is already open.
    pub fn start_trigger_group(
        &mut self,
        trigger_name: impl Into<String>,
        start_time: f64,
        end_time: f64,
        group: i32,
    ) {
        assert!(self.open_group.is_none(), "a command group is already open");
        self.open_group = Some(OpenGroup::Trigger(TriggerCommand::new(
            trigger_name,
            start_time,
            end_time,
            group,
        )));
    }

    /// Closes the open group. Loops are normalized so their earliest child
    /// starts at offset zero.
    ///
    /// # Panics
    /// Panics when no group is open.
    pub fn end_group(&mut self) {
        match self.open_group.take() {
            Some(OpenGroup::Loop(mut group)) => {
                group.normalize();
                self.commands.push(Command::Loop(group));
            }
            Some(OpenGroup::Trigger(group)) => {
                self.commands.push(Command::Trigger(group));
            }
            None => panic!("no command group is open"),
        }
        self.invalidate();
    }

    /// Adds a prebuilt command; display commands join the open group when
    /// one is open.
    ///
    /// # Panics
    /// Panics when a loop or trigger entry is added while a group is open.
    pub fn add_command(&mut self, command: Command) {
        match command {
            Command::Display(display) => self.push_display(display),
            other => {
                assert!(self.open_group.is_none(), "a command group is already open");
                self.commands.push(other);
                self.invalidate();
            }
        }
    }

    fn push_display(&mut self, command: DisplayCommand) {
        match &mut self.open_group {
            Some(OpenGroup::Loop(group)) => group.add(command),
            Some(OpenGroup::Trigger(group)) => group.add(command),
            None => self.commands.push(Command::Display(command)),
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.bounds.set(None);
        *self.timeline_cache.get_mut() = None;
    }

    /// Earliest start among commands that play unconditionally.
    pub fn start_time(&self) -> f64 {
        self.bounds().0
    }

    /// Latest end among commands that play unconditionally.
    pub fn end_time(&self) -> f64 {
        self.bounds().1
    }

    fn bounds(&self) -> (f64, f64) {
        if let Some(bounds) = self.bounds.get() {
            return bounds;
        }
        let mut start = f64::MAX;
        let mut end = f64::MIN;
        for command in self.commands.iter().filter(|c| c.is_active()) {
            start = start.min(command.start_time());
            end = end.max(command.end_time());
        }
        if start > end {
            start = 0.0;
            end = 0.0;
        }
        self.bounds.set(Some((start, end)));
        (start, end)
    }

    /// Whether any unconditional command window contains `time`.
    pub fn is_active_at(&self, time: f64) -> bool {
        let (start, end) = self.bounds();
        start <= time && time <= end
    }

    /// Builds this sprite's per-channel timelines from scratch.
    pub fn timelines(&self) -> SpriteTimelines {
        SpriteTimelines::build(&self.commands, self.initial_position)
    }

    fn with_timelines<R>(&self, query: impl FnOnce(&SpriteTimelines) -> R) -> R {
        let mut cache = self.timeline_cache.borrow_mut();
        let timelines = cache
            .get_or_insert_with(|| SpriteTimelines::build(&self.commands, self.initial_position));
        query(timelines)
    }

    /// Position at `time`, preferring combined moves over per-axis ones.
    pub fn position_at(&self, time: f64) -> Position {
        self.with_timelines(|t| {
            if t.position.has_commands() {
                t.position.value_at(time)
            } else {
                Position::new(t.position_x.value_at(time), t.position_y.value_at(time))
            }
        })
    }

    /// Per-axis scale at `time`; a uniform scale applies to both axes.
    pub fn scale_at(&self, time: f64) -> Scale {
        self.with_timelines(|t| {
            if t.scale_vec.has_commands() {
                t.scale_vec.value_at(time)
            } else {
                let factor = t.scale.value_at(time).0;
                Scale::new(factor, factor)
            }
        })
    }

    pub fn rotation_at(&self, time: f64) -> f64 {
        self.with_timelines(|t| t.rotation.value_at(time))
    }

    pub fn opacity_at(&self, time: f64) -> f64 {
        self.with_timelines(|t| t.opacity.value_at(time))
    }

    pub fn color_at(&self, time: f64) -> Color {
        self.with_timelines(|t| t.color.value_at(time))
    }

    pub fn flip_h_at(&self, time: f64) -> bool {
        self.with_timelines(|t| t.flip_h.value_at(time) != Parameter::None)
    }

    pub fn flip_v_at(&self, time: f64) -> bool {
        self.with_timelines(|t| t.flip_v.value_at(time) != Parameter::None)
    }

    pub fn additive_at(&self, time: f64) -> bool {
        self.with_timelines(|t| t.additive.value_at(time) != Parameter::None)
    }

    /// A combined move and a per-axis move drive the position through two
    /// representations at once; their merged value is undefined.
    pub fn has_incompatible_commands(&self) -> bool {
        self.with_timelines(|t| {
            t.position.has_commands()
                && (t.position_x.has_commands() || t.position_y.has_commands())
        })
    }

    pub fn has_overlapped_commands(&self) -> bool {
        self.with_timelines(SpriteTimelines::any_overlap)
    }
}

/// A frame sequence. Dereferences to [`Sprite`] for its command API; the
/// texture path names the first frame with the frame number spliced in
/// before the extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    sprite: Sprite,
    pub frame_count: u32,
    /// Milliseconds each frame stays on screen.
    pub frame_delay: f64,
    pub loop_type: LoopType,
}

impl Animation {
    pub fn new(
        texture_path: impl Into<String>,
        frame_count: u32,
        frame_delay: f64,
        loop_type: LoopType,
        origin: Origin,
        initial_position: Position,
    ) -> Self {
        Self {
            sprite: Sprite::with_origin(texture_path, origin, initial_position),
            frame_count,
            frame_delay,
            loop_type,
        }
    }

    /// When a play-once animation has shown its last frame.
    pub fn animation_end_time(&self) -> f64 {
        self.sprite.start_time() + f64::from(self.frame_count) * self.frame_delay
    }

    /// Frame on screen at `time`.
    pub fn frame_at(&self, time: f64) -> u32 {
        if self.frame_count == 0 || self.frame_delay <= 0.0 {
            return 0;
        }
        let mut frame = (time - self.sprite.start_time()) / self.frame_delay;
        match self.loop_type {
            LoopType::LoopForever => frame %= f64::from(self.frame_count),
            LoopType::LoopOnce => frame = frame.min(f64::from(self.frame_count - 1)),
        }
        frame.max(0.0) as u32
    }

    /// Texture path of the frame on screen at `time`.
    pub fn frame_path_at(&self, time: f64) -> String {
        let frame = self.frame_at(time);
        match self.sprite.texture_path.rfind('.') {
            Some(dot) => format!(
                "{}{}{}",
                &self.sprite.texture_path[..dot],
                frame,
                &self.sprite.texture_path[dot..]
            ),
            None => format!("{}{}", self.sprite.texture_path, frame),
        }
    }
}

impl Deref for Animation {
    type Target = Sprite;

    fn deref(&self) -> &Sprite {
        &self.sprite
    }
}

impl DerefMut for Animation {
    fn deref_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

/// A timed audio playback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub audio_path: String,
    pub time: f64,
    /// Playback volume, 0 to 100.
    pub volume: f64,
}

impl Sample {
    pub fn new(audio_path: impl Into<String>, time: f64, volume: f64) -> Self {
        Self {
            audio_path: audio_path.into(),
            time,
            volume,
        }
    }
}
