//! Storyboard command timelines and osb export, engine-agnostic.
//!
//! The model builds bottom-up: command values carry interpolation and wire
//! encoding, typed commands interpolate them over a time window, sprites own
//! command lists populated through a builder API, per-channel timelines merge
//! those commands into value-over-time queries, and the writer turns the
//! whole thing into the line-oriented osb text format, splitting oversized
//! sprites into visually identical slices along the way.

pub mod command;
pub mod config;
pub mod easing;
pub mod error;
pub mod fragment;
pub mod group;
pub mod segment;
pub mod sprite;
pub mod timeline;
pub mod value;
pub mod writer;

pub use command::{round_time, Command, DisplayCommand, TypedCommand};
pub use config::ExportSettings;
pub use easing::Easing;
pub use error::StoryboardError;
pub use fragment::{split_sprite_commands, CommandSegment};
pub use group::{LoopCommand, TriggerCommand};
pub use segment::{Element, Segment, StoryboardTransform};
pub use sprite::{Animation, Layer, LoopType, Origin, Sample, Sprite, DEFAULT_POSITION};
pub use timeline::{SpriteTimelines, Timeline};
pub use value::{Color, CommandValue, Parameter, Position, Scale, ScaleFactor};
pub use writer::{write_animation, write_sample, write_segment, write_sprite};
