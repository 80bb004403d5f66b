//! Canned storyboard scenes and their expected osb renderings.
//!
//! Scenes are built programmatically so tests can inspect them at any
//! level; the `data` directory carries the writer output they are expected
//! to produce, listed by name in `manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/manifest.json"))
        .expect("fixture manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    osb: HashMap<String, String>,
}

fn data_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub mod expected {
    use super::*;

    /// The checked-in writer output for the named scene.
    pub fn osb(name: &str) -> Result<String> {
        let file = MANIFEST
            .osb
            .get(name)
            .ok_or_else(|| anyhow!("no expected osb named {name:?}"))?;
        let path = data_root().join(file);
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }
}

pub mod scenes {
    //! Builders for the scenes the expected files were rendered from.

    use kiai_storyboard_core::{
        Animation, Easing, LoopType, Origin, Position, Segment, Sprite,
    };

    /// One fade over a second with an instant move every hundred
    /// milliseconds, splitting at one command per output sprite.
    pub fn split_fade_moves() -> Sprite {
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

    /// A sprite held at half scale, flashing three times from one second in.
    pub fn flash_loop() -> Sprite {
        let mut sprite = Sprite::new("sb/flash.png");
        sprite.scale(Easing::None, 0.0, 0.0, 0.5, 0.5);
        sprite.start_loop_group(1000.0, 3);
        sprite.fade(Easing::None, 0.0, 150.0, 0.0, 1.0);
        sprite.fade(Easing::None, 150.0, 300.0, 1.0, 0.0);
        sprite.end_group();
        sprite
    }

    /// A hidden sprite that pops whenever a hit sound plays in the first
    /// minute. Triggers keep the sprite whole no matter the threshold.
    pub fn hit_burst_trigger() -> Sprite {
        let mut sprite = Sprite::new("sb/hit.png");
        sprite.command_split_threshold = 1;
        sprite.fade(Easing::None, 0.0, 0.0, 0.0, 0.0);
        sprite.start_trigger_group("HitSound", 0.0, 60_000.0, 0);
        sprite.fade(Easing::Out, 0.0, 400.0, 1.0, 0.0);
        sprite.scale(Easing::Out, 0.0, 400.0, 1.2, 0.8);
        sprite.end_group();
        sprite
    }

    /// A three-frame play-once animation whose commands outlive its frames,
    /// so later slices degrade to sprites showing the final frame.
    pub fn burst_animation() -> Animation {
        let mut animation = Animation::new(
            "sb/fx/burst.png",
            3,
            100.0,
            LoopType::LoopOnce,
            Origin::Centre,
            Position::new(320.0, 240.0),
        );
        animation.command_split_threshold = 2;
        animation.fade(Easing::None, 0.0, 1200.0, 1.0, 0.0);
        for step in 0..6 {
            let time = f64::from(step) * 200.0;
            let angle = f64::from(step) / 10.0;
            animation.rotate(Easing::None, time, time, angle, angle);
        }
        animation
    }

    /// A scene root holding a background fade, a scaled lane of notes and a
    /// clap sample.
    pub fn full_scene() -> Segment {
        let mut scene = Segment::new();
        let background = scene.create_sprite("bg.jpg", Origin::Centre, Position::new(320.0, 240.0));
        background.fade(Easing::None, 0.0, 2000.0, 0.0, 1.0);

        let lane = scene.named_segment("lane");
        lane.position = Position::new(100.0, 50.0);
        lane.scale = 2.0;
        let dot = lane.create_sprite("sb/dot.png", Origin::Centre, Position::new(10.0, 20.0));
        dot.move_to(
            Easing::None,
            0.0,
            500.0,
            Position::new(10.0, 20.0),
            Position::new(30.0, 20.0),
        );
        dot.scale(Easing::None, 0.0, 0.0, 1.0, 1.0);

        scene.create_sample("sfx/clap.wav", 500.0, 80.0);
        scene
    }

    /// A long fade peppered with instant moves, sized for the splitter
    /// benchmarks.
    pub fn dense_sprite(move_count: u32) -> Sprite {
        let mut sprite = Sprite::new("sb/noise.png");
        sprite.command_split_threshold = 20;
        let end = f64::from(move_count) * 10.0;
        sprite.fade(Easing::None, 0.0, end, 0.0, 1.0);
        for step in 0..move_count {
            let time = f64::from(step) * 10.0;
            let position = Position::new(f64::from(step % 640), f64::from(step % 480));
            sprite.move_to(Easing::None, time, time, position, position);
        }
        sprite
    }
}
