use kiai_storyboard_core::{
    write_segment, write_sprite, Easing, ExportSettings, Layer, Parameter, Position, Sprite,
    StoryboardTransform,
};
use kiai_test_fixtures::{expected, scenes};

fn render_sprite(sprite: &Sprite, settings: &ExportSettings) -> String {
    let mut out = String::new();
    write_sprite(
        &mut out,
        sprite,
        Layer::Foreground,
        &StoryboardTransform::identity(),
        settings,
    )
    .expect("write");
    out
}

/// it should render a split sprite as repeated headers with pins
#[test]
fn split_sprite_matches_expected_output() {
    let out = render_sprite(&scenes::split_fade_moves(), &ExportSettings::default());
    assert_eq!(out, expected::osb("split_fade_moves").expect("fixture"));
}

/// it should render loop groups with nested indentation
#[test]
fn loop_group_matches_expected_output() {
    let out = render_sprite(&scenes::flash_loop(), &ExportSettings::default());
    assert_eq!(out, expected::osb("flash_loop").expect("fixture"));
}

/// it should render a whole scene with transforms and samples
#[test]
fn scene_matches_expected_output() {
    let mut out = String::new();
    write_segment(
        &mut out,
        &scenes::full_scene(),
        Layer::Background,
        &ExportSettings::default(),
    )
    .expect("write");
    assert_eq!(out, expected::osb("full_scene").expect("fixture"));
}

/// it should leave out end times and values that repeat the start
#[test]
fn redundant_fields_are_omitted() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.fade(Easing::None, 0.0, 1000.0, 0.5, 0.5);
    sprite.move_to(
        Easing::None,
        500.0,
        500.0,
        Position::new(100.0, 200.0),
        Position::new(100.0, 200.0),
    );

    let out = render_sprite(&sprite, &ExportSettings::default());
    assert_eq!(
        out,
        "Sprite,Foreground,Centre,\"sb/dot.png\",0,0\n F,0,0,1000,0.5\n M,0,500,,100,200\n"
    );
}

/// it should skip parameter commands that carry no flag
#[test]
fn flagless_parameters_are_skipped() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.parameter(Easing::None, 0.0, 0.0, Parameter::None);
    sprite.fade(Easing::None, 0.0, 100.0, 0.0, 1.0);

    let out = render_sprite(&sprite, &ExportSettings::default());
    assert_eq!(
        out,
        "Sprite,Foreground,Centre,\"sb/dot.png\",320,240\n F,0,0,100,0,1\n"
    );
}

/// it should write the trigger group number only when it is set
#[test]
fn trigger_group_number_is_conditional() {
    let out = render_sprite(&scenes::hit_burst_trigger(), &ExportSettings::default());
    assert_eq!(
        out,
        "Sprite,Foreground,Centre,\"sb/hit.png\",320,240\n F,0,0,,0\n T,HitSound,0,60000\n  F,1,0,400,1,0\n  S,1,0,400,1.2,0.8\n"
    );

    let mut grouped = Sprite::new("sb/hit.png");
    grouped.start_trigger_group("HitSoundClap", 0.0, 5000.0, 5);
    grouped.fade(Easing::None, 0.0, 200.0, 1.0, 0.0);
    grouped.end_group();
    let out = render_sprite(&grouped, &ExportSettings::default());
    assert_eq!(
        out,
        "Sprite,Foreground,Centre,\"sb/hit.png\",320,240\n T,HitSoundClap,0,5000,5\n  F,0,0,200,1,0\n"
    );
}

/// it should degrade a play-once animation to a sprite after its frames end
#[test]
fn play_once_animation_degrades_to_final_frame() {
    let animation = scenes::burst_animation();
    let mut out = String::new();
    kiai_storyboard_core::write_animation(
        &mut out,
        &animation,
        Layer::Foreground,
        &StoryboardTransform::identity(),
        &ExportSettings::default(),
    )
    .expect("write");

    let animation_headers = out.lines().filter(|l| l.starts_with("Animation,")).count();
    let sprite_headers: Vec<&str> = out.lines().filter(|l| l.starts_with("Sprite,")).collect();
    assert_eq!(animation_headers, 1);
    assert_eq!(sprite_headers.len(), 3);
    for header in sprite_headers {
        assert!(header.contains("\"sb/fx/burst2.png\""), "got {header}");
    }
}

/// it should switch between rounded and floating point fields per settings
#[test]
fn settings_pick_the_number_format() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.fade(Easing::None, 0.5, 1000.25, 0.0, 1.0);
    sprite.move_to(
        Easing::None,
        0.5,
        1000.25,
        Position::new(10.4, 20.6),
        Position::new(30.0, 40.0),
    );

    let floats = ExportSettings {
        use_float_for_time: true,
        use_float_for_move: true,
        optimise_sprites: true,
    };
    assert_eq!(
        render_sprite(&sprite, &floats),
        "Sprite,Foreground,Centre,\"sb/dot.png\",0,0\n F,0,0.5,1000.25,0,1\n M,0,0.5,1000.25,10.4,20.6,30,40\n"
    );

    let rounded = ExportSettings {
        use_float_for_time: false,
        use_float_for_move: false,
        optimise_sprites: true,
    };
    assert_eq!(
        render_sprite(&sprite, &rounded),
        "Sprite,Foreground,Centre,\"sb/dot.png\",0,0\n F,0,1,1000,0,1\n M,0,1,1000,10,21,30,40\n"
    );
}

/// it should report an unclosed group instead of writing half a sprite
#[test]
fn unclosed_group_is_an_error() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.start_loop_group(0.0, 2);
    sprite.fade(Easing::None, 0.0, 100.0, 0.0, 1.0);

    let mut out = String::new();
    let err = write_sprite(
        &mut out,
        &sprite,
        Layer::Foreground,
        &StoryboardTransform::identity(),
        &ExportSettings::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unclosed command group on sprite \"sb/dot.png\""
    );
    assert!(out.is_empty());
}
