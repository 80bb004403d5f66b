use approx::assert_abs_diff_eq;
use kiai_storyboard_core::{Easing, Position, Sprite};
use kiai_test_fixtures::scenes;

/// it should fall back to channel defaults when nothing drives them
#[test]
fn untouched_channels_report_defaults() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.fade(Easing::None, 500.0, 1000.0, 0.5, 1.0);

    let scale = sprite.scale_at(700.0);
    assert_abs_diff_eq!(scale.x, 1.0);
    assert_abs_diff_eq!(scale.y, 1.0);
    assert_abs_diff_eq!(sprite.rotation_at(700.0), 0.0);
    let color = sprite.color_at(700.0);
    assert_abs_diff_eq!(color.r, 1.0);
    assert_abs_diff_eq!(color.g, 1.0);
    assert_abs_diff_eq!(color.b, 1.0);
    assert!(!sprite.flip_h_at(700.0));
    assert!(!sprite.additive_at(700.0));

    // A continuous channel with commands reaches back to its first start
    // value before the window opens.
    assert_abs_diff_eq!(sprite.opacity_at(0.0), 0.5);
}

/// it should hold continuous values across gaps between commands
#[test]
fn continuous_channels_hold_across_gaps() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.move_to(
        Easing::None,
        0.0,
        100.0,
        Position::new(16.0, 24.0),
        Position::new(32.0, 24.0),
    );
    sprite.move_to(
        Easing::None,
        500.0,
        600.0,
        Position::new(32.0, 24.0),
        Position::new(64.0, 48.0),
    );

    let held = sprite.position_at(300.0);
    assert_abs_diff_eq!(held.x, 32.0);
    assert_abs_diff_eq!(held.y, 24.0);

    let mid = sprite.position_at(550.0);
    assert_abs_diff_eq!(mid.x, 48.0);
    assert_abs_diff_eq!(mid.y, 36.0);
}

/// it should apply parameters forward only
#[test]
fn parameters_apply_forward_only() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.flip_h(100.0, 200.0);
    sprite.additive(300.0, 300.0);

    assert!(!sprite.flip_h_at(99.0));
    assert!(sprite.flip_h_at(100.0));
    assert!(sprite.flip_h_at(200.0));
    // A ranged parameter reverts once its window closes.
    assert!(!sprite.flip_h_at(201.0));

    // An instantaneous parameter holds to the end of time.
    assert!(!sprite.additive_at(299.0));
    assert!(sprite.additive_at(300.0));
    assert!(sprite.additive_at(60_000.0));
}

/// it should unroll loops into absolute channel time
#[test]
fn loops_unroll_once_per_repetition() {
    let sprite = scenes::flash_loop();

    // Repetitions run 1000-1300, 1300-1600 and 1600-1900.
    for repetition in 0..3 {
        let offset = 1000.0 + 300.0 * f64::from(repetition);
        assert_abs_diff_eq!(sprite.opacity_at(offset + 75.0), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(sprite.opacity_at(offset + 150.0), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sprite.opacity_at(offset + 225.0), 0.5, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(sprite.opacity_at(2500.0), 0.0, epsilon = 1e-9);

    let scale = sprite.scale_at(1450.0);
    assert_abs_diff_eq!(scale.x, 0.5);
    assert_abs_diff_eq!(scale.y, 0.5);
}

/// it should leave trigger commands out of the merged channels
#[test]
fn triggers_do_not_reach_the_timelines() {
    let sprite = scenes::hit_burst_trigger();

    // Only the base fade plays unconditionally.
    assert_abs_diff_eq!(sprite.opacity_at(200.0), 0.0);
    let scale = sprite.scale_at(200.0);
    assert_abs_diff_eq!(scale.x, 1.0);
    assert_abs_diff_eq!(scale.y, 1.0);
}

/// it should flag two commands competing over one channel window
#[test]
fn overlapping_commands_are_flagged() {
    let mut overlapping = Sprite::new("sb/dot.png");
    overlapping.fade(Easing::None, 0.0, 1000.0, 0.0, 1.0);
    overlapping.fade(Easing::None, 500.0, 800.0, 1.0, 0.0);
    assert!(overlapping.has_overlapped_commands());

    let mut adjacent = Sprite::new("sb/dot.png");
    adjacent.fade(Easing::None, 0.0, 500.0, 0.0, 1.0);
    adjacent.fade(Easing::None, 500.0, 1000.0, 1.0, 0.0);
    assert!(!adjacent.has_overlapped_commands());

    // Instants inside another command's window count as overlap too.
    let mut instant_inside = Sprite::new("sb/dot.png");
    instant_inside.fade(Easing::None, 0.0, 1000.0, 0.0, 1.0);
    instant_inside.fade(Easing::None, 250.0, 250.0, 0.3, 0.3);
    assert!(instant_inside.has_overlapped_commands());
}

/// it should prefer combined moves and fall back to the axis channels
#[test]
fn axis_moves_fill_in_for_missing_combined_moves() {
    let mut sprite = Sprite::new("sb/dot.png");
    sprite.move_x(Easing::None, 0.0, 100.0, 100.0, 200.0);

    let position = sprite.position_at(50.0);
    assert_abs_diff_eq!(position.x, 150.0);
    assert_abs_diff_eq!(position.y, 240.0);
    assert!(!sprite.has_incompatible_commands());

    sprite.move_to(
        Easing::None,
        0.0,
        100.0,
        Position::new(0.0, 0.0),
        Position::new(10.0, 10.0),
    );
    assert!(sprite.has_incompatible_commands());
}
