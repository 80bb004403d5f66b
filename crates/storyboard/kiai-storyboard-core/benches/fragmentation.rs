use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kiai_storyboard_core::{
    split_sprite_commands, write_sprite, ExportSettings, Layer, StoryboardTransform,
};
use kiai_test_fixtures::scenes;

const MOVE_COUNT_SAMPLES: &[u32] = &[100, 400, 1600];

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_sprite_commands");
    for &move_count in MOVE_COUNT_SAMPLES {
        let sprite = scenes::dense_sprite(move_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(move_count),
            &sprite,
            |b, sprite| {
                b.iter(|| black_box(split_sprite_commands(sprite)));
            },
        );
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let sprite = scenes::dense_sprite(400);
    let transform = StoryboardTransform::identity();
    let settings = ExportSettings::default();

    c.bench_function("write_split_sprite", |b| {
        b.iter(|| {
            let mut out = String::new();
            write_sprite(&mut out, &sprite, Layer::Foreground, &transform, &settings)
                .expect("write");
            black_box(out);
        });
    });
}

criterion_group!(fragmentation, bench_split, bench_write);
criterion_main!(fragmentation);
