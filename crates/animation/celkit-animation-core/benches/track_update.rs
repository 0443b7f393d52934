use celkit_animation_core::{Keyframe, Point, Tick, Track, Transform};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn looping_track(keys: usize) -> Track {
    let step = Tick::PER_SECOND / 24;
    let mut keyframes: Vec<Keyframe> = (0..keys).map(|i| Keyframe::new(step * i as i64)).collect();
    if let Some(second) = keyframes.get_mut(1) {
        *second = second.loop_start();
    }
    if let Some(last) = keyframes.last_mut() {
        *last = last.loop_end();
    }
    let mut track = Track::new(keyframes, Tick::from_whole_seconds(60)).expect("valid track");
    track
        .add_channel("opacity", (0..keys).map(|i| (i % 3) as f64).collect())
        .expect("opacity");
    track
        .add_channel(
            "position",
            (0..keys).map(|i| Point::new(i as f64, (i * i) as f64)).collect(),
        )
        .expect("position");
    track
        .add_channel(
            "transform",
            (0..keys)
                .map(|i| Transform::from_translation(i as f64, 0.0))
                .collect(),
        )
        .expect("transform");
    track
}

fn bench_update(c: &mut Criterion) {
    let mut track = looping_track(16);
    let frame = Tick::PER_SECOND / 24;
    let frames = 60 * 24;
    c.bench_function("track_update_60s_at_24fps", |b| {
        b.iter(|| {
            for f in 0..frames {
                black_box(track.update(black_box(Tick(frame * f))));
            }
        })
    });

    c.bench_function("loop_table_rebuild", |b| {
        b.iter(|| {
            track.rebuild_loop_table();
            black_box(track.loop_table().len())
        })
    });
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
