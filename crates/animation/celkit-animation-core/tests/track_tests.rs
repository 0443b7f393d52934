use celkit_animation_core::{
    AnimatedValue, AnimationError, Color, Drawing, Interpolation, InterpolationState, Keyframe,
    Line, Material, Point, Stroke, Text, Tick, Track, Transform, Wiggle,
};

fn init_tracing() {
    let default_filter = "celkit_animation_core=debug";
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn even_keyframes(n: usize, spacing: i64) -> Vec<Keyframe> {
    (0..n).map(|i| Keyframe::new(i as i64 * spacing)).collect()
}

fn layer_track() -> Track {
    let mut track = Track::new(even_keyframes(4, 10), Tick(40)).unwrap();
    track.add_channel("opacity", vec![0.0, 0.25, 0.5, 0.75]).unwrap();
    track
        .add_channel(
            "position",
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 5.0),
                Point::new(20.0, 10.0),
                Point::new(30.0, 15.0),
            ],
        )
        .unwrap();
    track
        .add_channel(
            "transform",
            (0..4)
                .map(|i| Transform {
                    rotation: 0.1 * i as f64,
                    ..Transform::from_translation(i as f64, 0.0)
                })
                .collect(),
        )
        .unwrap();
    track
        .add_channel(
            "tint",
            vec![
                Color::rgba(0.0, 0.0, 0.0, 1.0),
                Color::rgba(0.2, 0.1, 0.0, 1.0),
                Color::rgba(0.4, 0.2, 0.0, 1.0),
                Color::rgba(0.6, 0.3, 0.0, 1.0),
            ],
        )
        .unwrap();
    track
        .add_channel("wiggle", vec![Wiggle::NONE; 4])
        .unwrap();
    track
        .add_channel(
            "caption",
            ["one", "two", "three", "four"].map(Text::from).to_vec(),
        )
        .unwrap();
    track
}

#[test]
fn every_channel_sees_the_same_resolution() {
    init_tracing();
    let mut track = layer_track();
    for t in (-5..=45).step_by(3) {
        let resolution = track.update(Tick(t)).unwrap();
        for name in track.channel_names() {
            let stamp = track
                .channel_dyn(name)
                .and_then(|c| c.last_evaluation())
                .unwrap();
            assert_eq!(stamp.entry_index, resolution.entry_index, "channel {name} at {t}");
            assert_eq!(stamp.state, resolution.state(), "channel {name} at {t}");
        }
    }
}

#[test]
fn collinear_keys_follow_straight_lines() {
    let mut track = layer_track();
    for t in [3, 10, 15, 22, 29] {
        let resolution = track.update(Tick(t)).unwrap();
        let want = t as f64 / 40.0;
        approx(*track.value::<f64>("opacity").unwrap(), want, 1e-12);
        let p = track.value::<Point>("position").unwrap();
        approx(p.x, t as f64, 1e-9);
        approx(p.y, t as f64 / 2.0, 1e-9);
        let tr = track.value::<Transform>("transform").unwrap();
        approx(tr.rotation, 0.01 * t as f64, 1e-12);
        approx(track.value::<Color>("tint").unwrap().g, 0.01 * t as f64, 1e-12);
        if t % 10 == 0 {
            assert_eq!(resolution.state(), InterpolationState::Step);
        }
    }
}

#[test]
fn exact_keyframe_times_return_source_values() {
    let mut track = layer_track();
    for (i, t) in [0, 10, 20, 30].into_iter().enumerate() {
        let resolution = track.update(Tick(t)).unwrap();
        assert_eq!(resolution.local_offset, Tick(0));
        assert_eq!(resolution.state(), InterpolationState::Step);
        let keys = track.channel::<Point>("position").unwrap().keys();
        assert_eq!(track.value::<Point>("position"), Some(&keys[i]));
    }
}

#[test]
fn text_holds_until_next_keyframe() {
    let mut track = layer_track();
    track.update(Tick(19));
    assert_eq!(track.value::<Text>("caption"), Some(&Text::from("two")));
    track.update(Tick(20));
    assert_eq!(track.value::<Text>("caption"), Some(&Text::from("three")));
}

#[test]
fn loop_scenario_tiles_the_duration() {
    let keyframes = vec![
        Keyframe::new(0),
        Keyframe::new(10).loop_start(),
        Keyframe::new(20).loop_end(),
    ];
    let mut track = Track::new(keyframes, Tick(45)).unwrap();
    track.add_channel("x", vec![0.0, 1.0, 2.0]).unwrap();
    let times: Vec<i64> = track
        .loop_table()
        .playback_times()
        .into_iter()
        .map(Tick::get)
        .collect();
    assert_eq!(times, vec![0, 10, 20, 30, 40]);

    // Inside a replay every neighbour is the looped key, so the value holds.
    let r = track.update(Tick(25)).unwrap();
    assert_eq!(r.entry_index, 2);
    approx(*track.value::<f64>("x").unwrap(), 1.0, 1e-12);

    // Past the duration the query clamps to the last entry.
    let r = track.update(Tick(1_000)).unwrap();
    assert_eq!(r.time, Tick(45));
    assert_eq!(r.entry_index, 4);
    assert_eq!(r.state(), InterpolationState::Step);
}

#[test]
fn shared_material_id_is_returned_untouched() {
    let base = Material::new(Color::rgba(1.0, 0.0, 0.0, 1.0), Color::BLACK, 2.0);
    let mut same_id = base;
    same_id.line_width = 4.0;
    let other = Material::new(Color::rgba(0.0, 1.0, 0.0, 1.0), Color::BLACK, 8.0);

    let mut track = Track::new(even_keyframes(4, 10), Tick(40)).unwrap();
    track
        .add_channel("material", vec![other, base, same_id, other])
        .unwrap();
    for t in [11, 15, 19] {
        track.update(Tick(t));
        assert_eq!(track.value::<Material>("material"), Some(&base));
    }
    track.update(Tick(5));
    let blended = track.value::<Material>("material").unwrap();
    assert_ne!(blended.id, base.id);
    assert_ne!(blended.id, other.id);
}

#[test]
fn drawing_with_extra_strokes_passes_them_through() {
    let stroke = |x: f64| Stroke {
        line: Line::new(vec![Point::new(x, 0.0), Point::new(x, 1.0)]),
        width: 1.0,
        color: Color::BLACK,
    };
    let keys = vec![
        Drawing::new(vec![stroke(0.0)]),
        Drawing::new(vec![stroke(10.0), stroke(50.0)]),
    ];
    let mut track = Track::new(even_keyframes(2, 10), Tick(10)).unwrap();
    track.add_channel("drawing", keys).unwrap();
    let r = track.update(Tick(5)).unwrap();
    assert_eq!(r.state(), InterpolationState::Linear);
    let drawing = track.value::<Drawing>("drawing").unwrap();
    assert_eq!(drawing.strokes.len(), 2);
    approx(drawing.strokes[0].line.points[0].x, 5.0, 1e-12);
    assert_eq!(drawing.strokes[1], stroke(50.0));
}

#[test]
fn insert_at_index_one_is_all_or_nothing() {
    let mut track = Track::new(even_keyframes(3, 10), Tick(30)).unwrap();
    track.add_channel("a", vec![0.0, 1.0, 2.0]).unwrap();
    track.add_channel("b", vec![Point::ZERO; 3]).unwrap();
    track.add_channel("c", vec![Text::from("t"); 3]).unwrap();

    let rejected = track.insert_keyframe(
        1,
        Keyframe::new(5),
        [
            ("a", AnimatedValue::Scalar(0.5)),
            ("b", AnimatedValue::Scalar(0.5)),
            ("c", Text::from("u").into()),
        ],
    );
    assert!(matches!(
        rejected,
        Err(AnimationError::ValueKindMismatch { .. })
    ));
    assert_eq!(track.len(), 3);
    assert!(track
        .channel_names()
        .all(|n| track.channel_dyn(n).map(|c| c.len()) == Some(3)));

    track
        .insert_keyframe(
            1,
            Keyframe::new(5).with_interpolation(Interpolation::Linear),
            [
                ("a", AnimatedValue::Scalar(0.5)),
                ("b", Point::new(1.0, 1.0).into()),
                ("c", Text::from("u").into()),
            ],
        )
        .unwrap();
    assert_eq!(track.len(), 4);
    assert!(track
        .channel_names()
        .all(|n| track.channel_dyn(n).map(|c| c.len()) == Some(4)));
    assert_eq!(track.loop_table().len(), 4);

    track.update(Tick(5));
    assert_eq!(track.value::<f64>("a"), Some(&0.5));
    assert_eq!(track.value::<Text>("c"), Some(&Text::from("u")));
}

#[test]
fn removed_channel_is_no_longer_evaluated() {
    let mut track = layer_track();
    let removed = track.remove_channel("caption").unwrap();
    assert_eq!(removed.len(), 4);
    assert!(track.value::<Text>("caption").is_none());
    assert!(matches!(
        track.remove_channel("caption"),
        Err(AnimationError::ChannelNotFound { .. })
    ));
    track.update(Tick(12));
    assert_eq!(track.channel_count(), 5);
}
