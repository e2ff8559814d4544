use hive_invaders::animation::{
    Animation, AnimationCollection, AnimationTransform, Curve, KeyFrame,
};
use hive_invaders::error::ConfigError;

fn control(dx: f32, dy: f32, curve: Curve) -> KeyFrame {
    KeyFrame {
        transform: AnimationTransform {
            dx,
            dy,
            ..Default::default()
        },
        curve,
        control_point: true,
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn id_is_normalized() {
    let a = Animation::new("My Fancy Anim", 500, 10);
    assert_eq!(a.id(), "my_fancy_anim");
}

#[test]
fn buckets_partition_duration() {
    let a = Animation::new("a", 500, 10);
    let buckets = a.buckets();
    assert_eq!(buckets.len(), 10);
    assert_eq!(buckets[0].start_ms, 0);
    for pair in buckets.windows(2) {
        assert_eq!(pair[0].end_ms, pair[1].start_ms); // contiguous
    }
    assert_eq!(buckets.last().unwrap().end_ms, 500); // 500 / 10 divides evenly
}

#[test]
fn bucket_rounding_shortfall_is_preserved() {
    // round(1000 / 3) = 333, so the last bucket ends at 999, not 1000
    let a = Animation::new("a", 1000, 3);
    let buckets = a.buckets();
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets.last().unwrap().end_ms, 999);
}

#[test]
fn key_frame_map_is_complete() {
    let a = Animation::new("a", 500, 10);
    assert_eq!(a.key_frame_len(), 11); // frame_count + 1
    assert!(a.key_frame("0").is_some());
    assert!(a.key_frame("10").is_some());
    assert!(a.key_frame("11").is_none());
}

#[test]
fn degenerate_animations_are_empty() {
    let zero_frames = Animation::new("a", 500, 0);
    assert!(zero_frames.buckets().is_empty());
    assert_eq!(zero_frames.key_frame_len(), 0);

    let zero_duration = Animation::new("b", 0, 10);
    assert!(zero_duration.buckets().is_empty());
    assert_eq!(zero_duration.key_frame_len(), 0);
}

// ── Reconfiguration ───────────────────────────────────────────────────────────

#[test]
fn set_duration_rebuckets_and_keeps_deltas() {
    let mut a = Animation::new("a", 500, 10);
    a.set_key_frame("2", control(7.0, 0.0, Curve::Linear));
    a.set_duration(1000);
    assert_eq!(a.buckets()[0].end_ms, 100); // new width: round(1000/10)
    assert_eq!(a.key_frame("2").unwrap().transform.dx, 7.0);
}

#[test]
fn set_frame_count_drops_out_of_range_frames() {
    let mut a = Animation::new("a", 500, 10);
    a.set_key_frame("9", control(3.0, 0.0, Curve::Linear));
    a.set_frame_count(5);
    assert_eq!(a.buckets().len(), 5);
    assert_eq!(a.key_frame_len(), 6); // "0".."5"
    assert!(a.key_frame("9").is_none());
}

// ── Time-bucket lookup ────────────────────────────────────────────────────────

#[test]
fn frame_by_time_resolves_buckets() {
    let a = Animation::new("a", 500, 10);
    let (_, key) = a.frame_by_time(0.0).unwrap();
    assert_eq!(key, "0");
    let (_, key) = a.frame_by_time(49.9).unwrap();
    assert_eq!(key, "0");
    let (_, key) = a.frame_by_time(50.0).unwrap();
    assert_eq!(key, "1"); // buckets are half-open
    let (_, key) = a.frame_by_time(460.0).unwrap();
    assert_eq!(key, "9");
}

#[test]
fn frame_by_time_falls_back_to_last_bucket() {
    let a = Animation::new("a", 500, 10);
    // Exactly on and beyond the duration boundary: never an error,
    // always the last bucket.
    let (_, key) = a.frame_by_time(500.0).unwrap();
    assert_eq!(key, "9");
    let (_, key) = a.frame_by_time(9999.0).unwrap();
    assert_eq!(key, "9");
}

#[test]
fn frame_by_time_covers_the_rounding_gap() {
    let a = Animation::new("a", 1000, 3); // last bucket ends at 999
    let (_, key) = a.frame_by_time(999.5).unwrap();
    assert_eq!(key, "2");
}

#[test]
fn degenerate_frame_by_time_is_none() {
    let a = Animation::new("a", 0, 0);
    assert!(a.frame_by_time(0.0).is_none());
}

// ── Smoothing pass ────────────────────────────────────────────────────────────

#[test]
fn smoothing_redistributes_and_zeroes_the_control_point() {
    let mut a = Animation::new("a", 500, 5);
    a.set_key_frame("0", control(0.0, 0.0, Curve::Linear)); // anchor
    a.set_key_frame("5", control(10.0, 0.0, Curve::Smooth));
    a.make_smooth();

    // Four fill frames between the anchor and the control: 10 / 4 = 2.5
    for key in ["1", "2", "3", "4"] {
        assert_eq!(a.key_frame(key).unwrap().transform.dx, 2.5);
    }
    assert_eq!(a.key_frame("5").unwrap().transform.dx, 0.0);
}

#[test]
fn smoothing_conserves_the_total_delta() {
    let mut a = Animation::new("a", 900, 9);
    a.set_key_frame("0", control(0.0, 0.0, Curve::Linear));
    a.set_key_frame("7", control(10.0, -21.0, Curve::Smooth));
    a.make_smooth();

    let mut dx_sum = 0.0;
    let mut dy_sum = 0.0;
    for i in 1..=6 {
        let t = a.key_frame(&i.to_string()).unwrap().transform;
        dx_sum += t.dx;
        dy_sum += t.dy;
    }
    assert!((dx_sum - 10.0).abs() < 1e-4);
    assert!((dy_sum - -21.0).abs() < 1e-4);
    let control = a.key_frame("7").unwrap().transform;
    assert_eq!((control.dx, control.dy), (0.0, 0.0));
}

#[test]
fn smoothing_without_anchor_fills_down_to_frame_zero() {
    let mut a = Animation::new("a", 500, 5);
    a.set_key_frame("5", control(10.0, 0.0, Curve::Smooth));
    a.make_smooth();
    // Frames 0..4 are all fills: 10 / 5 = 2
    for i in 0..=4 {
        assert_eq!(a.key_frame(&i.to_string()).unwrap().transform.dx, 2.0);
    }
}

#[test]
fn linear_control_points_redistribute_nothing() {
    let mut a = Animation::new("a", 500, 5);
    a.set_key_frame("0", control(0.0, 0.0, Curve::Linear));
    a.set_key_frame("5", control(10.0, 0.0, Curve::Linear));
    a.make_smooth();
    assert_eq!(a.key_frame("5").unwrap().transform.dx, 10.0);
    for key in ["1", "2", "3", "4"] {
        assert_eq!(a.key_frame(key).unwrap().transform.dx, 0.0);
    }
}

#[test]
fn smoothing_excludes_the_pivot() {
    let mut a = Animation::new("a", 500, 5);
    a.set_key_frame("0", control(0.0, 0.0, Curve::Linear));
    let mut kf = control(8.0, 0.0, Curve::Smooth);
    kf.transform.pivot = (24.0, 24.0);
    a.set_key_frame("5", kf);
    a.make_smooth();

    // The control keeps its pivot with a zeroed delta; fills get no pivot.
    let control_after = a.key_frame("5").unwrap().transform;
    assert_eq!(control_after.pivot, (24.0, 24.0));
    assert_eq!(control_after.dx, 0.0);
    assert_eq!(a.key_frame("2").unwrap().transform.pivot, (0.0, 0.0));
}

// ── Collection ────────────────────────────────────────────────────────────────

#[test]
fn collection_rejects_duplicate_ids() {
    let mut c = AnimationCollection::new();
    c.append(Animation::new("idle", 500, 10)).unwrap();
    let err = c.append(Animation::new("idle", 300, 5)).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateAnimation(id) if id == "idle"));
}

#[test]
fn collection_lookup_and_remove() {
    let mut c = AnimationCollection::new();
    c.append(Animation::new("idle", 500, 10)).unwrap();
    c.append(Animation::new("zigzag", 900, 9)).unwrap();
    assert_eq!(c.len(), 2);
    assert!(c.get("idle").is_some());
    assert!(c.get("missing").is_none());

    let removed = c.remove("idle").unwrap();
    assert_eq!(removed.id(), "idle");
    assert!(c.get("idle").is_none());
    assert!(c.remove("idle").is_none());
}

#[test]
fn collection_iterates_in_insertion_order() {
    let mut c = AnimationCollection::new();
    c.append(Animation::new("b", 500, 10)).unwrap();
    c.append(Animation::new("a", 500, 10)).unwrap();
    let ids: Vec<&str> = c.iter().map(|a| a.id()).collect();
    assert_eq!(ids, ["b", "a"]);
}
