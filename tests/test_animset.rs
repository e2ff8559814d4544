use hive_invaders::animset::AnimationLibrary;
use hive_invaders::error::ConfigError;

fn tiny_library(json: &str) -> AnimationLibrary {
    AnimationLibrary::from_json(json).unwrap()
}

// ── Parsing ───────────────────────────────────────────────────────────────────

#[test]
fn built_in_library_parses() {
    let library = AnimationLibrary::built_in().unwrap();
    assert!(library.sets.iter().any(|s| s.name == "basic"));
    assert!(library.sets.iter().any(|s| s.name == "shooter"));
    assert!(library.sets.iter().any(|s| s.name == "sniper"));
}

#[test]
fn bad_json_is_a_config_error() {
    let err = AnimationLibrary::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

// ── Building collections ──────────────────────────────────────────────────────

#[test]
fn basic_set_builds_its_animations() {
    let library = AnimationLibrary::built_in().unwrap();
    let collection = library.build_collection("basic", 48.0, 48.0).unwrap();
    for id in ["idle", "zigzag", "kamikaze_left", "kamikaze_right"] {
        assert!(collection.get(id).is_some(), "missing {id}");
    }
}

#[test]
fn common_pulls_in_the_aliased_set() {
    let library = AnimationLibrary::built_in().unwrap();

    // shooter: own jump/attack animations plus everything from basic
    let shooter = library.build_collection("shooter", 48.0, 48.0).unwrap();
    for id in ["idle", "zigzag", "jump_left", "attack_right"] {
        assert!(shooter.get(id).is_some(), "missing {id}");
    }

    // sniper: nothing of its own, just the basic set
    let sniper = library.build_collection("sniper", 48.0, 48.0).unwrap();
    assert!(sniper.get("idle").is_some());
    assert!(sniper.get("jump_left").is_none());
}

#[test]
fn own_definitions_override_inherited_ones() {
    let library = tiny_library(
        r#"{
          "sets": [
            { "name": "parent", "animations": [
                { "name": "idle", "duration": 800, "frame_count": 8, "key_frames": [] }
            ] },
            { "name": "child", "common": "parent", "animations": [
                { "name": "idle", "duration": 400, "frame_count": 4, "key_frames": [] }
            ] }
          ]
        }"#,
    );
    let collection = library.build_collection("child", 48.0, 48.0).unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.get("idle").unwrap().duration_ms(), 400);
}

#[test]
fn smoothing_is_applied_to_built_animations() {
    let library = AnimationLibrary::built_in().unwrap();
    let collection = library.build_collection("basic", 48.0, 48.0).unwrap();
    let idle = collection.get("idle").unwrap();

    // idle's smooth control at frame 4 (dy -9) ramps through fills 1..3
    let fill = idle.key_frame("2").unwrap();
    assert!(!fill.control_point);
    assert!((fill.transform.dy - -3.0).abs() < 1e-4); // -9 / 3 fills
    assert_eq!(idle.key_frame("4").unwrap().transform.dy, 0.0); // zeroed
}

// ── Authoring mistakes ────────────────────────────────────────────────────────

#[test]
fn unknown_set_fails() {
    let library = AnimationLibrary::built_in().unwrap();
    let err = library.build_collection("phantom", 48.0, 48.0).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownSet(name) if name == "phantom"));
}

#[test]
fn common_cycles_fail() {
    let library = tiny_library(
        r#"{
          "sets": [
            { "name": "a", "common": "b" },
            { "name": "b", "common": "a" }
          ]
        }"#,
    );
    let err = library.build_collection("a", 48.0, 48.0).unwrap_err();
    assert!(matches!(err, ConfigError::CommonCycle(_)));
}

#[test]
fn pivot_outside_the_sprite_fails() {
    let library = tiny_library(
        r#"{
          "sets": [
            { "name": "bad", "animations": [
                { "name": "spin", "duration": 500, "frame_count": 5, "key_frames": [
                    { "frame": 2, "angle": 90.0, "pivot": [60.0, 10.0], "curve": "linear" }
                ] }
            ] }
          ]
        }"#,
    );
    let err = library.build_collection("bad", 48.0, 48.0).unwrap_err();
    assert!(matches!(err, ConfigError::PivotOutOfBounds { x, .. } if x == 60.0));
}

#[test]
fn duplicate_animation_names_in_one_set_fail() {
    let library = tiny_library(
        r#"{
          "sets": [
            { "name": "dup", "animations": [
                { "name": "idle", "duration": 500, "frame_count": 5, "key_frames": [] },
                { "name": "idle", "duration": 300, "frame_count": 3, "key_frames": [] }
            ] }
          ]
        }"#,
    );
    let err = library.build_collection("dup", 48.0, 48.0).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateAnimation(_)));
}
