//! Animation authoring format.
//!
//! Animations are authored in a JSON library of named sets.  Each set lists
//! animations as `{name, duration, frame_count, key_frames}` where only the
//! control keyframes are written out; every listed frame becomes a control
//! point and `make_smooth` fills in the ramp frames.  A set may name another
//! set through `common` to pull in that set's animations before its own
//! (its own definitions override inherited ones with the same id).
//!
//! Building a collection for an entity of known size validates every pivot
//! against `[0, w] x [0, h]`; a pivot outside the sprite is an authoring
//! mistake and fails construction.

use serde::Deserialize;

use crate::animation::{Animation, AnimationCollection, AnimationTransform, Curve, KeyFrame};
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CurveDef {
    Linear,
    Smooth,
}

impl From<CurveDef> for Curve {
    fn from(def: CurveDef) -> Curve {
        match def {
            CurveDef::Linear => Curve::Linear,
            CurveDef::Smooth => Curve::Smooth,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct KeyFrameDef {
    /// Index into the animation's `0..=frame_count` keyframe range.
    pub frame: u32,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
    #[serde(default)]
    pub dw: f32,
    #[serde(default)]
    pub dh: f32,
    #[serde(default)]
    pub angle: f32,
    #[serde(default)]
    pub pivot: Option<(f32, f32)>,
    pub curve: CurveDef,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnimationDef {
    pub name: String,
    /// Milliseconds.
    pub duration: u32,
    pub frame_count: u32,
    pub key_frames: Vec<KeyFrameDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnimationSetDef {
    pub name: String,
    /// Optional alias: pull in another set's animations before our own.
    #[serde(default)]
    pub common: Option<String>,
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
}

/// The parsed animation library, one per game.
#[derive(Clone, Debug, Deserialize)]
pub struct AnimationLibrary {
    pub sets: Vec<AnimationSetDef>,
}

impl AnimationLibrary {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The library shipped with the game, embedded so the binary is
    /// self-contained.
    pub fn built_in() -> Result<Self, ConfigError> {
        AnimationLibrary::from_json(include_str!("../data/animations.json"))
    }

    fn set(&self, name: &str) -> Option<&AnimationSetDef> {
        self.sets.iter().find(|s| s.name == name)
    }

    /// Flatten a set's `common` chain into the ordered list of animation
    /// definitions it provides: inherited first, own definitions last, own
    /// ids overriding inherited ones.
    fn resolve(&self, name: &str) -> Result<Vec<&AnimationDef>, ConfigError> {
        let mut chain: Vec<&AnimationSetDef> = Vec::new();
        let mut visited: Vec<&str> = Vec::new();
        let mut cursor = Some(name);
        while let Some(set_name) = cursor {
            if visited.contains(&set_name) {
                return Err(ConfigError::CommonCycle(name.to_string()));
            }
            visited.push(set_name);
            let set = self
                .set(set_name)
                .ok_or_else(|| ConfigError::UnknownSet(set_name.to_string()))?;
            chain.push(set);
            cursor = set.common.as_deref();
        }

        // Ancestors first so more specific definitions shadow inherited
        // ones.  Duplicates inside a single set are left in place for the
        // collection to reject.
        let mut defs: Vec<&AnimationDef> = Vec::new();
        for set in chain.iter().rev() {
            defs.retain(|existing| !set.animations.iter().any(|d| d.name == existing.name));
            defs.extend(set.animations.iter());
        }
        Ok(defs)
    }

    /// Build the animation collection for one entity of size `w` x `h`.
    pub fn build_collection(
        &self,
        set_name: &str,
        w: f32,
        h: f32,
    ) -> Result<AnimationCollection, ConfigError> {
        let mut collection = AnimationCollection::new();
        for def in self.resolve(set_name)? {
            let mut anim = Animation::new(&def.name, def.duration, def.frame_count);
            for kf in &def.key_frames {
                let pivot = kf.pivot.unwrap_or((0.0, 0.0));
                if pivot.0 < 0.0 || pivot.0 > w || pivot.1 < 0.0 || pivot.1 > h {
                    return Err(ConfigError::PivotOutOfBounds {
                        x: pivot.0,
                        y: pivot.1,
                        w,
                        h,
                    });
                }
                anim.set_key_frame(
                    &kf.frame.to_string(),
                    KeyFrame {
                        transform: AnimationTransform {
                            dx: kf.dx,
                            dy: kf.dy,
                            dw: kf.dw,
                            dh: kf.dh,
                            angle: kf.angle,
                            pivot,
                        },
                        curve: kf.curve.into(),
                        control_point: true,
                    },
                );
            }
            anim.make_smooth();
            collection.append(anim)?;
        }
        Ok(collection)
    }
}
