//! Keyframe animation data model.
//!
//! An `Animation` is a named, fixed-duration sequence of keyframes bucketed
//! over time: the duration is sliced into `frame_count` equal half-open
//! intervals and each interval resolves to one keyframe.  Keyframes carry
//! transform *deltas*, not absolute poses; the animator applies each bucket's
//! delta exactly once as the timer passes through it.
//!
//! Authors only set a handful of control keyframes; `make_smooth` spreads a
//! smooth control point's delta evenly over the in-between frames leading up
//! to it so motion ramps instead of snapping.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Interpolation style of a control point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curve {
    /// The delta lands all at once in the control point's own bucket.
    Linear,
    /// The delta is redistributed over the fill frames before the control
    /// point by `make_smooth`.
    Smooth,
}

/// A flat delta applied to an entity's rectangle when a bucket is entered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationTransform {
    pub dx: f32,
    pub dy: f32,
    pub dw: f32,
    pub dh: f32,
    /// Rotation delta in degrees, accumulated by the animator.
    pub angle: f32,
    /// Rotation pivot, relative to the sprite's top-left corner.  Never
    /// redistributed by smoothing.
    pub pivot: (f32, f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyFrame {
    pub transform: AnimationTransform,
    pub curve: Curve,
    /// True for frames explicitly authored in animation data, false for
    /// frames synthesized as defaults or filled in by smoothing.
    pub control_point: bool,
}

impl Default for KeyFrame {
    fn default() -> Self {
        KeyFrame {
            transform: AnimationTransform::default(),
            curve: Curve::Linear,
            control_point: false,
        }
    }
}

/// One half-open time slice `[start_ms, end_ms)` mapped to a keyframe key.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBucket {
    pub key: String,
    pub start_ms: u32,
    pub end_ms: u32,
}

/// A named, fixed-duration keyframe sequence.
///
/// Invariants after construction (for `duration_ms > 0` and
/// `frame_count > 0`): the keyframe map holds exactly `frame_count + 1`
/// entries keyed `"0"..="frame_count"`, and the buckets partition
/// `[0, duration_ms)` into `frame_count` equal-width contiguous intervals.
/// The bucket width is `round(duration_ms / frame_count)`, so the last
/// bucket's end may fall short of `duration_ms`; that rounding shortfall is
/// deliberate and `frame_by_time` papers over it with a last-bucket
/// fallback.
#[derive(Clone, Debug)]
pub struct Animation {
    id: String,
    duration_ms: u32,
    frame_count: u32,
    key_frames: HashMap<String, KeyFrame>,
    buckets: Vec<FrameBucket>,
}

impl Animation {
    /// Ids are normalized to lowercase with spaces replaced by underscores.
    pub fn new(id: &str, duration_ms: u32, frame_count: u32) -> Self {
        let mut anim = Animation {
            id: id.to_lowercase().replace(' ', "_"),
            duration_ms,
            frame_count,
            key_frames: HashMap::new(),
            buckets: Vec::new(),
        };
        anim.map_frames();
        anim.build_key_frames();
        anim
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn buckets(&self) -> &[FrameBucket] {
        &self.buckets
    }

    pub fn key_frame_len(&self) -> usize {
        self.key_frames.len()
    }

    /// Re-derive buckets for a new duration.  Authored keyframes keep their
    /// indices; only the time slices move.
    pub fn set_duration(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms;
        self.map_frames();
        self.build_key_frames();
    }

    /// Re-slice the animation into a new frame count.  Existing keyframes
    /// whose index still fits are preserved, missing indices get defaults,
    /// and indices beyond the new count are dropped.
    pub fn set_frame_count(&mut self, frame_count: u32) {
        self.frame_count = frame_count;
        self.map_frames();
        self.build_key_frames();
    }

    fn degenerate(&self) -> bool {
        self.frame_count == 0 || self.duration_ms == 0
    }

    fn map_frames(&mut self) {
        self.buckets.clear();
        if self.degenerate() {
            return;
        }
        let segment = (self.duration_ms as f32 / self.frame_count as f32).round() as u32;
        for index in 0..self.frame_count {
            self.buckets.push(FrameBucket {
                key: index.to_string(),
                start_ms: segment * index,
                end_ms: segment * (index + 1),
            });
        }
    }

    fn build_key_frames(&mut self) {
        if self.degenerate() {
            self.key_frames.clear();
            return;
        }
        for index in 0..=self.frame_count {
            self.key_frames
                .entry(index.to_string())
                .or_insert_with(KeyFrame::default);
        }
        let count = self.frame_count;
        self.key_frames
            .retain(|key, _| key.parse::<u32>().map_or(false, |i| i <= count));
    }

    pub fn set_key_frame(&mut self, key: &str, key_frame: KeyFrame) {
        self.key_frames.insert(key.to_string(), key_frame);
    }

    pub fn key_frame(&self, key: &str) -> Option<&KeyFrame> {
        self.key_frames.get(key)
    }

    /// Resolve the keyframe whose bucket contains `timer_ms`.
    ///
    /// A timer at or beyond the last bucket's end (the rounding shortfall
    /// zone, or the exact duration boundary) falls back to the **last**
    /// bucket rather than erroring; a real-time loop must never flicker on a
    /// boundary tick.  Returns `None` only for a degenerate animation.
    pub fn frame_by_time(&self, timer_ms: f32) -> Option<(&KeyFrame, &str)> {
        let last = self.buckets.last()?;
        let bucket = self
            .buckets
            .iter()
            .find(|b| timer_ms >= b.start_ms as f32 && timer_ms < b.end_ms as f32)
            .unwrap_or(last);
        self.key_frames
            .get(&bucket.key)
            .map(|kf| (kf, bucket.key.as_str()))
    }

    /// Redistribute smooth control-point deltas over the fill frames that
    /// lead up to them.
    ///
    /// Walks the indices in descending order.  A `Smooth` control point
    /// becomes the carrier for every non-control frame below it (down to
    /// the next control point): each delta field, pivot excluded, is
    /// divided evenly across those fill frames and the carrier's own delta
    /// is zeroed, so an authored jump turns into a ramp through the frames
    /// before it.  `Linear` control points keep their delta and
    /// redistribute nothing.
    pub fn make_smooth(&mut self) {
        let mut carrier: Option<String> = None;
        let mut pending: Vec<String> = Vec::new();
        for index in (0..=self.frame_count).rev() {
            let key = index.to_string();
            let Some(frame) = self.key_frames.get(&key) else {
                continue;
            };
            let (control_point, curve) = (frame.control_point, frame.curve);
            if !control_point {
                if carrier.is_some() {
                    pending.push(key);
                }
                continue;
            }
            self.flush_carrier(&mut carrier, &mut pending);
            if curve == Curve::Smooth {
                carrier = Some(key);
            }
        }
        self.flush_carrier(&mut carrier, &mut pending);
    }

    fn flush_carrier(&mut self, carrier: &mut Option<String>, pending: &mut Vec<String>) {
        let Some(carrier_key) = carrier.take() else {
            pending.clear();
            return;
        };
        if pending.is_empty() {
            return;
        }
        let share = pending.len() as f32;
        let source = self.key_frames[&carrier_key].transform;
        let fraction = AnimationTransform {
            dx: source.dx / share,
            dy: source.dy / share,
            dw: source.dw / share,
            dh: source.dh / share,
            angle: source.angle / share,
            pivot: (0.0, 0.0),
        };
        for fill_key in pending.drain(..) {
            if let Some(fill) = self.key_frames.get_mut(&fill_key) {
                fill.transform = fraction;
                fill.curve = Curve::Smooth;
            }
        }
        if let Some(control) = self.key_frames.get_mut(&carrier_key) {
            let pivot = control.transform.pivot;
            control.transform = AnimationTransform {
                pivot,
                ..AnimationTransform::default()
            };
        }
    }
}

/// An ordered set of animations with unique ids, owned by one animator.
#[derive(Clone, Debug, Default)]
pub struct AnimationCollection {
    animations: Vec<Animation>,
}

impl AnimationCollection {
    pub fn new() -> Self {
        AnimationCollection::default()
    }

    /// Appending a duplicate id is an authoring mistake and fails.
    pub fn append(&mut self, animation: Animation) -> Result<(), ConfigError> {
        if self.get(animation.id()).is_some() {
            return Err(ConfigError::DuplicateAnimation(animation.id().to_string()));
        }
        self.animations.push(animation);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Animation> {
        self.animations.iter_mut().find(|a| a.id() == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Animation> {
        let index = self.animations.iter().position(|a| a.id() == id)?;
        Some(self.animations.remove(index))
    }

    /// Insertion-order iteration, deterministic for tests.
    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.iter()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}
