//! Animation playback.
//!
//! An `Animator` owns one `AnimationCollection` and plays a single animation
//! at a time against a target rectangle it does not own.  Deltas are applied
//! exactly once per time bucket; re-applying while the timer sits inside one
//! bucket would accumulate into runaway drift.

use crate::animation::AnimationCollection;
use crate::geom::Rect;

#[derive(Clone, Debug)]
pub struct Animator {
    pub collection: AnimationCollection,
    timer_ms: f32,
    current: Option<String>,
    looping: bool,
    paused: bool,
    last_bucket: Option<String>,
    last_finished: Option<String>,
    /// Accumulated rotation in degrees.  Axis-aligned rects cannot hold a
    /// rotation, so renderers that care read it from here.
    pub angle: f32,
}

impl Animator {
    pub fn new(collection: AnimationCollection) -> Self {
        Animator {
            collection,
            timer_ms: 0.0,
            current: None,
            looping: false,
            paused: false,
            last_bucket: None,
            last_finished: None,
            angle: 0.0,
        }
    }

    /// Start an animation from its beginning.  An unknown id is recovered
    /// locally: the current animation is cleared and a warning logged, the
    /// frame loop must not be interrupted by a bad lookup.
    pub fn play(&mut self, id: &str, looping: bool) {
        if self.collection.get(id).is_none() {
            log::warn!("animation `{id}` not in collection, stopping playback");
            self.current = None;
            return;
        }
        self.current = Some(id.to_string());
        self.looping = looping;
        self.timer_ms = 0.0;
        self.last_bucket = None;
    }

    pub fn stop(&mut self) {
        self.current = None;
        self.timer_ms = 0.0;
        self.last_bucket = None;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    /// Force the timer to a shared value; used by the hive to phase-lock
    /// every idle member to one global clock.
    pub fn sync_timer(&mut self, timer_ms: f32) {
        self.timer_ms = timer_ms;
    }

    /// Id of the last animation that ran to completion without looping.
    /// Taking it clears the signal.
    pub fn take_finished(&mut self) -> Option<String> {
        self.last_finished.take()
    }

    pub fn last_finished(&self) -> Option<&str> {
        self.last_finished.as_deref()
    }

    /// Advance playback by one tick and apply the active keyframe's delta to
    /// `rect`.
    ///
    /// Order per tick: handle expiry (loop restart or finish), resolve the
    /// bucket for the current timer, apply its delta if the bucket changed
    /// since the last application, then advance the timer by the fixed
    /// nominal frame time.
    pub fn render_animation(&mut self, rect: &mut Rect, frame_time_ms: f32) {
        if self.paused {
            return;
        }

        if let Some(id) = self.current.clone() {
            let expired = self
                .collection
                .get(&id)
                .map_or(true, |anim| self.timer_ms >= anim.duration_ms() as f32);
            if expired {
                if self.looping {
                    self.timer_ms = 0.0;
                    self.last_bucket = None;
                } else {
                    // Entity freezes at its final pose.
                    self.last_finished = Some(id);
                    self.current = None;
                }
            }
        }

        let Some(id) = self.current.as_deref() else {
            return;
        };
        let Some(anim) = self.collection.get(id) else {
            return;
        };

        if let Some((key_frame, bucket_key)) = anim.frame_by_time(self.timer_ms) {
            if self.last_bucket.as_deref() != Some(bucket_key) {
                let t = key_frame.transform;
                let bucket_key = bucket_key.to_string();
                rect.x += t.dx;
                rect.y += t.dy;
                rect.w += t.dw;
                rect.h += t.dh;
                self.angle += t.angle;
                self.last_bucket = Some(bucket_key);
            }
        }

        self.timer_ms += frame_time_ms;
    }
}
