//! Simulation events.
//!
//! Instead of wiring callbacks from each enemy back into its owner, every
//! notable transition pushes a `GameEvent` into the per-tick sink; the hive
//! reacts to shot events after the update pass and the frontend drains the
//! rest for sound cues and explosion flashes.

/// Named sound triggers.  Playback is the frontend's problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    /// An enemy left formation and started falling toward the player.
    AttackFall,
    /// A straight enemy shot left the barrel.
    Shot,
    /// A sniper fired an aimed shot.
    AimedShot,
    /// Something blew up.
    Explosion,
}

/// What kind of projectile a `ShotFired` event should spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotKind {
    /// Straight-down bullet from a shooter.
    Straight,
    /// Angle-locked bullet that aims at the player once, on its first tick.
    Aimed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    /// An enemy entered its attack state.
    AttackStarted,
    /// An enemy fell off the bottom and wrapped back above the top.
    AttackEnded,
    /// An enemy glided back onto its formation slot.
    PositionRestored,
    /// An enemy ran out of life; `points` were already added to the score.
    Died { points: u32, x: f32, y: f32 },
    /// An enemy pulled the trigger; the hive turns this into a bullet.
    ShotFired { kind: ShotKind, x: f32, y: f32 },
    /// Sound cue for the frontend.
    Sound(SoundCue),
    /// Spawn a short-lived explosion marker at this position.
    ExplosionAt { x: f32, y: f32 },
}
