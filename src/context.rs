//! Shared per-tick simulation context.
//!
//! Screen bounds, level number, the fixed frame time, the score and player
//! life pool, the player's center (read by aimed shots), and the event sink,
//! gathered in one struct instead of ambient globals.
//! Passed by mutable reference into every update call, which keeps the
//! hive/enemy interactions testable without global setup.

use crate::events::GameEvent;

/// Nominal tick length at 60 Hz.  All internal timers advance by this
/// constant, never by the measured wall-clock delta, so animation speed is
/// decoupled from frame-rate jitter.
pub const FRAME_TIME_MS: f32 = 1000.0 / 60.0;

/// Starting player life pool.
pub const PLAYER_LIFE: i32 = 100;

pub struct SimContext {
    /// Simulation-space width in pixels.
    pub width: f32,
    /// Simulation-space height in pixels.
    pub height: f32,
    /// Current level number, 1-based.
    pub level: u32,
    /// Milliseconds each tick advances every timer by.
    pub frame_time_ms: f32,
    pub score: u32,
    /// Player life pool; only the player side decrements this.
    pub lives: i32,
    /// Player center, refreshed by the driver before the hive updates.
    pub player_center: (f32, f32),
    /// Events emitted during this tick, drained by the owner/frontend.
    pub events: Vec<GameEvent>,
}

impl SimContext {
    pub fn new(width: f32, height: f32, level: u32) -> Self {
        SimContext {
            width,
            height,
            level,
            frame_time_ms: FRAME_TIME_MS,
            score: 0,
            lives: PLAYER_LIFE,
            player_center: (width / 2.0, height - 50.0),
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the tick's remaining events to the frontend and clear the sink.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
