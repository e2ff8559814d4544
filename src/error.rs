//! Fatal-at-construction errors.
//!
//! Everything here represents an authoring mistake (bad animation data, a
//! malformed level pattern, an empty roster), so the offending component
//! refuses to initialize and the error propagates to the caller.  Runtime
//! lookup misses are never surfaced through this type; those are recovered
//! locally so they cannot interrupt the frame loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("animation id `{0}` already exists, ids must be unique per collection")]
    DuplicateAnimation(String),

    #[error("pivot ({x}, {y}) lies outside the sprite bounds {w}x{h}")]
    PivotOutOfBounds { x: f32, y: f32, w: f32, h: f32 },

    #[error("a hive mind needs at least one enemy in its roster")]
    EmptyRoster,

    #[error("level row {row} has {columns} columns, expected 1 to 8")]
    MalformedLevelRow { row: usize, columns: usize },

    #[error("animation set `{0}` not found in the library")]
    UnknownSet(String),

    #[error("`common` aliases starting at set `{0}` form a cycle")]
    CommonCycle(String),

    #[error("animation library is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
