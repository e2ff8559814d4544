//! Enemy-side simulation core for a terminal Space Invaders variant.
//!
//! The interesting machinery lives in three places: the keyframe animation
//! engine (`animation` + `animator`), the enemy state machine with its
//! archetypes (`enemy`), and the `HiveMind` scheduler that throttles attacks
//! across the roster (`hive`).  Everything else is the glue a playable game
//! needs: geometry, the level factory, the player side, and the simulation
//! context that replaces ambient globals.

pub mod animation;
pub mod animator;
pub mod animset;
pub mod context;
pub mod enemy;
pub mod error;
pub mod events;
pub mod geom;
pub mod hive;
pub mod level;
pub mod player;
