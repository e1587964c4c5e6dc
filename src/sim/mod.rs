//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Entities kept in spawn order
//! - No rendering, audio or platform dependencies

pub mod ability;
pub mod collision;
mod input;
pub mod state;
pub mod tick;

pub use ability::{Ability, AbilityEffects, AbilityState};
pub use collision::{Barrier, actor_obstacle_collision, out_of_bounds, within_reach};
pub use state::{
    Actor, Character, GameEvent, GamePhase, Obstacle, Pickup, PickupKind, Session,
};
pub use tick::{TickInput, autopilot, tick};
