//! Collision tests between the actor, the field, obstacles and pickups
//!
//! All tests are pure geometry. Whether a hit matters (invincibility,
//! absorbed hits) is decided by the tick handler.

use glam::Vec2;

use super::state::{Actor, Obstacle};

/// Which barrier of an obstacle the actor struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Barrier {
    Top,
    Bottom,
}

/// Open-interval overlap of two horizontal spans
#[inline]
pub fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max && a_max > b_min
}

/// Axis-aligned test of the actor against both barriers of an obstacle
///
/// Returns the barrier hit, checking the top one first.
pub fn actor_obstacle_collision(
    actor: &Actor,
    obstacle: &Obstacle,
    field_height: f32,
) -> Option<Barrier> {
    if !spans_overlap(actor.pos.x, actor.right(), obstacle.x, obstacle.right()) {
        return None;
    }
    if actor.pos.y < obstacle.top {
        return Some(Barrier::Top);
    }
    if actor.bottom() > obstacle.bottom_top(field_height) {
        return Some(Barrier::Bottom);
    }
    None
}

/// Whether any part of the actor is outside [0, field_height]
pub fn out_of_bounds(actor: &Actor, field_height: f32) -> bool {
    actor.pos.y < 0.0 || actor.bottom() > field_height
}

/// Push the actor back inside the field (soft wall)
pub fn clamp_to_field(actor: &mut Actor, field_height: f32) {
    if actor.pos.y < 0.0 {
        actor.pos.y = 0.0;
    }
    if actor.bottom() > field_height {
        actor.pos.y = field_height - actor.size.y;
    }
}

/// Collection radius for the actor's current size
#[inline]
pub fn pickup_radius(actor: &Actor, reach: f32) -> f32 {
    actor.size.x + reach
}

/// Center-to-center distance test for pickups
pub fn within_reach(actor: &Actor, point: Vec2, reach: f32) -> bool {
    actor.center().distance(point) < pickup_radius(actor, reach)
}
