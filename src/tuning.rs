//! Data-driven game balance
//!
//! Every gameplay constant that a designer might want to tweak lives here.
//! A tuning file only needs to name the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::persistence::PersistError;

/// Energy and score granted by one pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupValue {
    pub energy: u8,
    pub score: u64,
}

/// Balance table for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Actor ===
    pub actor_spawn_x: f32,
    pub actor_spawn_y: f32,
    pub actor_size: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Velocity assigned on jump (negative is up)
    pub jump_impulse: f32,

    // === Scroll speed ===
    pub base_speed: f32,
    pub speed_per_level: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub base_gap: f32,
    pub gap_shrink_per_level: f32,
    pub min_gap: f32,
    /// Minimum barrier height at the very top and bottom of the field
    pub gap_margin: f32,
    pub base_spacing: f32,
    pub spacing_shrink_per_level: f32,
    pub min_spacing: f32,
    /// How far past the left edge the trailing edge travels before removal
    pub obstacle_despawn_margin: f32,

    // === Pickups ===
    /// Per-tick spawn probability
    pub pickup_spawn_chance: f32,
    pub max_pickups: usize,
    /// Share of spawns that are gems
    pub gem_chance: f32,
    /// Spawn x is `field_width + pickup_spawn_offset`
    pub pickup_spawn_offset: f32,
    pub pickup_min_y: f32,
    pub pickup_y_range: f32,
    /// Horizontal clearance kept from every obstacle at spawn
    pub pickup_clearance: f32,
    /// Pickups left of this x are dropped
    pub pickup_despawn_x: f32,
    /// Collection radius is `actor width + pickup_reach`
    pub pickup_reach: f32,
    pub star: PickupValue,
    pub gem: PickupValue,

    // === Scoring ===
    pub points_per_level: u64,
    /// Invincibility granted after an absorbed hit
    pub grace_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            actor_spawn_x: 80.0,
            actor_spawn_y: 300.0,
            actor_size: 45.0,
            gravity: 0.5,
            jump_impulse: -8.0,

            base_speed: 3.0,
            speed_per_level: 0.5,

            obstacle_width: 60.0,
            base_gap: 180.0,
            gap_shrink_per_level: 10.0,
            min_gap: 100.0,
            gap_margin: 75.0,
            base_spacing: 400.0,
            spacing_shrink_per_level: 20.0,
            min_spacing: 260.0,
            obstacle_despawn_margin: 20.0,

            pickup_spawn_chance: 0.01,
            max_pickups: 3,
            gem_chance: 0.1,
            pickup_spawn_offset: 50.0,
            pickup_min_y: 150.0,
            pickup_y_range: 300.0,
            pickup_clearance: 30.0,
            pickup_despawn_x: -50.0,
            pickup_reach: 10.0,
            star: PickupValue {
                energy: 10,
                score: 2,
            },
            gem: PickupValue {
                energy: 25,
                score: 5,
            },

            points_per_level: 10,
            grace_ticks: 60,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a tuning file from disk
    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Level reached at a given score (1-based)
    pub fn level_for_score(&self, score: u64) -> u32 {
        (score / self.points_per_level.max(1)) as u32 + 1
    }

    /// Base scroll speed at a level, before ability modifiers
    pub fn speed_for_level(&self, level: u32) -> f32 {
        self.base_speed + level as f32 * self.speed_per_level
    }

    /// Obstacle gap at a level, never below `min_gap`
    pub fn gap_for_level(&self, level: u32) -> f32 {
        (self.base_gap - level as f32 * self.gap_shrink_per_level).max(self.min_gap)
    }

    /// Horizontal distance between obstacle spawns, never below `min_spacing`
    pub fn spacing_for_level(&self, level: u32) -> f32 {
        let shrink = level.saturating_sub(1) as f32 * self.spacing_shrink_per_level;
        (self.base_spacing - shrink).max(self.min_spacing)
    }

    /// Largest gap that still leaves both margins inside the field
    pub fn max_gap(&self) -> f32 {
        (self.field_height - 2.0 * self.gap_margin).max(self.min_gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_score() {
        let t = Tuning::default();
        assert_eq!(t.level_for_score(0), 1);
        assert_eq!(t.level_for_score(9), 1);
        assert_eq!(t.level_for_score(10), 2);
        assert_eq!(t.level_for_score(37), 4);
    }

    #[test]
    fn test_gap_has_floor() {
        let t = Tuning::default();
        assert_eq!(t.gap_for_level(1), 170.0);
        assert_eq!(t.gap_for_level(8), 100.0);
        assert_eq!(t.gap_for_level(50), t.min_gap);
    }

    #[test]
    fn test_spacing_shrinks_to_floor() {
        let t = Tuning::default();
        assert_eq!(t.spacing_for_level(1), 400.0);
        assert!(t.spacing_for_level(2) < t.spacing_for_level(1));
        assert_eq!(t.spacing_for_level(100), t.min_spacing);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "gravity": 0.25, "max_pickups": 5 }"#).unwrap();
        assert_eq!(t.gravity, 0.25);
        assert_eq!(t.max_pickups, 5);
        assert_eq!(t.jump_impulse, Tuning::default().jump_impulse);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ gravity"),
            Err(PersistError::Json(_))
        ));
    }
}
