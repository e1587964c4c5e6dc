//! Character abilities
//!
//! Each ability is a descriptor: a duration, optional grace windows, and a
//! pure function from (elapsed, remaining) ticks to the set of effects the
//! tick handler applies. The tick handler never needs to know which ability
//! is running, it only reads the resulting [`AbilityEffects`].

use serde::{Deserialize, Serialize};

use crate::lerp;

/// Slow: scroll speed factor at full strength
pub const SLOW_FACTOR: f32 = 0.5;
/// Slow: ticks to ease in and out
pub const SLOW_RAMP_TICKS: u32 = 30;

/// Dash: length of the opening burst
pub const DASH_BURST_TICKS: u32 = 30;
/// Dash: flat speed added during the burst
pub const DASH_SPEED_BONUS: f32 = 6.0;
/// Dash: invincibility granted when the burst ends
pub const DASH_GRACE_TICKS: u32 = 60;
pub const DASH_GAP_MULTIPLIER: f32 = 1.5;
pub const DASH_SPACING_MULTIPLIER: f32 = 1.3;

/// Shrink: size factor at full strength
pub const SHRINK_SCALE: f32 = 0.5;
/// Shrink: ticks to shrink and to grow back
pub const SHRINK_RAMP_TICKS: u32 = 30;
pub const SHRINK_PICKUP_MULTIPLIER: f32 = 1.5;

/// Magnet: fraction of the distance to the actor each pickup covers per tick
pub const MAGNET_PULL: f32 = 0.1;
/// Magnet: invincibility granted on activation
pub const MAGNET_GRACE_TICKS: u32 = 60;

/// Special ability variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Full invincibility for the duration
    Shield,
    /// Everything scrolls slower
    Slow,
    /// Hovering speed burst, then a grace window
    Dash,
    /// Actor shrinks to half size and back
    Shrink,
    /// Pickups are drawn to the actor
    Magnet,
    /// Swallows the next obstacle hit
    AbsorbOnce,
}

/// Modifiers applied while an ability is running
///
/// The default value is the neutral baseline every deactivation returns to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityEffects {
    /// Obstacle collisions and bounds exits are ignored
    pub invincible: bool,
    /// Multiplies obstacle and pickup scroll speed
    pub speed_multiplier: f32,
    /// Added to scroll speed after the multiplier
    pub speed_bonus: f32,
    /// Widens newly spawned gaps
    pub gap_multiplier: f32,
    /// Widens the distance between newly spawned obstacles
    pub spacing_multiplier: f32,
    /// Multiplies the per-tick pickup spawn chance
    pub pickup_chance_multiplier: f32,
    /// Actor size relative to its base size
    pub size_scale: f32,
    /// Vertical velocity held at zero
    pub hover: bool,
    /// Fraction of the distance each pickup moves toward the actor per tick
    pub magnet_pull: f32,
    /// The next obstacle hit is absorbed instead of ending the run
    pub absorbs_hit: bool,
}

impl AbilityEffects {
    pub const BASELINE: Self = Self {
        invincible: false,
        speed_multiplier: 1.0,
        speed_bonus: 0.0,
        gap_multiplier: 1.0,
        spacing_multiplier: 1.0,
        pickup_chance_multiplier: 1.0,
        size_scale: 1.0,
        hover: false,
        magnet_pull: 0.0,
        absorbs_hit: false,
    };
}

impl Default for AbilityEffects {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Strength of a ramped effect: rises from 0 to 1 over the first `window`
/// ticks, holds, and falls back to 0 over the last `window` ticks.
pub fn envelope(elapsed: u32, remaining: u32, window: u32) -> f32 {
    if window == 0 {
        return 1.0;
    }
    (elapsed.min(remaining) as f32 / window as f32).min(1.0)
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Shield,
        Ability::Slow,
        Ability::Dash,
        Ability::Shrink,
        Ability::Magnet,
        Ability::AbsorbOnce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::Shield => "Shield",
            Ability::Slow => "Slow",
            Ability::Dash => "Dash",
            Ability::Shrink => "Shrink",
            Ability::Magnet => "Magnet",
            Ability::AbsorbOnce => "Absorb",
        }
    }

    /// Total run time in ticks
    pub fn duration_ticks(&self) -> u32 {
        match self {
            Ability::Shield => 5 * 60,
            Ability::Slow => 7 * 60,
            Ability::Dash => 6 * 60,
            Ability::Shrink => 10 * 60,
            Ability::Magnet => 5 * 60,
            Ability::AbsorbOnce => 10 * 60,
        }
    }

    /// Global invincibility granted the moment the ability fires
    pub fn activation_grace_ticks(&self) -> u32 {
        match self {
            Ability::Magnet => MAGNET_GRACE_TICKS,
            _ => 0,
        }
    }

    /// Global invincibility granted on a specific tick of the run
    pub fn grace_at(&self, elapsed: u32) -> Option<u32> {
        match self {
            Ability::Dash if elapsed == DASH_BURST_TICKS => Some(DASH_GRACE_TICKS),
            _ => None,
        }
    }

    /// Effects for a given point in the run
    pub fn effects(&self, elapsed: u32, remaining: u32) -> AbilityEffects {
        let base = AbilityEffects::BASELINE;
        match self {
            Ability::Shield => AbilityEffects {
                invincible: true,
                ..base
            },
            Ability::Slow => {
                let strength = envelope(elapsed, remaining, SLOW_RAMP_TICKS);
                AbilityEffects {
                    speed_multiplier: lerp(1.0, SLOW_FACTOR, strength),
                    ..base
                }
            }
            Ability::Dash => {
                let bursting = elapsed < DASH_BURST_TICKS;
                AbilityEffects {
                    invincible: bursting,
                    hover: bursting,
                    speed_bonus: if bursting { DASH_SPEED_BONUS } else { 0.0 },
                    gap_multiplier: DASH_GAP_MULTIPLIER,
                    spacing_multiplier: DASH_SPACING_MULTIPLIER,
                    ..base
                }
            }
            Ability::Shrink => {
                let strength = envelope(elapsed, remaining, SHRINK_RAMP_TICKS);
                AbilityEffects {
                    size_scale: lerp(1.0, SHRINK_SCALE, strength),
                    pickup_chance_multiplier: SHRINK_PICKUP_MULTIPLIER,
                    ..base
                }
            }
            Ability::Magnet => AbilityEffects {
                magnet_pull: MAGNET_PULL,
                ..base
            },
            Ability::AbsorbOnce => AbilityEffects {
                absorbs_hit: true,
                ..base
            },
        }
    }
}

/// Runtime state of the selected character's ability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityState {
    pub ability: Ability,
    pub active: bool,
    /// Ticks left in the current run
    pub remaining: u32,
    /// Length of the current run, set on activation
    pub total: u32,
    /// Set when the last run ended by swallowing a hit
    pub absorbed: bool,
    /// Effects applied on the current tick
    pub effects: AbilityEffects,
}

impl AbilityState {
    /// Inert state for a freshly spawned actor
    pub fn new(ability: Ability) -> Self {
        Self {
            ability,
            active: false,
            remaining: 0,
            total: 0,
            absorbed: false,
            effects: AbilityEffects::BASELINE,
        }
    }

    /// Ticks since activation
    pub fn elapsed(&self) -> u32 {
        self.total.saturating_sub(self.remaining)
    }

    /// Fraction of the run still to go (0 when inert)
    pub fn remaining_ratio(&self) -> f32 {
        if !self.active || self.total == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.total as f32
    }

    /// Start a run; the caller checks the meter
    pub fn activate(&mut self) {
        let duration = self.ability.duration_ticks();
        self.active = true;
        self.remaining = duration;
        self.total = duration;
        self.absorbed = false;
        self.effects = self.ability.effects(0, duration);
    }

    /// Count one tick down; returns false once the run is over
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return false;
        }
        self.effects = self.ability.effects(self.elapsed(), self.remaining);
        true
    }

    /// Stop the run and drop every modifier
    pub fn deactivate(&mut self) {
        self.active = false;
        self.remaining = 0;
        self.effects = AbilityEffects::BASELINE;
    }
}
