//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. Order per tick:
//! physics, bounds, ability, speed, obstacles and scoring, pickups and energy.

use rand::Rng;

use super::collision::{actor_obstacle_collision, clamp_to_field, out_of_bounds, within_reach};
use super::state::{Character, GameEvent, GamePhase, Obstacle, Pickup, PickupKind, Session};

/// Input commands queued for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (click/tap/space)
    pub jump: bool,
    /// Fire the character ability
    pub activate_ability: bool,
    /// Character picked in the menu
    pub select_character: Option<Character>,
    /// Start the run without jumping
    pub start: bool,
    /// Retry after game over
    pub reset: bool,
    /// A menu overlay has focus; jumps are dropped
    pub menu_open: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
    /// Wall-clock time (ms), drives the retry cooldown
    pub now_ms: f64,
}

impl TickInput {
    /// Drop one-shot commands after they have been applied
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.activate_ability = false;
        self.select_character = None;
        self.start = false;
        self.reset = false;
    }
}

/// Advance the session by one tick
pub fn tick(state: &mut Session, input: &TickInput) {
    state.events.clear();

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    if let Some(character) = input.select_character {
        state.select_character(character);
    }
    if input.reset {
        state.reset(input.now_ms);
    }
    if input.start {
        state.start();
    }
    if input.jump && !input.menu_open {
        state.jump();
    }
    if input.activate_ability {
        state.activate_ability();
    }

    // Ready and Over are frozen
    if state.phase != GamePhase::Active {
        return;
    }

    state.time_ticks += 1;

    // Physics
    if state.ability.effects.hover {
        state.actor.vel = 0.0;
    } else {
        state.actor.integrate();
    }

    // Bounds
    let field_height = state.tuning.field_height;
    if out_of_bounds(&state.actor, field_height) {
        if state.is_invincible() {
            clamp_to_field(&mut state.actor, field_height);
        } else {
            state.end_run(input.now_ms);
            return;
        }
    }

    step_ability(state);

    let effects = state.ability.effects;
    let speed = state.tuning.speed_for_level(state.level) * effects.speed_multiplier
        + effects.speed_bonus;

    spawn_obstacle(state);
    if !advance_obstacles(state, speed, input.now_ms) {
        return;
    }

    spawn_pickup(state);
    advance_pickups(state, speed);
}

/// Count down the global grace window and the ability, applying its effects
fn step_ability(state: &mut Session) {
    state.invincible_ticks = state.invincible_ticks.saturating_sub(1);

    if !state.ability.active {
        return;
    }
    if !state.ability.advance() {
        state.deactivate_ability();
        return;
    }

    if let Some(grace) = state.ability.ability.grace_at(state.ability.elapsed()) {
        state.grant_invincibility(grace);
    }
    state.actor.set_scale(state.ability.effects.size_scale);
    if state.ability.effects.hover {
        state.actor.vel = 0.0;
    }
}

/// Push a new obstacle at the right edge once a full spacing has scrolled by
pub fn spawn_obstacle(state: &mut Session) {
    let tuning = &state.tuning;
    let effects = state.ability.effects;

    let spacing = tuning.spacing_for_level(state.level) * effects.spacing_multiplier;
    let due = state.scrolled_since_spawn.is_none_or(|d| d > spacing);
    if !due {
        return;
    }

    let gap = (tuning.gap_for_level(state.level) * effects.gap_multiplier).min(tuning.max_gap());
    let span = (tuning.field_height - gap - 2.0 * tuning.gap_margin).max(0.0);
    let top = tuning.gap_margin + state.rng.random::<f32>() * span;
    let bottom = tuning.field_height - top - gap;
    let x = tuning.field_width;
    let width = tuning.obstacle_width;

    state.scrolled_since_spawn = Some(0.0);
    let id = state.next_entity_id();
    log::debug!("Obstacle {} spawned: top {:.1} gap {:.1}", id, top, gap);
    state.obstacles.push(Obstacle {
        id,
        x,
        width,
        top,
        bottom,
        gap,
        passed: false,
    });
}

/// Scroll obstacles, resolve hits and award passes
///
/// Returns false when a hit ended the run.
fn advance_obstacles(state: &mut Session, speed: f32, now_ms: f64) -> bool {
    let field_height = state.tuning.field_height;
    let mut cleared = 0;
    if let Some(scrolled) = state.scrolled_since_spawn.as_mut() {
        *scrolled += speed;
    }

    for i in 0..state.obstacles.len() {
        state.obstacles[i].x -= speed;

        let hit = if state.is_invincible() {
            None
        } else {
            actor_obstacle_collision(&state.actor, &state.obstacles[i], field_height)
        };
        if let Some(barrier) = hit {
            if state.ability.effects.absorbs_hit {
                log::info!("Hit on {:?} barrier absorbed", barrier);
                state.deactivate_ability();
                state.ability.absorbed = true;
                state.grant_invincibility(state.tuning.grace_ticks);
                state.events.push(GameEvent::HitAbsorbed);
            } else {
                log::debug!("Hit {:?} barrier of obstacle {}", barrier, state.obstacles[i].id);
                state.end_run(now_ms);
                return false;
            }
        }

        let obstacle = &mut state.obstacles[i];
        if !obstacle.passed && state.actor.pos.x > obstacle.right() {
            obstacle.passed = true;
            cleared += 1;
        }
    }

    let margin = state.tuning.obstacle_despawn_margin;
    state.obstacles.retain(|o| o.right() >= -margin);

    for _ in 0..cleared {
        state.add_score(1);
        state.events.push(GameEvent::Scored);
    }
    true
}

/// Roll for a new pickup just beyond the right edge
pub fn spawn_pickup(state: &mut Session) {
    let tuning = &state.tuning;
    let chance = tuning.pickup_spawn_chance * state.ability.effects.pickup_chance_multiplier;
    let roll = state.rng.random::<f32>();
    if roll >= chance || state.pickups.len() >= tuning.max_pickups {
        return;
    }

    let x = tuning.field_width + tuning.pickup_spawn_offset;
    let clearance = tuning.pickup_clearance;
    let blocked = state
        .obstacles
        .iter()
        .any(|o| x > o.x - clearance && x < o.right() + clearance);
    if blocked {
        return;
    }

    let y = tuning.pickup_min_y + state.rng.random::<f32>() * tuning.pickup_y_range;
    let kind = if state.rng.random::<f32>() < tuning.gem_chance {
        PickupKind::Gem
    } else {
        PickupKind::Star
    };

    let id = state.next_entity_id();
    log::debug!("{:?} {} spawned at y {:.1}", kind, id, y);
    state.pickups.push(Pickup {
        id,
        kind,
        pos: glam::Vec2::new(x, y),
    });
}

/// Scroll and pull pickups, then collect everything in reach
fn advance_pickups(state: &mut Session, speed: f32) {
    let center = state.actor.center();
    let pull = state.ability.effects.magnet_pull;
    let reach = state.tuning.pickup_reach;
    let despawn_x = state.tuning.pickup_despawn_x;

    let mut collected = Vec::new();
    let actor = &state.actor;
    state.pickups.retain_mut(|pickup| {
        pickup.pos.x -= speed;
        if pull > 0.0 {
            pickup.pos += (center - pickup.pos) * pull;
        }
        if within_reach(actor, pickup.pos, reach) {
            collected.push(pickup.kind);
            return false;
        }
        pickup.pos.x >= despawn_x
    });

    for kind in collected {
        let value = kind.value(&state.tuning);
        state.add_energy(value.energy);
        state.add_score(value.score);
        state.events.push(GameEvent::PickupCollected(kind));
    }
}

/// Idle/demo mode: steer toward the next gap and use the ability when ready
pub fn autopilot(state: &Session, input: &mut TickInput) {
    match state.phase {
        GamePhase::Ready => input.jump = true,
        GamePhase::Over => input.reset = state.retry_ready(input.now_ms),
        GamePhase::Active => {
            let actor = &state.actor;
            let field_height = state.tuning.field_height;
            let target = state
                .obstacles
                .iter()
                .find(|o| o.right() >= actor.pos.x)
                .map(|o| o.top + o.gap * 0.5)
                .unwrap_or(field_height * 0.5);

            // Jump only on the way down, when the next tick would sink below the target
            let next_center = actor.center().y + actor.vel + actor.gravity;
            input.jump = actor.vel >= 0.0 && next_center > target;
            input.activate_ability = state.ability_ready();
        }
    }
}
