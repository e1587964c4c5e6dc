//! Game state and core simulation types
//!
//! Everything a run needs lives in [`Session`], so a snapshot of it is a
//! complete, deterministic save.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability::{Ability, AbilityState};
use crate::consts::{MAX_ENERGY, RETRY_COOLDOWN_MS};
use crate::tuning::{PickupValue, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Actor idle at the spawn point, waiting for the first jump
    Ready,
    /// Simulation running
    Active,
    /// Run ended; waits out the retry cooldown
    Over,
}

/// Playable characters, each bound to one ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Character {
    #[default]
    Chick,
    Penguin,
    Dove,
    Puppy,
    Kitten,
    Turtle,
}

impl Character {
    pub const ALL: [Character; 6] = [
        Character::Chick,
        Character::Penguin,
        Character::Dove,
        Character::Puppy,
        Character::Kitten,
        Character::Turtle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Character::Chick => "chick",
            Character::Penguin => "penguin",
            Character::Dove => "dove",
            Character::Puppy => "puppy",
            Character::Kitten => "kitten",
            Character::Turtle => "turtle",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chick" => Some(Character::Chick),
            "penguin" => Some(Character::Penguin),
            "dove" | "bird" => Some(Character::Dove),
            "puppy" | "dog" => Some(Character::Puppy),
            "kitten" | "cat" => Some(Character::Kitten),
            "turtle" => Some(Character::Turtle),
            _ => None,
        }
    }

    /// The ability this character unlocks at full meter
    pub fn ability(&self) -> Ability {
        match self {
            Character::Chick => Ability::Shield,
            Character::Penguin => Ability::Slow,
            Character::Dove => Ability::Dash,
            Character::Puppy => Ability::Shrink,
            Character::Kitten => Ability::Magnet,
            Character::Turtle => Ability::AbsorbOnce,
        }
    }
}

/// The player-controlled falling body
///
/// `pos` is the top-left corner. Only `pos.y` changes during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub size: Vec2,
    pub base_size: Vec2,
    /// Vertical velocity (positive is down)
    pub vel: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub character: Character,
}

impl Actor {
    pub fn new(tuning: &Tuning, character: Character) -> Self {
        let size = Vec2::splat(tuning.actor_size);
        Self {
            pos: Vec2::new(tuning.actor_spawn_x, tuning.actor_spawn_y),
            size,
            base_size: size,
            vel: 0.0,
            gravity: tuning.gravity,
            jump_impulse: tuning.jump_impulse,
            character,
        }
    }

    /// One step of gravity
    pub fn integrate(&mut self) {
        self.vel += self.gravity;
        self.pos.y += self.vel;
    }

    /// Overwrite velocity with the jump impulse (no accumulation)
    pub fn jump(&mut self) {
        self.vel = self.jump_impulse;
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Resize relative to the base size, keeping the top-left corner
    pub fn set_scale(&mut self, scale: f32) {
        self.size = self.base_size * scale.max(f32::EPSILON);
    }

    pub fn reset_size(&mut self) {
        self.size = self.base_size;
    }
}

/// A paired top/bottom barrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Height of the barrier hanging from the top
    pub top: f32,
    /// Height of the barrier standing on the bottom
    pub bottom: f32,
    pub gap: f32,
    /// Set once the actor has cleared it
    pub passed: bool,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// y of the bottom barrier's upper edge
    pub fn bottom_top(&self, field_height: f32) -> f32 {
        field_height - self.bottom
    }
}

/// Pickup tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Common
    Star,
    /// Rare, worth more
    Gem,
}

impl PickupKind {
    pub fn value(&self, tuning: &Tuning) -> PickupValue {
        match self {
            PickupKind::Star => tuning.star,
            PickupKind::Gem => tuning.gem,
        }
    }
}

/// A collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    /// Center point
    pub pos: Vec2,
}

/// One-shot notifications for audio/visual layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// An obstacle was cleared
    Scored,
    LevelUp(u32),
    PickupCollected(PickupKind),
    AbilityActivated(Ability),
    AbilityEnded(Ability),
    /// An obstacle hit was swallowed by the ability
    HitAbsorbed,
    Died,
    NewBestScore(u64),
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Character used for the next spawn
    pub character: Character,
    pub actor: Actor,
    pub ability: AbilityState,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Live pickups, oldest first
    pub pickups: Vec<Pickup>,
    pub score: u64,
    pub level: u32,
    pub energy: u8,
    pub best_score: u64,
    /// Global invincibility ticks, independent of the ability
    pub invincible_ticks: u32,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    /// Wall-clock time of the last death (ms)
    pub died_at_ms: Option<f64>,
    /// Distance scrolled since the last obstacle spawn; `None` before the first
    pub scrolled_since_spawn: Option<f32>,
    /// Events raised since the start of the current tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl Session {
    /// Create a session with the default balance table
    pub fn new(seed: u64, character: Character) -> Self {
        Self::with_tuning(seed, character, Tuning::default())
    }

    pub fn with_tuning(seed: u64, character: Character, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            actor: Actor::new(&tuning, character),
            ability: AbilityState::new(character.ability()),
            tuning,
            phase: GamePhase::Ready,
            character,
            obstacles: Vec::new(),
            pickups: Vec::new(),
            score: 0,
            level: 1,
            energy: 0,
            best_score: 0,
            invincible_ticks: 0,
            time_ticks: 0,
            died_at_ms: None,
            scrolled_since_spawn: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whether collisions and bounds exits are currently harmless
    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0 || self.ability.effects.invincible
    }

    /// Meter is full and the ability is idle
    pub fn ability_ready(&self) -> bool {
        self.energy >= MAX_ENERGY && !self.ability.active
    }

    /// Add points and re-derive the level
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        let level = self.tuning.level_for_score(self.score);
        if level > self.level {
            log::info!("Level {} reached at score {}", level, self.score);
            self.events.push(GameEvent::LevelUp(level));
        }
        self.level = level;
    }

    /// Charge the meter, saturating at full
    pub fn add_energy(&mut self, amount: u8) {
        self.energy = self.energy.saturating_add(amount).min(MAX_ENERGY);
    }

    /// Grant at least `ticks` of global invincibility
    pub fn grant_invincibility(&mut self, ticks: u32) {
        self.invincible_ticks = self.invincible_ticks.max(ticks);
    }

    /// End the ability run and undo its modifications
    pub fn deactivate_ability(&mut self) {
        if !self.ability.active {
            return;
        }
        self.ability.deactivate();
        self.actor.reset_size();
        log::info!("{} ended", self.ability.ability.as_str());
        self.events.push(GameEvent::AbilityEnded(self.ability.ability));
    }

    /// Whether a retry would be honored at `now_ms`
    pub fn retry_ready(&self, now_ms: f64) -> bool {
        self.phase == GamePhase::Over
            && self
                .died_at_ms
                .is_some_and(|t| now_ms - t > RETRY_COOLDOWN_MS)
    }

    /// Transition to Over; runs at most once per run
    pub(crate) fn end_run(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Over {
            return;
        }
        self.phase = GamePhase::Over;
        self.died_at_ms = Some(now_ms);
        self.events.push(GameEvent::Died);
        log::info!(
            "Run over: score {} level {} after {} ticks",
            self.score,
            self.level,
            self.time_ticks
        );

        if self.score > self.best_score {
            self.best_score = self.score;
            self.events.push(GameEvent::NewBestScore(self.score));
            log::info!("New best score: {}", self.score);
        }
    }

    /// Back to Ready with a fresh actor; best score, character and RNG carry over
    pub(crate) fn respawn(&mut self) {
        self.phase = GamePhase::Ready;
        self.actor = Actor::new(&self.tuning, self.character);
        self.ability = AbilityState::new(self.character.ability());
        self.obstacles.clear();
        self.pickups.clear();
        self.score = 0;
        self.level = 1;
        self.energy = 0;
        self.invincible_ticks = 0;
        self.time_ticks = 0;
        self.died_at_ms = None;
        self.scrolled_since_spawn = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_ready() {
        let s = Session::new(7, Character::Penguin);
        assert_eq!(s.phase, GamePhase::Ready);
        assert_eq!(s.level, 1);
        assert_eq!(s.energy, 0);
        assert_eq!(s.actor.pos, Vec2::new(80.0, 300.0));
        assert_eq!(s.actor.vel, 0.0);
        assert_eq!(s.ability.ability, Ability::Slow);
        assert!(!s.ability.active);
    }

    #[test]
    fn test_jump_overwrites_velocity() {
        let mut actor = Actor::new(&Tuning::default(), Character::Chick);
        actor.vel = 12.0;
        actor.jump();
        assert_eq!(actor.vel, -8.0);
        actor.jump();
        assert_eq!(actor.vel, -8.0);
    }

    #[test]
    fn test_add_score_tracks_level() {
        let mut s = Session::new(1, Character::Chick);
        s.add_score(9);
        assert_eq!(s.level, 1);
        s.add_score(1);
        assert_eq!(s.level, 2);
        assert!(s.events.contains(&GameEvent::LevelUp(2)));
        s.add_score(27);
        assert_eq!(s.score, 37);
        assert_eq!(s.level, 4);
    }

    #[test]
    fn test_energy_saturates() {
        let mut s = Session::new(1, Character::Chick);
        s.add_energy(95);
        s.add_energy(25);
        assert_eq!(s.energy, MAX_ENERGY);
        s.add_energy(u8::MAX);
        assert_eq!(s.energy, MAX_ENERGY);
    }

    #[test]
    fn test_end_run_updates_best_once() {
        let mut s = Session::new(1, Character::Chick);
        s.phase = GamePhase::Active;
        s.best_score = 20;
        s.add_score(37);
        s.end_run(1000.0);
        s.end_run(1500.0);
        assert_eq!(s.best_score, 37);
        assert_eq!(s.died_at_ms, Some(1000.0));
        let bests = s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewBestScore(_)))
            .count();
        assert_eq!(bests, 1);
    }

    #[test]
    fn test_retry_cooldown() {
        let mut s = Session::new(1, Character::Chick);
        assert!(!s.retry_ready(10_000.0));
        s.phase = GamePhase::Active;
        s.end_run(1000.0);
        assert!(!s.retry_ready(2999.0));
        // The cooldown must be strictly exceeded
        assert!(!s.retry_ready(3000.0));
        assert!(s.retry_ready(3000.5));
    }

    #[test]
    fn test_character_names() {
        for c in Character::ALL {
            assert_eq!(Character::from_name(c.as_str()), Some(c));
        }
        assert_eq!(Character::from_name("DOG"), Some(Character::Puppy));
        assert_eq!(Character::from_name("dragon"), None);
    }
}
