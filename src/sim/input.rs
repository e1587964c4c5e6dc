//! Named input handlers
//!
//! Each handler applies one discrete input to the session and returns whether
//! it had any effect. Inputs outside their valid phase are ignored.

use super::state::{Character, GameEvent, GamePhase, Session};

impl Session {
    /// Jump; the first jump in Ready also starts the run
    pub fn jump(&mut self) -> bool {
        match self.phase {
            GamePhase::Ready => {
                self.phase = GamePhase::Active;
                log::info!("Run started as {}", self.character.as_str());
            }
            GamePhase::Active => {}
            GamePhase::Over => return false,
        }
        self.actor.jump();
        self.events.push(GameEvent::Jumped);
        true
    }

    /// Start the run without an initial jump
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        self.phase = GamePhase::Active;
        log::info!("Run started as {}", self.character.as_str());
        true
    }

    /// Fire the character ability when the meter is full
    pub fn activate_ability(&mut self) -> bool {
        if self.phase != GamePhase::Active || !self.ability_ready() {
            return false;
        }
        self.energy = 0;
        self.ability.activate();
        let ability = self.ability.ability;
        self.grant_invincibility(ability.activation_grace_ticks());
        self.actor.set_scale(self.ability.effects.size_scale);
        self.events.push(GameEvent::AbilityActivated(ability));
        log::info!(
            "{} activated for {} ticks",
            ability.as_str(),
            self.ability.total
        );
        true
    }

    /// Pick a character; applies now in Ready, at the next reset in Over
    pub fn select_character(&mut self, character: Character) -> bool {
        match self.phase {
            GamePhase::Active => false,
            GamePhase::Ready => {
                self.character = character;
                self.respawn();
                true
            }
            GamePhase::Over => {
                self.character = character;
                true
            }
        }
    }

    /// Leave Over for a fresh Ready once the cooldown has elapsed
    pub fn reset(&mut self, now_ms: f64) -> bool {
        if !self.retry_ready(now_ms) {
            return false;
        }
        self.respawn();
        log::info!("Session reset");
        true
    }
}
