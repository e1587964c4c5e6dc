//! Browser entry point
//!
//! The page owns the canvas and the animation loop; it forwards key/touch
//! input and frame times here and reads state back for drawing.

use wasm_bindgen::prelude::*;

use super::now_ms;
use crate::best_score::BestScore;
use crate::clock::{FixedStep, step_frame};
use crate::sim::{Character, GameEvent, GamePhase, Session, TickInput};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Pixel Dash starting...");
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    clock: FixedStep,
    input: TickInput,
    best: BestScore,
    /// Events from the last frame, drained by `take_events_json`
    pending: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, character: &str) -> WebGame {
        let character = Character::from_name(character).unwrap_or_default();
        let best = BestScore::load();
        let mut session = Session::new(seed, character);
        session.best_score = best.score;
        Self {
            session,
            clock: FixedStep::default(),
            input: TickInput::default(),
            best,
            pending: Vec::new(),
        }
    }

    /// Advance by one animation frame (`dt` in seconds)
    pub fn frame(&mut self, dt: f32) {
        self.input.now_ms = now_ms();
        let events = step_frame(&mut self.session, &mut self.clock, &mut self.input, dt);

        for event in &events {
            if let GameEvent::NewBestScore(score) = *event {
                if self.best.record(
                    score,
                    self.session.level,
                    self.session.character,
                    self.input.now_ms,
                ) {
                    self.best.save();
                }
            }
        }
        self.pending.extend(events);
    }

    pub fn jump(&mut self) {
        self.input.jump = true;
    }

    pub fn activate(&mut self) {
        self.input.activate_ability = true;
    }

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn reset(&mut self) {
        self.input.reset = true;
    }

    /// Returns false for an unknown character name
    pub fn select_character(&mut self, name: &str) -> bool {
        match Character::from_name(name) {
            Some(character) => {
                self.input.select_character = Some(character);
                true
            }
            None => {
                log::warn!("Unknown character '{}'", name);
                false
            }
        }
    }

    /// Menu overlay open: jumps are dropped
    pub fn set_menu_open(&mut self, open: bool) {
        self.input.menu_open = open;
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    pub fn phase(&self) -> String {
        match self.session.phase {
            GamePhase::Ready => "ready",
            GamePhase::Active => "active",
            GamePhase::Over => "over",
        }
        .to_string()
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn level(&self) -> u32 {
        self.session.level
    }

    pub fn energy(&self) -> u8 {
        self.session.energy
    }

    pub fn best_score(&self) -> u64 {
        self.best.score
    }

    pub fn ability_active(&self) -> bool {
        self.session.ability.active
    }

    /// Remaining fraction of the active ability, for the HUD bar
    pub fn ability_remaining(&self) -> f32 {
        self.session.ability.remaining_ratio()
    }

    pub fn retry_ready(&self) -> bool {
        self.session.retry_ready(now_ms())
    }

    /// Leftover fraction of a tick, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    /// Full session snapshot for the renderer
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events raised since the last call
    pub fn take_events_json(&mut self) -> Result<String, JsValue> {
        let events = std::mem::take(&mut self.pending);
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
