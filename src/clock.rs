//! Fixed-step tick driver
//!
//! Converts variable frame times into whole simulation ticks. Large gaps
//! (tab switches, debugger pauses) are clamped so the simulation never tries
//! to catch up more than a handful of steps in one frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameEvent, Session, TickInput, tick};

/// Time accumulator for a fixed timestep
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Feed one frame of elapsed time (seconds); returns ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    /// Leftover fraction of a step, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).min(1.0)
    }
}

/// Run every tick owed for one frame
///
/// One-shot inputs are cleared once a tick has consumed them; if no tick runs
/// this frame they stay queued. Events from all ticks are returned in order.
pub fn step_frame(
    session: &mut Session,
    clock: &mut FixedStep,
    input: &mut TickInput,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..clock.advance(dt) {
        tick(session, input);
        input.clear_one_shots();
        events.append(&mut session.events);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Character, GamePhase};

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStep::new(0.01, 8);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!(clock.alpha() > 0.15 && clock.alpha() < 0.25);
    }

    #[test]
    fn test_substeps_capped() {
        let mut clock = FixedStep::new(0.01, 4);
        assert_eq!(clock.advance(5.0), 4);
    }

    #[test]
    fn test_one_shots_wait_for_a_tick() {
        let mut session = Session::new(5, Character::Chick);
        let mut clock = FixedStep::default();
        let mut input = TickInput {
            jump: true,
            ..Default::default()
        };

        let events = step_frame(&mut session, &mut clock, &mut input, 0.0);
        assert!(events.is_empty());
        assert!(input.jump);
        assert_eq!(session.phase, GamePhase::Ready);

        let events = step_frame(&mut session, &mut clock, &mut input, SIM_DT * 3.5);
        assert!(!input.jump);
        assert_eq!(session.phase, GamePhase::Active);
        assert_eq!(session.time_ticks, 3);
        assert_eq!(events.first(), Some(&GameEvent::Jumped));
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::Jumped).count(),
            1
        );
    }
}
