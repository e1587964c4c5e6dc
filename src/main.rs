//! Pixel Dash entry point
//!
//! The browser build is driven from `platform::web`. Natively this runs the
//! simulation headless on autopilot, which is handy for balance checks and
//! for reproducing a seed.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use pixel_dash::BestScore;
    use pixel_dash::Tuning;
    use pixel_dash::consts::SIM_DT;
    use pixel_dash::platform::now_ms;
    use pixel_dash::sim::{Character, GameEvent, GamePhase, Session, TickInput, tick};

    /// Headless Pixel Dash runs on autopilot.
    #[derive(Debug, Parser)]
    #[command(name = "pixel-dash", version, about)]
    pub struct Args {
        /// RNG seed for the first run; later runs use seed + n.
        #[arg(short, long, default_value = "1")]
        pub seed: u64,

        /// Character: chick, penguin, dove, puppy, kitten or turtle.
        #[arg(short, long, default_value = "chick", value_parser = parse_character)]
        pub character: Character,

        /// Number of runs to simulate.
        #[arg(short, long, default_value = "1")]
        pub runs: u32,

        /// Tick cap per run (60 ticks = one second).
        #[arg(short, long, default_value = "36000", value_name = "TICKS")]
        pub ticks: u64,

        /// JSON balance table; missing fields keep their defaults.
        #[arg(long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,

        /// Best-score file. Defaults to the config directory.
        #[arg(long, value_name = "FILE")]
        pub best_score: Option<PathBuf>,

        /// Do not read or write the best score.
        #[arg(long)]
        pub no_save: bool,
    }

    fn parse_character(s: &str) -> Result<Character, String> {
        Character::from_name(s).ok_or_else(|| format!("unknown character '{s}'"))
    }

    /// Outcome of one headless run
    #[derive(Debug)]
    struct RunSummary {
        score: u64,
        level: u32,
        ticks: u64,
        pickups: u32,
        abilities: u32,
        absorbed: u32,
        died: bool,
    }

    fn play(session: &mut Session, tick_cap: u64) -> RunSummary {
        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut summary = RunSummary {
            score: 0,
            level: 1,
            ticks: 0,
            pickups: 0,
            abilities: 0,
            absorbed: 0,
            died: false,
        };

        // Simulated clock so runs are reproducible
        let step_ms = f64::from(SIM_DT) * 1000.0;
        for n in 0..tick_cap {
            input.now_ms = n as f64 * step_ms;
            tick(session, &input);
            input.clear_one_shots();

            for event in session.events.drain(..) {
                match event {
                    GameEvent::PickupCollected(_) => summary.pickups += 1,
                    GameEvent::AbilityActivated(_) => summary.abilities += 1,
                    GameEvent::HitAbsorbed => summary.absorbed += 1,
                    GameEvent::Died => summary.died = true,
                    _ => {}
                }
            }
            // One run per session; the autopilot would otherwise retry
            if session.phase == GamePhase::Over {
                break;
            }
        }

        summary.score = session.score;
        summary.level = session.level;
        summary.ticks = session.time_ticks;
        summary
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::load_from(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let best_path = args.best_score.clone().unwrap_or_else(BestScore::default_path);
        let mut best = if args.no_save {
            BestScore::new()
        } else {
            BestScore::load_from(&best_path)
        };

        for run in 0..args.runs {
            let seed = args.seed.wrapping_add(u64::from(run));
            let mut session = Session::with_tuning(seed, args.character, tuning.clone());
            session.best_score = best.score;

            let summary = play(&mut session, args.ticks);
            log::info!(
                "Run {} (seed {}): score {} level {} ticks {} pickups {} abilities {} absorbed {}{}",
                run + 1,
                seed,
                summary.score,
                summary.level,
                summary.ticks,
                summary.pickups,
                summary.abilities,
                summary.absorbed,
                if summary.died { "" } else { " (tick cap)" }
            );
            println!(
                "run {:>3}  seed {:<8} {:<8} score {:>5}  level {:>3}  {:>7} ticks",
                run + 1,
                seed,
                args.character.as_str(),
                summary.score,
                summary.level,
                summary.ticks
            );

            if best.record(summary.score, summary.level, args.character, now_ms()) {
                println!("new best score: {}", best.score);
            }
        }

        if !args.no_save {
            best.save_to(&best_path)
                .with_context(|| format!("saving best score to {}", best_path.display()))?;
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_parse_character_alias() {
            let args = Args::try_parse_from(["pixel-dash", "-c", "dog", "--no-save"]).unwrap();
            assert_eq!(args.character, Character::Puppy);
            assert!(args.no_save);
        }

        #[test]
        fn test_args_reject_unknown_character() {
            assert!(Args::try_parse_from(["pixel-dash", "-c", "dragon"]).is_err());
        }

        #[test]
        fn test_headless_run_respects_tick_cap() {
            let mut session = Session::new(3, Character::Turtle);
            let summary = play(&mut session, 50);
            assert!(summary.ticks <= 50);
            assert_ne!(session.phase, GamePhase::Ready);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Pixel Dash (headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
