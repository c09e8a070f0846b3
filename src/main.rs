//! Eco Shooter entry point
//!
//! Headless demo: loads settings and the high score, lets the autopilot play
//! for a while at the target frame rate, then logs how it went.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use eco_shooter::assets::{Placeholders, SpriteSet};
use eco_shooter::audio::{AudioManager, SilentAudio};
use eco_shooter::autopilot;
use eco_shooter::persistence::FileStore;
use eco_shooter::platform::FrameClock;
use eco_shooter::renderer::snapshot;
use eco_shooter::settings::SETTINGS_FILE;
use eco_shooter::sim::{FrameInput, GameEvent};
use eco_shooter::{Game, HighScore, Settings, Trigger};

/// Tally of a demo session
#[derive(Debug, Default)]
struct Session {
    frames: u64,
    runs: u32,
    wins: u32,
    best_run: u64,
}

impl Session {
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::GameOver { score } => {
                    self.runs += 1;
                    self.best_run = self.best_run.max(*score);
                    log::info!("Run {} over with {score} points", self.runs);
                }
                GameEvent::Victory { score } => {
                    self.runs += 1;
                    self.wins += 1;
                    self.best_run = self.best_run.max(*score);
                    log::info!("Run {} won with {score} points", self.runs);
                }
                GameEvent::BossSpawned => log::info!("Boss incoming"),
                _ => {}
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Eco Shooter (headless) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings = Settings::load(&settings_path);

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Seed {seed}");

    let sprites = SpriteSet::load(&Placeholders);
    log::info!("{} sprites use placeholder art", sprites.fallback_count());
    let high_score = HighScore::load(FileStore::new(&settings.high_score_path));

    let mut game = Game::new(seed, sprites.masks(), high_score);
    let mut audio = AudioManager::new(SilentAudio::new(), &Placeholders, &settings);
    audio.start_music();

    if !settings.autopilot {
        log::warn!("No input device in headless mode and autopilot is off; nothing to play");
        game.handle(Trigger::Quit);
    }

    let mut clock = FrameClock::new(settings.target_fps);
    let deadline = settings
        .demo_length()
        .and_then(|length| Instant::now().checked_add(length));
    if deadline.is_none() {
        log::warn!(
            "Demo length of {}s is out of range; running until quit",
            settings.demo_seconds
        );
    }
    let mut session = Session::default();

    while game.running() {
        let dt = clock.tick();
        let input = if deadline.is_some_and(|end| Instant::now() >= end) {
            FrameInput {
                quit: true,
                ..Default::default()
            }
        } else {
            autopilot::drive(&game)
        };

        game.frame(&input, dt);
        let events = game.drain_events();
        audio.react(&events);
        session.record(&events);
        session.frames += 1;

        if settings.show_fps && session.frames % 300 == 0 {
            log::debug!("{} fps", clock.fps());
        }
    }

    let hud = snapshot(&game).hud;
    let summary = serde_json::to_string(&hud).context("serializing final HUD")?;
    log::info!(
        "Session done: {} frames, {} runs, {} wins, best run {}",
        session.frames,
        session.runs,
        session.wins,
        session.best_run
    );
    println!("{summary}");
    Ok(())
}
