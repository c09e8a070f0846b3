//! Screen state machine
//!
//! Gates the simulation: frames only advance while a run is on screen and not
//! paused. Ending a run is the one place the high score gets written.

use serde::{Deserialize, Serialize};

use crate::highscores::HighScore;
use crate::sim::{
    Boss, FrameInput, GameEvent, Outcome, Simulation, Sprites, World, tick,
};
use crate::ui;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    MainMenu,
    Instructions,
    /// A run is in progress (possibly paused)
    Playing,
    GameOver,
    Win,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::MainMenu => "main menu",
            Screen::Instructions => "instructions",
            Screen::Playing => "playing",
            Screen::GameOver => "game over",
            Screen::Win => "win",
        }
    }
}

/// Something that asks the screen machine to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Main menu: begin a run
    Start,
    /// Main menu: open the instructions
    ShowHelp,
    /// Instructions: back to the main menu
    Back,
    /// Playing: leave the run for the main menu
    Abandon,
    /// Playing: pause or resume
    TogglePause,
    /// Game over: start another run
    Retry,
    /// Game over / win: back to the main menu
    ReturnToMenu,
    /// Anywhere: stop the loop
    Quit,
}

pub struct Game {
    screen: Screen,
    paused: bool,
    running: bool,
    sim: Simulation,
    high_score: HighScore,
}

impl Game {
    pub fn new(seed: u64, sprites: Sprites, high_score: HighScore) -> Self {
        Self {
            screen: Screen::MainMenu,
            paused: false,
            running: true,
            sim: Simulation::new(seed, sprites),
            high_score,
        }
    }

    /// Apply a trigger. Returns false when it means nothing on this screen.
    pub fn handle(&mut self, trigger: Trigger) -> bool {
        let from = self.screen;
        let next = match (from, trigger) {
            (_, Trigger::Quit) => {
                log::info!("Quit requested");
                self.running = false;
                return true;
            }
            (Screen::MainMenu, Trigger::Start) | (Screen::GameOver, Trigger::Retry) => {
                self.start_run();
                Screen::Playing
            }
            (Screen::MainMenu, Trigger::ShowHelp) => Screen::Instructions,
            (Screen::Instructions, Trigger::Back) => Screen::MainMenu,
            (Screen::Playing, Trigger::Abandon) => {
                self.paused = false;
                self.sim.clear();
                Screen::MainMenu
            }
            (Screen::Playing, Trigger::TogglePause) => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
                return true;
            }
            (Screen::GameOver | Screen::Win, Trigger::ReturnToMenu) => {
                self.sim.clear();
                Screen::MainMenu
            }
            _ => {
                log::debug!("Ignoring {trigger:?} on {}", from.as_str());
                return false;
            }
        };
        self.screen = next;
        log::info!("Screen: {} -> {}", from.as_str(), next.as_str());
        true
    }

    fn start_run(&mut self) {
        self.paused = false;
        self.sim.reset();
    }

    /// Run one frame: apply this frame's menu/keyboard triggers, then advance
    /// the simulation if a run is live.
    pub fn frame(&mut self, input: &FrameInput, dt: f32) {
        for trigger in ui::triggers(self.screen, input) {
            self.handle(trigger);
        }
        if !self.running || self.screen != Screen::Playing || self.paused {
            return;
        }

        match tick(&mut self.sim, input, dt) {
            Outcome::Continue => {}
            Outcome::PlayerDestroyed => self.end_run(Screen::GameOver),
            Outcome::BossDefeated => self.end_run(Screen::Win),
        }
    }

    /// Leave play for a result screen and persist the high score
    fn end_run(&mut self, result: Screen) {
        let score = self.sim.ctx.score;
        let event = if result == Screen::Win {
            GameEvent::Victory { score }
        } else {
            GameEvent::GameOver { score }
        };
        self.sim.ctx.emit(event);
        if result == Screen::GameOver {
            self.sim.world.remove_player();
        }
        if self.high_score.record(score) {
            self.sim.ctx.emit(GameEvent::NewHighScore { score });
        }
        self.screen = result;
        log::info!(
            "Screen: playing -> {} (score {score}, best {})",
            result.as_str(),
            self.high_score.best()
        );
    }

    /// Events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.sim.ctx.drain_events()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// False once a quit was requested
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn world(&self) -> &World {
        &self.sim.world
    }

    pub fn score(&self) -> u64 {
        self.sim.ctx.score
    }

    pub fn lives(&self) -> u8 {
        self.sim.lives()
    }

    pub fn difficulty(&self) -> u32 {
        self.sim.ctx.difficulty_level()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    /// The live boss, if any
    pub fn boss(&self) -> Option<&Boss> {
        self.sim.world.boss().map(|(_, boss)| boss)
    }

    /// Play time of the current run (ms)
    pub fn play_time_ms(&self) -> u64 {
        self.sim.ctx.now_ms()
    }
}
