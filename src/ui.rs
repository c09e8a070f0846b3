//! Menu layout and input mapping
//!
//! Turns raw frame input into screen triggers: pointer presses over a button,
//! plus keyboard shortcuts for each screen.

use glam::Vec2;

use crate::consts::WINDOW_WIDTH;
use crate::game::{Screen, Trigger};
use crate::sim::FrameInput;

/// Axis-aligned screen rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive of the top/left edge, exclusive of bottom/right
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub label: &'static str,
    pub rect: Rect,
    pub trigger: Trigger,
}

const BUTTON_W: f32 = 240.0;
const BUTTON_H: f32 = 58.0;
const BUTTON_X: f32 = WINDOW_WIDTH / 2.0 - BUTTON_W / 2.0;

const fn menu_button(label: &'static str, y: f32, trigger: Trigger) -> Button {
    Button {
        label,
        rect: Rect::new(BUTTON_X, y, BUTTON_W, BUTTON_H),
        trigger,
    }
}

const MAIN_MENU: [Button; 3] = [
    menu_button("Play", 250.0, Trigger::Start),
    menu_button("Instructions", 318.0, Trigger::ShowHelp),
    menu_button("Exit", 386.0, Trigger::Quit),
];

const INSTRUCTIONS: [Button; 1] = [Button {
    label: "Back",
    rect: Rect::new(WINDOW_WIDTH / 2.0 - 50.0, 560.0, 100.0, 50.0),
    trigger: Trigger::Back,
}];

const GAME_OVER: [Button; 3] = [
    menu_button("Play again", 350.0, Trigger::Retry),
    menu_button("Main menu", 418.0, Trigger::ReturnToMenu),
    menu_button("Exit", 486.0, Trigger::Quit),
];

const WIN: [Button; 1] = [menu_button("Back to menu", 420.0, Trigger::ReturnToMenu)];

/// Buttons shown on a screen (none while playing)
pub fn buttons(screen: Screen) -> &'static [Button] {
    match screen {
        Screen::MainMenu => &MAIN_MENU,
        Screen::Instructions => &INSTRUCTIONS,
        Screen::GameOver => &GAME_OVER,
        Screen::Win => &WIN,
        Screen::Playing => &[],
    }
}

/// Button under the pointer, if any
pub fn hit_test(screen: Screen, pointer: Vec2) -> Option<&'static Button> {
    buttons(screen).iter().find(|b| b.rect.contains(pointer))
}

fn key_triggers(screen: Screen, input: &FrameInput, out: &mut Vec<Trigger>) {
    if input.confirm {
        match screen {
            Screen::MainMenu => out.push(Trigger::Start),
            Screen::GameOver => out.push(Trigger::Retry),
            Screen::Win => out.push(Trigger::ReturnToMenu),
            Screen::Instructions | Screen::Playing => {}
        }
    }
    if input.back {
        match screen {
            Screen::Playing => out.push(Trigger::Abandon),
            Screen::Instructions => out.push(Trigger::Back),
            Screen::GameOver | Screen::Win => out.push(Trigger::ReturnToMenu),
            Screen::MainMenu => {}
        }
    }
    if input.pause && screen == Screen::Playing {
        out.push(Trigger::TogglePause);
    }
}

/// Triggers raised by this frame's input on `screen`, in the order to apply
pub fn triggers(screen: Screen, input: &FrameInput) -> Vec<Trigger> {
    let mut out = Vec::new();
    if input.quit {
        out.push(Trigger::Quit);
    }
    if input.pointer_pressed {
        if let Some(button) = input.pointer.and_then(|p| hit_test(screen, p)) {
            out.push(button.trigger);
        }
    }
    key_triggers(screen, input, &mut out);
    out
}
