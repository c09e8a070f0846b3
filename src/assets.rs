//! Asset loading with placeholders
//!
//! An `AssetSource` either hands back an image/sound or an `AssetError`. The
//! loader never lets the error through: every lookup ends as `Loaded::Ready`
//! or `Loaded::Fallback`, and the fallback is drawn procedurally in the same
//! size the real art would have. The simulation only ever sees the masks.

use std::collections::HashMap;
use std::rc::Rc;

use crate::audio::SoundEffect;
use crate::consts::*;
use crate::error::AssetError;
use crate::sim::{Mask, Sprites};

/// Explosion frames looked up at `explosion/0` .. `explosion/20`
pub const EXPLOSION_FRAME_SLOTS: usize = 21;
/// Boss animation slots looked up under `boss/`
pub const BOSS_FRAME_SLOTS: usize = 8;

/// RGBA color
pub type Rgba = [u8; 4];

const GREEN: Rgba = [40, 200, 80, 255];
const GRAY: Rgba = [150, 150, 150, 255];
const DARK_GRAY: Rgba = [100, 100, 100, 255];
const BOSS_RED: Rgba = [180, 30, 30, 255];
const BULLET_RED: Rgba = [200, 60, 60, 255];
const LASER_GRAY: Rgba = [200, 200, 200, 255];
const CLEAR: Rgba = [0, 0, 0, 0];

/// RGBA8 image, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Image {
    /// Paint every pixel with `paint(x, y)`
    pub fn from_fn(width: u32, height: u32, mut paint: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&paint(x, y));
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = ((y * self.width + x) * 4) as usize;
        match self.rgba.get(i..i + 4) {
            Some(p) => [p[0], p[1], p[2], p[3]],
            None => CLEAR,
        }
    }

    /// Nearest-neighbour scale to the requested size
    pub fn resized(&self, width: u32, height: u32) -> Image {
        if (width, height) == (self.width, self.height) || self.width == 0 || self.height == 0 {
            return self.clone();
        }
        Image::from_fn(width, height, |x, y| {
            let sx = (x as u64 * self.width as u64 / width as u64) as u32;
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            self.pixel(sx, sy)
        })
    }

    /// Collision mask from the alpha channel
    pub fn mask(&self) -> Mask {
        Mask::from_rgba(self.width, self.height, &self.rgba, MASK_ALPHA_THRESHOLD)
    }
}

/// Decoded audio clip (mono samples)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sound {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Sound {
    /// Plays nothing
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_silent(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Where art and sound come from
pub trait AssetSource {
    fn image(&self, name: &str) -> Result<Image, AssetError>;
    fn sound(&self, name: &str) -> Result<Sound, AssetError>;
}

/// Result of a capability-checked lookup. Both arms carry a usable asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Ready(T),
    Fallback(T),
}

impl<T> Loaded<T> {
    pub fn get(&self) -> &T {
        match self {
            Loaded::Ready(asset) | Loaded::Fallback(asset) => asset,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Loaded::Ready(asset) | Loaded::Fallback(asset) => asset,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Loaded::Fallback(_))
    }
}

/// Source with nothing in it: every lookup falls back
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholders;

impl AssetSource for Placeholders {
    fn image(&self, _name: &str) -> Result<Image, AssetError> {
        Err(AssetError::Unsupported { kind: "image" })
    }

    fn sound(&self, _name: &str) -> Result<Sound, AssetError> {
        Err(AssetError::Unsupported { kind: "sound" })
    }
}

/// Assets held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub images: HashMap<String, Image>,
    pub sounds: HashMap<String, Sound>,
}

impl AssetSource for MemorySource {
    fn image(&self, name: &str) -> Result<Image, AssetError> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound { name: name.into() })
    }

    fn sound(&self, name: &str) -> Result<Sound, AssetError> {
        self.sounds
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound { name: name.into() })
    }
}

/// Sprite art the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Player,
    Hazard,
    Collectible,
    Laser,
    BossBullet,
    Boss,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 6] = [
        SpriteKey::Player,
        SpriteKey::Hazard,
        SpriteKey::Collectible,
        SpriteKey::Laser,
        SpriteKey::BossBullet,
        SpriteKey::Boss,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpriteKey::Player => "player",
            SpriteKey::Hazard => "meteor",
            SpriteKey::Collectible => "green_item",
            SpriteKey::Laser => "laser",
            SpriteKey::BossBullet => "boss_bullet",
            SpriteKey::Boss => "boss",
        }
    }

    /// Size the sprite is drawn and collided at
    pub fn size(&self) -> (u32, u32) {
        match self {
            SpriteKey::Player => PLAYER_SIZE,
            SpriteKey::Hazard => HAZARD_SIZE,
            SpriteKey::Collectible => (COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
            SpriteKey::Laser => LASER_SIZE,
            SpriteKey::BossBullet => BOSS_BULLET_SIZE,
            SpriteKey::Boss => BOSS_SIZE,
        }
    }

    /// Procedural stand-in art
    pub fn placeholder(&self) -> Image {
        let (w, h) = self.size();
        match self {
            SpriteKey::Player => triangle(w, h, GREEN),
            SpriteKey::Hazard => crossed_box(w, h),
            SpriteKey::Collectible => ellipse(w, h, GREEN),
            SpriteKey::Laser => rounded_box(w, h, 2, LASER_GRAY),
            SpriteKey::BossBullet => rounded_box(w, h, 3, BULLET_RED),
            SpriteKey::Boss => ellipse(w, h, BOSS_RED),
        }
    }
}

/// Upward-pointing triangle filling the box
fn triangle(w: u32, h: u32, color: Rgba) -> Image {
    Image::from_fn(w, h, |x, y| {
        let half_span = (y as f32 + 0.5) / h as f32 * w as f32 / 2.0;
        let dx = (x as f32 + 0.5 - w as f32 / 2.0).abs();
        if dx <= half_span { color } else { CLEAR }
    })
}

fn ellipse(w: u32, h: u32, color: Rgba) -> Image {
    let (rx, ry) = (w as f32 / 2.0, h as f32 / 2.0);
    Image::from_fn(w, h, |x, y| {
        let dx = (x as f32 + 0.5 - rx) / rx;
        let dy = (y as f32 + 0.5 - ry) / ry;
        if dx * dx + dy * dy <= 1.0 { color } else { CLEAR }
    })
}

fn rounded_box(w: u32, h: u32, radius: u32, color: Rgba) -> Image {
    let r = radius.min(w / 2).min(h / 2) as f32;
    Image::from_fn(w, h, |x, y| {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        // Distance past the nearest inner corner
        let cx = px.clamp(r, w as f32 - r);
        let cy = py.clamp(r, h as f32 - r);
        let (dx, dy) = (px - cx, py - cy);
        if dx * dx + dy * dy <= r * r { color } else { CLEAR }
    })
}

/// Gray rounded box with a diagonal stroke, the generic missing-art marker
fn crossed_box(w: u32, h: u32) -> Image {
    let base = rounded_box(w, h, 8, GRAY);
    Image::from_fn(w, h, |x, y| {
        let on_diagonal = (x as i64 * h as i64 - y as i64 * w as i64).abs() <= w.max(h) as i64;
        let p = base.pixel(x, y);
        if on_diagonal && p[3] > 0 { DARK_GRAY } else { p }
    })
}

/// Look up an image, scaling real art to `size` or drawing the placeholder
pub fn load_image(source: &dyn AssetSource, key: SpriteKey) -> Loaded<Image> {
    let (w, h) = key.size();
    match source.image(key.name()) {
        Ok(image) => Loaded::Ready(image.resized(w, h)),
        Err(err) => {
            log::warn!("{err}; drawing placeholder for {}", key.name());
            Loaded::Fallback(key.placeholder())
        }
    }
}

/// Look up a sound, substituting silence
pub fn load_sound(source: &dyn AssetSource, effect: SoundEffect) -> Loaded<Sound> {
    match source.sound(effect.file_name()) {
        Ok(sound) => Loaded::Ready(sound),
        Err(err) => {
            log::warn!("{err}; {} will be silent", effect.file_name());
            Loaded::Fallback(Sound::silent())
        }
    }
}

/// All sprite art, loaded once at startup
#[derive(Debug, Clone)]
pub struct SpriteSet {
    images: HashMap<SpriteKey, Loaded<Image>>,
    /// Animation frames found (missing slots are skipped)
    pub explosion: Vec<Image>,
    /// Boss animation frames, scaled to the boss size
    pub boss: Vec<Image>,
}

impl SpriteSet {
    pub fn load(source: &dyn AssetSource) -> Self {
        let images = SpriteKey::ALL
            .iter()
            .map(|&key| (key, load_image(source, key)))
            .collect();
        let explosion: Vec<Image> = (0..EXPLOSION_FRAME_SLOTS)
            .filter_map(|i| source.image(&format!("explosion/{i}")).ok())
            .collect();
        if explosion.is_empty() {
            log::warn!("No explosion frames found; explosions use a short fallback");
        }
        let (boss_w, boss_h) = SpriteKey::Boss.size();
        let boss: Vec<Image> = (0..BOSS_FRAME_SLOTS)
            .filter_map(|i| source.image(&format!("boss/{i}")).ok())
            .map(|frame| frame.resized(boss_w, boss_h))
            .collect();
        if !boss.is_empty() {
            log::debug!("Boss animates over {} frames", boss.len());
        }
        Self {
            images,
            explosion,
            boss,
        }
    }

    pub fn image(&self, key: SpriteKey) -> &Image {
        match self.images.get(&key) {
            Some(loaded) => loaded.get(),
            // Every key is loaded in `load`
            None => &FALLBACK_PIXEL,
        }
    }

    /// Number of sprites drawn with placeholder art
    pub fn fallback_count(&self) -> usize {
        self.images.values().filter(|l| l.is_fallback()).count()
    }

    /// Collision masks for the simulation
    pub fn masks(&self) -> Sprites {
        let mask = |key: SpriteKey| Rc::new(self.image(key).mask());
        Sprites {
            player: mask(SpriteKey::Player),
            hazard: mask(SpriteKey::Hazard),
            collectible: mask(SpriteKey::Collectible),
            laser: mask(SpriteKey::Laser),
            boss_bullet: mask(SpriteKey::BossBullet),
            boss: mask(SpriteKey::Boss),
            boss_frames: self.boss.iter().map(|frame| Rc::new(frame.mask())).collect(),
            explosion_frames: self.explosion.len(),
        }
    }
}

static FALLBACK_PIXEL: Image = Image {
    width: 0,
    height: 0,
    rgba: Vec::new(),
};

/// All sound effects, loaded once at startup
#[derive(Debug, Clone)]
pub struct SoundBank {
    sounds: HashMap<SoundEffect, Loaded<Sound>>,
}

impl SoundBank {
    pub fn load(source: &dyn AssetSource) -> Self {
        let sounds = SoundEffect::ALL
            .iter()
            .map(|&effect| (effect, load_sound(source, effect)))
            .collect();
        Self { sounds }
    }

    pub fn get(&self, effect: SoundEffect) -> Option<&Sound> {
        self.sounds.get(&effect).map(Loaded::get)
    }
}
