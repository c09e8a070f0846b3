//! Render snapshot
//!
//! Flattens the world into sprite instances plus a HUD summary once per frame.
//! Nothing here draws; a presentation backend uploads `instances` as-is.

pub mod instance;

pub use instance::{Frame, Hud, SpriteId, SpriteInstance, colors, snapshot};
