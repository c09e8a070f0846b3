//! Platform layer
//!
//! Wall-clock pacing for the frame loop. Everything below `sim` sees only
//! the `dt` this produces.

pub mod clock;

pub use clock::FrameClock;
