//! Frame driving.
//!
//! Turns a configured viewer into something that plays: a clock mapping wall
//! time to logical media timestamps (with duration looping), and a driver
//! that issues `draw` calls from it, optionally wrapping the scene in a HUD
//! overlay for instrumentation.

mod clock;
mod frame;

pub use clock::PlaybackClock;
pub use frame::FrameDriver;
