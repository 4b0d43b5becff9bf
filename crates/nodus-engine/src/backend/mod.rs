//! Rendering backend identifiers, resolution, and implementations.
//!
//! This module is responsible for:
//! - validating raw backend identifiers into a concrete [`Backend`]
//! - resolving the AUTO policy against backend availability
//! - providing the [`RenderBackend`] seam the viewer draws through
//!
//! Only two backends exist: a CPU rasterizing backend and a null backend for
//! harnesses that exercise the lifecycle without pixel output. Real GPU
//! backends live behind the same trait in the excluded engine layer.

mod ident;
mod null;
mod overlay;
mod render;
mod software;

pub use ident::{Backend, BackendId};
pub use null::NullBackend;
pub use render::{BYTES_PER_PIXEL, FrameInput, RenderBackend, Rgba8};
pub use software::SoftwareBackend;
