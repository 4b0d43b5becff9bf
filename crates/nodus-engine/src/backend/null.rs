use crate::error::Result;

use super::render::{FrameInput, RenderBackend};
use super::Backend;

/// Backend that validates the full lifecycle but produces no pixels.
///
/// Exists so harnesses can run the viewer state machine without paying for
/// rasterization (`BACKEND=null`). Draws succeed and leave the target
/// untouched, so capture buffer contents are unspecified under this backend.
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn kind(&self) -> Backend {
        Backend::Null
    }

    fn render(&mut self, frame: &FrameInput<'_>, _target: &mut [u8]) -> Result<()> {
        log::trace!("null frame t={:.3} for {}", frame.time, frame.root);
        Ok(())
    }
}
