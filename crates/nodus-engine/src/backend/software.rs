use std::collections::HashMap;

use crate::error::Result;
use crate::scene::{NodeId, NodeKind};

use super::overlay::HudOverlay;
use super::render::{BYTES_PER_PIXEL, FrameInput, RenderBackend, Rgba8};
use super::Backend;

/// CPU rasterizing backend.
///
/// Clears the target and composites HUD overlays; every other node kind is
/// an opaque handle whose rasterization belongs to the excluded engine
/// layer. HUD latency measures persist across frames, keyed by node id, and
/// are dropped when the node leaves the drawn scene.
pub struct SoftwareBackend {
    clear: Rgba8,
    huds: HashMap<NodeId, HudOverlay>,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::with_clear_color(Rgba8::BLACK)
    }

    pub fn with_clear_color(clear: Rgba8) -> Self {
        Self {
            clear,
            huds: HashMap::new(),
        }
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for SoftwareBackend {
    fn kind(&self) -> Backend {
        Backend::Software
    }

    fn render(&mut self, frame: &FrameInput<'_>, target: &mut [u8]) -> Result<()> {
        debug_assert_eq!(
            target.len(),
            frame.width as usize * frame.height as usize * BYTES_PER_PIXEL,
            "target size does not match configured dimensions"
        );

        let pixels: &mut [Rgba8] = bytemuck::cast_slice_mut(target);
        pixels.fill(self.clear);

        let reach = frame.arena.reachable(frame.root);
        self.huds.retain(|id, _| reach.contains(id));

        for &id in &reach {
            if let Some(NodeKind::Hud(params)) = frame.arena.kind(id) {
                let overlay = self
                    .huds
                    .entry(id)
                    .or_insert_with(|| HudOverlay::new(params.measure_window));
                overlay.record_frame();
                overlay.composite(&params, pixels, frame.width, frame.height);
            }
        }

        log::trace!(
            "software frame t={:.3} {}x{} ({} nodes)",
            frame.time,
            frame.width,
            frame.height,
            reach.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Arena;

    fn draw(backend: &mut SoftwareBackend, arena: &Arena, root: NodeId, w: u32, h: u32) -> Vec<u8> {
        let mut target = vec![0u8; w as usize * h as usize * BYTES_PER_PIXEL];
        let frame = FrameInput { arena, root, time: 0.0, width: w, height: h };
        backend.render(&frame, &mut target).unwrap();
        target
    }

    #[test]
    fn clears_whole_target() {
        let arena = Arena::new();
        let scene = arena.render(arena.quad());
        let mut backend = SoftwareBackend::with_clear_color(Rgba8::new(7, 8, 9, 255));

        let target = draw(&mut backend, &arena, scene, 4, 4);
        assert!(target.chunks_exact(4).all(|px| px == [7, 8, 9, 255]));
    }

    #[test]
    fn hud_state_is_dropped_with_the_node() {
        let arena = Arena::new();
        let hud = arena.hud(arena.render(arena.quad()));
        let plain = arena.render(arena.quad());
        let mut backend = SoftwareBackend::new();

        draw(&mut backend, &arena, hud, 8, 8);
        assert_eq!(backend.huds.len(), 1);

        draw(&mut backend, &arena, plain, 8, 8);
        assert!(backend.huds.is_empty());
    }
}
