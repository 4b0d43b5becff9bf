use crate::error::Result;
use crate::scene::NodeId;
use crate::viewer::Viewer;

use super::PlaybackClock;

/// Drives per-frame draws on a configured viewer.
///
/// Timestamps come either from the playback clock ([`tick`](Self::tick)) or
/// from the caller ([`step`](Self::step), for offscreen and test use). The
/// driver adds no synchronization of its own; it inherits the viewer's
/// single-caller model.
pub struct FrameDriver {
    viewer: Viewer,
    clock: PlaybackClock,
    frames: u64,
}

impl FrameDriver {
    pub fn new(viewer: Viewer) -> Self {
        Self::with_clock(viewer, PlaybackClock::new())
    }

    pub fn with_clock(viewer: Viewer, clock: PlaybackClock) -> Self {
        Self {
            viewer,
            clock,
            frames: 0,
        }
    }

    /// Binds `root` as the viewer's scene.
    pub fn bind_scene(&mut self, root: NodeId) -> Result<()> {
        self.viewer.set_scene(root)
    }

    /// Wraps `root` in a HUD overlay node and binds the wrapper.
    ///
    /// The overlay is part of the scene graph, so it falls under the same
    /// ownership claim as the scene it instruments. Returns the wrapper id.
    pub fn bind_scene_with_hud(&mut self, root: NodeId) -> Result<NodeId> {
        let hud = self.viewer.arena().hud(root);
        self.viewer.set_scene(hud)?;
        Ok(hud)
    }

    /// Draws one frame at the clock's current media time.
    pub fn tick(&mut self) -> Result<f64> {
        let t = self.clock.media_time();
        self.viewer.draw(t)?;
        self.frames += 1;
        Ok(t)
    }

    /// Draws one frame at an explicit timestamp.
    pub fn step(&mut self, time: f64) -> Result<()> {
        self.viewer.draw(time)?;
        self.frames += 1;
        Ok(())
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    /// Hands the viewer back, ending the driver.
    pub fn into_viewer(self) -> Viewer {
        self.viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Arena, NodeKind, Registry};
    use crate::viewer::ViewerConfig;
    use std::sync::Arc;

    fn driver() -> (Arc<Arena>, Arc<Registry>, FrameDriver) {
        let arena = Arc::new(Arena::new());
        let registry = Arc::new(Registry::new());
        let mut viewer = Viewer::new(arena.clone(), registry.clone());
        viewer.configure(&ViewerConfig::offscreen(32, 32)).unwrap();
        (arena, registry, FrameDriver::new(viewer))
    }

    #[test]
    fn step_counts_frames() {
        let (arena, _registry, mut driver) = driver();
        driver.bind_scene(arena.render(arena.quad())).unwrap();

        for i in 0..5 {
            driver.step(f64::from(i) / 60.0).unwrap();
        }
        assert_eq!(driver.frames(), 5);
    }

    #[test]
    fn failed_step_does_not_count() {
        let (_arena, _registry, mut driver) = driver();
        // No scene bound yet.
        assert!(driver.step(0.0).is_err());
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn hud_wrapper_is_claimed_with_the_scene() {
        let (arena, registry, mut driver) = driver();
        let scene = arena.render(arena.quad());
        let hud = driver.bind_scene_with_hud(scene).unwrap();

        assert!(matches!(arena.kind(hud), Some(NodeKind::Hud(_))));
        let owner = driver.viewer().id();
        assert_eq!(registry.owner_of(hud), Some(owner));
        assert_eq!(registry.owner_of(scene), Some(owner));

        driver.tick().unwrap();
    }
}
