use std::sync::Arc;

use crate::backend::{BYTES_PER_PIXEL, Backend, FrameInput, RenderBackend};
use crate::error::{Result, ViewerError};
use crate::scene::{Arena, NodeId, Registry, ViewerId};

use super::{CaptureView, ViewerConfig};

/// Resources owned by a configured viewer.
struct Active {
    offscreen: bool,
    width: u32,
    height: u32,
    backend_kind: Backend,
    backend: Box<dyn RenderBackend>,
    /// Offscreen render target, `width * height * 4` bytes. Empty onscreen.
    framebuffer: Vec<u8>,
    capture: Option<CaptureView>,
    scene: Option<NodeId>,
}

enum State {
    Unconfigured,
    Configured(Active),
}

/// A rendering context with an explicit configure/draw lifecycle.
///
/// Lifecycle: created unconfigured, enters `Configured` through a valid
/// [`configure`](Self::configure), self-loops on reconfigure and
/// `set_scene`/`draw`, and ends when the value is dropped (or consumed by
/// [`destroy`](Self::destroy)), which releases its registry claims and
/// backend resources. "No calls after destroy" is enforced by ownership.
///
/// A viewer is single-threaded from the caller's perspective: every
/// operation takes `&mut self`, runs to completion, and reports errors
/// synchronously. Independent viewers may live on independent threads; the
/// [`Registry`] and [`Arena`] they share are internally synchronized.
pub struct Viewer {
    id: ViewerId,
    arena: Arc<Arena>,
    registry: Arc<Registry>,
    state: State,
}

impl Viewer {
    /// Creates an unconfigured viewer over a shared arena and registry.
    pub fn new(arena: Arc<Arena>, registry: Arc<Registry>) -> Self {
        let id = registry.register_viewer();
        Self {
            id,
            arena,
            registry,
            state: State::Unconfigured,
        }
    }

    pub fn id(&self) -> ViewerId {
        self.id
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, State::Configured(_))
    }

    /// Resolved backend of the current configuration, if any.
    pub fn backend(&self) -> Option<Backend> {
        match &self.state {
            State::Configured(active) => Some(active.backend_kind),
            State::Unconfigured => None,
        }
    }

    /// Target size of the current configuration, if any.
    pub fn size(&self) -> Option<(u32, u32)> {
        match &self.state {
            State::Configured(active) => Some((active.width, active.height)),
            State::Unconfigured => None,
        }
    }

    /// Currently bound scene root, if any.
    pub fn scene(&self) -> Option<NodeId> {
        match &self.state {
            State::Configured(active) => active.scene,
            State::Unconfigured => None,
        }
    }

    /// Applies `cfg`, entering or re-entering the configured state.
    ///
    /// Transactional: the replacement resource set is fully validated and
    /// built before the previous one is swapped out, so on failure the prior
    /// configuration (if any) is preserved unchanged. A bound scene survives
    /// reconfiguration, claims included; backend resources are rebuilt.
    pub fn configure(&mut self, cfg: &ViewerConfig) -> Result<()> {
        let backend_kind = Backend::resolve(cfg.backend)?;

        if cfg.offscreen {
            if cfg.width == 0 || cfg.height == 0 {
                return Err(ViewerError::InvalidConfiguration {
                    reason: format!(
                        "offscreen mode requires non-zero dimensions, got {}x{}",
                        cfg.width, cfg.height
                    ),
                });
            }
            if let Some(view) = &cfg.capture {
                let needed = cfg.width as usize * cfg.height as usize * BYTES_PER_PIXEL;
                if view.len() < needed {
                    return Err(ViewerError::InvalidConfiguration {
                        reason: format!(
                            "capture buffer holds {} bytes, frame needs {needed}",
                            view.len()
                        ),
                    });
                }
                // Detect at configure when feasible; a view going stale
                // later is only caught at draw.
                if !view.is_live() {
                    return Err(ViewerError::InvalidConfiguration {
                        reason: "capture buffer has already been released".into(),
                    });
                }
            }
        } else {
            if cfg.window.is_none() {
                return Err(ViewerError::InvalidConfiguration {
                    reason: "onscreen mode requires a window handle".into(),
                });
            }
            if !backend_kind.can_present() {
                return Err(ViewerError::InvalidConfiguration {
                    reason: format!("backend {} cannot present to a window", backend_kind.name()),
                });
            }
        }

        let framebuffer = if cfg.offscreen {
            vec![0u8; cfg.width as usize * cfg.height as usize * BYTES_PER_PIXEL]
        } else {
            Vec::new()
        };

        // The scene stays bound across a successful reconfigure; its claims
        // are already held by this viewer.
        let scene = match &self.state {
            State::Configured(active) => active.scene,
            State::Unconfigured => None,
        };

        self.state = State::Configured(Active {
            offscreen: cfg.offscreen,
            width: cfg.width,
            height: cfg.height,
            backend_kind,
            backend: backend_kind.instantiate(),
            framebuffer,
            capture: cfg.capture.clone(),
            scene,
        });

        log::debug!(
            "{} configured: backend={} offscreen={} {}x{}",
            self.id,
            backend_kind.name(),
            cfg.offscreen,
            cfg.width,
            cfg.height
        );
        Ok(())
    }

    /// Binds the subgraph rooted at `root` as this viewer's scene.
    ///
    /// On an ownership conflict the previously bound scene (if any) remains
    /// bound; the call never leaves the viewer sceneless on failure.
    pub fn set_scene(&mut self, root: NodeId) -> Result<()> {
        let State::Configured(active) = &mut self.state else {
            return Err(ViewerError::InvalidState {
                reason: "set_scene requires a configured viewer",
            });
        };
        self.registry.rebind(self.id, &self.arena, root)?;
        active.scene = Some(root);
        log::debug!("{} bound scene {root}", self.id);
        Ok(())
    }

    /// Renders one frame at logical timestamp `time` seconds.
    ///
    /// Requires a configured viewer with a bound scene. Offscreen frames
    /// land in the internal framebuffer and are copied out through the
    /// registered capture view; a stale view fails the draw. Timestamp
    /// monotonicity across calls is the caller's responsibility.
    pub fn draw(&mut self, time: f64) -> Result<()> {
        let State::Configured(active) = &mut self.state else {
            return Err(ViewerError::InvalidState {
                reason: "draw requires a configured viewer",
            });
        };
        let Some(root) = active.scene else {
            return Err(ViewerError::InvalidState {
                reason: "draw requires a bound scene",
            });
        };

        let frame = FrameInput {
            arena: &self.arena,
            root,
            time,
            width: active.width,
            height: active.height,
        };
        active.backend.render(&frame, &mut active.framebuffer)?;

        if active.offscreen
            && let Some(view) = &active.capture
            && !view.copy_from(&active.framebuffer)
        {
            return Err(ViewerError::InvalidState {
                reason: "capture buffer was released while still registered",
            });
        }
        Ok(())
    }

    /// Ends the lifecycle, releasing registry claims and backend resources.
    ///
    /// Equivalent to dropping the viewer; provided for call sites where the
    /// teardown point should be explicit.
    pub fn destroy(self) {}
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.registry.release(self.id);
        if self.is_configured() {
            log::debug!("{} destroyed", self.id);
        }
        self.state = State::Unconfigured;
    }
}
