use raw_window_handle::RawWindowHandle;

use crate::backend::BackendId;

use super::CaptureView;

/// Viewer configuration, as passed to `configure`.
///
/// Keep this structure stable and minimal; it crosses the embedder boundary.
///
/// Invariants (checked by `configure`, never here):
/// - offscreen mode requires `width > 0` and `height > 0`
/// - a capture view must cover `width * height * 4` bytes
/// - onscreen mode requires a window handle and a backend able to present
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Render into memory instead of a visible surface.
    pub offscreen: bool,

    /// Target width in pixels. Ignored onscreen (the surface decides).
    pub width: u32,

    /// Target height in pixels. Ignored onscreen.
    pub height: u32,

    /// Requested backend identifier. `AUTO` resolves at configure time.
    pub backend: BackendId,

    /// Optional caller-owned capture destination for offscreen frames.
    pub capture: Option<CaptureView>,

    /// Window to present into. Required onscreen, ignored offscreen.
    ///
    /// Not retained by the viewer past `configure`; the handle is consumed
    /// by the backend when it can present.
    pub window: Option<RawWindowHandle>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            offscreen: false,
            width: 0,
            height: 0,
            backend: BackendId::AUTO,
            capture: None,
            window: None,
        }
    }
}

impl ViewerConfig {
    /// Offscreen configuration at the given size, AUTO backend.
    pub fn offscreen(width: u32, height: u32) -> Self {
        Self {
            offscreen: true,
            width,
            height,
            ..Self::default()
        }
    }

    /// Onscreen configuration presenting into `window`.
    pub fn onscreen(window: RawWindowHandle) -> Self {
        Self {
            window: Some(window),
            ..Self::default()
        }
    }

    pub fn with_backend(mut self, backend: BackendId) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_capture(mut self, capture: CaptureView) -> Self {
        self.capture = Some(capture);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_onscreen_auto() {
        let cfg = ViewerConfig::default();
        assert!(!cfg.offscreen);
        assert_eq!(cfg.backend, BackendId::AUTO);
        assert!(cfg.capture.is_none());
    }

    #[test]
    fn builders_compose() {
        let buffer = super::super::CaptureBuffer::for_size(8, 8);
        let cfg = ViewerConfig::offscreen(8, 8)
            .with_backend(BackendId::SOFTWARE)
            .with_capture(buffer.view());
        assert!(cfg.offscreen);
        assert_eq!(cfg.backend, BackendId::SOFTWARE);
        assert!(cfg.capture.is_some());
    }
}
