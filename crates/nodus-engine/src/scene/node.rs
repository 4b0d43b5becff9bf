use core::fmt;

/// Stable index of a node inside an [`Arena`](super::Arena).
///
/// Node identity is per-arena: ids from different arenas must never be mixed.
/// Ids stay valid for the lifetime of the arena (nodes are never removed).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// Node payloads.
///
/// The set is intentionally minimal: viewers treat nodes as opaque handles,
/// so only kinds that the lifecycle layer has to distinguish exist here. The
/// HUD is the one kind with engine-side behavior (overlay compositing).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A renderable primitive. Geometry lives in the excluded backend layer.
    Quad,
    /// Draws its single child with an (opaque) program.
    Render,
    /// Ordered collection of children.
    Group,
    /// Diagnostic overlay composited after its child.
    Hud(HudParams),
}

/// Parameters of a HUD overlay node.
#[derive(Debug, Clone, PartialEq)]
pub struct HudParams {
    /// Number of frame samples kept for latency measures.
    pub measure_window: usize,
    /// Background color of the overlay strip, straight-alpha RGBA.
    pub bg_color: [u8; 4],
}

impl Default for HudParams {
    fn default() -> Self {
        Self {
            measure_window: 60,
            bg_color: [0, 0, 0, 160],
        }
    }
}
