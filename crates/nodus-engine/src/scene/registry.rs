use core::fmt;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, ViewerError};

use super::{Arena, NodeId};

/// Identity of a viewer context, as used in ownership claims.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ViewerId(u64);

impl ViewerId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer #{}", self.0)
    }
}

struct RegistryInner {
    claims: HashMap<NodeId, ViewerId>,
    next_viewer: u64,
}

/// Cross-context ownership registry.
///
/// Tracks, for every node reachable from some viewer's current scene, which
/// viewer owns it. Binding a live subgraph to two contexts at once would
/// alias context-specific backend resources, so claims are exclusive per
/// node and cover the whole reachable graph, not just the root.
///
/// The registry is the one piece of state shared across viewer instances.
/// It is internally synchronized and meant to be handed to each viewer as an
/// `Arc` clone, never kept as hidden process-wide state.
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                claims: HashMap::new(),
                next_viewer: 1,
            }),
        }
    }

    /// Allocates the identity a viewer uses for all of its claims.
    pub fn register_viewer(&self) -> ViewerId {
        let mut inner = self.inner.lock().unwrap();
        let id = ViewerId(inner.next_viewer);
        inner.next_viewer += 1;
        id
    }

    /// Claims every node reachable from `root` for `viewer`.
    ///
    /// Fails atomically: if any reachable node is owned by a different
    /// viewer, no claim is recorded. Re-claiming nodes the viewer already
    /// owns is allowed (ownership is idempotent per viewer).
    pub fn claim(&self, viewer: ViewerId, arena: &Arena, root: NodeId) -> Result<()> {
        let reach = arena.reachable(root);
        let mut inner = self.inner.lock().unwrap();
        Self::check_claimable(&inner, viewer, &reach)?;
        for &node in &reach {
            inner.claims.insert(node, viewer);
        }
        log::trace!("{viewer} claimed {} nodes from {root}", reach.len());
        Ok(())
    }

    /// Releases every claim held by `viewer`.
    pub fn release(&self, viewer: ViewerId) {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.claims.len();
        inner.claims.retain(|_, owner| *owner != viewer);
        let released = before - inner.claims.len();
        if released > 0 {
            log::trace!("{viewer} released {released} nodes");
        }
    }

    /// Replaces `viewer`'s claim set with the subgraph reachable from `root`.
    ///
    /// This is the transactional release-then-claim backing `set_scene`:
    /// under a single lock acquisition the new subgraph is verified, then the
    /// old claims are dropped and the new ones recorded. On failure nothing
    /// changes, so a rejected rebind leaves the previous scene fully bound.
    pub fn rebind(&self, viewer: ViewerId, arena: &Arena, root: NodeId) -> Result<()> {
        let reach = arena.reachable(root);
        let mut inner = self.inner.lock().unwrap();
        Self::check_claimable(&inner, viewer, &reach)?;
        inner.claims.retain(|_, owner| *owner != viewer);
        for &node in &reach {
            inner.claims.insert(node, viewer);
        }
        log::trace!("{viewer} rebound to {root} ({} nodes)", reach.len());
        Ok(())
    }

    /// Returns the current owner of `node`, if any.
    pub fn owner_of(&self, node: NodeId) -> Option<ViewerId> {
        self.inner.lock().unwrap().claims.get(&node).copied()
    }

    fn check_claimable(inner: &RegistryInner, viewer: ViewerId, reach: &[NodeId]) -> Result<()> {
        for &node in reach {
            if let Some(&owner) = inner.claims.get(&node)
                && owner != viewer
            {
                log::warn!("claim rejected: {node} is owned by {owner}, wanted by {viewer}");
                return Err(ViewerError::OwnershipConflict { node, owner });
            }
        }
        Ok(())
    }
}
