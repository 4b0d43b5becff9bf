use std::collections::HashSet;
use std::sync::Mutex;

use super::{HudParams, NodeId, NodeKind};

struct Node {
    kind: NodeKind,
    children: Vec<NodeId>,
}

/// Append-only scene-graph store.
///
/// Nodes are addressed by stable [`NodeId`] indices and may be shared across
/// any number of parent graphs (DAG, not tree). The arena is internally
/// synchronized so builders and viewers on different threads can share one
/// instance behind an `Arc`.
///
/// Nodes are never removed; an id stays valid for the arena's lifetime.
#[derive(Default)]
pub struct Arena {
    nodes: Mutex<Vec<Node>>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let mut nodes = self.nodes.lock().unwrap();
        debug_assert!(
            children.iter().all(|c| c.index() < nodes.len()),
            "child NodeId from a different arena"
        );
        let id = NodeId::from_index(nodes.len() as u32);
        nodes.push(Node { kind, children });
        id
    }

    /// Creates a quad primitive.
    pub fn quad(&self) -> NodeId {
        self.push(NodeKind::Quad, Vec::new())
    }

    /// Creates a render node drawing `child`.
    pub fn render(&self, child: NodeId) -> NodeId {
        self.push(NodeKind::Render, vec![child])
    }

    /// Creates a group over `children`, preserving order.
    pub fn group(&self, children: &[NodeId]) -> NodeId {
        self.push(NodeKind::Group, children.to_vec())
    }

    /// Wraps `child` in a HUD overlay with default parameters.
    pub fn hud(&self, child: NodeId) -> NodeId {
        self.hud_with(child, HudParams::default())
    }

    /// Wraps `child` in a HUD overlay with explicit parameters.
    pub fn hud_with(&self, child: NodeId, params: HudParams) -> NodeId {
        self.push(NodeKind::Hud(params), vec![child])
    }

    /// Returns the payload of `id`, or `None` for an id this arena never
    /// produced.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        let nodes = self.nodes.lock().unwrap();
        nodes.get(id.index()).map(|n| n.kind.clone())
    }

    /// Returns the direct children of `id` (empty for leaves and unknown ids).
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.lock().unwrap();
        nodes
            .get(id.index())
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every node reachable from `root`, in depth-first visit order.
    ///
    /// Shared nodes appear once regardless of how many paths lead to them, so
    /// the result is usable as a claim set.
    pub fn reachable(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.lock().unwrap();
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = nodes.get(id.index()) else {
                continue;
            };
            order.push(id);
            // Reverse keeps sibling visit order aligned with child order.
            stack.extend(node.children.iter().rev().copied());
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let arena = Arena::new();
        let a = arena.quad();
        let b = arena.quad();
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn reachable_walks_nested_graphs() {
        let arena = Arena::new();
        let quad = arena.quad();
        let render = arena.render(quad);
        let scene = arena.group(&[render]);

        assert_eq!(arena.reachable(scene), vec![scene, render, quad]);
        assert_eq!(arena.reachable(quad), vec![quad]);
    }

    #[test]
    fn reachable_dedups_diamond_sharing() {
        let arena = Arena::new();
        let quad = arena.quad();
        let r1 = arena.render(quad);
        let r2 = arena.render(quad);
        let scene = arena.group(&[r1, r2]);

        let reach = arena.reachable(scene);
        assert_eq!(reach.len(), 4);
        assert_eq!(reach.iter().filter(|&&n| n == quad).count(), 1);
    }

    #[test]
    fn hud_wraps_child() {
        let arena = Arena::new();
        let render = arena.render(arena.quad());
        let hud = arena.hud(render);

        assert!(matches!(arena.kind(hud), Some(NodeKind::Hud(_))));
        assert!(arena.reachable(hud).contains(&render));
    }
}
