//! Scene-graph storage and cross-context ownership.
//!
//! Responsibilities:
//! - store nodes in an append-only arena addressed by stable indices
//! - walk reachable subgraphs (DAG-aware, deduplicated)
//! - track which viewer context, if any, owns each live node
//!
//! Node payloads are ordinary data-modeling glue; the lifecycle machinery in
//! [`crate::viewer`] never inspects them beyond reachability, with the single
//! exception of the HUD overlay rasterized by the software backend.

mod arena;
mod node;
mod registry;

pub use arena::Arena;
pub use node::{HudParams, NodeId, NodeKind};
pub use registry::{Registry, ViewerId};
