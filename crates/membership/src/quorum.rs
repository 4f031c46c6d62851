//! Quorum-floor policy shared by every membership-mutating operation.

use quorate_cluster::{Node, NodeLister};

use crate::error::{Error, Result};

/// Default minimum number of control-plane nodes that must remain for a
/// membership removal to proceed.
pub const DEFAULT_MIN_CONTROL_PLANE_NODES: usize = 2;

/// Policy knobs for membership management.
#[derive(Clone, Debug)]
pub struct MembershipConfig {
    /// Operational safety floor: removals are refused when fewer
    /// control-plane nodes than this remain. Distinct from etcd's own quorum
    /// arithmetic (etcd runs with a single member); the floor keeps
    /// automated reconciliation from walking the control plane down to a
    /// state where membership can no longer be changed safely.
    pub min_control_plane_nodes: usize,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            min_control_plane_nodes: DEFAULT_MIN_CONTROL_PLANE_NODES,
        }
    }
}

/// Lists the control-plane nodes and enforces the floor.
pub(crate) async fn list_nodes_above_floor<C>(lister: &C, floor: usize) -> Result<Vec<Node>>
where
    C: NodeLister,
{
    let nodes = lister
        .list_control_plane_nodes()
        .await
        .map_err(|e| Error::NodeList(e.to_string()))?;

    if nodes.len() < floor {
        return Err(Error::QuorumFloorViolation {
            remaining: nodes.len(),
            floor,
        });
    }

    Ok(nodes)
}
