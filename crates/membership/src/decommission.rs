//! Two-phase, annotation-mediated decommissioning of a node's etcd member.

use std::sync::Arc;

use quorate_cluster::{Machine, Node, NodeLister, NodePatcher};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::quorum::{MembershipConfig, list_nodes_above_floor};

/// Annotation requesting that the on-node agent remove the node's own etcd
/// member. Written by this crate; the value is a truthy marker.
pub const ETCD_REMOVE_ANNOTATION: &str = "etcd.k3s.cattle.io/remove";

/// Annotation acknowledging that the agent completed self-removal. Written
/// by the agent; its presence is terminal.
pub const ETCD_REMOVED_NODE_ANNOTATION: &str = "etcd.k3s.cattle.io/removed-node-name";

/// Where a node stands in the decommission handshake, as encoded by the two
/// etcd annotations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecommissionState {
    /// No handshake annotations present yet.
    Requested,

    /// Removal has been requested; the agent has not acknowledged.
    RemoveRequested,

    /// The agent removed the member and acknowledged. Terminal.
    Removed,
}

impl DecommissionState {
    /// Reads the handshake state off a node's annotations.
    #[must_use]
    pub fn of(node: &Node) -> Self {
        if node.has_annotation(ETCD_REMOVED_NODE_ANNOTATION) {
            Self::Removed
        } else if node.has_annotation(ETCD_REMOVE_ANNOTATION) {
            Self::RemoveRequested
        } else {
            Self::Requested
        }
    }
}

/// Orchestrates removal of the etcd member tied to a departing machine.
///
/// While the node object still exists its member is never removed directly:
/// the member may be mid-write or participating in an in-flight consensus
/// round, so the node's own agent is asked to drain and self-remove, and
/// completion is observed on a later call.
pub struct NodeDecommissioner<C> {
    cluster: Arc<C>,
    config: MembershipConfig,
}

impl<C> NodeDecommissioner<C>
where
    C: NodeLister + NodePatcher,
{
    /// Creates a decommissioner with the default configuration.
    #[must_use]
    pub fn new(cluster: Arc<C>) -> Self {
        Self::with_config(cluster, MembershipConfig::default())
    }

    /// Creates a decommissioner with a custom configuration.
    #[must_use]
    pub fn with_config(cluster: Arc<C>, config: MembershipConfig) -> Self {
        Self { cluster, config }
    }

    /// Requests removal of the machine's etcd member and reports whether it
    /// has completed.
    ///
    /// Returns `Ok(true)` once the member is gone — immediately when the
    /// machine never had a node, or once the on-node agent has acknowledged.
    /// Returns `Ok(false)` after signalling intent while the handshake is
    /// still pending.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::QuorumFloorViolation`] rather than stranding the
    /// cluster when too few control-plane nodes remain, and surfaces node
    /// listing, lookup, and patch failures.
    pub async fn remove_for_machine(&self, machine: &Machine) -> Result<bool> {
        let Some(node_ref) = machine.node_ref() else {
            // Nothing to do, no node for the machine.
            return Ok(true);
        };
        self.request_removal(&node_ref.name).await
    }

    async fn request_removal(&self, node_name: &str) -> Result<bool> {
        let control_plane =
            list_nodes_above_floor(self.cluster.as_ref(), self.config.min_control_plane_nodes)
                .await?;

        let Some(node) = control_plane.iter().find(|node| node.name == node_name) else {
            return Err(Error::NodeNotFound(node_name.to_owned()));
        };

        match DecommissionState::of(node) {
            DecommissionState::Removed => {
                debug!(node = %node_name, "node agent acknowledged etcd member removal");
                Ok(true)
            }
            DecommissionState::Requested | DecommissionState::RemoveRequested => {
                let mut updated = node.clone();
                updated.set_annotation(ETCD_REMOVE_ANNOTATION, "true");
                self.cluster
                    .patch_node(&updated)
                    .await
                    .map_err(|e| Error::Patch {
                        node: node_name.to_owned(),
                        reason: e.to_string(),
                    })?;

                info!(node = %node_name, "requested etcd member removal from node agent");
                Ok(false)
            }
        }
    }
}
