//! Forwarding etcd leadership ahead of deleting the leader's machine.

use std::sync::Arc;

use quorate_cluster::{Machine, NodeLister};
use quorate_etcd::{EtcdClient, EtcdClientFactory, member_for_node_name};
use tracing::{debug, info};

use crate::clients::close_client;
use crate::error::{Error, Result};

/// Moves etcd leadership off a machine that is about to be deleted.
pub struct LeadershipForwarder<E, C> {
    etcd: Arc<E>,
    nodes: Arc<C>,
}

impl<E, C> LeadershipForwarder<E, C>
where
    E: EtcdClientFactory,
    C: NodeLister,
{
    /// Creates a forwarder.
    #[must_use]
    pub fn new(etcd: Arc<E>, nodes: Arc<C>) -> Self {
        Self { etcd, nodes }
    }

    /// Transfers leadership to `candidate` if `outgoing` currently leads.
    ///
    /// A machine that was never associated with a node cannot be the leader,
    /// so that case is a no-op. `MoveLeader` is only valid against the
    /// leader itself, which is why client resolution is leader-bound. When
    /// the outgoing machine's member is absent or not the leader there is
    /// nothing to forward.
    ///
    /// # Errors
    ///
    /// Fails when no candidate is supplied, when the candidate has no node
    /// reference or no corresponding member, and on node listing, client
    /// acquisition, member listing, or transfer failures.
    pub async fn forward(&self, outgoing: &Machine, candidate: Option<&Machine>) -> Result<()> {
        let Some(outgoing_ref) = outgoing.node_ref() else {
            return Ok(());
        };
        let Some(candidate) = candidate else {
            return Err(Error::MissingLeaderCandidate);
        };
        let Some(candidate_ref) = candidate.node_ref() else {
            return Err(Error::MissingCandidateNode);
        };

        let nodes = self
            .nodes
            .list_control_plane_nodes()
            .await
            .map_err(|e| Error::NodeList(e.to_string()))?;
        let node_names: Vec<String> = nodes.into_iter().map(|node| node.name).collect();

        let client = self
            .etcd
            .for_leader(&node_names)
            .await
            .map_err(|e| Error::ClientAcquisition(e.to_string()))?;

        let moved = move_leader(&client, &outgoing_ref.name, &candidate_ref.name).await;
        close_client(&client).await;
        moved
    }
}

async fn move_leader<T: EtcdClient>(
    client: &T,
    outgoing_node: &str,
    candidate_node: &str,
) -> Result<()> {
    let members = client
        .members()
        .await
        .map_err(|e| Error::MemberList(e.to_string()))?;

    match member_for_node_name(&members, outgoing_node) {
        Some(member) if member.id == client.leader_id() => {}
        _ => {
            // Nothing to do, this machine is not the etcd leader.
            debug!(node = %outgoing_node, "machine does not hold etcd leadership");
            return Ok(());
        }
    }

    let Some(next_leader) = member_for_node_name(&members, candidate_node) else {
        return Err(Error::MemberNotFound(candidate_node.to_owned()));
    };

    info!(from = %outgoing_node, to = %candidate_node, "moving etcd leadership");
    client
        .move_leader(next_leader.id)
        .await
        .map_err(|e| Error::MoveLeader(e.to_string()))
}
