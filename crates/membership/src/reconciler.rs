//! Best-effort reconciliation of etcd membership against the live node set.

use std::sync::Arc;

use quorate_cluster::NodeLister;
use quorate_etcd::{EtcdClient, EtcdClientFactory, member_for_node_name};
use tracing::{debug, info};

use crate::clients::close_client;
use crate::error::{AggregateError, Error, Result};
use crate::quorum::{MembershipConfig, list_nodes_above_floor};

/// Outcome of one reconciliation pass.
///
/// Removal failures do not abort the pass, so removed member names and
/// failures are reported side by side. A member whose removal failed is
/// still present in etcd and is picked up again on the next pass.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Derived node names of members targeted for removal, in encounter
    /// order.
    pub removed_members: Vec<String>,

    /// Every per-member failure from this pass.
    pub errors: Vec<Error>,
}

impl ReconcileOutcome {
    /// Collapses the outcome into a result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aggregate`] preserving every per-member failure when
    /// any occurred.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.removed_members)
        } else {
            Err(Error::Aggregate(AggregateError::new(self.errors)))
        }
    }
}

/// Removes etcd members that no longer have a corresponding control-plane
/// node, so the control plane stops running health checks against them.
pub struct MembershipReconciler<E, C> {
    etcd: Arc<E>,
    nodes: Arc<C>,
    config: MembershipConfig,
}

impl<E, C> MembershipReconciler<E, C>
where
    E: EtcdClientFactory,
    C: NodeLister,
{
    /// Creates a reconciler with the default configuration.
    #[must_use]
    pub fn new(etcd: Arc<E>, nodes: Arc<C>) -> Self {
        Self::with_config(etcd, nodes, MembershipConfig::default())
    }

    /// Creates a reconciler with a custom configuration.
    #[must_use]
    pub fn with_config(etcd: Arc<E>, nodes: Arc<C>, config: MembershipConfig) -> Self {
        Self {
            etcd,
            nodes,
            config,
        }
    }

    /// Scans each node's view of the member list for members with no
    /// corresponding node and removes them with best effort.
    ///
    /// Nodes are processed sequentially in input order so that removals
    /// never race a shrinking quorum floor within one pass. A node whose
    /// etcd is unreachable, or whose member listing fails, is skipped until
    /// the next pass without surfacing an error; a single unreachable node
    /// must never block correction of the others.
    pub async fn reconcile(&self, node_names: &[String]) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        for node_name in node_names {
            self.reconcile_node(node_names, node_name, &mut outcome)
                .await;
        }
        outcome
    }

    async fn reconcile_node(
        &self,
        node_names: &[String],
        node_name: &str,
        outcome: &mut ReconcileOutcome,
    ) {
        let client = match self
            .etcd
            .for_first_available_node(&[node_name.to_owned()])
            .await
        {
            Ok(client) => client,
            Err(err) => {
                debug!(node = %node_name, error = %err, "etcd unreachable, skipping node this pass");
                return;
            }
        };

        let members = match client.members().await {
            Ok(members) => members,
            Err(err) => {
                debug!(node = %node_name, error = %err, "failed to list etcd members, skipping node this pass");
                close_client(&client).await;
                return;
            }
        };

        for member in &members {
            let member_node = member.node_name();
            // A freshly added member advertises an empty name until its etcd
            // starts; removing it would race its own bootstrap.
            if member_node.is_empty() {
                continue;
            }
            if node_names.iter().any(|name| name == member_node) {
                continue;
            }

            info!(node = %member_node, "removing etcd member for nonexisting node");
            outcome.removed_members.push(member_node.to_owned());
            if let Err(err) = self.remove_member_for_missing_node(member_node).await {
                outcome.errors.push(err);
            }
        }

        close_client(&client).await;
    }

    /// Removes the member belonging to a node that no longer exists,
    /// refusing when the control plane is at its safety floor.
    async fn remove_member_for_missing_node(&self, node_name: &str) -> Result<()> {
        let control_plane =
            list_nodes_above_floor(self.nodes.as_ref(), self.config.min_control_plane_nodes)
                .await?;

        // The departed node's own etcd may already be gone; resolve a client
        // among the survivors.
        let remaining: Vec<String> = control_plane
            .iter()
            .filter(|node| node.name != node_name)
            .map(|node| node.name.clone())
            .collect();

        let client = self
            .etcd
            .for_first_available_node(&remaining)
            .await
            .map_err(|e| Error::ClientAcquisition(e.to_string()))?;

        let removal = remove_member(&client, node_name).await;
        close_client(&client).await;
        removal
    }
}

/// Members are addressed by numeric id, so the target is resolved from a
/// fresh listing; a member that is already gone counts as removed.
async fn remove_member<T: EtcdClient>(client: &T, node_name: &str) -> Result<()> {
    let members = client
        .members()
        .await
        .map_err(|e| Error::MemberList(e.to_string()))?;

    let Some(member) = member_for_node_name(&members, node_name) else {
        return Ok(());
    };

    client
        .remove_member(member.id)
        .await
        .map_err(|e| Error::RemoveMember(e.to_string()))
}
