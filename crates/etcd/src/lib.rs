//! Abstract interface for the etcd wire client consumed by control-plane
//! membership management.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod member;

pub use member::{Member, member_for_node_name};

use std::error::Error;
use std::fmt::{self, Debug};

use async_trait::async_trait;

/// Marker trait for etcd client errors.
pub trait EtcdClientError: Debug + Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> EtcdClientErrorKind;
}

/// The kind of etcd client error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EtcdClientErrorKind {
    /// None of the requested peers could be reached.
    Unreachable,

    /// No peer in the requested set currently holds leadership.
    NoLeader,

    /// The addressed member does not exist.
    MemberNotFound,

    /// Other/unknown error.
    Other,
}

impl fmt::Display for EtcdClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A connection to a single etcd peer.
///
/// Connections are scoped resources: callers acquire one immediately before
/// use and call [`close`](EtcdClient::close) on every exit path.
#[async_trait]
pub trait EtcdClient: Send + Sync + 'static {
    /// The error type for client operations.
    type Error: EtcdClientError;

    /// Lists the cluster's current members. The request goes through
    /// consensus, so a successful response also proves the connected peer is
    /// healthy enough to participate in it.
    async fn members(&self) -> Result<Vec<Member>, Self::Error>;

    /// Removes the member with the given id from the cluster configuration.
    async fn remove_member(&self, id: u64) -> Result<(), Self::Error>;

    /// Transfers leadership to the member with the given id. Only valid when
    /// this client is connected to the current leader.
    async fn move_leader(&self, id: u64) -> Result<(), Self::Error>;

    /// Id of the member the connected peer considered leader when this
    /// client was resolved. A snapshot, not an RPC.
    fn leader_id(&self) -> u64;

    /// Releases the connection.
    async fn close(&self) -> Result<(), Self::Error>;
}

/// Produces [`EtcdClient`]s bound to a reachable peer, given a candidate set
/// of node names.
#[async_trait]
pub trait EtcdClientFactory: Send + Sync + 'static {
    /// The error type for client resolution.
    type Error: EtcdClientError;

    /// The client type handed out by this factory.
    type Client: EtcdClient;

    /// Resolves a client to any reachable peer among the given nodes.
    /// Sufficient for reads and for removals issued from a surviving peer.
    async fn for_first_available_node(
        &self,
        node_names: &[String],
    ) -> Result<Self::Client, Self::Error>;

    /// Resolves a client connected to the peer that currently holds
    /// leadership among the given nodes. Leadership transfer must be issued
    /// against the leader itself.
    async fn for_leader(&self, node_names: &[String]) -> Result<Self::Client, Self::Error>;
}
