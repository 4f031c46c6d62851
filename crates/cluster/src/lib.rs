//! Control-plane data model and the Kubernetes-style API seams consumed by
//! membership management.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod machine;
mod node;

pub use error::{ClusterApiError, ClusterApiErrorKind};
pub use machine::{Machine, NodeRef};
pub use node::Node;

use async_trait::async_trait;

/// Lists the live control-plane node set.
#[async_trait]
pub trait NodeLister: Send + Sync + 'static {
    /// The error type for listing operations.
    type Error: ClusterApiError;

    /// Returns every control-plane node currently known to the cluster API,
    /// with name and annotations populated.
    async fn list_control_plane_nodes(&self) -> Result<Vec<Node>, Self::Error>;
}

/// Applies annotation patches to Node objects.
#[async_trait]
pub trait NodePatcher: Send + Sync + 'static {
    /// The error type for patch operations.
    type Error: ClusterApiError;

    /// Persists the given node's annotations, read-modify-write. The caller
    /// patches a node it just listed with only its own keys added, so
    /// unrelated annotations survive; across writers the last patch wins.
    async fn patch_node(&self, node: &Node) -> Result<(), Self::Error>;
}
