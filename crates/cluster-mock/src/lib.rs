//! In-memory fake of the control-plane node API for deterministic tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use quorate_cluster::{Node, NodeLister, NodePatcher};
use tokio::sync::RwLock;

/// A fake control-plane API backed by an in-memory node store. Cloning
/// shares the underlying state.
#[derive(Clone, Default)]
pub struct MockClusterApi {
    nodes: Arc<RwLock<Vec<Node>>>,
    patches: Arc<RwLock<Vec<Node>>>,
    fail_listing: Arc<AtomicBool>,
    list_calls: Arc<AtomicUsize>,
}

impl MockClusterApi {
    /// Creates an empty fake API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the store.
    pub async fn add_node(&self, node: Node) {
        self.nodes.write().await.push(node);
    }

    /// Returns the stored node with the given name, if any.
    pub async fn node(&self, name: &str) -> Option<Node> {
        self.nodes
            .read()
            .await
            .iter()
            .find(|node| node.name == name)
            .cloned()
    }

    /// Every node passed to `patch_node`, in call order.
    pub async fn patched_nodes(&self) -> Vec<Node> {
        self.patches.read().await.clone()
    }

    /// Makes subsequent listing calls fail.
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Number of listing calls issued so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeLister for MockClusterApi {
    type Error = Error;

    async fn list_control_plane_nodes(&self) -> Result<Vec<Node>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(Error::Listing);
        }
        Ok(self.nodes.read().await.clone())
    }
}

#[async_trait]
impl NodePatcher for MockClusterApi {
    type Error = Error;

    async fn patch_node(&self, node: &Node) -> Result<(), Error> {
        let mut nodes = self.nodes.write().await;
        let Some(stored) = nodes.iter_mut().find(|stored| stored.name == node.name) else {
            return Err(Error::NodeNotFound(node.name.clone()));
        };
        // Last patch wins.
        stored.annotations = node.annotations.clone();
        drop(nodes);

        self.patches.write().await.push(node.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn patch_replaces_annotations_and_is_recorded() {
        let api = MockClusterApi::new();
        api.add_node(Node::new("cp-0")).await;

        let mut updated = Node::new("cp-0");
        updated.set_annotation("k", "v");
        api.patch_node(&updated).await.unwrap();

        let stored = api.node("cp-0").await.unwrap();
        assert_eq!(stored.annotations.get("k").map(String::as_str), Some("v"));
        assert_eq!(api.patched_nodes().await.len(), 1);
    }

    #[tokio::test]
    async fn patching_an_unknown_node_fails() {
        let api = MockClusterApi::new();
        let result = api.patch_node(&Node::new("ghost")).await;
        assert!(matches!(result, Err(Error::NodeNotFound(name)) if name == "ghost"));
    }

    #[tokio::test]
    async fn injected_listing_failure_surfaces() {
        let api = MockClusterApi::new();
        api.fail_listing(true);
        assert!(api.list_control_plane_nodes().await.is_err());
        assert_eq!(api.list_calls(), 1);
    }
}
