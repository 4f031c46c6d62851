use serde::{Deserialize, Serialize};

/// Reference from a machine to the node backing it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NodeRef {
    /// Name of the referenced node.
    pub name: String,
}

/// A provisioned compute instance, optionally bound to a live node.
///
/// Read-only from the perspective of membership management; the higher-level
/// reconciler owns its lifecycle.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Machine {
    /// Machine name.
    pub name: String,

    /// The node this machine backs, if one was ever associated.
    pub node_ref: Option<NodeRef>,
}

impl Machine {
    /// Creates a machine with no node association.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_ref: None,
        }
    }

    /// Creates a machine bound to the named node.
    #[must_use]
    pub fn with_node(name: impl Into<String>, node_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_ref: Some(NodeRef {
                name: node_name.into(),
            }),
        }
    }

    /// The machine's node reference, if any.
    #[must_use]
    pub const fn node_ref(&self) -> Option<&NodeRef> {
        self.node_ref.as_ref()
    }
}
