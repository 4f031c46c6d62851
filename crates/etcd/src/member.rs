use serde::{Deserialize, Serialize};

/// An entry in etcd's internal membership list.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Member {
    /// Opaque numeric identifier, stable for the member's lifetime.
    pub id: u64,

    /// Advertised member name. Empty for a member that has been added to the
    /// cluster configuration but has not yet completed its own startup
    /// handshake.
    pub name: String,
}

impl Member {
    /// Creates a member.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Node name derived from the advertised member name.
    ///
    /// The on-node agent registers members as `<node-name>-<suffix>`, so the
    /// segment after the final `-` is trimmed. A name without a `-` is
    /// returned unchanged, and a mid-join member's empty name derives to the
    /// empty string.
    #[must_use]
    pub fn node_name(&self) -> &str {
        match self.name.rfind('-') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        }
    }
}

/// Finds the member whose derived node name equals `node_name`.
#[must_use]
pub fn member_for_node_name<'a>(members: &'a [Member], node_name: &str) -> Option<&'a Member> {
    members
        .iter()
        .find(|member| member.node_name() == node_name)
}
