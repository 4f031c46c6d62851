use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A live control-plane host.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Node {
    /// Unique, stable node name.
    pub name: String,

    /// Freeform node metadata. Membership management reads and writes a
    /// small set of etcd-related keys and leaves everything else untouched.
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl Node {
    /// Creates a node with no annotations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: HashMap::new(),
        }
    }

    /// Whether the annotation `key` is present, regardless of value.
    #[must_use]
    pub fn has_annotation(&self, key: &str) -> bool {
        self.annotations.contains_key(key)
    }

    /// Sets annotation `key` to `value`.
    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(key.into(), value.into());
    }
}
