use std::fmt;

use thiserror::Error;

/// Convenience alias for membership operation results.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by membership operations.
///
/// Collaborator errors cross the trait seam as rendered strings so callers
/// are not coupled to a concrete client or API implementation.
#[derive(Debug, Error)]
pub enum Error {
    /// A removal would leave fewer control-plane nodes than the safety floor
    /// allows.
    #[error("removal refused: {remaining} control plane node(s) remaining, floor is {floor}")]
    QuorumFloorViolation {
        /// Control-plane nodes counted by the listing.
        remaining: usize,
        /// The configured floor.
        floor: usize,
    },

    /// Listing control-plane nodes failed.
    #[error("failed to list control plane nodes: {0}")]
    NodeList(String),

    /// No etcd client could be produced for the requested role.
    #[error("failed to create etcd client: {0}")]
    ClientAcquisition(String),

    /// Listing etcd members failed.
    #[error("failed to list etcd members: {0}")]
    MemberList(String),

    /// Removing an etcd member failed.
    #[error("failed to remove member from etcd: {0}")]
    RemoveMember(String),

    /// Transferring etcd leadership failed.
    #[error("failed to move leader: {0}")]
    MoveLeader(String),

    /// The target node is absent from the live control-plane node list.
    #[error("node {0} not found")]
    NodeNotFound(String),

    /// No etcd member corresponds to the given node.
    #[error("no etcd member found for node {0}")]
    MemberNotFound(String),

    /// Leadership forwarding was invoked without a successor.
    #[error("leader candidate is required")]
    MissingLeaderCandidate,

    /// The designated successor has no node reference.
    #[error("leader candidate has no node reference")]
    MissingCandidateNode,

    /// Patching node annotations failed.
    #[error("failed to patch node {node}: {reason}")]
    Patch {
        /// The node that was being patched.
        node: String,
        /// The underlying patch failure.
        reason: String,
    },

    /// Multiple independent failures from one best-effort pass.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Aggregate of every failure from a best-effort batch.
///
/// Each cause is preserved and rendered, rather than surfacing only the
/// first.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<Error>,
}

impl AggregateError {
    /// Wraps the collected failures.
    #[must_use]
    pub fn new(errors: Vec<Error>) -> Self {
        Self { errors }
    }

    /// The individual failures, in the order encountered.
    #[must_use]
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s) occurred", self.errors.len())?;
        for error in &self.errors {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
