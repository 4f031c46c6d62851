use quorate_cluster::{ClusterApiError, ClusterApiErrorKind};
use thiserror::Error;

/// Error type for the fake control-plane API.
#[derive(Debug, Error)]
pub enum Error {
    /// Injected listing failure.
    #[error("node listing failed")]
    Listing,

    /// The addressed node does not exist in the store.
    #[error("node {0} not found")]
    NodeNotFound(String),
}

impl ClusterApiError for Error {
    fn kind(&self) -> ClusterApiErrorKind {
        match self {
            Self::Listing => ClusterApiErrorKind::External,
            Self::NodeNotFound(_) => ClusterApiErrorKind::NodeNotFound,
        }
    }
}
