use std::error::Error;
use std::fmt::{self, Debug};

/// Marker trait for control-plane API errors.
pub trait ClusterApiError: Debug + Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ClusterApiErrorKind;
}

/// The kind of control-plane API error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClusterApiErrorKind {
    /// The addressed node does not exist.
    NodeNotFound,

    /// Error reaching the cluster API itself.
    External,

    /// Other/unknown error.
    Other,
}

impl fmt::Display for ClusterApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
