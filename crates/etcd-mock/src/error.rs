use quorate_etcd::{EtcdClientError, EtcdClientErrorKind};
use thiserror::Error;

/// Error type for the fake etcd cluster.
#[derive(Debug, Error)]
pub enum Error {
    /// None of the requested peers is reachable.
    #[error("no reachable etcd peer among the requested nodes")]
    NoReachablePeer,

    /// No reachable peer among the requested nodes holds leadership.
    #[error("no etcd leader among the requested nodes")]
    NoLeader,

    /// Injected member-list failure.
    #[error("member list failed")]
    MemberList,

    /// Injected remove-member failure.
    #[error("remove member failed")]
    RemoveMember,

    /// The addressed member does not exist.
    #[error("member {0:#x} not found")]
    MemberNotFound(u64),
}

impl EtcdClientError for Error {
    fn kind(&self) -> EtcdClientErrorKind {
        match self {
            Self::NoReachablePeer => EtcdClientErrorKind::Unreachable,
            Self::NoLeader => EtcdClientErrorKind::NoLeader,
            Self::MemberNotFound(_) => EtcdClientErrorKind::MemberNotFound,
            Self::MemberList | Self::RemoveMember => EtcdClientErrorKind::Other,
        }
    }
}
