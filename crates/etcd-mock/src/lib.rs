//! In-memory fake of an etcd cluster for deterministic tests.
//!
//! Every client handed out by the factory shares one cluster state, so a
//! removal issued through one client is observed by the next listing. The
//! factory tracks how many clients are open; tests assert the gauge returns
//! to zero to catch leaked connections.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use quorate_etcd::{EtcdClient, EtcdClientFactory, Member};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    members: Vec<Member>,
    leader_id: u64,
    unreachable: HashSet<String>,
    removed_member_ids: Vec<u64>,
    leader_moves: Vec<u64>,
    fail_member_list: bool,
    fail_remove_member: bool,
}

/// A fake etcd cluster. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct MockEtcdCluster {
    state: Arc<RwLock<State>>,
    open_clients: Arc<AtomicUsize>,
}

impl MockEtcdCluster {
    /// Creates an empty fake cluster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the member list.
    pub async fn set_members(&self, members: Vec<Member>) {
        self.state.write().await.members = members;
    }

    /// Marks which member currently holds leadership.
    pub async fn set_leader(&self, id: u64) {
        self.state.write().await.leader_id = id;
    }

    /// Marks a node's etcd endpoint unreachable.
    pub async fn set_unreachable(&self, node_name: &str) {
        self.state
            .write()
            .await
            .unreachable
            .insert(node_name.to_owned());
    }

    /// Makes subsequent member-list calls fail.
    pub async fn fail_member_list(&self, fail: bool) {
        self.state.write().await.fail_member_list = fail;
    }

    /// Makes subsequent remove-member calls fail.
    pub async fn fail_remove_member(&self, fail: bool) {
        self.state.write().await.fail_remove_member = fail;
    }

    /// The member list as the fake cluster currently knows it.
    pub async fn members(&self) -> Vec<Member> {
        self.state.read().await.members.clone()
    }

    /// Id of the member currently holding leadership.
    pub async fn leader_id(&self) -> u64 {
        self.state.read().await.leader_id
    }

    /// Member ids passed to `remove_member`, in call order.
    pub async fn removed_member_ids(&self) -> Vec<u64> {
        self.state.read().await.removed_member_ids.clone()
    }

    /// Member ids passed to `move_leader`, in call order.
    pub async fn leader_moves(&self) -> Vec<u64> {
        self.state.read().await.leader_moves.clone()
    }

    /// Number of clients handed out and not yet closed.
    #[must_use]
    pub fn open_clients(&self) -> usize {
        self.open_clients.load(Ordering::SeqCst)
    }

    fn client(&self, leader_id: u64) -> MockEtcdClient {
        self.open_clients.fetch_add(1, Ordering::SeqCst);
        MockEtcdClient {
            state: Arc::clone(&self.state),
            open_clients: Arc::clone(&self.open_clients),
            leader_id,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EtcdClientFactory for MockEtcdCluster {
    type Error = Error;
    type Client = MockEtcdClient;

    async fn for_first_available_node(
        &self,
        node_names: &[String],
    ) -> Result<MockEtcdClient, Error> {
        let state = self.state.read().await;
        if node_names
            .iter()
            .all(|name| state.unreachable.contains(name))
        {
            return Err(Error::NoReachablePeer);
        }
        let leader_id = state.leader_id;
        drop(state);

        Ok(self.client(leader_id))
    }

    async fn for_leader(&self, node_names: &[String]) -> Result<MockEtcdClient, Error> {
        let state = self.state.read().await;
        let leader_id = state.leader_id;
        let leader_node = state
            .members
            .iter()
            .find(|member| member.id == leader_id)
            .map(|member| member.node_name().to_owned());

        match leader_node {
            Some(node) if node_names.contains(&node) && !state.unreachable.contains(&node) => {
                drop(state);
                Ok(self.client(leader_id))
            }
            _ => Err(Error::NoLeader),
        }
    }
}

/// Client handle over the shared fake cluster state.
pub struct MockEtcdClient {
    state: Arc<RwLock<State>>,
    open_clients: Arc<AtomicUsize>,
    leader_id: u64,
    closed: AtomicBool,
}

impl MockEtcdClient {
    fn release(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.open_clients.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl EtcdClient for MockEtcdClient {
    type Error = Error;

    async fn members(&self) -> Result<Vec<Member>, Error> {
        let state = self.state.read().await;
        if state.fail_member_list {
            return Err(Error::MemberList);
        }
        Ok(state.members.clone())
    }

    async fn remove_member(&self, id: u64) -> Result<(), Error> {
        let mut state = self.state.write().await;
        if state.fail_remove_member {
            return Err(Error::RemoveMember);
        }
        let Some(position) = state.members.iter().position(|member| member.id == id) else {
            return Err(Error::MemberNotFound(id));
        };
        state.members.remove(position);
        state.removed_member_ids.push(id);
        Ok(())
    }

    async fn move_leader(&self, id: u64) -> Result<(), Error> {
        let mut state = self.state.write().await;
        if !state.members.iter().any(|member| member.id == id) {
            return Err(Error::MemberNotFound(id));
        }
        state.leader_id = id;
        state.leader_moves.push(id);
        Ok(())
    }

    fn leader_id(&self) -> u64 {
        self.leader_id
    }

    async fn close(&self) -> Result<(), Error> {
        self.release();
        Ok(())
    }
}

// Backstop for futures dropped mid-operation, so the open-client gauge stays
// honest under cancellation.
impl Drop for MockEtcdClient {
    fn drop(&mut self) {
        self.release();
    }
}
