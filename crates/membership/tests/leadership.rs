//! Forwarding etcd leadership before deleting the leader's machine.

use std::sync::Arc;

use quorate_cluster::{Machine, Node};
use quorate_cluster_mock::MockClusterApi;
use quorate_etcd::Member;
use quorate_etcd_mock::MockEtcdCluster;
use quorate_membership::{Error, LeadershipForwarder};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn two_member_setup() -> (Arc<MockEtcdCluster>, Arc<MockClusterApi>) {
    let etcd = Arc::new(MockEtcdCluster::new());
    let api = Arc::new(MockClusterApi::new());
    api.add_node(Node::new("alpha")).await;
    api.add_node(Node::new("beta")).await;
    etcd.set_members(vec![
        Member::new(1, "alpha-00aa11bb"),
        Member::new(2, "beta-22cc33dd"),
    ])
    .await;
    (etcd, api)
}

#[tokio::test]
async fn machine_without_node_is_a_noop() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), Arc::clone(&api));

    forwarder
        .forward(
            &Machine::new("machine-0"),
            Some(&Machine::with_node("machine-1", "beta")),
        )
        .await
        .unwrap();

    assert_eq!(api.list_calls(), 0);
    assert!(etcd.leader_moves().await.is_empty());
    assert_eq!(etcd.open_clients(), 0);
}

#[tokio::test]
async fn missing_candidate_is_an_error_before_any_etcd_call() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), Arc::clone(&api));

    let result = forwarder
        .forward(&Machine::with_node("machine-0", "alpha"), None)
        .await;

    assert!(matches!(result, Err(Error::MissingLeaderCandidate)));
    assert_eq!(api.list_calls(), 0);
    assert!(etcd.leader_moves().await.is_empty());
    assert_eq!(etcd.open_clients(), 0);
}

#[tokio::test]
async fn candidate_without_node_is_an_error() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), Arc::clone(&api));

    let result = forwarder
        .forward(
            &Machine::with_node("machine-0", "alpha"),
            Some(&Machine::new("machine-1")),
        )
        .await;

    assert!(matches!(result, Err(Error::MissingCandidateNode)));
    assert!(etcd.leader_moves().await.is_empty());
}

#[tokio::test]
async fn non_leader_machine_is_a_noop() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    etcd.set_leader(2).await;

    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), api);
    forwarder
        .forward(
            &Machine::with_node("machine-0", "alpha"),
            Some(&Machine::with_node("machine-1", "beta")),
        )
        .await
        .unwrap();

    assert!(etcd.leader_moves().await.is_empty());
    assert_eq!(etcd.leader_id().await, 2);
    assert_eq!(etcd.open_clients(), 0);
}

#[tokio::test]
async fn leadership_moves_to_the_candidate() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    etcd.set_leader(1).await;

    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), api);
    forwarder
        .forward(
            &Machine::with_node("machine-0", "alpha"),
            Some(&Machine::with_node("machine-1", "beta")),
        )
        .await
        .unwrap();

    assert_eq!(etcd.leader_moves().await, vec![2]);
    assert_eq!(etcd.leader_id().await, 2);
    assert_eq!(etcd.open_clients(), 0);
}

#[tokio::test]
async fn outgoing_machine_without_member_is_a_noop() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    api.add_node(Node::new("gamma")).await;
    etcd.set_leader(1).await;

    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), api);
    forwarder
        .forward(
            &Machine::with_node("machine-0", "gamma"),
            Some(&Machine::with_node("machine-1", "beta")),
        )
        .await
        .unwrap();

    assert!(etcd.leader_moves().await.is_empty());
    assert_eq!(etcd.open_clients(), 0);
}

#[tokio::test]
async fn missing_candidate_member_is_reported() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    api.add_node(Node::new("gamma")).await;
    etcd.set_leader(1).await;

    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), api);
    let result = forwarder
        .forward(
            &Machine::with_node("machine-0", "alpha"),
            Some(&Machine::with_node("machine-1", "gamma")),
        )
        .await;

    assert!(matches!(result, Err(Error::MemberNotFound(name)) if name == "gamma"));
    assert!(etcd.leader_moves().await.is_empty());
    assert_eq!(etcd.open_clients(), 0);
}

#[tokio::test]
async fn unreachable_leader_surfaces_acquisition_failure() {
    init_tracing();
    let (etcd, api) = two_member_setup().await;
    etcd.set_leader(1).await;
    etcd.set_unreachable("alpha").await;

    let forwarder = LeadershipForwarder::new(Arc::clone(&etcd), api);
    let result = forwarder
        .forward(
            &Machine::with_node("machine-0", "alpha"),
            Some(&Machine::with_node("machine-1", "beta")),
        )
        .await;

    assert!(matches!(result, Err(Error::ClientAcquisition(_))));
    assert!(etcd.leader_moves().await.is_empty());
    assert_eq!(etcd.open_clients(), 0);
}
