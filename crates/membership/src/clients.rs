//! Scoped release of acquired etcd clients.

use quorate_etcd::EtcdClient;
use tracing::warn;

/// Closes an acquired client. Release failures are downgraded to a warning
/// so they never mask the operation's own result.
pub(crate) async fn close_client<T: EtcdClient>(client: &T) {
    if let Err(err) = client.close().await {
        warn!(error = %err, "failed to close etcd client");
    }
}
