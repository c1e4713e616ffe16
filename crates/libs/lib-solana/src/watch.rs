//! # Native Balance Watcher
//!
//! Subscribes to account-change notifications over the cluster websocket and
//! re-fetches the native balance on each one, publishing results through a
//! `tokio::sync::watch` channel.
//!
//! The subscription task is detached; dropping the watcher aborts it, which
//! releases the subscription. Results are tagged with a fetch generation so
//! one that resolves after a newer fetch began is discarded rather than
//! applied.

use std::sync::Arc;

use futures_util::StreamExt;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::balance::FetchSequencer;
use crate::client::SolanaClient;
use crate::cluster::Cluster;

/// Live view of one account's native balance.
///
/// `None` means the balance is not yet known or the account does not exist.
pub struct BalanceWatcher {
    receiver: watch::Receiver<Option<f64>>,
    task: JoinHandle<()>,
}

impl BalanceWatcher {
    /// Start watching `owner`'s native balance.
    ///
    /// An initial fetch runs immediately; afterwards the balance refreshes
    /// on every account-change notification. If the websocket subscription
    /// cannot be established the initial value remains the last successful
    /// fetch.
    pub fn spawn(client: Arc<SolanaClient>, owner: Pubkey) -> Self {
        let (sender, receiver) = watch::channel(None);
        let task = tokio::spawn(run(client, owner, sender));
        Self { receiver, task }
    }

    /// Subscribe to balance updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.receiver.clone()
    }

    /// Most recently observed balance in SOL.
    pub fn latest(&self) -> Option<f64> {
        *self.receiver.borrow()
    }
}

impl Drop for BalanceWatcher {
    fn drop(&mut self) {
        // Releases the websocket subscription along with the task.
        self.task.abort();
    }
}

async fn run(client: Arc<SolanaClient>, owner: Pubkey, sender: watch::Sender<Option<f64>>) {
    let sequencer = FetchSequencer::new();

    refresh(&client, &owner, &sender, &sequencer).await;

    let ws_url = Cluster::ws_url(client.url());
    let pubsub = match PubsubClient::new(&ws_url).await {
        Ok(pubsub) => pubsub,
        Err(e) => {
            warn!("websocket connection to {ws_url} failed, balance will not auto-refresh: {e}");
            return;
        }
    };

    let (mut notifications, unsubscribe) = match pubsub.account_subscribe(&owner, None).await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!("account subscription for {owner} failed: {e}");
            return;
        }
    };

    debug!("watching account changes for {owner}");
    while notifications.next().await.is_some() {
        refresh(&client, &owner, &sender, &sequencer).await;
    }

    unsubscribe().await;
}

async fn refresh(
    client: &SolanaClient,
    owner: &Pubkey,
    sender: &watch::Sender<Option<f64>>,
    sequencer: &FetchSequencer,
) {
    let generation = sequencer.begin();
    match client.native_balance(owner).await {
        // A fetch that lost the race to a newer one is dropped.
        Ok(balance) if sequencer.is_current(generation) => {
            let _ = sender.send(balance);
        }
        Ok(_) => debug!("discarding stale balance fetch for {owner}"),
        Err(e) => warn!("balance refresh failed for {owner}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SolanaClient;

    #[tokio::test]
    #[ignore] // Requires RPC + websocket connection
    async fn test_watcher_reports_initial_balance() {
        let client = Arc::new(SolanaClient::builder().cluster(Cluster::Devnet).build());
        let owner = Pubkey::new_unique();

        let watcher = BalanceWatcher::spawn(client, owner);
        let mut updates = watcher.subscribe();
        updates.changed().await.unwrap();
        // A fresh random account does not exist on-chain.
        assert_eq!(*updates.borrow(), None);
    }
}
