//! Periodic asset list refresh
//!
//! `Idle → Running → Cancelled`. While running, the poller calls
//! `fetch_list(list_size)`, waits one interval and repeats. Errors are
//! absorbed by the store, so the loop never stops on its own.

use crate::{cancel::CancellationToken, config::PollerConfig, store::AssetStore};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PollerState {
    Idle = 0,
    Running = 1,
    Cancelled = 2,
}

impl PollerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PollerState::Idle,
            1 => PollerState::Running,
            _ => PollerState::Cancelled,
        }
    }
}

/// Background task refreshing the store's asset list on a fixed cadence
///
/// Dropping the poller cancels it.
pub struct ListPoller {
    store: Arc<AssetStore>,
    config: PollerConfig,
    token: CancellationToken,
    state: Arc<AtomicU8>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ListPoller {
    /// Creates an idle poller; call [`ListPoller::start`] to begin polling
    ///
    /// # Arguments
    ///
    /// * `store` - Store whose list is refreshed
    /// * `config` - Refresh interval and number of assets kept per fetch
    pub fn new(store: Arc<AssetStore>, config: PollerConfig) -> Self {
        Self::with_token(store, config, CancellationToken::new())
    }

    /// Creates a poller that also stops when `token` is cancelled
    pub fn with_token(
        store: Arc<AssetStore>,
        config: PollerConfig,
        token: CancellationToken,
    ) -> Self {
        Self {
            store,
            config,
            token,
            state: Arc::new(AtomicU8::new(PollerState::Idle as u8)),
            handle: Mutex::new(None),
        }
    }

    /// Returns the lifecycle state
    ///
    /// # Returns
    ///
    /// `Cancelled` as soon as the token is cancelled, even if the task has
    /// not observed it yet.
    pub fn state(&self) -> PollerState {
        if self.token.is_cancelled() {
            return PollerState::Cancelled;
        }
        PollerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Spawns the polling task. Only the first call from `Idle` has an effect.
    pub fn start(&self) {
        if self
            .state
            .compare_exchange(
                PollerState::Idle as u8,
                PollerState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            tracing::debug!(state = ?self.state(), "List poller already started");
            return;
        }

        let store = self.store.clone();
        let token = self.token.clone();
        let state = self.state.clone();
        let PollerConfig {
            interval,
            list_size,
        } = self.config;

        let handle = tokio::spawn(async move {
            tracing::info!(
                refresh_interval_secs = interval.as_secs(),
                list_size,
                provider = store.provider_name(),
                "Starting asset list poller"
            );

            while !token.is_cancelled() {
                // Not raced against the token: an in-flight fetch finishes.
                let status = store.fetch_list(list_size).await;
                tracing::trace!(?status, "Asset list poll finished");

                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = sleep(interval) => {}
                }
            }

            state.store(PollerState::Cancelled as u8, Ordering::SeqCst);
            tracing::info!("Asset list poller stopped");
        });

        let mut slot = match self.handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(handle);
    }

    /// Stops future iterations; a fetch already in flight is left to finish
    pub fn cancel(&self) {
        self.token.cancel();
        self.state.store(PollerState::Cancelled as u8, Ordering::SeqCst);
    }

    /// Cancels and waits for the polling task to exit
    pub async fn shutdown(&self) {
        self.cancel();
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Asset list poller task failed");
            }
        }
    }
}

impl Drop for ListPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
