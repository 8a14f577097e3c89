//! Screen models for the asset list and asset detail screens
//!
//! Each model owns a projection task that re-runs the matching projector
//! whenever one of its store inputs changes and publishes the result on a
//! `watch` channel. The published value is `None` until the first
//! projection is available. Dropping a model cancels everything it started.

use crate::{
    cancel::CancellationToken,
    config::PollerConfig,
    poller::{ListPoller, PollerState},
    projector::{project_detail, project_list, DetailUiState, ListUiState},
    store::AssetStore,
};
use std::sync::Arc;
use tokio::sync::watch;

fn publish<T: PartialEq>(tx: &watch::Sender<Option<T>>, value: T) {
    tx.send_if_modified(|current| {
        if current.as_ref() == Some(&value) {
            false
        } else {
            *current = Some(value);
            true
        }
    });
}

/// List screen: polls the list and projects it into [`ListUiState`]
pub struct ListScreenModel {
    ui_state: watch::Receiver<Option<ListUiState>>,
    poller: ListPoller,
    token: CancellationToken,
}

impl ListScreenModel {
    /// Starts the list poller and the projection task
    pub fn new(store: Arc<AssetStore>, config: PollerConfig) -> Self {
        let token = CancellationToken::new();
        let (tx, ui_state) = watch::channel(None);

        let mut loading = store.observe_list_loading();
        let mut list = store.observe_list();
        let mut error = store.observe_list_error();
        let projection_token = token.clone();

        tokio::spawn(async move {
            loop {
                let state = {
                    let is_loading = *loading.borrow_and_update();
                    let assets = list.borrow_and_update();
                    let error_message = error.borrow_and_update();
                    project_list(is_loading, (*assets).as_deref(), (*error_message).as_deref())
                };
                publish(&tx, state);

                let changed = tokio::select! {
                    _ = projection_token.cancelled() => break,
                    r = loading.changed() => r,
                    r = list.changed() => r,
                    r = error.changed() => r,
                };
                if changed.is_err() {
                    break;
                }
            }
            tracing::debug!("List projection stopped");
        });

        let poller = ListPoller::with_token(store, config, token.child_token());
        poller.start();

        Self {
            ui_state,
            poller,
            token,
        }
    }

    /// Subscribes to projected states
    pub fn ui_state(&self) -> watch::Receiver<Option<ListUiState>> {
        self.ui_state.clone()
    }

    pub fn current(&self) -> Option<ListUiState> {
        self.ui_state.borrow().clone()
    }

    pub fn poller_state(&self) -> PollerState {
        self.poller.state()
    }
}

impl Drop for ListScreenModel {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Detail screen for one asset id
///
/// Fires a one-shot detail fetch on creation. The fetch is tied to the
/// model's lifetime: once the model is dropped a late result is discarded.
pub struct DetailScreenModel {
    asset_id: String,
    store: Arc<AssetStore>,
    ui_state: watch::Receiver<Option<DetailUiState>>,
    token: CancellationToken,
}

impl DetailScreenModel {
    pub fn new(store: Arc<AssetStore>, asset_id: impl Into<String>) -> Self {
        let asset_id = asset_id.into();
        let token = CancellationToken::new();
        let (tx, ui_state) = watch::channel(None);

        let mut loading = store.observe_detail_loading();
        let mut detail = store.observe_detail(&asset_id);
        let projection_token = token.clone();

        tokio::spawn(async move {
            loop {
                let is_loading = *loading.borrow_and_update();
                if let Some(state) = project_detail(is_loading, detail.resolve_and_mark_seen()) {
                    publish(&tx, state);
                }

                let changed = tokio::select! {
                    _ = projection_token.cancelled() => break,
                    r = loading.changed() => r,
                    r = detail.changed() => r,
                };
                if changed.is_err() {
                    break;
                }
            }
            tracing::debug!(asset_id = detail.id(), "Detail projection stopped");
        });

        {
            let store = store.clone();
            let asset_id = asset_id.clone();
            let token = token.clone();
            tokio::spawn(async move {
                let status = store.fetch_detail_with(&asset_id, &token).await;
                tracing::debug!(asset_id = %asset_id, ?status, "Detail fetch finished");
            });
        }

        Self {
            asset_id,
            store,
            ui_state,
            token,
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Returns the store this screen reads from
    pub fn store(&self) -> &Arc<AssetStore> {
        &self.store
    }

    /// Subscribes to projected states
    pub fn ui_state(&self) -> watch::Receiver<Option<DetailUiState>> {
        self.ui_state.clone()
    }

    pub fn current(&self) -> Option<DetailUiState> {
        self.ui_state.borrow().clone()
    }
}

impl Drop for DetailScreenModel {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
