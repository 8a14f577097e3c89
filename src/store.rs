//! In-memory asset store with observable state
//!
//! Every field (list, list loading flag, list error, and the same three for
//! the detail slot) lives in its own `tokio::sync::watch` channel. Observers
//! get the latest value on subscribe and are woken on every change; writes
//! equal to the current value are not broadcast.

use crate::{
    cancel::CancellationToken,
    constants::EVENT_CHANNEL_CAPACITY,
    provider::AssetProvider,
    types::{Asset, AssetDetailState, AssetListState, AssetStoreEvent},
};
use futures::Stream;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{broadcast, watch};

/// How a single fetch call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Result stored
    Updated,
    /// Error message stored, previous data kept
    Failed,
    /// Token cancelled before the result could be written
    Cancelled,
    /// A later-issued fetch on the same slot already wrote; this result was dropped
    Superseded,
}

enum Outcome<T> {
    Success(T),
    Failure(String),
    Cancelled,
}

/// Issue-order bookkeeping for one slot
#[derive(Default)]
struct Sequence {
    issued: u64,
    /// Ticket of the newest fetch whose result was written
    last_applied: u64,
    /// Tickets issued and not yet finished
    outstanding: Vec<u64>,
}

/// One observable slot: value, loading flag, error message
struct FetchSlot<T> {
    value: watch::Sender<Option<T>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    /// Also serializes the check-then-write in `finish` against `begin`
    sequence: Mutex<Sequence>,
}

fn set<T: PartialEq>(tx: &watch::Sender<T>, value: T) {
    tx.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}

impl<T: PartialEq> FetchSlot<T> {
    fn new() -> Self {
        Self {
            value: watch::channel(None).0,
            loading: watch::channel(false).0,
            error: watch::channel(None).0,
            sequence: Mutex::new(Sequence::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sequence> {
        match self.sequence.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn begin(&self) -> u64 {
        let mut sequence = self.lock();
        sequence.issued += 1;
        let ticket = sequence.issued;
        sequence.outstanding.push(ticket);
        set(&self.loading, true);
        set(&self.error, None);
        ticket
    }

    /// Writes `outcome` unless a later-issued fetch already wrote its result
    ///
    /// Cancelled fetches write nothing and do not hold back older ones. The
    /// loading flag stays set while a fetch newer than the last written one
    /// is still running.
    fn finish(&self, ticket: u64, outcome: Outcome<T>) -> FetchStatus {
        let mut sequence = self.lock();
        sequence.outstanding.retain(|t| *t != ticket);

        let status = match outcome {
            Outcome::Cancelled => FetchStatus::Cancelled,
            _ if ticket < sequence.last_applied => FetchStatus::Superseded,
            Outcome::Success(value) => {
                set(&self.value, Some(value));
                sequence.last_applied = ticket;
                FetchStatus::Updated
            }
            Outcome::Failure(message) => {
                set(&self.error, Some(message));
                sequence.last_applied = ticket;
                FetchStatus::Failed
            }
        };

        let last_applied = sequence.last_applied;
        let pending = sequence.outstanding.iter().any(|t| *t > last_applied);
        set(&self.loading, pending);
        status
    }
}

/// Authoritative in-memory state for the asset list and a single asset detail
///
/// Construct one per application and share it as `Arc<AssetStore>`.
pub struct AssetStore {
    provider: Arc<dyn AssetProvider>,
    list: FetchSlot<Vec<Asset>>,
    detail: FetchSlot<Asset>,
    events: broadcast::Sender<AssetStoreEvent>,
}

impl AssetStore {
    /// Creates an empty store backed by `provider`
    pub fn new(provider: Arc<dyn AssetProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            provider,
            list: FetchSlot::new(),
            detail: FetchSlot::new(),
            events,
        }
    }

    /// Returns the name of the backing provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Fetches the asset list and keeps the first `limit` entries
    ///
    /// Failures are stored in the list error slot; the previous list is
    /// left untouched.
    pub async fn fetch_list(&self, limit: usize) -> FetchStatus {
        self.fetch_list_with(limit, &CancellationToken::new()).await
    }

    /// Same as [`AssetStore::fetch_list`], abandoned when `token` is cancelled
    ///
    /// A cancelled fetch writes neither data nor error. It clears the loading
    /// flag unless another fetch it raced with is still running.
    pub async fn fetch_list_with(&self, limit: usize, token: &CancellationToken) -> FetchStatus {
        if token.is_cancelled() {
            return FetchStatus::Cancelled;
        }

        let ticket = self.list.begin();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.provider.fetch_assets() => Some(result),
        };

        let outcome = match result {
            _ if token.is_cancelled() => Outcome::Cancelled,
            None => Outcome::Cancelled,
            Some(Ok(assets)) => {
                let assets: Vec<Asset> = assets.into_iter().take(limit).collect();
                Outcome::Success(assets)
            }
            Some(Err(e)) => {
                let provider = self.provider_name();
                tracing::warn!(error = %e, provider, "Failed to fetch asset list");
                Outcome::Failure(e.to_string())
            }
        };

        let event = match &outcome {
            Outcome::Success(assets) => Some(AssetStoreEvent::list_updated(assets.len())),
            Outcome::Failure(message) => Some(AssetStoreEvent::list_fetch_failed(message.clone())),
            Outcome::Cancelled => None,
        };

        let status = self.list.finish(ticket, outcome);
        match status {
            FetchStatus::Updated | FetchStatus::Failed => {
                if let Some(event) = event {
                    tracing::debug!(limit, event = %event, "Asset list fetch finished");
                    let _ = self.events.send(event);
                }
            }
            FetchStatus::Superseded => {
                tracing::debug!(ticket, "Dropping superseded asset list result");
            }
            FetchStatus::Cancelled => {
                tracing::debug!("Asset list fetch cancelled");
            }
        }
        status
    }

    /// Fetches a single asset and replaces the detail slot
    pub async fn fetch_detail(&self, id: &str) -> FetchStatus {
        self.fetch_detail_with(id, &CancellationToken::new()).await
    }

    /// Same as [`AssetStore::fetch_detail`], abandoned when `token` is cancelled
    pub async fn fetch_detail_with(&self, id: &str, token: &CancellationToken) -> FetchStatus {
        if token.is_cancelled() {
            return FetchStatus::Cancelled;
        }

        let ticket = self.detail.begin();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.provider.fetch_asset(id) => Some(result),
        };

        let outcome = match result {
            _ if token.is_cancelled() => Outcome::Cancelled,
            None => Outcome::Cancelled,
            Some(Ok(asset)) => Outcome::Success(asset),
            Some(Err(e)) => {
                tracing::warn!(error = %e, asset_id = id, "Failed to fetch asset detail");
                Outcome::Failure(e.to_string())
            }
        };

        let event = match &outcome {
            Outcome::Success(asset) => Some(AssetStoreEvent::detail_updated(asset)),
            Outcome::Failure(message) => {
                Some(AssetStoreEvent::detail_fetch_failed(id, message.clone()))
            }
            Outcome::Cancelled => None,
        };

        let status = self.detail.finish(ticket, outcome);
        if matches!(status, FetchStatus::Updated | FetchStatus::Failed) {
            if let Some(event) = event {
                let _ = self.events.send(event);
            }
        } else {
            tracing::debug!(asset_id = id, ?status, "Asset detail result not written");
        }
        status
    }

    /// Subscribes to the stored list
    ///
    /// # Returns
    ///
    /// A receiver holding the current list (`None` before the first
    /// successful fetch) that is woken on every change.
    pub fn observe_list(&self) -> watch::Receiver<Option<Vec<Asset>>> {
        self.list.value.subscribe()
    }

    /// Subscribes to the list loading flag
    ///
    /// # Returns
    ///
    /// `true` while a list fetch is in flight.
    pub fn observe_list_loading(&self) -> watch::Receiver<bool> {
        self.list.loading.subscribe()
    }

    /// Subscribes to the message of the last failed list fetch
    ///
    /// Cleared when a new fetch starts.
    pub fn observe_list_error(&self) -> watch::Receiver<Option<String>> {
        self.list.error.subscribe()
    }

    /// Observes the asset with `id`
    ///
    /// Resolves to the detail slot whenever it holds an asset, whatever its
    /// id, and otherwise to the entry with `id` in the last list. Callers
    /// that may see another asset's detail compare ids themselves.
    ///
    /// # Arguments
    ///
    /// * `id` - Asset id looked up in the list, e.g. `"bitcoin"`
    pub fn observe_detail(&self, id: &str) -> DetailWatch {
        DetailWatch {
            id: id.to_string(),
            detail: self.detail.value.subscribe(),
            list: self.list.value.subscribe(),
            last: None,
        }
    }

    /// Subscribes to the detail loading flag
    pub fn observe_detail_loading(&self) -> watch::Receiver<bool> {
        self.detail.loading.subscribe()
    }

    /// Subscribes to the message of the last failed detail fetch
    ///
    /// # Returns
    ///
    /// A receiver holding `None` until a detail fetch fails, reset to `None`
    /// when the next detail fetch starts.
    pub fn observe_detail_error(&self) -> watch::Receiver<Option<String>> {
        self.detail.error.subscribe()
    }

    /// Subscribes to fetch events
    pub fn subscribe_events(&self) -> broadcast::Receiver<AssetStoreEvent> {
        self.events.subscribe()
    }

    /// Copies the current list slot
    pub fn snapshot_list(&self) -> AssetListState {
        AssetListState {
            assets: self.list.value.borrow().clone(),
            is_loading: *self.list.loading.borrow(),
            error_message: self.list.error.borrow().clone(),
        }
    }

    /// Copies the current detail slot
    pub fn snapshot_detail(&self) -> AssetDetailState {
        AssetDetailState {
            detail: self.detail.value.borrow().clone(),
            is_loading: *self.detail.loading.borrow(),
            error_message: self.detail.error.borrow().clone(),
        }
    }
}

/// Returns the detail slot if set, otherwise the list entry with `id`
pub fn resolve_detail(
    id: &str,
    detail: Option<&Asset>,
    list: Option<&[Asset]>,
) -> Option<Asset> {
    detail
        .or_else(|| list.and_then(|assets| assets.iter().find(|asset| asset.id == id)))
        .cloned()
}

/// Observer for a single asset returned by [`AssetStore::observe_detail`]
///
/// Yields nothing while neither the detail slot nor the list holds the id.
/// Consecutive equal values are yielded once.
pub struct DetailWatch {
    id: String,
    detail: watch::Receiver<Option<Asset>>,
    list: watch::Receiver<Option<Vec<Asset>>>,
    last: Option<Asset>,
}

impl DetailWatch {
    /// Returns the asset id this watch was created for
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resolves against the current store state without waiting
    pub fn current(&self) -> Option<Asset> {
        let detail = self.detail.borrow();
        let list = self.list.borrow();
        resolve_detail(&self.id, (*detail).as_ref(), (*list).as_deref())
    }

    /// Like [`DetailWatch::current`], and marks both inputs as seen
    pub fn resolve_and_mark_seen(&mut self) -> Option<Asset> {
        let detail = self.detail.borrow_and_update().clone();
        let list = self.list.borrow_and_update();
        resolve_detail(&self.id, detail.as_ref(), (*list).as_deref())
    }

    /// Waits until the detail slot or the list changes
    ///
    /// Errors only once the store has been dropped and neither input holds
    /// an unseen value.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        let detail_closed = tokio::select! {
            r = self.detail.changed() => match r {
                Ok(()) => return Ok(()),
                Err(_) => true,
            },
            r = self.list.changed() => match r {
                Ok(()) => return Ok(()),
                Err(_) => false,
            },
        };
        // One side is closed and fully seen; the other may still hold a value
        if detail_closed {
            self.list.changed().await
        } else {
            self.detail.changed().await
        }
    }

    /// Waits for the next resolved value that differs from the last one yielded
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn resolved(&mut self) -> Option<Asset> {
        if self.last.is_none() {
            if let Some(asset) = self.resolve_and_mark_seen() {
                self.last = Some(asset.clone());
                return Some(asset);
            }
        }

        loop {
            self.changed().await.ok()?;
            if let Some(asset) = self.resolve_and_mark_seen() {
                if self.last.as_ref() != Some(&asset) {
                    self.last = Some(asset.clone());
                    return Some(asset);
                }
            }
        }
    }

    /// Turns the watch into a stream of resolved values
    pub fn into_stream(self) -> impl Stream<Item = Asset> + Send + 'static {
        futures::stream::unfold(self, |mut watch| async move {
            watch.resolved().await.map(|asset| (asset, watch))
        })
    }
}
