//! # Asset Watch
//!
//! Lists cryptocurrency assets and per-asset detail from the CoinCap REST
//! API, keeps the last known state in memory and exposes it as observable
//! values and presentation-ready screen states.
//!
//! ## Usage
//!
//! The store is an ordinary value: build it once at the composition root and
//! hand `Arc` clones to whatever needs it.
//!
//! ```no_run
//! use asset_watch::{AssetStore, CoinCapProvider, ListScreenModel, PollerConfig, ProviderConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = CoinCapProvider::new(&ProviderConfig::from_env())?;
//! let store = Arc::new(AssetStore::new(Arc::new(provider)));
//!
//! // One-off fetch
//! store.fetch_list(10).await;
//! if let Some(assets) = store.observe_list().borrow().as_ref() {
//!     for asset in assets {
//!         println!("{}: ${:.2}", asset.symbol, asset.price_usd);
//!     }
//! }
//!
//! // Or let the list screen poll every minute
//! let screen = ListScreenModel::new(store.clone(), PollerConfig::default());
//! let mut states = screen.ui_state();
//! states.changed().await?;
//! println!("{:?}", *states.borrow());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ListPoller (every 60s)          DetailScreenModel (once, on creation)
//!     ↓                               ↓
//! AssetStore::fetch_list          AssetStore::fetch_detail
//!     ↓                               ↓
//!           AssetProvider (CoinCap)
//!     ↓
//! watch channels (list / detail / loading / error)
//!     ↓
//! projector → ListUiState / DetailUiState
//! ```

pub mod cancel;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod poller;
pub mod projector;
pub mod provider;
pub mod providers;
pub mod screens;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use config::{PollerConfig, ProviderConfig};
pub use error::ProviderError;
pub use poller::{ListPoller, PollerState};
pub use projector::{project_detail, project_list, DetailUiState, ListUiState};
pub use provider::AssetProvider;
pub use providers::CoinCapProvider;
pub use screens::{DetailScreenModel, ListScreenModel};
pub use store::{AssetStore, DetailWatch, FetchStatus};
pub use types::{Asset, AssetDetailState, AssetListState, AssetStoreEvent};
