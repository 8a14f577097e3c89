use asset_watch::format::{format_price, round_percentage};
use asset_watch::{
    AssetStore, CoinCapProvider, DetailScreenModel, ListScreenModel, ListUiState, PollerConfig,
    ProviderConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("asset_watch=debug")),
        )
        .init();

    // Composition root: one provider, one store, shared by both screens
    let provider = CoinCapProvider::new(&ProviderConfig::from_env())?;
    let store = Arc::new(AssetStore::new(Arc::new(provider)));

    let list_screen = ListScreenModel::new(store.clone(), PollerConfig::default());
    let mut list_states = list_screen.ui_state();

    println!("Waiting for the asset list...");
    let first_id = loop {
        list_states.changed().await?;
        let state = list_states.borrow_and_update().clone();
        match state {
            Some(ListUiState::Loading) | None => println!("  loading"),
            Some(ListUiState::Error(message)) => println!("  error: {message}"),
            Some(ListUiState::Content(assets)) => {
                let assets = assets.unwrap_or_default();
                for asset in &assets {
                    println!(
                        "{:>3} {:<6} {:>12} {:>8}",
                        asset.rank,
                        asset.symbol,
                        format_price(asset.price_usd),
                        round_percentage(asset.change_percent_24h)
                    );
                }
                match assets.first() {
                    Some(asset) => break asset.id.clone(),
                    None => println!("  empty list"),
                }
            }
        }
    };

    let detail_screen = DetailScreenModel::new(store.clone(), first_id);
    let mut detail_states = detail_screen.ui_state();
    let deadline = tokio::time::sleep(Duration::from_secs(15));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = detail_states.changed() => {
                changed?;
                if let Some(state) = detail_states.borrow_and_update().clone() {
                    let d = &state.detail;
                    println!(
                        "{} ({}): price {} | market cap {} | volume 24h {} | supply {}{}",
                        d.name,
                        d.symbol,
                        format_price(d.price_usd),
                        format_price(d.market_cap_usd),
                        format_price(d.volume_usd_24h),
                        format_price(d.supply),
                        if state.is_refreshing { " (refreshing)" } else { "" }
                    );
                    if !state.is_refreshing {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
