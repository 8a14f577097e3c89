//! Types for the asset watcher

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Market data for a single cryptocurrency
///
/// Only ever built from a fully decoded response. CoinCap encodes numbers
/// as strings, so every numeric field goes through a lenient decoder that
/// accepts either representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Slug identifier, e.g. "bitcoin"
    pub id: String,

    /// Rank by market capitalization
    #[serde(deserialize_with = "de_rank")]
    pub rank: u32,

    /// Ticker symbol, e.g. "BTC"
    pub symbol: String,

    /// Display name
    pub name: String,

    /// Circulating supply
    #[serde(deserialize_with = "de_f64")]
    pub supply: f64,

    /// Maximum supply (0.0 when uncapped)
    #[serde(deserialize_with = "de_f64")]
    pub max_supply: f64,

    /// Market capitalization in USD
    #[serde(deserialize_with = "de_f64")]
    pub market_cap_usd: f64,

    /// Trading volume over the last 24h in USD
    #[serde(rename = "volumeUsd24Hr", deserialize_with = "de_f64")]
    pub volume_usd_24h: f64,

    /// Price in USD
    #[serde(deserialize_with = "de_f64")]
    pub price_usd: f64,

    /// 24h price change percentage
    #[serde(rename = "changePercent24Hr", deserialize_with = "de_f64")]
    pub change_percent_24h: f64,

    /// Volume-weighted average price over the last 24h
    #[serde(rename = "vwap24Hr", deserialize_with = "de_f64")]
    pub vwap_24h: f64,
}

/// `GET /assets` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct AssetListResponse {
    pub data: Vec<Asset>,
}

/// `GET /assets/{id}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct AssetDetailResponse {
    pub data: Asset,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Decodes a number sent either as a JSON number or a numeric string.
/// `null` decodes to 0.0.
fn de_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrString::Number(n)) => Ok(n),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}"))),
    }
}

fn de_rank<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = de_f64(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!("invalid rank {value}")));
    }
    Ok(value as u32)
}

/// Snapshot of the list slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetListState {
    pub assets: Option<Vec<Asset>>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// Snapshot of the detail slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetDetailState {
    pub detail: Option<Asset>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// Store events published on every successful or failed fetch
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStoreEvent {
    /// The asset list was replaced
    ListUpdated {
        id: Uuid,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A list fetch failed; previous list kept
    ListFetchFailed {
        id: Uuid,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The detail slot was replaced
    DetailUpdated {
        id: Uuid,
        asset_id: String,
        price_usd: f64,
        timestamp: DateTime<Utc>,
    },

    /// A detail fetch failed; previous detail kept
    DetailFetchFailed {
        id: Uuid,
        asset_id: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl AssetStoreEvent {
    pub(crate) fn list_updated(count: usize) -> Self {
        Self::ListUpdated {
            id: Uuid::new_v4(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn list_fetch_failed(error_message: String) -> Self {
        Self::ListFetchFailed {
            id: Uuid::new_v4(),
            error_message,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn detail_updated(asset: &Asset) -> Self {
        Self::DetailUpdated {
            id: Uuid::new_v4(),
            asset_id: asset.id.clone(),
            price_usd: asset.price_usd,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn detail_fetch_failed(asset_id: &str, error_message: String) -> Self {
        Self::DetailFetchFailed {
            id: Uuid::new_v4(),
            asset_id: asset_id.to_string(),
            error_message,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            Self::ListUpdated { id, .. }
            | Self::ListFetchFailed { id, .. }
            | Self::DetailUpdated { id, .. }
            | Self::DetailFetchFailed { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ListUpdated { .. } => "LIST_UPDATED",
            Self::ListFetchFailed { .. } => "LIST_FETCH_FAILED",
            Self::DetailUpdated { .. } => "DETAIL_UPDATED",
            Self::DetailFetchFailed { .. } => "DETAIL_FETCH_FAILED",
        }
    }
}

impl std::fmt::Display for AssetStoreEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListUpdated { count, .. } => write!(f, "Asset list updated: {count} assets"),
            Self::ListFetchFailed { error_message, .. } => {
                write!(f, "Asset list fetch failed: {error_message}")
            }
            Self::DetailUpdated {
                asset_id,
                price_usd,
                ..
            } => write!(f, "Asset detail updated: {asset_id} = ${price_usd:.2}"),
            Self::DetailFetchFailed {
                asset_id,
                error_message,
                ..
            } => write!(f, "Asset detail fetch failed for {asset_id}: {error_message}"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_coincap_strings() {
        let json = r#"{
            "id": "bitcoin",
            "rank": "1",
            "symbol": "BTC",
            "name": "Bitcoin",
            "supply": "18000000.0",
            "maxSupply": "21000000.0",
            "marketCapUsd": "600000000000.0",
            "volumeUsd24Hr": "50000000000.0",
            "priceUsd": "30000.0",
            "changePercent24Hr": "2.0",
            "vwap24Hr": "29000.0",
            "explorer": "https://blockchain.info/"
        }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset, fixtures::bitcoin());
    }

    #[test]
    fn test_decode_plain_numbers_and_null_max_supply() {
        let json = r#"{"data": {
            "id": "ethereum", "rank": 2, "symbol": "ETH", "name": "Ethereum",
            "supply": 120000000, "maxSupply": null, "marketCapUsd": 2.4e11,
            "volumeUsd24Hr": 1e10, "priceUsd": 2000.5, "changePercent24Hr": -1.25,
            "vwap24Hr": 1990
        }}"#;
        let response: AssetDetailResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.rank, 2);
        assert_eq!(response.data.max_supply, 0.0);
        assert_eq!(response.data.change_percent_24h, -1.25);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let bad_number = r#"{"id": "x", "rank": "1", "symbol": "X", "name": "X",
            "supply": "lots", "maxSupply": "1", "marketCapUsd": "1",
            "volumeUsd24Hr": "1", "priceUsd": "1", "changePercent24Hr": "1", "vwap24Hr": "1"}"#;
        assert!(serde_json::from_str::<Asset>(bad_number).is_err());

        let missing_id = r#"{"rank": "1", "symbol": "X", "name": "X",
            "supply": "1", "maxSupply": "1", "marketCapUsd": "1",
            "volumeUsd24Hr": "1", "priceUsd": "1", "changePercent24Hr": "1", "vwap24Hr": "1"}"#;
        assert!(serde_json::from_str::<Asset>(missing_id).is_err());

        let fractional_rank = r#"{"id": "x", "rank": "1.5", "symbol": "X", "name": "X",
            "supply": "1", "maxSupply": "1", "marketCapUsd": "1",
            "volumeUsd24Hr": "1", "priceUsd": "1", "changePercent24Hr": "1", "vwap24Hr": "1"}"#;
        assert!(serde_json::from_str::<Asset>(fractional_rank).is_err());
    }

    #[test]
    fn test_event_display() {
        let event = AssetStoreEvent::detail_updated(&fixtures::bitcoin());
        assert_eq!(event.event_type(), "DETAIL_UPDATED");
        assert_eq!(event.to_string(), "Asset detail updated: bitcoin = $30000.00");
    }
}
