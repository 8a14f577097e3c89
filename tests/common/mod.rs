//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod mock_api;

pub const BITCOIN_JSON: &str = r#"{
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

/// CoinCap-style asset object with the given id, rank and price
pub fn asset_json(id: &str, rank: u32, price: f64) -> String {
    format!(
        r#"{{"id": "{id}", "rank": "{rank}", "symbol": "{sym}", "name": "{id}",
            "supply": "1000.0", "maxSupply": null, "marketCapUsd": "{cap}",
            "volumeUsd24Hr": "10.0", "priceUsd": "{price}", "changePercent24Hr": "-0.5",
            "vwap24Hr": "{price}"}}"#,
        sym = id.to_uppercase(),
        cap = price * 1000.0,
    )
}

pub fn list_body(items: &[String]) -> String {
    format!(r#"{{"data": [{}], "timestamp": 1700000000000}}"#, items.join(","))
}

pub fn detail_body(item: &str) -> String {
    format!(r#"{{"data": {}, "timestamp": 1700000000000}}"#, item)
}
