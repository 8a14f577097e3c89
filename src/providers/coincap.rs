//! CoinCap asset provider implementation

use crate::{
    config::ProviderConfig,
    constants::ASSETS_ENDPOINT,
    error::ProviderError,
    provider::AssetProvider,
    types::{Asset, AssetDetailResponse, AssetListResponse},
};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

/// CoinCap asset provider
pub struct CoinCapProvider {
    client: Client,
    base_url: Url,
}

impl CoinCapProvider {
    /// Creates a new CoinCap provider
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ProviderError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidBaseUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self { client, base_url })
    }

    /// Builds `{base}/assets[/{id}]`, escaping the id as a single path segment
    fn build_url(&self, id: Option<&str>) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ProviderError::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(ASSETS_ENDPOINT);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        tracing::debug!(url = %url, "Fetching from CoinCap");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        let response = check_status(response).await?;
        let body = response.text().await.map_err(ProviderError::NetworkError)?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("Failed to parse CoinCap response: {}", e))
        })
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.as_u16() == 429 {
        return Err(ProviderError::RateLimitExceeded);
    }

    let message = match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => {
            let body = response.text().await.unwrap_or_default();
            if body.trim().is_empty() {
                "Unexpected status".to_string()
            } else {
                body
            }
        }
    };
    Err(ProviderError::http(status.as_u16(), message))
}

impl Default for CoinCapProvider {
    fn default() -> Self {
        Self::new(&ProviderConfig::default()).expect("Failed to create CoinCap provider")
    }
}

#[async_trait]
impl AssetProvider for CoinCapProvider {
    async fn fetch_assets(&self) -> Result<Vec<Asset>, ProviderError> {
        let url = self.build_url(None)?;
        let response: AssetListResponse = self.get_json(url).await?;

        tracing::debug!(count = response.data.len(), "Fetched asset list from CoinCap");

        Ok(response.data)
    }

    async fn fetch_asset(&self, id: &str) -> Result<Asset, ProviderError> {
        let url = self.build_url(Some(id))?;
        let response: AssetDetailResponse = self.get_json(url).await?;
        Ok(response.data)
    }

    fn provider_name(&self) -> &'static str {
        "coincap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> CoinCapProvider {
        CoinCapProvider::new(&ProviderConfig::default().with_base_url(base)).unwrap()
    }

    #[test]
    fn test_build_url() {
        let p = provider("https://api.coincap.io/v2");
        assert_eq!(
            p.build_url(None).unwrap().as_str(),
            "https://api.coincap.io/v2/assets"
        );
        assert_eq!(
            p.build_url(Some("bitcoin")).unwrap().as_str(),
            "https://api.coincap.io/v2/assets/bitcoin"
        );

        let p = provider("http://localhost:8080/v2/");
        assert_eq!(
            p.build_url(Some("usd coin")).unwrap().as_str(),
            "http://localhost:8080/v2/assets/usd%20coin"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let cfg = ProviderConfig::default().with_base_url("not a url");
        assert!(matches!(
            CoinCapProvider::new(&cfg),
            Err(ProviderError::InvalidBaseUrl(_))
        ));

        let cfg = ProviderConfig::default().with_base_url("mailto:someone@example.com");
        assert!(matches!(
            CoinCapProvider::new(&cfg),
            Err(ProviderError::InvalidBaseUrl(_))
        ));
    }
}
