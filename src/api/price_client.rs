//! CoinGecko client for fetching live spot prices.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use backoff::{future::retry, Error as BackoffError, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::PriceQuote;
use crate::trading::CalculatorConfig;

use super::types::SimplePriceResponse;
use super::Asset;

/// Anything that can quote a USD price for an asset.
#[allow(async_fn_in_trait)]
pub trait PriceSource {
    async fn get_price(&self, asset: &Asset) -> Result<PriceQuote>;
}

/// Client for the CoinGecko public API (read-only).
pub struct PriceClient {
    client: Client,
    base_url: String,
    retry_budget: Duration,
}

impl PriceClient {
    /// Create with custom base URL and default timeouts (for testing).
    #[cfg(test)]
    pub fn with_base_url(base_url: String) -> Result<Self> {
        Self::from_config(&CalculatorConfig {
            price_api_url: base_url,
            ..Default::default()
        })
    }

    /// Create from calculator configuration.
    pub fn from_config(config: &CalculatorConfig) -> Result<Self> {
        Self::build(
            config.price_api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.retry_budget_secs),
        )
    }

    fn build(base_url: String, timeout: Duration, retry_budget: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_budget,
        })
    }

    fn price_url(&self, asset: &Asset) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_market_cap=false&include_24hr_vol=false",
            self.base_url, asset.id
        )
    }

    /// One request; connection failures, 429 and 5xx are worth retrying.
    async fn fetch_once(&self, url: &str) -> Result<SimplePriceResponse, BackoffError<anyhow::Error>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Price request failed");
                return Err(BackoffError::transient(
                    anyhow::Error::new(e).context("Failed to fetch price from API"),
                ));
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            warn!(status = %status, "Price API unavailable");
            return Err(BackoffError::transient(anyhow!(
                "Price request failed: {}",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackoffError::permanent(anyhow!(
                "Price request failed: {} - {}",
                status,
                body
            )));
        }

        response.json().await.map_err(|e| {
            BackoffError::permanent(
                anyhow::Error::new(e).context("Failed to parse price response"),
            )
        })
    }
}

impl PriceSource for PriceClient {
    /// Fetch the current USD price, retrying transient failures within
    /// the configured budget.
    async fn get_price(&self, asset: &Asset) -> Result<PriceQuote> {
        let url = self.price_url(asset);
        debug!(url = %url, "Fetching price");

        let policy = ExponentialBackoff {
            max_elapsed_time: Some(self.retry_budget),
            ..Default::default()
        };

        let body = retry(policy, || self.fetch_once(&url))
            .await
            .with_context(|| format!("Could not fetch price for {}", asset.symbol))?;

        let price = extract_price(&body, asset)?;
        debug!(symbol = asset.symbol, price = %price, "Fetched price");

        Ok(PriceQuote::new(asset.symbol, asset.id, price))
    }
}

/// Pull the USD price for `asset` out of a /simple/price body.
pub(crate) fn extract_price(body: &SimplePriceResponse, asset: &Asset) -> Result<Decimal> {
    let price = body
        .get(asset.id)
        .and_then(|prices| prices.usd)
        .ok_or_else(|| anyhow!("Could not fetch price for {}", asset.symbol))?;

    if price <= Decimal::ZERO {
        anyhow::bail!("Price API returned non-positive price {} for {}", price, asset.symbol);
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::assets;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response per connection, in order.
    /// Returns the base URL and a counter of accepted requests.
    async fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let reply = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    #[tokio::test]
    async fn test_get_price_retries_unavailable() {
        let (url, hits) = serve(vec![
            ("503 Service Unavailable", "{}"),
            ("200 OK", r#"{"bitcoin": {"usd": 65000}}"#),
        ])
        .await;
        let client = PriceClient::with_base_url(url).unwrap();

        let quote = client.get_price(assets::lookup("BTC").unwrap()).await.unwrap();

        assert_eq!(quote.price, dec!(65000));
        assert_eq!(quote.asset_id, "bitcoin");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_price_not_found_is_not_retried() {
        let (url, hits) = serve(vec![
            ("404 Not Found", r#"{"error": "coin not found"}"#),
            ("200 OK", r#"{"bitcoin": {"usd": 65000}}"#),
        ])
        .await;
        let client = PriceClient::with_base_url(url).unwrap();

        let err = client.get_price(assets::lookup("BTC").unwrap()).await.unwrap_err();

        assert!(format!("{:#}", err).contains("404"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_price_malformed_body_is_not_retried() {
        let (url, hits) = serve(vec![
            ("200 OK", "not json"),
            ("200 OK", r#"{"ethereum": {"usd": 3000}}"#),
        ])
        .await;
        let client = PriceClient::with_base_url(url).unwrap();

        let err = client.get_price(assets::lookup("ETH").unwrap()).await.unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to parse price response"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    fn parse(json: &str) -> SimplePriceResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_price() {
        let btc = assets::lookup("BTC").unwrap();
        let body = parse(r#"{"bitcoin": {"usd": 67321.5}}"#);
        assert_eq!(extract_price(&body, btc).unwrap(), dec!(67321.5));
    }

    #[test]
    fn test_extract_price_missing_coin() {
        let eth = assets::lookup("ETH").unwrap();
        let body = parse(r#"{"bitcoin": {"usd": 67321.5}}"#);
        let err = extract_price(&body, eth).unwrap_err();
        assert!(err.to_string().contains("ETH"));
    }

    #[test]
    fn test_extract_price_missing_currency() {
        let sol = assets::lookup("SOL").unwrap();
        let body = parse(r#"{"solana": {}}"#);
        assert!(extract_price(&body, sol).is_err());
    }

    #[test]
    fn test_extract_price_rejects_zero() {
        let doge = assets::lookup("DOGE").unwrap();
        let body = parse(r#"{"dogecoin": {"usd": 0}}"#);
        assert!(extract_price(&body, doge).is_err());
    }

    #[test]
    fn test_price_url() {
        let client = PriceClient::with_base_url("http://localhost:8080/api/v3/".to_string()).unwrap();
        let url = client.price_url(assets::lookup("avax").unwrap());
        assert_eq!(
            url,
            "http://localhost:8080/api/v3/simple/price?ids=avalanche-2&vs_currencies=usd&include_market_cap=false&include_24hr_vol=false"
        );
    }
}
