use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::model::{DepthLevel, Quote};

const QUOTE_API_URL: &str = "https://api.upstox.com/v2/market-quote/quotes";

// ── Quote source trait ──────────────────────────────────────────────

/// The quote-fetch collaborator: given a batch of instrument keys, return
/// live quotes keyed by `instrument_token`. Tests substitute mocks.
#[async_trait]
pub trait QuoteSource {
    async fn fetch_quotes(&self, keys: &[String]) -> Result<HashMap<String, Quote>>;
}

// ── Upstox API response types ───────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    data: HashMap<String, RawQuote>,
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    instrument_token: String,
    #[serde(default)]
    last_price: f64,
    #[serde(default)]
    depth: RawDepth,
}

#[derive(Debug, Default, Deserialize)]
struct RawDepth {
    #[serde(default)]
    buy: Vec<RawLevel>,
    #[serde(default)]
    sell: Vec<RawLevel>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct RawLevel {
    #[serde(default)]
    price: f64,
    #[serde(default)]
    quantity: i64,
}

/// Re-key the response by `instrument_token`: the API keys its map by
/// exchange symbol, not by the instrument key that was requested.
fn into_quotes(resp: QuoteResponse) -> HashMap<String, Quote> {
    resp.data
        .into_values()
        .map(|raw| {
            let best_bid = best_level(&raw.depth.buy);
            let best_ask = best_level(&raw.depth.sell);
            let quote = Quote {
                instrument_token: raw.instrument_token.clone(),
                last_price: raw.last_price,
                best_bid,
                best_ask,
            };
            (raw.instrument_token, quote)
        })
        .collect()
}

/// Depth lists are ordered best-first; zero-price padding rows mean no order.
fn best_level(levels: &[RawLevel]) -> Option<DepthLevel> {
    levels
        .first()
        .filter(|l| l.price > 0.0)
        .map(|l| DepthLevel {
            price: l.price,
            quantity: l.quantity,
        })
}

// ── Upstox client ───────────────────────────────────────────────────

/// Batched market-quote client against the Upstox REST API.
pub struct UpstoxQuotes {
    client: reqwest::Client,
    token: String,
    url: String,
}

impl UpstoxQuotes {
    pub fn new(client: reqwest::Client, token: String) -> Self {
        Self {
            client,
            token,
            url: QUOTE_API_URL.to_string(),
        }
    }
}

#[async_trait]
impl QuoteSource for UpstoxQuotes {
    async fn fetch_quotes(&self, keys: &[String]) -> Result<HashMap<String, Quote>> {
        let joined = keys.join(",");
        let resp = retry(3, || {
            let client = self.client.clone();
            let url = self.url.clone();
            let token = self.token.clone();
            let joined = joined.clone();
            async move {
                let r = client
                    .get(&url)
                    .query(&[("instrument_key", joined.as_str())])
                    .bearer_auth(&token)
                    .header("Accept", "application/json")
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<QuoteResponse>()
                    .await?;
                Ok(r)
            }
        })
        .await
        .context("fetching market quotes")?;

        Ok(into_quotes(resp))
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Retry an async operation with exponential backoff.
pub async fn retry<T, F, Fut>(max_retries: u32, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..=max_retries {
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                last_err = Some(e);
                if attempt < max_retries {
                    let delay = std::time::Duration::from_millis(1000 * 2u64.pow(attempt));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(last_err.unwrap())
}

#[derive(Debug, Deserialize)]
struct TokenFile {
    access_token: String,
}

/// Read the bearer token produced by the (external) login flow.
pub fn load_token(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading token file {}", path.display()))?;
    let token: TokenFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing token file {}", path.display()))?;
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_rekeys_quote_response() {
        let body = r#"{
            "status": "success",
            "data": {
                "NSE_EQ:RELIANCE": {
                    "instrument_token": "NSE_EQ|INE002A01018",
                    "last_price": 2870.5,
                    "depth": {
                        "buy": [{"price": 2870.0, "quantity": 10, "orders": 2}],
                        "sell": [{"price": 2871.0, "quantity": 5, "orders": 1}]
                    }
                },
                "NSE_EQ:ILLIQUID": {
                    "instrument_token": "NSE_EQ|ILLIQ",
                    "last_price": 12.0,
                    "depth": {
                        "buy": [{"price": 0.0, "quantity": 0, "orders": 0}],
                        "sell": []
                    }
                }
            }
        }"#;

        let resp: QuoteResponse = serde_json::from_str(body).unwrap();
        let quotes = into_quotes(resp);

        let rel = &quotes["NSE_EQ|INE002A01018"];
        assert_eq!(rel.last_price, 2870.5);
        assert_eq!(rel.best_bid_price(), Some(2870.0));
        assert_eq!(rel.best_ask_price(), Some(2871.0));

        // Zero-price padding rows are not real orders.
        let ill = &quotes["NSE_EQ|ILLIQ"];
        assert_eq!(ill.best_bid, None);
        assert_eq!(ill.best_ask, None);
    }

    #[test]
    fn missing_depth_yields_empty_book() {
        let body = r#"{"data": {"X": {"instrument_token": "T|1", "last_price": 5.0}}}"#;
        let resp: QuoteResponse = serde_json::from_str(body).unwrap();
        let quotes = into_quotes(resp);
        assert_eq!(quotes["T|1"].best_bid, None);
        assert_eq!(quotes["T|1"].last_price, 5.0);
    }
}
