use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{FetchError, PriceSource, validate_price};

pub const COINGECKO_SIMPLE_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// `simple/price` body: `{ "<asset id>": { "<vs currency>": price } }`.
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// CoinGecko `simple/price` client for a single asset.
#[derive(Clone, Debug)]
pub struct CoinGeckoSource {
    http: Client,
    url: String,
    asset: String,
    vs: String,
}

impl CoinGeckoSource {
    pub fn new(
        url: impl Into<String>,
        asset: &str,
        vs: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(concat!("signal-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
            asset: asset.trim().to_lowercase(),
            vs: vs.trim().to_lowercase(),
        })
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn vs(&self) -> &str {
        &self.vs
    }
}

/// Pull the configured quote out of a decoded response.
pub fn extract_price(body: &SimplePriceResponse, asset: &str, vs: &str) -> Result<f64, FetchError> {
    let price = body
        .get(asset)
        .and_then(|quotes| quotes.get(vs))
        .copied()
        .ok_or_else(|| FetchError::MissingQuote {
            asset: asset.to_string(),
            vs: vs.to_string(),
        })?;

    validate_price(price)
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    #[instrument(
        skip(self),
        fields(asset = %self.asset, vs = %self.vs),
        level = "debug"
    )]
    async fn fetch(&self) -> Result<f64, FetchError> {
        let resp = self
            .http
            .get(&self.url)
            .query(&[("ids", self.asset.as_str()), ("vs_currencies", self.vs.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: SimplePriceResponse = resp.json().await?;
        let price = extract_price(&body, &self.asset, &self.vs)?;

        debug!(price, "coingecko price fetched");

        Ok(price)
    }
}
