//! Yahoo Finance quote provider.
//!
//! Reads the last traded price for a symbol from the metadata of Yahoo's v8
//! chart API. Yahoo Finance has no official API and is subject to unannounced
//! format changes; the synthetic provider is the offline fallback.

use super::{QuoteError, QuoteProvider};
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance v8 chart API response, trimmed to the fields we read.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

/// Yahoo Finance quote provider.
pub struct YahooQuoteProvider {
    client: reqwest::blocking::Client,
}

impl YahooQuoteProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Chart API URL for a symbol; a one-day range is enough for the
    /// regular market price in the metadata.
    fn chart_url(symbol: &str) -> String {
        format!("https://query2.finance.yahoo.com/v8/finance/chart/{symbol}?interval=1d&range=1d")
    }

    /// Pull the regular market price out of a chart response.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<f64, QuoteError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    QuoteError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    QuoteError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                QuoteError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::ResponseFormatChanged("result array is empty".into()))?;

        let price = data
            .meta
            .regular_market_price
            .ok_or_else(|| QuoteError::MissingPrice {
                symbol: symbol.to_string(),
            })?;

        if !price.is_finite() || price <= 0.0 {
            return Err(QuoteError::InvalidPrice {
                symbol: symbol.to_string(),
                price,
            });
        }

        Ok(price)
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_last(&self, symbol: &str) -> Result<f64, QuoteError> {
        let url = Self::chart_url(symbol);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| QuoteError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(QuoteError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(QuoteError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            QuoteError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, chart)
    }
}
