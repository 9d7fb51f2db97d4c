//! Yahoo Finance data fetcher
//!
//! Spot quotes, the nearest option chain and the 13-week T-bill yield (^IRX)
//! from Yahoo Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::market::MarketData;
use crate::core::{ContractQuote, ExpirationChain, MoveError, MoveResult, SpotQuote};

/// Yahoo client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YahooConfig {
    /// API host
    /// Default: https://query1.finance.yahoo.com
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Symbol whose latest close is the risk-free rate, in percent
    /// Default: ^IRX (13-week T-bill)
    pub rate_symbol: String,
    /// Per-request timeout
    /// Default: 10 seconds
    pub timeout_secs: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            rate_symbol: "^IRX".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    config: YahooConfig,
}

impl YahooClient {
    pub fn new() -> MoveResult<Self> {
        Self::with_config(YahooConfig::default())
    }

    pub fn with_config(config: YahooConfig) -> MoveResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MoveError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> MoveResult<T> {
        tracing::info!(url, "fetching");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| MoveError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MoveError::data_unavailable(format!("{url} returned HTTP {status}")));
        }

        let body = response.text().map_err(|e| MoveError::network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(url, body = %body, "unparseable response");
            MoveError::data_unavailable(format!("failed to parse response from {url}: {e}"))
        })
    }

    /// Get current quote for a symbol
    pub fn get_quote(&self, symbol: &str) -> MoveResult<SpotQuote> {
        let url = format!("{}/v7/finance/quote", self.config.base_url);
        let response: YahooQuoteResponse = self.get_json(&url, &[("symbols", symbol)])?;
        spot_from_response(symbol, response)
    }

    /// Get the option chain for the first listed expiration
    pub fn get_nearest_chain(&self, symbol: &str) -> MoveResult<ExpirationChain> {
        let url = format!("{}/v7/finance/options/{}", self.config.base_url, symbol);
        let response: YahooOptionsResponse = self.get_json(&url, &[])?;
        chain_from_response(symbol, response)
    }

    /// Latest close of the configured rate symbol, as a fraction
    pub fn get_risk_free_rate(&self) -> MoveResult<f64> {
        let url = format!("{}/v8/finance/chart/{}", self.config.base_url, self.config.rate_symbol);
        let query = [("range", "5d"), ("interval", "1d")];
        let response: YahooChartResponse = self.get_json(&url, &query)?;
        let percent = latest_close(&self.config.rate_symbol, response)?;
        Ok(percent / 100.0)
    }
}

impl MarketData for YahooClient {
    fn spot(&self, symbol: &str) -> MoveResult<SpotQuote> {
        self.get_quote(symbol)
    }

    fn risk_free_rate(&self) -> MoveResult<f64> {
        self.get_risk_free_rate()
    }

    fn nearest_expiration_chain(&self, symbol: &str) -> MoveResult<ExpirationChain> {
        self.get_nearest_chain(symbol)
    }
}

fn spot_from_response(symbol: &str, response: YahooQuoteResponse) -> MoveResult<SpotQuote> {
    let result = response
        .quote_response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| {
            MoveError::data_unavailable(format!("no quote data returned for {symbol}"))
        })?;

    let price = result
        .regular_market_price
        .ok_or_else(|| MoveError::data_unavailable(format!("no market price for {symbol}")))?;

    let display_name = result
        .long_name
        .or(result.short_name)
        .unwrap_or_else(|| symbol.to_string());

    Ok(SpotQuote {
        symbol: result.symbol.unwrap_or_else(|| symbol.to_string()),
        display_name,
        price,
    })
}

fn chain_from_response(
    symbol: &str,
    response: YahooOptionsResponse,
) -> MoveResult<ExpirationChain> {
    let chain_data = response
        .option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| {
            MoveError::data_unavailable(format!("no options data returned for {symbol}"))
        })?;

    let options = chain_data
        .options
        .into_iter()
        .next()
        .ok_or_else(|| MoveError::data_unavailable(format!("{symbol} has no listed options")))?;

    let timestamp = options
        .expiration_date
        .or_else(|| chain_data.expiration_dates.first().copied())
        .ok_or_else(|| MoveError::data_unavailable(format!("no expiration date for {symbol}")))?;
    let expiration = expiration_from_timestamp(timestamp)?;

    let mut chain = ExpirationChain::new(symbol, expiration);
    for call in &options.calls {
        if let Some(quote) = convert_contract(call) {
            chain.add_call(quote);
        }
    }
    for put in &options.puts {
        if let Some(quote) = convert_contract(put) {
            chain.add_put(quote);
        }
    }

    tracing::info!(
        symbol,
        %expiration,
        calls = chain.calls.len(),
        puts = chain.puts.len(),
        "loaded option chain"
    );
    Ok(chain)
}

fn expiration_from_timestamp(ts: i64) -> MoveResult<NaiveDate> {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| MoveError::data_unavailable(format!("invalid expiration timestamp {ts}")))
}

/// Convert Yahoo contract data to our quote format
fn convert_contract(data: &YahooOptionData) -> Option<ContractQuote> {
    match (data.strike, data.last_price) {
        (Some(strike), Some(last)) => {
            Some(ContractQuote::new(strike, last, data.in_the_money.unwrap_or(false)))
        }
        _ => {
            tracing::warn!(
                contract = ?data.contract_symbol,
                "skipping contract without strike or last price"
            );
            None
        }
    }
}

fn latest_close(symbol: &str, response: YahooChartResponse) -> MoveResult<f64> {
    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| {
            MoveError::data_unavailable(format!("no chart data returned for {symbol}"))
        })?;

    result
        .indicators
        .quote
        .iter()
        .flat_map(|q| q.close.iter())
        .rev()
        .find_map(|close| close.filter(|c| c.is_finite()))
        .ok_or_else(|| MoveError::data_unavailable(format!("no closing value for {symbol}")))
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    result: Vec<YahooQuoteData>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    symbol: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(rename = "expirationDate")]
    expiration_date: Option<i64>,
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    #[serde(rename = "inTheMoney")]
    in_the_money: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const QUOTE_JSON: &str = r#"{
        "quoteResponse": {
            "result": [{
                "symbol": "AAPL",
                "regularMarketPrice": 227.48,
                "shortName": "Apple Inc.",
                "longName": "Apple Inc."
            }],
            "error": null
        }
    }"#;

    const OPTIONS_JSON: &str = r#"{
        "optionChain": {
            "result": [{
                "underlyingSymbol": "AAPL",
                "expirationDates": [1792713600, 1793318400],
                "quote": {"regularMarketPrice": 227.48},
                "options": [{
                    "expirationDate": 1792713600,
                    "calls": [
                        {"contractSymbol": "AAPL261023C00230000", "strike": 230.0, "lastPrice": 1.35, "inTheMoney": false},
                        {"contractSymbol": "AAPL261023C00220000", "strike": 220.0, "lastPrice": 8.10, "inTheMoney": true},
                        {"contractSymbol": "AAPL261023C00225000", "strike": 225.0, "lastPrice": 4.05, "inTheMoney": true},
                        {"contractSymbol": "AAPL261023C00215000", "strike": 215.0, "inTheMoney": true}
                    ],
                    "puts": [
                        {"contractSymbol": "AAPL261023P00225000", "strike": 225.0, "lastPrice": 1.70, "inTheMoney": false},
                        {"contractSymbol": "AAPL261023P00230000", "strike": 230.0, "lastPrice": 3.95, "inTheMoney": true},
                        {"contractSymbol": "AAPL261023P00235000", "strike": 235.0, "lastPrice": 8.20, "inTheMoney": true}
                    ]
                }]
            }],
            "error": null
        }
    }"#;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^IRX"},
                "timestamp": [1792368000, 1792454400, 1792540800],
                "indicators": {"quote": [{"close": [4.215, 4.198, null]}]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_quote() {
        let response: YahooQuoteResponse = serde_json::from_str(QUOTE_JSON).unwrap();
        let spot = spot_from_response("aapl", response).unwrap();

        assert_eq!(spot.symbol, "AAPL");
        assert_eq!(spot.display_name, "Apple Inc.");
        assert_eq!(spot.price, 227.48);
    }

    #[test]
    fn test_quote_name_falls_back_to_symbol() {
        let json = r#"{"quoteResponse": {"result": [{"regularMarketPrice": 10.0}]}}"#;
        let response: YahooQuoteResponse = serde_json::from_str(json).unwrap();
        let spot = spot_from_response("XYZ", response).unwrap();

        assert_eq!(spot.display_name, "XYZ");
    }

    #[test]
    fn test_unknown_symbol() {
        let json = r#"{"quoteResponse": {"result": [], "error": null}}"#;
        let response: YahooQuoteResponse = serde_json::from_str(json).unwrap();

        let err = spot_from_response("NOPE", response).unwrap_err();
        assert!(err.is_data_unavailable());
    }

    #[test]
    fn test_parse_chain() {
        let response: YahooOptionsResponse = serde_json::from_str(OPTIONS_JSON).unwrap();
        let chain = chain_from_response("AAPL", response).unwrap();

        assert_eq!(chain.expiration, NaiveDate::from_ymd_opt(2026, 10, 23).unwrap());
        // Contract without a last price is dropped
        assert_eq!(chain.calls.len(), 3);
        assert_eq!(chain.puts.len(), 3);

        let strikes: Vec<f64> = chain.calls.iter().map(|c| c.strike).collect();
        assert_eq!(strikes, vec![220.0, 225.0, 230.0]);

        let call = chain.nearest_itm_call().unwrap();
        assert_eq!((call.strike, call.last_price), (225.0, 4.05));
        let put = chain.nearest_itm_put().unwrap();
        assert_eq!((put.strike, put.last_price), (230.0, 3.95));
    }

    #[test]
    fn test_chain_without_options() {
        let json = r#"{"optionChain": {"result": [{"expirationDates": [], "options": []}]}}"#;
        let response: YahooOptionsResponse = serde_json::from_str(json).unwrap();

        assert!(chain_from_response("XYZ", response).unwrap_err().is_data_unavailable());
    }

    #[test]
    fn test_latest_close_skips_nulls() {
        let response: YahooChartResponse = serde_json::from_str(CHART_JSON).unwrap();
        let close = latest_close("^IRX", response).unwrap();

        assert_abs_diff_eq!(close, 4.198, epsilon = 1e-12);
    }

    #[test]
    fn test_chart_error() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();

        assert!(latest_close("^IRX", response).unwrap_err().is_data_unavailable());
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_quote() {
        let client = YahooClient::new().unwrap();
        let quote = client.get_quote("SPY").unwrap();

        assert!(quote.price > 0.0);
        println!("SPY price: {}", quote.price);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_risk_free_rate() {
        let client = YahooClient::new().unwrap();
        let rate = client.get_risk_free_rate().unwrap();

        assert!(rate > -0.01 && rate < 0.25);
        println!("^IRX rate: {}", rate);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_nearest_chain() {
        let client = YahooClient::new().unwrap();
        let chain = client.get_nearest_chain("SPY").unwrap();

        println!("Chain for {}: {} calls, {} puts",
            chain.expiration, chain.calls.len(), chain.puts.len());

        assert!(!chain.calls.is_empty());
        assert!(!chain.puts.is_empty());
    }
}
