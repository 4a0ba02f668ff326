use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{get_json, validate_converted};
use crate::core::currency::{Currency, CurrencyCatalogProvider, CurrencyRateProvider};
use crate::core::error::FxError;

// CurrencyBeaconProvider implementation for CurrencyRateProvider and CurrencyCatalogProvider
pub struct CurrencyBeaconProvider {
    base_url: String,
    api_token: String,
}

impl CurrencyBeaconProvider {
    pub fn new(base_url: &str, api_token: &str) -> Self {
        CurrencyBeaconProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    response: Option<ConvertBody>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConvertBody {
    date: Option<String>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    response: Vec<CurrencyEntry>,
}

#[derive(Debug, Deserialize)]
struct CurrencyEntry {
    short_code: String,
    symbol: String,
}

#[async_trait]
impl CurrencyRateProvider for CurrencyBeaconProvider {
    #[instrument(name = "CurrencyBeaconConvert", skip(self))]
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, FxError> {
        let url = format!(
            "{}/convert?from={}&to={}&amount={}",
            self.base_url, from, to, amount
        );
        let data: ConvertResponse = get_json(&url, Some(&self.api_token)).await?;

        // The value is duplicated at the top level on older API versions.
        let value = data
            .response
            .and_then(|body| {
                debug!(date = ?body.date, "Received CurrencyBeacon conversion");
                body.value
            })
            .or(data.value)
            .ok_or_else(|| FxError::RateUnavailable {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        validate_converted(value, from, to)
    }
}

#[async_trait]
impl CurrencyCatalogProvider for CurrencyBeaconProvider {
    async fn list_currencies(&self) -> Result<Vec<Currency>, FxError> {
        let url = format!("{}/currencies", self.base_url);
        let data: CurrenciesResponse = get_json(&url, Some(&self.api_token)).await?;

        Ok(data
            .response
            .into_iter()
            .map(|entry| Currency {
                code: entry.short_code,
                symbol: entry.symbol,
                amount: None,
            })
            .collect())
    }
}
