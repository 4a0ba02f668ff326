use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

use super::symbols::symbol_for;
use super::util::{get_json, validate_converted};
use crate::core::currency::{Currency, CurrencyCatalogProvider, CurrencyRateProvider};
use crate::core::error::FxError;

// FrankfurterProvider implementation for CurrencyRateProvider and CurrencyCatalogProvider
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: String,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl CurrencyRateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterConvert", skip(self))]
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, FxError> {
        let url = format!(
            "{}/latest?from={}&to={}&amount={}",
            self.base_url, from, to, amount
        );
        let data: LatestResponse = get_json(&url, None).await?;
        debug!(base = %data.base, date = %data.date, "Received Frankfurter rates");

        let value = data
            .rates
            .get(to)
            .copied()
            .ok_or_else(|| FxError::RateUnavailable {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        validate_converted(value, from, to)
    }
}

#[async_trait]
impl CurrencyCatalogProvider for FrankfurterProvider {
    async fn list_currencies(&self) -> Result<Vec<Currency>, FxError> {
        let url = format!("{}/currencies", self.base_url);
        // Keyed by code; BTreeMap keeps the listing ordered.
        let names: BTreeMap<String, String> = get_json(&url, None).await?;

        Ok(names
            .into_keys()
            .map(|code| {
                let symbol = symbol_for(&code).to_string();
                Currency {
                    code,
                    symbol,
                    amount: None,
                }
            })
            .collect())
    }
}
