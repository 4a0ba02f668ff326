use super::ui;
use crate::core::input::parse_edit;
use crate::core::{
    CatalogLoader, CurrencyPair, CurrencyRateProvider, EditOutcome, FxError, PairSynchronizer,
    Side,
};
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ConvertRequest {
    /// Raw amount text, validated like keyboard input.
    pub amount: String,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Treat the amount as the "to" side and compute "from".
    pub reverse: bool,
}

/// Runs one conversion through a fresh synchronizer and returns the resulting pair.
pub async fn convert(
    rates: Arc<dyn CurrencyRateProvider>,
    loader: Arc<CatalogLoader>,
    request: &ConvertRequest,
) -> Result<CurrencyPair> {
    let amount = parse_edit(&request.amount)
        .map_err(|e| anyhow!("Invalid amount '{}': {}", request.amount, e))?;

    let catalog = loader.load().await.context("Failed to load supported currencies")?;
    let mut pair = loader.default_pair().await?;
    for (side, code) in [(Side::From, &request.from), (Side::To, &request.to)] {
        if let Some(code) = code {
            let currency = catalog
                .find(code)
                .cloned()
                .ok_or_else(|| FxError::UnknownCurrency(code.clone()))?;
            pair.replace(side, currency);
        }
    }
    debug!(?pair, amount, "Converting");

    let sync = PairSynchronizer::new(rates, loader, pair);
    let side = if request.reverse { Side::To } else { Side::From };
    match sync.edit(side, amount).await? {
        EditOutcome::Applied(pair) => Ok(pair),
        EditOutcome::Superseded => Err(anyhow!("Conversion was superseded")),
    }
}

pub async fn run(
    rates: Arc<dyn CurrencyRateProvider>,
    loader: Arc<CatalogLoader>,
    request: &ConvertRequest,
) -> Result<()> {
    let spinner = ui::new_spinner("Converting...");
    let result = convert(rates, loader, request).await;
    spinner.finish_and_clear();

    let pair = result?;
    println!("{}", ui::pair_table(&pair));
    Ok(())
}
