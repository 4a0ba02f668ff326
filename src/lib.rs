pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::convert::ConvertRequest;
use crate::core::config::{AppConfig, ProviderKind};
use crate::core::{CatalogLoader, CurrencyCatalogProvider, CurrencyRateProvider, PairSynchronizer};
use crate::providers::currency_beacon::CurrencyBeaconProvider;
use crate::providers::frankfurter::FrankfurterProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert(ConvertRequest),
    Interactive,
}

/// Rate and catalog providers for the configured upstream API.
pub fn build_providers(
    config: &AppConfig,
) -> Result<(Arc<dyn CurrencyRateProvider>, Arc<dyn CurrencyCatalogProvider>)> {
    match config.provider {
        ProviderKind::Frankfurter => {
            let base_url = config
                .providers
                .frankfurter
                .as_ref()
                .map_or("https://api.frankfurter.app", |p| p.base_url.as_str());
            let provider = Arc::new(FrankfurterProvider::new(base_url));
            let rates: Arc<dyn CurrencyRateProvider> = provider.clone();
            let catalog: Arc<dyn CurrencyCatalogProvider> = provider;
            Ok((rates, catalog))
        }
        ProviderKind::CurrencyBeacon => {
            let beacon = config
                .providers
                .currency_beacon
                .as_ref()
                .context("Provider currency_beacon selected but not configured")?;
            let provider = Arc::new(CurrencyBeaconProvider::new(
                &beacon.base_url,
                &beacon.api_token,
            ));
            let rates: Arc<dyn CurrencyRateProvider> = provider.clone();
            let catalog: Arc<dyn CurrencyCatalogProvider> = provider;
            Ok((rates, catalog))
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxpair starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let (rates, catalog_provider) = build_providers(&config)?;
    let configured_pair = config.default_pair.as_ref().map(|p| p.to_pair());
    let loader = Arc::new(CatalogLoader::new(catalog_provider, configured_pair));

    match command {
        AppCommand::Currencies => cli::currencies::run(&loader).await,
        AppCommand::Convert(request) => cli::convert::run(rates, loader, &request).await,
        AppCommand::Interactive => {
            let sync = PairSynchronizer::start(rates, loader)
                .await
                .context("Failed to load supported currencies")?;
            cli::interactive::run(Arc::new(sync), config.debounce()).await
        }
    }
}
