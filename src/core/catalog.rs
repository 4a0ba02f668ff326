//! Supported currency catalog, loaded once per process.

use std::sync::Arc;
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use super::currency::{Currency, CurrencyCatalogProvider, CurrencyPair, Side};
use super::error::FxError;

/// Ordered list of supported currencies. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    currencies: Vec<Currency>,
}

impl Catalog {
    pub fn new(currencies: Vec<Currency>) -> Self {
        Catalog { currencies }
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn find(&self, code: &str) -> Option<&Currency> {
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Picks the initial pair.
    ///
    /// A configured pair wins, with symbols taken from the catalog where the code is
    /// known. Without one the first two catalog entries are used.
    pub fn default_pair(&self, configured: Option<&CurrencyPair>) -> Result<CurrencyPair, FxError> {
        if let Some(pair) = configured {
            let resolve = |side: Side| {
                let wanted = pair.side(side);
                match self.find(&wanted.code) {
                    Some(known) => Currency {
                        amount: wanted.amount,
                        ..known.clone()
                    },
                    None => {
                        warn!(code = %wanted.code, "Configured default currency not in catalog");
                        wanted.clone()
                    }
                }
            };
            return Ok(CurrencyPair::new(resolve(Side::From), resolve(Side::To)));
        }

        match (self.currencies.first(), self.currencies.get(1)) {
            (Some(from), Some(to)) => Ok(CurrencyPair::new(from.clone(), to.clone())),
            _ => Err(FxError::NoDefaultPair),
        }
    }
}

struct LoadingGuard<'a>(&'a watch::Sender<bool>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

pub struct CatalogLoader {
    provider: Arc<dyn CurrencyCatalogProvider>,
    configured_default: Option<CurrencyPair>,
    catalog: OnceCell<Arc<Catalog>>,
    loading: watch::Sender<bool>,
}

impl CatalogLoader {
    pub fn new(
        provider: Arc<dyn CurrencyCatalogProvider>,
        configured_default: Option<CurrencyPair>,
    ) -> Self {
        let (loading, _) = watch::channel(true);
        CatalogLoader {
            provider,
            configured_default,
            catalog: OnceCell::new(),
            loading,
        }
    }

    /// Loads the catalog on first call and returns the shared copy afterwards.
    ///
    /// Concurrent callers wait on the same request. A failed load stores nothing,
    /// so the next call asks the provider again.
    pub async fn load(&self) -> Result<Arc<Catalog>, FxError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                self.loading.send_replace(true);
                let _loading = LoadingGuard(&self.loading);

                debug!("Loading currency catalog");
                let currencies = self.provider.list_currencies().await.inspect_err(|e| {
                    warn!(error = %e, "Failed to load currency catalog");
                })?;
                info!(count = currencies.len(), "Loaded currency catalog");
                Ok::<_, FxError>(Arc::new(Catalog::new(currencies)))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// Returns the catalog if it has been loaded.
    pub fn get(&self) -> Option<Arc<Catalog>> {
        self.catalog.get().cloned()
    }

    pub async fn default_pair(&self) -> Result<CurrencyPair, FxError> {
        let catalog = self.load().await?;
        catalog.default_pair(self.configured_default.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }
}
