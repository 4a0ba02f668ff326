//! Keeps the two sides of a currency pair consistent.
//!
//! Every edit makes one side the source of truth for a single conversion. Results
//! are applied with switch-to-latest semantics: each request draws a ticket from a
//! monotonic counter, and a result only lands if no newer request has been issued
//! for its side, and the opposite side has not been edited since.

use chrono::Utc;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::catalog::CatalogLoader;
use super::currency::{
    Currency, CurrencyPair, CurrencyRateProvider, Side, round_amount, sanitize_amount,
};
use super::error::FxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Converting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The conversion landed; carries the pair after the update.
    Applied(CurrencyPair),
    /// A newer edit was issued while this one was in flight; nothing changed.
    Superseded,
}

#[derive(Debug, Default)]
struct Tickets {
    issued: u64,
    latest: [u64; 2],
}

impl Tickets {
    fn issue(&mut self, side: Side) -> u64 {
        self.issued += 1;
        self.latest[side.index()] = self.issued;
        self.issued
    }

    fn is_current(&self, side: Side, ticket: u64) -> bool {
        self.latest[side.index()] == ticket && self.latest[side.opposite().index()] < ticket
    }
}

/// Holds `converting` high while alive. Dropping it on any exit path, including
/// cancellation of the owning future, releases the flag.
struct InFlight<'a> {
    sync: &'a PairSynchronizer,
}

impl<'a> InFlight<'a> {
    fn begin(sync: &'a PairSynchronizer) -> Self {
        let mut count = sync.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        sync.converting.send_replace(true);
        InFlight { sync }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut count = self
            .sync
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.sync.converting.send_replace(false);
        }
    }
}

pub struct PairSynchronizer {
    rates: Arc<dyn CurrencyRateProvider>,
    catalog: Arc<CatalogLoader>,
    pair: watch::Sender<CurrencyPair>,
    converting: watch::Sender<bool>,
    in_flight: Mutex<usize>,
    tickets: Mutex<Tickets>,
}

impl PairSynchronizer {
    pub fn new(
        rates: Arc<dyn CurrencyRateProvider>,
        catalog: Arc<CatalogLoader>,
        initial: CurrencyPair,
    ) -> Self {
        let (pair, _) = watch::channel(initial);
        let (converting, _) = watch::channel(false);
        PairSynchronizer {
            rates,
            catalog,
            pair,
            converting,
            in_flight: Mutex::new(0),
            tickets: Mutex::new(Tickets::default()),
        }
    }

    /// Loads the catalog and starts from its default pair.
    pub async fn start(
        rates: Arc<dyn CurrencyRateProvider>,
        catalog: Arc<CatalogLoader>,
    ) -> Result<Self, FxError> {
        let initial = catalog.default_pair().await?;
        info!(from = %initial.from.code, to = %initial.to.code, "Starting with default pair");
        Ok(Self::new(rates, catalog, initial))
    }

    pub fn pair(&self) -> CurrencyPair {
        self.pair.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CurrencyPair> {
        self.pair.subscribe()
    }

    pub fn is_converting(&self) -> bool {
        *self.converting.borrow()
    }

    pub fn state(&self) -> SyncState {
        if self.is_converting() {
            SyncState::Converting
        } else {
            SyncState::Idle
        }
    }

    pub fn subscribe_converting(&self) -> watch::Receiver<bool> {
        self.converting.subscribe()
    }

    /// Sets `amount` on `side` and recomputes the opposite side from it.
    #[instrument(name = "PairEdit", skip(self))]
    pub async fn edit(&self, side: Side, amount: f64) -> Result<EditOutcome, FxError> {
        let amount = sanitize_amount(Some(amount));
        let ticket = self.issue_ticket(side);
        let (source, target) = {
            let pair = self.pair.borrow();
            (pair.side(side).clone(), pair.side(side.opposite()).clone())
        };

        let _in_flight = InFlight::begin(self);
        debug!(ticket, amount, from = %source.code, to = %target.code, "Converting");

        let result = if source.code == target.code {
            Ok(amount)
        } else {
            self.rates.convert(amount, &source.code, &target.code).await
        };

        let converted = match result {
            Ok(value) => round_amount(value),
            Err(e) => {
                warn!(ticket, error = %e, "Conversion failed, keeping previous values");
                return Err(e);
            }
        };

        if !self.ticket_is_current(side, ticket) {
            debug!(ticket, "Discarding superseded conversion");
            return Ok(EditOutcome::Superseded);
        }

        self.pair.send_modify(|pair| {
            let edited = pair.side(side).clone().with_amount(amount);
            let derived = pair.side(side.opposite()).clone().with_amount(converted);
            pair.replace(side, edited);
            pair.replace(side.opposite(), derived);
            pair.last_updated = Some(Utc::now());
        });
        debug!(ticket, converted, "Applied conversion");
        Ok(EditOutcome::Applied(self.pair()))
    }

    /// Switches `side` to another catalog currency, keeping its amount, and
    /// recomputes the opposite side from it.
    pub async fn select_currency(&self, side: Side, code: &str) -> Result<EditOutcome, FxError> {
        let catalog = self.catalog.load().await?;
        let selected = catalog
            .find(code)
            .cloned()
            .ok_or_else(|| FxError::UnknownCurrency(code.to_string()))?;

        let amount = {
            let mut amount = None;
            self.pair.send_modify(|pair| {
                amount = pair.side(side).amount;
                pair.replace(
                    side,
                    Currency {
                        amount,
                        ..selected
                    },
                );
            });
            amount
        };
        info!(side = %side, code = %code, "Selected currency");

        self.edit(side, sanitize_amount(amount)).await
    }

    fn issue_ticket(&self, side: Side) -> u64 {
        self.tickets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .issue(side)
    }

    fn ticket_is_current(&self, side: Side, ticket: u64) -> bool {
        self.tickets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_current(side, ticket)
    }
}
