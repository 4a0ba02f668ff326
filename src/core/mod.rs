//! Currency pair synchronization core

pub mod catalog;
pub mod config;
pub mod currency;
pub mod edit_stream;
pub mod error;
pub mod input;
pub mod log;
pub mod sync;

// Re-export main types for cleaner imports
pub use catalog::{Catalog, CatalogLoader};
pub use currency::{Currency, CurrencyCatalogProvider, CurrencyPair, CurrencyRateProvider, Side};
pub use edit_stream::{EditStream, SyncEvent};
pub use error::{FxError, ValidationRejected};
pub use sync::{EditOutcome, PairSynchronizer, SyncState};
