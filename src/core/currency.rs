//! Currency conversion abstractions and core types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::error::FxError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl Currency {
    pub fn new(code: &str, symbol: &str) -> Self {
        Currency {
            code: code.to_string(),
            symbol: symbol.to_string(),
            amount: None,
        }
    }

    pub fn with_amount(self, amount: f64) -> Self {
        Currency {
            amount: Some(amount),
            ..self
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.amount {
            Some(amount) => write!(f, "{}{:.2} {}", self.symbol, amount, self.code),
            None => write!(f, "{}- {}", self.symbol, self.code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    From,
    To,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::From => Side::To,
            Side::To => Side::From,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::From => 0,
            Side::To => 1,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::From => "from",
                Side::To => "to",
            }
        )
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "from" => Ok(Side::From),
            "to" => Ok(Side::To),
            _ => Err(anyhow::anyhow!("Invalid side: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: Currency,
    pub to: Currency,
    #[serde(skip)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CurrencyPair {
    pub fn new(from: Currency, to: Currency) -> Self {
        CurrencyPair {
            from,
            to,
            last_updated: None,
        }
    }

    pub fn side(&self, side: Side) -> &Currency {
        match side {
            Side::From => &self.from,
            Side::To => &self.to,
        }
    }

    /// Swaps in a new `Currency` for one side; the previous value is dropped, not mutated.
    pub fn replace(&mut self, side: Side, currency: Currency) {
        match side {
            Side::From => self.from = currency,
            Side::To => self.to = currency,
        }
    }
}

/// Clamps an amount to what the upstream APIs accept. Missing, negative and
/// non-finite values become 0.
pub fn sanitize_amount(amount: Option<f64>) -> f64 {
    match amount {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Rounds a converted amount to display precision (2 places).
pub fn round_amount(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Converts `amount` of `from` into `to`, returning the converted amount.
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, FxError>;
}

#[async_trait]
pub trait CurrencyCatalogProvider: Send + Sync {
    async fn list_currencies(&self) -> Result<Vec<Currency>, FxError>;
}
