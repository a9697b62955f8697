use crate::error::{EtlError, Result};
use std::collections::HashMap;

/// One row of the scraped table
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub bank_name: String,
    pub market_cap_usd: f64,
}

/// A bank row with its market cap converted into the supported currencies
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBankRecord {
    pub bank_name: String,
    pub market_cap_usd: f64,
    pub market_cap_eur: f64,
    pub market_cap_gbp: f64,
    pub market_cap_inr: f64,
}

/// Rows in scrape order
pub type ResultSet<T> = Vec<T>;

/// Currency code to rate, in target currency per USD
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeRateTable {
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, currency: impl Into<String>, rate: f64) {
        self.rates.insert(currency.into(), rate);
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Looks up a rate the transform cannot proceed without.
    pub fn require(&self, currency: &str) -> Result<f64> {
        self.get(currency).ok_or_else(|| {
            EtlError::Config(format!("exchange rate for {currency} not found in rate table"))
        })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, f64)> for ExchangeRateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}
