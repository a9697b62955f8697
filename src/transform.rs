use crate::constants::{RATE_CURRENCY_HEADER, RATE_VALUE_HEADER, REQUIRED_CURRENCIES};
use crate::error::{EtlError, Result};
use crate::types::{BankRecord, EnrichedBankRecord, ExchangeRateTable, ResultSet};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Reads the `Currency`/`Rate` columns of the exchange-rate file.
///
/// Extra columns are ignored and a repeated currency keeps its last rate.
pub fn load_exchange_rates(path: &Path) -> Result<ExchangeRateTable> {
    let file = File::open(path).map_err(|e| {
        EtlError::Config(format!("Failed to open rate table '{}': {}", path.display(), e))
    })?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| rate_table_error(path, e))?
        .clone();
    let column = |name: &str| {
        headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
            EtlError::Config(format!(
                "rate table '{}' has no '{}' column",
                path.display(),
                name
            ))
        })
    };
    let currency_idx = column(RATE_CURRENCY_HEADER)?;
    let rate_idx = column(RATE_VALUE_HEADER)?;

    let mut rates = ExchangeRateTable::new();
    for (line_num, result) in reader.records().enumerate() {
        let record = result.map_err(|e| rate_table_error(path, e))?;
        let currency = record.get(currency_idx).unwrap_or("").trim();
        let rate_text = record.get(rate_idx).unwrap_or("").trim();
        let rate: f64 = rate_text.parse().map_err(|_| {
            EtlError::Config(format!(
                "rate table '{}' line {}: rate '{}' for {} is not a number",
                path.display(),
                line_num + 2,
                rate_text,
                currency
            ))
        })?;
        rates.insert(currency, rate);
    }

    debug!("Loaded {} exchange rates from {}", rates.len(), path.display());
    Ok(rates)
}

fn rate_table_error(path: &Path, err: csv::Error) -> EtlError {
    EtlError::Config(format!("Failed to read rate table '{}': {}", path.display(), err))
}

/// Rounds to 2 decimals the way numpy's `round` does: scale by 100, round
/// half to even, scale back. A value whose scaled form is exactly `.5`
/// goes to the even neighbour, so 0.125 becomes 0.12 and 0.375 becomes 0.38.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Adds EUR, GBP and INR market caps to every record, keeping row order.
///
/// Fails with a config error before touching any row if a required
/// currency is missing from `rates`.
pub fn transform(
    records: ResultSet<BankRecord>,
    rates: &ExchangeRateTable,
) -> Result<ResultSet<EnrichedBankRecord>> {
    let [eur, gbp, inr] = REQUIRED_CURRENCIES;
    let eur_rate = rates.require(eur)?;
    let gbp_rate = rates.require(gbp)?;
    let inr_rate = rates.require(inr)?;

    let enriched: Vec<EnrichedBankRecord> = records
        .into_iter()
        .map(|record| EnrichedBankRecord {
            market_cap_eur: round2(record.market_cap_usd * eur_rate),
            market_cap_gbp: round2(record.market_cap_usd * gbp_rate),
            market_cap_inr: round2(record.market_cap_usd * inr_rate),
            market_cap_usd: record.market_cap_usd,
            bank_name: record.bank_name,
        })
        .collect();

    info!("Converted {} market caps into {:?}", enriched.len(), REQUIRED_CURRENCIES);
    Ok(enriched)
}

/// Loads the rate file at `rate_table_path` and applies [`transform`].
pub fn transform_with_rate_file(
    records: ResultSet<BankRecord>,
    rate_table_path: &Path,
) -> Result<ResultSet<EnrichedBankRecord>> {
    let rates = load_exchange_rates(rate_table_path)?;
    transform(records, &rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::tempdir;

    fn rates() -> ExchangeRateTable {
        [("EUR", 0.93), ("GBP", 0.80), ("INR", 82.95)]
            .into_iter()
            .map(|(c, r)| (c.to_string(), r))
            .collect()
    }

    fn bank(name: &str, usd: f64) -> BankRecord {
        BankRecord { bank_name: name.to_string(), market_cap_usd: usd }
    }

    #[test]
    fn test_hundred_usd_converts_exactly() {
        let out = transform(vec![bank("Test Bank", 100.0)], &rates()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].market_cap_eur, 93.0);
        assert_eq!(out[0].market_cap_gbp, 80.0);
        assert_eq!(out[0].market_cap_inr, 8295.0);
        assert_eq!(out[0].market_cap_usd, 100.0);
    }

    #[test]
    fn test_values_are_rounded_to_two_decimals() {
        let out = transform(vec![bank("JPMorgan Chase", 432.92)], &rates()).unwrap();
        assert_eq!(out[0].market_cap_eur, 402.62);
        assert_eq!(out[0].market_cap_gbp, 346.34);
        assert_eq!(out[0].market_cap_inr, 35910.71);
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
    }

    #[test]
    fn test_row_order_is_preserved() {
        let input = vec![bank("A", 3.0), bank("B", 1.0), bank("C", 2.0)];
        let out = transform(input, &rates()).unwrap();
        let names: Vec<&str> = out.iter().map(|r| r.bank_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_inr_is_config_error() {
        let mut partial = ExchangeRateTable::new();
        partial.insert("EUR", 0.93);
        partial.insert("GBP", 0.8);

        let err = transform(vec![bank("A", 1.0)], &partial).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("INR"));
    }

    #[test]
    fn test_load_exchange_rates_by_header_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exchange_rate.csv");
        fs::write(&path, "Rate,Currency,Note\n0.93,EUR,x\n0.8,GBP,\n82.95,INR,y\n0.9,EUR,later\n").unwrap();

        let table = load_exchange_rates(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("GBP"), Some(0.8));
        assert_eq!(table.get("EUR"), Some(0.9));
    }

    #[test]
    fn test_rate_file_without_rate_column_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exchange_rate.csv");
        fs::write(&path, "Currency,Value\nEUR,0.93\n").unwrap();

        let err = load_exchange_rates(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_missing_rate_file_is_config_error() {
        let dir = tempdir().unwrap();
        let err = transform_with_rate_file(vec![], &dir.path().join("absent.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
