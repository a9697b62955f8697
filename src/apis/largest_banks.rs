use crate::constants::TABLE_ATTRIBS;
use crate::error::{EtlError, Result};
use crate::ports::PageFetcher;
use crate::types::{BankRecord, ResultSet};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

/// Where each semantic column lives inside a data row.
///
/// Indices count `<td>` cells and `<a>` elements from zero. On the archived
/// page the name cell starts with a flag link, so the bank link is the second
/// anchor.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub name_column: String,
    pub market_cap_column: String,
    pub name_cell: usize,
    pub name_anchor: usize,
    pub name_attribute: String,
    pub market_cap_cell: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            name_column: TABLE_ATTRIBS[0].to_string(),
            market_cap_column: TABLE_ATTRIBS[1].to_string(),
            name_cell: 1,
            name_anchor: 1,
            name_attribute: "title".to_string(),
            market_cap_cell: 2,
        }
    }
}

impl TableLayout {
    /// Layout for the given output column names: bank name, then USD market cap.
    pub fn with_columns(table_attribs: &[&str]) -> Result<Self> {
        match table_attribs {
            [name, market_cap] => Ok(Self {
                name_column: name.to_string(),
                market_cap_column: market_cap.to_string(),
                ..Self::default()
            }),
            other => Err(EtlError::Config(format!(
                "expected 2 table columns (name, market cap), got {}",
                other.len()
            ))),
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| EtlError::Parse(format!("invalid selector '{css}': {e}")))
}

/// Scrapes the bank table from a single page.
pub struct LargestBanksCrawler<'a> {
    fetcher: &'a dyn PageFetcher,
    layout: TableLayout,
}

impl<'a> LargestBanksCrawler<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, layout: TableLayout) -> Self {
        Self { fetcher, layout }
    }

    #[instrument(skip(self))]
    pub fn extract(&self, url: &str) -> Result<ResultSet<BankRecord>> {
        let page = self.fetcher.fetch(url)?;
        let records = parse_bank_table(&page, &self.layout)?;
        info!("Extracted {} banks", records.len());
        Ok(records)
    }
}

/// Reads every data row of the first `wikitable` on the page.
///
/// Rows without `<td>` cells are headers and are skipped. Any data row that
/// lacks the cells, anchor or attribute named by `layout`, or whose market
/// cap is not a non-negative number, fails the whole extraction.
pub fn parse_bank_table(html: &str, layout: &TableLayout) -> Result<ResultSet<BankRecord>> {
    let document = Html::parse_document(html);
    let table_selector = selector("table.wikitable")?;
    let tbody_selector = selector("tbody")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let anchor_selector = selector("a")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| EtlError::Parse("no table with class 'wikitable' found".into()))?;
    let tbody = table
        .select(&tbody_selector)
        .next()
        .ok_or_else(|| EtlError::Parse("wikitable has no <tbody>".into()))?;

    let mut records = Vec::new();
    let mut data_row = 0usize;

    for row in tbody.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.is_empty() {
            continue;
        }
        data_row += 1;

        let name_cell = cells.get(layout.name_cell).ok_or_else(|| {
            missing(data_row, &layout.name_column, format!("cell {}", layout.name_cell))
        })?;
        let anchor = name_cell
            .select(&anchor_selector)
            .nth(layout.name_anchor)
            .ok_or_else(|| {
                missing(data_row, &layout.name_column, format!("anchor {}", layout.name_anchor))
            })?;
        let bank_name = anchor.value().attr(&layout.name_attribute).ok_or_else(|| {
            missing(
                data_row,
                &layout.name_column,
                format!("'{}' attribute", layout.name_attribute),
            )
        })?;

        let market_cap_cell = cells.get(layout.market_cap_cell).ok_or_else(|| {
            missing(
                data_row,
                &layout.market_cap_column,
                format!("cell {}", layout.market_cap_cell),
            )
        })?;
        let market_cap_text = market_cap_cell.text().collect::<String>();
        let market_cap_usd = parse_market_cap(&market_cap_text).map_err(|reason| {
            EtlError::Parse(format!(
                "row {data_row}: {} value '{}' {reason}",
                layout.market_cap_column,
                market_cap_text.trim()
            ))
        })?;

        debug!("Row {}: {} = {}", data_row, bank_name, market_cap_usd);
        records.push(BankRecord {
            bank_name: bank_name.to_string(),
            market_cap_usd,
        });
    }

    if records.is_empty() {
        warn!("No data rows found - the page structure may have changed");
    }

    Ok(records)
}

fn missing(row: usize, column: &str, what: String) -> EtlError {
    EtlError::Parse(format!("row {row}: {what} for {column} is missing"))
}

fn parse_market_cap(text: &str) -> std::result::Result<f64, &'static str> {
    let cleaned = text.trim().replace('\n', "");
    let value: f64 = cleaned.parse().map_err(|_| "is not a number")?;
    if !value.is_finite() {
        return Err("is not a finite number");
    }
    if value < 0.0 {
        return Err("is negative");
    }
    Ok(value)
}
