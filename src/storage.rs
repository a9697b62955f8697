use crate::constants::{
    BANK_NAME_COLUMN, MC_EUR_COLUMN, MC_GBP_COLUMN, MC_INR_COLUMN, MC_USD_COLUMN,
};
use crate::error::Result;
use crate::types::EnrichedBankRecord;
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use std::fmt;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Column names in record order
pub const RECORD_COLUMNS: [&str; 5] = [
    BANK_NAME_COLUMN,
    MC_USD_COLUMN,
    MC_EUR_COLUMN,
    MC_GBP_COLUMN,
    MC_INR_COLUMN,
];

/// Writes the records as CSV with a header row and a leading 0-based index
/// column, replacing whatever was at `path`.
pub fn load_to_csv(records: &[EnrichedBankRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![""];
    header.extend(RECORD_COLUMNS);
    writer.write_record(&header)?;

    for (index, record) in records.iter().enumerate() {
        writer.serialize((
            index,
            &record.bank_name,
            record.market_cap_usd,
            record.market_cap_eur,
            record.market_cap_gbp,
            record.market_cap_inr,
        ))?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column names and rows returned by a read query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format!("{f:?}"),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

impl fmt::Display for QueryOutput {
    /// Right-aligned table with a leading row index, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "Empty result\nColumns: [{}]", self.columns.join(", "));
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(render_value).collect())
            .collect();
        let index_width = (self.rows.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row.get(i).map_or(0, |c| c.chars().count()))
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        for (index, row) in cells.iter().enumerate() {
            write!(f, "\n{index:<index_width$}")?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {cell:>width$}")?;
            }
        }
        Ok(())
    }
}

/// Single connection to the SQLite sink, held for the whole run
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref())?;
        debug!("Opened database {}", path.as_ref().display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Drops and recreates `table_name`, then inserts one row per record.
    pub fn load_table(&mut self, table_name: &str, records: &[EnrichedBankRecord]) -> Result<()> {
        let table = quote_identifier(table_name);
        let tx = self.conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 {} TEXT,
                 {} REAL,
                 {} REAL,
                 {} REAL,
                 {} REAL
             );",
            RECORD_COLUMNS[0], RECORD_COLUMNS[1], RECORD_COLUMNS[2], RECORD_COLUMNS[3], RECORD_COLUMNS[4],
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                RECORD_COLUMNS.join(", ")
            ))?;
            for record in records {
                stmt.execute(params![
                    record.bank_name,
                    record.market_cap_usd,
                    record.market_cap_eur,
                    record.market_cap_gbp,
                    record.market_cap_inr,
                ])?;
            }
        }

        tx.commit()?;
        info!("Loaded {} rows into table {}", records.len(), table_name);
        Ok(())
    }

    /// Runs a literal SQL statement and collects every row.
    ///
    /// The text is executed as given, with no parameter binding.
    pub fn query(&self, sql: &str) -> Result<QueryOutput> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(row.get::<_, Value>(i)?);
            }
            out.push(values);
        }

        Ok(QueryOutput { columns, rows: out })
    }

    /// Writes the query text, then its result table, to `out`.
    pub fn run_query<W: Write>(&self, sql: &str, out: &mut W) -> Result<QueryOutput> {
        writeln!(out, "{sql}")?;
        let output = self.query(sql)?;
        writeln!(out, "{output}")?;
        Ok(output)
    }

    /// Releases the connection, surfacing any error from closing it.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        debug!("Database connection closed");
        Ok(())
    }
}
