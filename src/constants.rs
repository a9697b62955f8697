/// Default run settings, used when no config file overrides them
pub const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";
pub const DEFAULT_RATE_TABLE_PATH: &str = "./exchange_rate.csv";
pub const DEFAULT_CSV_OUTPUT_PATH: &str = "./Largest_banks_data.csv";
pub const DEFAULT_DB_PATH: &str = "Banks.db";
pub const DEFAULT_TABLE_NAME: &str = "Largest_banks";
pub const DEFAULT_LOG_PATH: &str = "code_log.txt";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_PATH: &str = "banks_etl.toml";

// Output column names, in record order
pub const BANK_NAME_COLUMN: &str = "Bank_Name";
pub const MC_USD_COLUMN: &str = "MC_USD_Billion";
pub const MC_EUR_COLUMN: &str = "MC_EUR_Billion";
pub const MC_GBP_COLUMN: &str = "MC_GBP_Billion";
pub const MC_INR_COLUMN: &str = "MC_INR_Billion";

/// Columns requested from the scraped table
pub const TABLE_ATTRIBS: [&str; 2] = [BANK_NAME_COLUMN, MC_USD_COLUMN];

// Exchange-rate table headers
pub const RATE_CURRENCY_HEADER: &str = "Currency";
pub const RATE_VALUE_HEADER: &str = "Rate";

/// Currencies every rate table must provide
pub const REQUIRED_CURRENCIES: [&str; 3] = ["EUR", "GBP", "INR"];

/// Progress log timestamp, e.g. 2026-Oct-16-09-30-01
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H-%M-%S";

// Progress messages, in the order the pipeline writes them
pub const MSG_PRELIMINARIES: &str = "Preliminaries complete. Initiating ETL process";
pub const MSG_EXTRACTED: &str = "Data extraction complete. Initiating Transformation process";
pub const MSG_TRANSFORMED: &str = "Data transformation complete. Initiating Loading process";
pub const MSG_CSV_SAVED: &str = "Data saved to CSV file";
pub const MSG_DB_LOADED: &str = "Data loaded to Database as a table, Executing queries";
pub const MSG_COMPLETE: &str = "Process Complete";
pub const MSG_CONNECTION_CLOSED: &str = "Server Connection closed";
