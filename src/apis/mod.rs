pub mod largest_banks;

pub use largest_banks::{parse_bank_table, LargestBanksCrawler, TableLayout};
