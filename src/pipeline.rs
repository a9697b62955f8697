use crate::apis::{LargestBanksCrawler, TableLayout};
use crate::config::EtlConfig;
use crate::constants::{
    BANK_NAME_COLUMN, MC_GBP_COLUMN, MSG_COMPLETE, MSG_CONNECTION_CLOSED, MSG_CSV_SAVED,
    MSG_DB_LOADED, MSG_EXTRACTED, MSG_PRELIMINARIES, MSG_TRANSFORMED, TABLE_ATTRIBS,
};
use crate::error::Result;
use crate::ports::PageFetcher;
use crate::progress::ProgressLog;
use crate::storage::{load_to_csv, Database, QueryOutput};
use crate::transform::transform_with_rate_file;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Read-back queries run after loading, in order.
pub fn fixed_queries(table_name: &str) -> Vec<String> {
    vec![
        format!("SELECT * FROM {table_name}"),
        format!("SELECT AVG({MC_GBP_COLUMN}) FROM {table_name}"),
        format!("SELECT {BANK_NAME_COLUMN} from {table_name} LIMIT 5"),
    ]
}

/// Summary of a completed run
#[derive(Debug)]
pub struct PipelineReport {
    pub rows_extracted: usize,
    pub csv_path: PathBuf,
    pub table_name: String,
    pub queries: Vec<String>,
    pub query_outputs: Vec<QueryOutput>,
}

pub struct Pipeline<'a> {
    config: EtlConfig,
    fetcher: &'a dyn PageFetcher,
    progress: ProgressLog,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: EtlConfig, fetcher: &'a dyn PageFetcher) -> Self {
        let progress = ProgressLog::new(config.log_path.clone());
        Self {
            config,
            fetcher,
            progress,
        }
    }

    /// Extract, transform, load, then run the read-back queries.
    ///
    /// Query text and results go to `out`. A progress line is logged after
    /// each completed stage, so a failing stage leaves the log ending at the
    /// stage before it. The database is opened once, closed before the final
    /// progress line, and dropped on every error path.
    #[instrument(skip(self, out), fields(source = %self.config.source_url))]
    pub fn run<W: Write>(&self, out: &mut W) -> Result<PipelineReport> {
        let config = &self.config;
        config.validate()?;
        let mut db = Database::open(&config.db_path)?;
        self.progress.log(MSG_PRELIMINARIES)?;

        let crawler = LargestBanksCrawler::new(self.fetcher, TableLayout::with_columns(&TABLE_ATTRIBS)?);
        let records = crawler.extract(&config.source_url)?;
        let rows_extracted = records.len();
        self.progress.log(MSG_EXTRACTED)?;

        let enriched = transform_with_rate_file(records, &config.rate_table_path)?;
        self.progress.log(MSG_TRANSFORMED)?;

        load_to_csv(&enriched, &config.csv_output_path)?;
        self.progress.log(MSG_CSV_SAVED)?;

        db.load_table(&config.table_name, &enriched)?;
        self.progress.log(MSG_DB_LOADED)?;

        let queries = fixed_queries(&config.table_name);
        let mut query_outputs = Vec::with_capacity(queries.len());
        for query in &queries {
            query_outputs.push(db.run_query(query, out)?);
        }
        self.progress.log(MSG_COMPLETE)?;

        db.close()?;
        self.progress.log(MSG_CONNECTION_CLOSED)?;

        info!("Pipeline finished with {} rows", rows_extracted);
        Ok(PipelineReport {
            rows_extracted,
            csv_path: config.csv_output_path.clone(),
            table_name: config.table_name.clone(),
            queries,
            query_outputs,
        })
    }
}
