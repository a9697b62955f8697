use anyhow::Context;
use banks_etl::constants::DEFAULT_CONFIG_PATH;
use banks_etl::http_client::ReqwestFetcher;
use banks_etl::logging;
use banks_etl::{EtlConfig, Pipeline};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = logging::init_logging();

    let config = EtlConfig::load_or_default(DEFAULT_CONFIG_PATH)
        .with_context(|| format!("Failed to load configuration from {DEFAULT_CONFIG_PATH}"))?;
    info!(?config, "Starting ETL run");

    let fetcher = ReqwestFetcher::new().context("Failed to build HTTP client")?;
    let pipeline = Pipeline::new(config, &fetcher);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match pipeline.run(&mut out) {
        Ok(report) => {
            info!(
                rows = report.rows_extracted,
                csv = %report.csv_path.display(),
                table = %report.table_name,
                queries = report.queries.len(),
                "ETL run complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(kind = ?e.kind(), "ETL run failed: {}", e);
            Err(e.into())
        }
    }
}
