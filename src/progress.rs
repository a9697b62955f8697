use crate::constants::LOG_TIMESTAMP_FORMAT;
use crate::error::Result;
use chrono::{DateTime, Local, TimeZone};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Append-only text log of pipeline stages.
///
/// The file is opened and closed on every call, so whatever was written
/// before a crash is already on disk.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn log(&self, message: &str) -> Result<()> {
        self.log_at(&Local::now(), message)
    }

    pub fn log_at<Tz: TimeZone>(&self, at: &DateTime<Tz>, message: &str) -> Result<()>
    where
        Tz::Offset: std::fmt::Display,
    {
        let line = format_line(at, message);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        info!(progress = %message, "{}", line);
        Ok(())
    }
}

/// `<timestamp> Message: <message>`
pub fn format_line<Tz: TimeZone>(at: &DateTime<Tz>, message: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} Message: {}", at.format(LOG_TIMESTAMP_FORMAT), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_line_format() {
        let at = Utc.with_ymd_and_hms(2023, 9, 8, 9, 16, 35).unwrap();
        assert_eq!(
            format_line(&at, "Process Complete"),
            "2023-Sep-08-09-16-35 Message: Process Complete"
        );
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("code_log.txt");
        fs::write(&path, "earlier line\n").unwrap();

        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        ProgressLog::new(&path).log_at(&at, "first").unwrap();
        ProgressLog::new(&path).log_at(&at, "second").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "earlier line\n2024-Jan-02-03-04-05 Message: first\n2024-Jan-02-03-04-05 Message: second\n"
        );
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = tempdir().unwrap();
        let log = ProgressLog::new(dir.path().join("missing").join("code_log.txt"));
        let err = log.log("anything").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
