use crate::error::Result;

/// Retrieves the HTML body of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}
