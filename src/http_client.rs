use crate::error::{EtlError, Result};
use crate::ports::PageFetcher;
use reqwest::blocking::Client;
use tracing::{debug, info};

/// Blocking GET with no timeout and no retry.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        // The blocking client defaults to a 30s timeout; waits here are unbounded
        let client = Client::builder().timeout(None).build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for ReqwestFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        debug!("Received {} bytes", body.len());
        Ok(body)
    }
}
