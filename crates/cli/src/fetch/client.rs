use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use tracing::debug;

use crate::fetch::error::Result;
use crate::fetch::error::FetchError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const TIMEOUT: Duration = Duration::from_secs(20);

pub(crate) struct PageClient {
    client: Client,
    timezone: String,
}

impl PageClient {
    pub fn new(timezone: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            timezone: timezone.into(),
        })
    }

    /// Saves the page at `url` to `path` and returns the number of bytes
    /// written.
    pub fn download(&self, url: Url, path: &Path) -> Result<u64> {
        debug!(%url, timezone = %self.timezone, "requesting the page");

        let mut response = self
            .client
            .get(url)
            .header(COOKIE, format!("timezone={}", self.timezone))
            .send()?;

        match response.status() {
            StatusCode::OK => {
                let mut writer = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)?;

                let bytes = io::copy(&mut response, &mut writer)?;
                Ok(bytes)
            }
            status_code => {
                let message = response.text()?;
                let error = FetchError::Response {
                    status_code,
                    message,
                };
                Err(error)
            }
        }
    }
}
