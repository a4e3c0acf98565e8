use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;

/// Where decks and card faces come from.
///
/// Calls block; the UI runs them on a worker thread.
pub trait DeckSource {
    /// GET the draw endpoint and return the raw body.
    fn draw(&self, url: &str) -> Result<String>;

    /// GET one face image.
    fn image(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpDeckSource {
    http: Client,
}

impl HttpDeckSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("naipes/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl DeckSource for HttpDeckSource {
    fn draw(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }

    fn image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
