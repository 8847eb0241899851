use crate::domain::model::Country;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

/// 讀取公開的國家清單（不需授權）
#[derive(Debug, Clone)]
pub struct CountrySource {
    client: Client,
    url: String,
}

impl CountrySource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Any failure here is fatal for the run; there is nothing to fetch without the list.
    pub async fn fetch_countries(&self) -> Result<Vec<Country>> {
        tracing::debug!("Making API request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(EtlError::NetworkError {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let countries: Vec<Country> = serde_json::from_str(&body)?;

        tracing::info!("Found {} countries.", countries.len());
        Ok(countries)
    }
}
