use crate::config::Credentials;
use crate::core::countries::CountrySource;
use crate::core::report::render_csv;
use crate::core::subscriptions::SubscriptionFetcher;
use crate::core::{ConfigProvider, Country, Pipeline, Storage, SubscriptionPlan};
use crate::utils::error::Result;
use chrono::{Local, NaiveDate};
use reqwest::Client;

/// 國家清單 → 各國訂閱目錄 → CSV
pub struct PricingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    countries: CountrySource,
    fetcher: SubscriptionFetcher,
}

impl<S: Storage, C: ConfigProvider> PricingPipeline<S, C> {
    pub fn new(storage: S, config: C, credentials: Credentials) -> Self {
        Self::with_date(storage, config, credentials, Local::now().date_naive())
    }

    /// Same as [`PricingPipeline::new`] but pins the date embedded in catalog URLs.
    pub fn with_date(storage: S, config: C, credentials: Credentials, date: NaiveDate) -> Self {
        // 同一個 client 在所有請求間共用連線池
        let client = Client::new();
        let countries = CountrySource::new(client.clone(), config.countries_url());
        let fetcher =
            SubscriptionFetcher::new(client, config.catalog_base_url(), credentials, date);

        Self {
            storage,
            config,
            countries,
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PricingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Country>> {
        tracing::info!("Fetching the list of countries...");
        self.countries.fetch_countries().await
    }

    async fn transform(&self, countries: Vec<Country>) -> Result<Vec<SubscriptionPlan>> {
        tracing::info!(
            "Fetching subscription data for {} countries ({} concurrent requests, date {})...",
            countries.len(),
            self.config.concurrent_requests(),
            self.fetcher.date()
        );

        let plans = self
            .fetcher
            .fetch_all(&countries, self.config.concurrent_requests())
            .await;

        Ok(plans)
    }

    async fn load(&self, plans: Vec<SubscriptionPlan>) -> Result<String> {
        tracing::info!("Saving data to '{}'...", self.config.output_file());

        let data = render_csv(&plans)?;
        tracing::debug!("Writing CSV ({} bytes, {} rows)", data.len(), plans.len());
        let written = self
            .storage
            .write_file(self.config.output_file(), &data)
            .await?;

        tracing::info!("CSV file saved successfully.");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::utils::error::EtlError;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(path.to_string())
        }
    }

    fn config(server: &MockServer) -> CliConfig {
        CliConfig {
            countries_url: server.url("/countries.json"),
            catalog_base_url: server.base_url(),
            output_file: "prices.csv".to_string(),
            ..CliConfig::default()
        }
    }

    #[tokio::test]
    async fn test_extract_propagates_country_list_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/countries.json");
            then.status(502);
        });

        let pipeline = PricingPipeline::new(
            MockStorage::new(),
            config(&server),
            Credentials::new("Bearer t", "1"),
        );

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::NetworkError { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_transform_and_load_through_storage() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/2026-01-31/users/55/subscription-catalog")
                .query_param("billingCountryCode", "GB");
            then.status(200).json_body(serde_json::json!({
                "plusPackageViewModels": [
                    {"periodLengthInMonths": 12, "isFamilyPlan": false, "priceInCents": 7999, "trialPeriodInDays": 14, "planCurrency": "GBP"}
                ]
            }));
        });

        let storage = MockStorage::new();
        let pipeline = PricingPipeline::with_date(
            storage.clone(),
            config(&server),
            Credentials::new("Bearer t", "55"),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );

        let plans = pipeline
            .transform(vec![Country::new("Reino Unido", "GB")])
            .await
            .unwrap();
        assert_eq!(plans.len(), 1);

        let written = pipeline.load(plans).await.unwrap();
        assert_eq!(written, "prices.csv");

        let csv = String::from_utf8(storage.get_file("prices.csv").await.unwrap()).unwrap();
        assert!(csv.contains("Duolingo Premium 12 Months,12_month,12,Reino Unido,GB,14,79.99,GBP"));
    }

    async fn run_as_trait_object(pipeline: &dyn Pipeline) -> Result<Vec<SubscriptionPlan>> {
        let countries = vec![Country::new("Polonia", "PL"), Country::new("Suecia", "SE")];
        pipeline.transform(countries).await
    }

    #[tokio::test]
    async fn test_transform_runs_behind_dyn_pipeline_on_spawned_task() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/2026-01-31/users/55/subscription-catalog");
            then.status(200).json_body(serde_json::json!({
                "plusPackageViewModels": [
                    {"periodLengthInMonths": 1, "priceInCents": 3999, "planCurrency": "PLN"}
                ]
            }));
        });

        let pipeline = PricingPipeline::with_date(
            MockStorage::new(),
            config(&server),
            Credentials::new("Bearer t", "55"),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );

        // tokio::spawn 要求 future 為 Send
        let handle = tokio::spawn(async move { run_as_trait_object(&pipeline).await });
        let plans = handle.await.unwrap().unwrap();

        let codes: Vec<&str> = plans.iter().map(|p| p.country_code.as_str()).collect();
        assert_eq!(codes, vec!["PL", "SE"]);
    }
}
