use crate::config::Credentials;
use crate::domain::model::{CatalogResponse, Country, SubscriptionPlan};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use url::Url;

/// 上游 API 會擋掉非瀏覽器的 User-Agent
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

const SUPPORTED_LAYOUTS: &str = "STANDARD";
const PAYMENT_VENDOR: &str = "VENDOR_STRIPE";

/// 查詢每個國家的訂閱目錄並正規化成 [`SubscriptionPlan`]
#[derive(Debug, Clone)]
pub struct SubscriptionFetcher {
    client: Client,
    base_url: String,
    credentials: Credentials,
    date: NaiveDate,
}

impl SubscriptionFetcher {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        credentials: Credentials,
        date: NaiveDate,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
            date,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `<base>/<YYYY-MM-DD>/users/<user id>/subscription-catalog?billingCountryCode=..&supportedLayouts=STANDARD&vendor=VENDOR_STRIPE`
    pub fn catalog_url(&self, country: &Country) -> Result<Url> {
        let raw = format!(
            "{}/{}/users/{}/subscription-catalog",
            self.base_url.trim_end_matches('/'),
            self.date.format("%Y-%m-%d"),
            self.credentials.user_id
        );

        let mut url = Url::parse(&raw).map_err(|e| EtlError::ConfigError {
            message: format!("Invalid catalog URL '{}': {}", raw, e),
        })?;
        url.query_pairs_mut()
            .append_pair("billingCountryCode", &country.code)
            .append_pair("supportedLayouts", SUPPORTED_LAYOUTS)
            .append_pair("vendor", PAYMENT_VENDOR);

        Ok(url)
    }

    /// Never fails: every error is logged with the country name and yields no plans,
    /// so one bad country cannot sink the batch.
    pub async fn fetch_subscriptions(&self, country: &Country) -> Vec<SubscriptionPlan> {
        match self.try_fetch_subscriptions(country).await {
            Ok(plans) => plans,
            Err(EtlError::NetworkError { status, .. }) => {
                tracing::warn!(
                    "Error fetching subscriptions for {}. Status code: {}",
                    country.name,
                    status
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Error processing {}: {}", country.name, e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_subscriptions(&self, country: &Country) -> Result<Vec<SubscriptionPlan>> {
        let url = self.catalog_url(country)?;
        tracing::debug!("Fetching catalog for {} ({})", country.name, country.code);

        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, &self.credentials.bearer_token)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::NetworkError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let catalog: CatalogResponse = serde_json::from_str(&body)?;

        let (raw_plans, skipped) = catalog.into_raw_plans();
        if skipped > 0 {
            tracing::debug!("{}: skipped {} malformed plan entries", country.name, skipped);
        }
        if raw_plans.is_empty() {
            tracing::info!("No subscriptions found for {}.", country.name);
            return Ok(Vec::new());
        }

        let plans: Vec<SubscriptionPlan> = raw_plans
            .iter()
            .filter_map(|raw| SubscriptionPlan::from_raw(country, raw))
            .collect();

        tracing::debug!(
            "{}: kept {} of {} plans",
            country.name,
            plans.len(),
            raw_plans.len()
        );
        Ok(plans)
    }

    /// 以固定上限並行抓取，結果依國家清單順序攤平
    pub async fn fetch_all(&self, countries: &[Country], limit: usize) -> Vec<SubscriptionPlan> {
        // 先建立所有 future，stream 內不持有借用 country 的 closure
        let tasks: Vec<_> = countries
            .iter()
            .map(|country| self.fetch_subscriptions(country))
            .collect();

        let per_country: Vec<Vec<SubscriptionPlan>> = stream::iter(tasks)
            .buffered(limit.max(1))
            .collect()
            .await;

        per_country.into_iter().flatten().collect()
    }
}
