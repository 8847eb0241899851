use crate::domain::model::{Country, SubscriptionPlan};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn countries_url(&self) -> &str;
    fn catalog_base_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Country>>;
    async fn transform(&self, countries: Vec<Country>) -> Result<Vec<SubscriptionPlan>>;
    async fn load(&self, plans: Vec<SubscriptionPlan>) -> Result<String>;
}
