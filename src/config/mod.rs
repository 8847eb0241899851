pub mod cli;
pub mod credentials;

pub use credentials::{Credentials, EnvFile};

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_endpoint, validate_file_name, validate_path, validate_range, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COUNTRIES_URL: &str =
    "https://js.stripe.com/v3/fingerprinted/data/countries_es-0c588d4d6449e3a2b4d51f68184e2a79.json";
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://www.duolingo.com";
pub const DEFAULT_OUTPUT_FILE: &str = "duolingo_subscriptions.csv";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "duo-pricing-etl"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Collect Duolingo subscription prices for every billing country into a CSV file")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_COUNTRIES_URL))]
    pub countries_url: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_CATALOG_BASE_URL))]
    pub catalog_base_url: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "."))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_OUTPUT_FILE))]
    pub output_file: String,

    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_CONCURRENT_REQUESTS))]
    pub concurrent_requests: usize,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log process CPU and memory usage"))]
    pub monitor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            output_path: ".".to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            verbose: false,
            monitor: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn countries_url(&self) -> &str {
        &self.countries_url
    }

    fn catalog_base_url(&self) -> &str {
        &self.catalog_base_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_endpoint("countries_url", &self.countries_url)?;
        validate_endpoint("catalog_base_url", &self.catalog_base_url)?;
        validate_path("output_path", &self.output_path)?;
        validate_file_name("output_file", &self.output_file)?;
        validate_range("concurrent_requests", self.concurrent_requests, 1, 100)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
