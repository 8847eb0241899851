pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig, Credentials};
pub use core::{etl::EtlEngine, pipeline::PricingPipeline};
pub use domain::model::{Country, PlanType, SubscriptionPlan};
pub use utils::error::{EtlError, Result};
