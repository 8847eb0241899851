pub mod countries;
pub mod etl;
pub mod pipeline;
pub mod report;
pub mod subscriptions;

pub use crate::domain::model::{Country, SubscriptionPlan};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
