use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub countries: usize,
    pub plans: usize,
    pub output_path: String,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    /// 國家清單失敗會直接中止，不會發出任何國家的查詢
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting the script...");
        self.monitor.log_stats("Start");

        // Extract
        let countries = self.pipeline.extract().await?;
        let country_count = countries.len();
        self.monitor.log_stats("Countries fetched");

        // Transform
        let plans = self.pipeline.transform(countries).await?;
        let plan_count = plans.len();
        tracing::info!(
            "Collected {} subscription plans from {} countries",
            plan_count,
            country_count
        );
        self.monitor.log_stats("Subscriptions fetched");

        // Load
        let output_path = self.pipeline.load(plans).await?;
        self.monitor.log_stats("Finished");

        Ok(RunSummary {
            countries: country_count,
            plans: plan_count,
            output_path,
        })
    }
}
