use clap::Parser;
use duo_pricing_etl::config::EnvFile;
use duo_pricing_etl::utils::{logger, validation::Validate};
use duo_pricing_etl::{
    CliConfig, Credentials, EtlEngine, EtlError, LocalStorage, PricingPipeline,
};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在時直接使用環境變數
    let env_file = EnvFile::load();

    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting duo-pricing-etl");
    match &env_file {
        EnvFile::Loaded(path) => tracing::debug!("Loaded environment from {}", path.display()),
        EnvFile::Missing => tracing::debug!(".env file not found, using process environment"),
        EnvFile::Invalid(e) => tracing::warn!("⚠️ Ignoring unreadable .env file: {}", e),
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 在任何網路請求之前檢查設定與憑證
    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => exit_with(&e),
    };

    if config.monitor {
        tracing::info!("🔍 Resource monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let monitor_enabled = config.monitor;
    let pipeline = PricingPipeline::new(storage, config, credentials);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Script completed successfully.");
            println!(
                "✅ Saved {} plans from {} countries to {}",
                summary.plans, summary.countries, summary.output_path
            );
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}
