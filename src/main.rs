use clap::Parser;
use pycraft_launcher::core::supervisor::LaunchOutcome;
use pycraft_launcher::utils::{logger, validation::Validate};
use pycraft_launcher::{
    CliConfig, LaunchManifest, LaunchPlan, LaunchSupervisor, SystemRunner, TerminalConsole,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting pycraft-launcher");
    tracing::debug!("CLI config: {:?}", config);

    // 載入並驗證啟動清單
    let manifest = match LaunchManifest::load(config.manifest.as_deref()) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::error!("❌ Failed to load manifest: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = manifest.validate() {
        tracing::error!("❌ Manifest validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be executed");
        for line in LaunchPlan::build(&manifest, &config.forwarded).lines() {
            println!("{}", line);
        }
        return;
    }

    if config.monitor {
        tracing::info!("🔍 Launch monitoring enabled");
    }

    let supervisor = LaunchSupervisor::new(SystemRunner::new(), TerminalConsole::new(), manifest)
        .with_monitoring(config.monitor);

    let report = supervisor.run(&config.forwarded).await;
    tracing::info!("📋 Launch summary: {:?}", report.summary());

    if let LaunchOutcome::Aborted(e) = &report.outcome {
        tracing::debug!("Launch aborted in {:?}: {}", report.visited().last(), e);
    }

    std::process::exit(report.exit_code());
}
