//! awsping - rank AWS regions by HTTP round-trip latency

use awsping::{
    cli::Cli,
    config::{display_config_summary, load_config},
    defaults::supports_color,
    error::{AppError, Result},
    executor::{ExecutionConfig, LatencyCoordinator},
    logging::LoggerFactory,
    output::{OutputCoordinator, OutputFormatterFactory},
    probe::HttpProbe,
    PKG_NAME, VERSION,
};
use clap::Parser;
use std::io::Write;
use std::process;

const BUILD_TIME: &str = env!("BUILD_TIME");

#[tokio::main]
async fn main() {
    awsping::install_panic_hook();

    let cli = Cli::parse();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(supports_color()));
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    let config = load_config(cli)?;

    let loggers = LoggerFactory::new(config.clone());
    let logger = loggers.create_logger("MAIN").await;
    logger
        .debug(&format!("{} v{}", PKG_NAME, VERSION))
        .field("build_time", BUILD_TIME)
        .field("git_commit", option_env!("GIT_COMMIT").unwrap_or("unknown"))
        .log()
        .await;
    logger
        .debug(&format!("Configuration:\n{}", display_config_summary(&config)))
        .log()
        .await;

    let probe_logger = loggers.create_probe_logger().await;
    let probe = HttpProbe::with_logger(&config, probe_logger.clone())?;
    let mut coordinator =
        LatencyCoordinator::new(ExecutionConfig::from(&config), probe).with_logger(probe_logger);

    let (ranked, summary) = coordinator.run_default().await?;
    logger
        .info("Ranking complete")
        .field("rounds", summary.rounds)
        .field("regions", summary.regions)
        .field("failed_probes", summary.failed_probes)
        .field("elapsed_ms", summary.elapsed.as_millis() as u64)
        .log()
        .await;

    let output = OutputCoordinator::new(OutputFormatterFactory::create_formatter(config.enable_color))
        .display_ranking(&ranked)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    if let AppError::Config(_) = error {
        eprintln!();
        eprintln!("Configuration help:");
        eprintln!("  - --repeats must be a whole number of at least 1");
        eprintln!("  - Check AWSPING_* variables in the environment and in .env");
        eprintln!("  - AWSPING_TIMEOUT_SECONDS accepts 0 (no limit) up to 300");
    }
}
