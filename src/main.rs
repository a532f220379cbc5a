//! New Relic Alerts CLI
//!
//! 读取 `.newrelicalerts`，将其中声明的告警策略同步到 New Relic

use anyhow::Result;
use clap::Parser;
use newrelic_alerts::cli::{handle_apply, print_error, print_report, ApplyArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "newrelic-alerts")]
#[command(about = "Converge New Relic alert policies from a .newrelicalerts config file")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    apply: ApplyArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug newrelic-alerts --dry-run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newrelic_alerts=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match handle_apply(cli.apply).await {
        Ok(report) => {
            print_report(&report);
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }

    Ok(())
}
