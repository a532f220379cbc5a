//! Apply 命令 - 加载配置并收敛远端告警状态

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use super::output::{print_error, print_success};
use crate::api::{DryRunApi, NewRelicClient};
use crate::config::{AlertsConfig, CONFIG_FILE_NAME};
use crate::reconciler::{Reconciler, RunReport};
use crate::settings::Settings;

/// Apply 命令参数
#[derive(Args, Debug, Default)]
pub struct ApplyArgs {
    /// 配置文件路径（默认从当前目录向上查找 .newrelicalerts）
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Dry-run 模式（只读取远端，不执行写操作）
    #[arg(long)]
    pub dry_run: bool,
}

/// 处理 apply 命令
pub async fn handle_apply(args: ApplyArgs) -> Result<RunReport> {
    // 1. 配置文件
    let config = load_config(args.config.as_deref())?;

    // 2. 凭证
    let settings = Settings::from_env()?;

    // 3. 收敛
    apply_config(&config, &settings, args.dry_run).await
}

/// 读取指定配置文件，未指定时从当前目录开始查找
pub fn load_config(path: Option<&Path>) -> Result<AlertsConfig> {
    match path {
        Some(path) => AlertsConfig::load(path),
        None => {
            let cwd = std::env::current_dir().context("Cannot determine current directory")?;
            AlertsConfig::discover(&cwd)
        }
    }
}

/// 用给定设置收敛配置
pub async fn apply_config(
    config: &AlertsConfig,
    settings: &Settings,
    dry_run: bool,
) -> Result<RunReport> {
    let client = NewRelicClient::new(settings)?;
    info!(
        base_url = client.base_url(),
        policies = config.policies.len(),
        dry_run,
        "Applying {}",
        CONFIG_FILE_NAME
    );

    let report = if dry_run {
        Reconciler::new(DryRunApi::new(client)).run(config).await?
    } else {
        Reconciler::new(client).run(config).await?
    };

    Ok(report)
}

/// 打印运行结果，失败的策略写到 stderr
pub fn print_report(report: &RunReport) {
    for (name, err) in report.failures() {
        print_error(&format!("Policy \"{}\" failed: {}", name, err));
    }

    if report.is_success() {
        print_success(&format!("{} policies converged", report.policies.len()));
    }
}
