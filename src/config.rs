//! 期望状态配置文件 `.newrelicalerts`
//!
//! 配置查找顺序：
//! 1. 从当前目录开始逐级向上，依次检查 `<dir>/.newrelicalerts` 和 `<dir>/.config/newrelicalerts`
//! 2. 用户主目录下的同名文件

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = ".newrelicalerts";

/// `.config/` 子目录下使用的文件名（去掉前导点）
const DOT_CONFIG_FILE_NAME: &str = "newrelicalerts";

/// 配置文件根对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default)]
    pub policies: Vec<DesiredPolicy>,
}

/// 声明的告警策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredPolicy {
    /// 策略名称（文档内唯一）
    pub name: String,
    pub notification: NotificationSpec,
    pub condition: ConditionSpec,
}

/// 通知目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSpec {
    /// 渠道类型标签，如 "slack"
    #[serde(rename = "type")]
    pub notification_type: String,
    pub url: String,
    /// 渠道名称，可带前导标记字符（如 `#ops`）
    pub channel: String,
}

/// NRQL 告警条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub description: String,
    /// 评估窗口
    pub duration: u32,
    pub operator: Operator,
    pub threshold: f64,
    /// NRQL 查询语句
    pub query: String,
}

/// 阈值比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Above,
    Below,
    Equal,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Above => write!(f, "above"),
            Operator::Below => write!(f, "below"),
            Operator::Equal => write!(f, "equal"),
        }
    }
}

impl AlertsConfig {
    /// 从指定路径加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!(path = %path.display(), policies = config.policies.len(), "Loaded alerts config");
        Ok(config)
    }

    /// 从 `start_dir` 开始查找并加载
    pub fn discover(start_dir: &Path) -> Result<Self> {
        let path = find_config(start_dir)
            .with_context(|| format!("Could not find {} config file", CONFIG_FILE_NAME))?;
        Self::load(&path)
    }
}

/// 从 `start_dir` 逐级向上查找配置文件，找不到时回退到主目录
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find_map(config_in_dir)
        .or_else(|| dirs::home_dir().and_then(|home| config_in_dir(&home)))
}

fn config_in_dir(dir: &Path) -> Option<PathBuf> {
    [
        dir.join(CONFIG_FILE_NAME),
        dir.join(".config").join(DOT_CONFIG_FILE_NAME),
    ]
    .into_iter()
    .find(|candidate| candidate.is_file())
}
