//! 运行环境设置（API 凭证、接口地址）

use anyhow::{anyhow, Result};
use std::time::Duration;

/// New Relic REST API v2 基础地址
pub const DEFAULT_BASE_URL: &str = "https://api.newrelic.com/v2/";

/// API key 环境变量
pub const API_KEY_ENV: &str = "NEWRELIC_API_KEY";

/// 覆盖基础地址的环境变量（代理、测试用）
pub const BASE_URL_ENV: &str = "NEWRELIC_API_URL";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 客户端设置
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 从进程环境读取
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过查找函数读取，便于测试时不修改进程环境
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("No available {} env var", API_KEY_ENV))?;

        let settings = Self::new(api_key);
        Ok(match lookup(BASE_URL_ENV).filter(|u| !u.is_empty()) {
            Some(url) => settings.with_base_url(url),
            None => settings,
        })
    }
}
