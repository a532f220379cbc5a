//! New Relic Alerts API 客户端
//!
//! `AlertsApi` 每个方法对应一次 REST 调用，不包含业务逻辑。
//! 调用失败原样返回 `ApiError`，不重试、不退避。

pub mod client;
pub mod dry_run;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ConditionSpec;

pub use client::NewRelicClient;
pub use dry_run::DryRunApi;
pub use types::{
    ChannelConfiguration, ChannelId, ChannelLinks, ConditionId, PolicyId, RemoteCondition,
    RemoteNotificationChannel, RemotePolicy,
};

/// 远程调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error ({status}) from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },
}

/// Alerts REST API 的资源操作
#[async_trait]
pub trait AlertsApi: Send + Sync {
    async fn list_policies(&self) -> Result<Vec<RemotePolicy>, ApiError>;

    async fn create_policy(&self, name: &str) -> Result<PolicyId, ApiError>;

    async fn update_policy(&self, policy_id: PolicyId, name: &str) -> Result<PolicyId, ApiError>;

    async fn list_notification_channels(&self) -> Result<Vec<RemoteNotificationChannel>, ApiError>;

    /// 创建渠道；`channel_name` 的前导标记字符在存储前去掉
    async fn create_notification_channel(
        &self,
        channel_type: &str,
        url: &str,
        channel_name: &str,
    ) -> Result<ChannelId, ApiError>;

    async fn delete_channel_policy_association(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<(), ApiError>;

    async fn associate_policy_with_channel(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<PolicyId, ApiError>;

    async fn list_conditions_for_policy(
        &self,
        policy_id: PolicyId,
    ) -> Result<Vec<RemoteCondition>, ApiError>;

    async fn delete_condition(&self, condition_id: ConditionId) -> Result<(), ApiError>;

    async fn create_condition(
        &self,
        policy_id: PolicyId,
        condition: &ConditionSpec,
    ) -> Result<ConditionId, ApiError>;
}
