//! Dry-run 包装：读操作照常转发，写操作只记录不发送

use async_trait::async_trait;
use tracing::info;

use super::types::*;
use super::{AlertsApi, ApiError};
use crate::config::ConditionSpec;

/// dry-run 模式下新建资源返回的占位 ID
pub const PLACEHOLDER_ID: u64 = 0;

/// 包装任意 `AlertsApi`，跳过所有写操作
pub struct DryRunApi<A> {
    inner: A,
}

impl<A> DryRunApi<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: AlertsApi> AlertsApi for DryRunApi<A> {
    async fn list_policies(&self) -> Result<Vec<RemotePolicy>, ApiError> {
        self.inner.list_policies().await
    }

    async fn create_policy(&self, name: &str) -> Result<PolicyId, ApiError> {
        info!(policy = name, "[DRY-RUN] Would create policy");
        Ok(PolicyId(PLACEHOLDER_ID))
    }

    async fn update_policy(&self, policy_id: PolicyId, name: &str) -> Result<PolicyId, ApiError> {
        info!(policy = name, %policy_id, "[DRY-RUN] Would update policy");
        Ok(policy_id)
    }

    async fn list_notification_channels(&self) -> Result<Vec<RemoteNotificationChannel>, ApiError> {
        self.inner.list_notification_channels().await
    }

    async fn create_notification_channel(
        &self,
        channel_type: &str,
        _url: &str,
        channel_name: &str,
    ) -> Result<ChannelId, ApiError> {
        info!(channel_type, channel = channel_name, "[DRY-RUN] Would create notification channel");
        Ok(ChannelId(PLACEHOLDER_ID))
    }

    async fn delete_channel_policy_association(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<(), ApiError> {
        info!(%policy_id, %channel_id, "[DRY-RUN] Would remove channel association");
        Ok(())
    }

    async fn associate_policy_with_channel(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<PolicyId, ApiError> {
        info!(%policy_id, %channel_id, "[DRY-RUN] Would associate policy with channel");
        Ok(policy_id)
    }

    async fn list_conditions_for_policy(
        &self,
        policy_id: PolicyId,
    ) -> Result<Vec<RemoteCondition>, ApiError> {
        // 占位策略在远端不存在
        if policy_id.0 == PLACEHOLDER_ID {
            return Ok(Vec::new());
        }
        self.inner.list_conditions_for_policy(policy_id).await
    }

    async fn delete_condition(&self, condition_id: ConditionId) -> Result<(), ApiError> {
        info!(%condition_id, "[DRY-RUN] Would delete condition");
        Ok(())
    }

    async fn create_condition(
        &self,
        policy_id: PolicyId,
        condition: &ConditionSpec,
    ) -> Result<ConditionId, ApiError> {
        info!(%policy_id, condition = %condition.description, "[DRY-RUN] Would create NRQL condition");
        Ok(ConditionId(PLACEHOLDER_ID))
    }
}
