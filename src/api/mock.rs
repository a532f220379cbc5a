//! 测试用的内存 `AlertsApi`，按顺序记录所有调用

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::types::*;
use super::{AlertsApi, ApiError};
use crate::config::ConditionSpec;
use crate::notification::strip_channel_marker;

/// 记录的 API 调用
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListPolicies,
    CreatePolicy(String),
    UpdatePolicy(PolicyId, String),
    ListChannels,
    CreateChannel {
        channel_type: String,
        url: String,
        channel: String,
    },
    DeleteAssociation(PolicyId, ChannelId),
    Associate(PolicyId, ChannelId),
    ListConditions(PolicyId),
    DeleteCondition(ConditionId),
    CreateCondition(PolicyId, String),
}

impl ApiCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            ApiCall::ListPolicies | ApiCall::ListChannels | ApiCall::ListConditions(_)
        )
    }
}

pub struct RecordingApi {
    policies: Vec<RemotePolicy>,
    channels: Vec<RemoteNotificationChannel>,
    conditions: HashMap<PolicyId, Vec<ConditionId>>,
    failing_policy: Option<String>,
    calls: Mutex<Vec<ApiCall>>,
    next_id: AtomicU64,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            policies: Vec::new(),
            channels: Vec::new(),
            conditions: HashMap::new(),
            failing_policy: None,
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1000),
        }
    }

    pub fn with_policy(mut self, id: u64, name: &str) -> Self {
        self.policies.push(RemotePolicy {
            id: PolicyId(id),
            name: name.to_string(),
        });
        self
    }

    pub fn with_channel(mut self, id: u64, channel_type: &str, channel: &str, linked: &[u64]) -> Self {
        self.channels.push(RemoteNotificationChannel {
            id: ChannelId(id),
            channel_type: channel_type.to_string(),
            configuration: ChannelConfiguration {
                url: None,
                channel: Some(channel.to_string()),
            },
            links: ChannelLinks {
                policy_ids: linked.iter().copied().map(PolicyId).collect(),
            },
        });
        self
    }

    pub fn with_conditions(mut self, policy_id: u64, ids: &[u64]) -> Self {
        self.conditions
            .insert(PolicyId(policy_id), ids.iter().copied().map(ConditionId).collect());
        self
    }

    /// 对该策略名的创建/更新调用返回错误
    pub fn failing_for(mut self, policy_name: &str) -> Self {
        self.failing_policy = Some(policy_name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<ApiCall> {
        self.calls().into_iter().filter(ApiCall::is_mutation).collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn check_failure(&self, name: &str) -> Result<(), ApiError> {
        if self.failing_policy.as_deref() == Some(name) {
            return Err(ApiError::UnexpectedResponse {
                endpoint: "alerts_policies.json".to_string(),
                message: format!("injected failure for {}", name),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AlertsApi for RecordingApi {
    async fn list_policies(&self) -> Result<Vec<RemotePolicy>, ApiError> {
        self.record(ApiCall::ListPolicies);
        Ok(self.policies.clone())
    }

    async fn create_policy(&self, name: &str) -> Result<PolicyId, ApiError> {
        self.record(ApiCall::CreatePolicy(name.to_string()));
        self.check_failure(name)?;
        Ok(PolicyId(self.next_id()))
    }

    async fn update_policy(&self, policy_id: PolicyId, name: &str) -> Result<PolicyId, ApiError> {
        self.record(ApiCall::UpdatePolicy(policy_id, name.to_string()));
        self.check_failure(name)?;
        Ok(policy_id)
    }

    async fn list_notification_channels(&self) -> Result<Vec<RemoteNotificationChannel>, ApiError> {
        self.record(ApiCall::ListChannels);
        Ok(self.channels.clone())
    }

    async fn create_notification_channel(
        &self,
        channel_type: &str,
        url: &str,
        channel_name: &str,
    ) -> Result<ChannelId, ApiError> {
        self.record(ApiCall::CreateChannel {
            channel_type: channel_type.to_string(),
            url: url.to_string(),
            channel: strip_channel_marker(channel_name).to_string(),
        });
        Ok(ChannelId(self.next_id()))
    }

    async fn delete_channel_policy_association(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::DeleteAssociation(policy_id, channel_id));
        Ok(())
    }

    async fn associate_policy_with_channel(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<PolicyId, ApiError> {
        self.record(ApiCall::Associate(policy_id, channel_id));
        Ok(policy_id)
    }

    async fn list_conditions_for_policy(
        &self,
        policy_id: PolicyId,
    ) -> Result<Vec<RemoteCondition>, ApiError> {
        self.record(ApiCall::ListConditions(policy_id));
        Ok(self
            .conditions
            .get(&policy_id)
            .map(|ids| {
                ids.iter()
                    .map(|&id| RemoteCondition { id, policy_id })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_condition(&self, condition_id: ConditionId) -> Result<(), ApiError> {
        self.record(ApiCall::DeleteCondition(condition_id));
        Ok(())
    }

    async fn create_condition(
        &self,
        policy_id: PolicyId,
        condition: &ConditionSpec,
    ) -> Result<ConditionId, ApiError> {
        self.record(ApiCall::CreateCondition(policy_id, condition.description.clone()));
        Ok(ConditionId(self.next_id()))
    }
}
