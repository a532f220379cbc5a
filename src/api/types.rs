//! New Relic Alerts REST API 类型
//!
//! 远程资源模型（策略、通知渠道、条件）以及请求/响应载荷。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ConditionSpec, Operator};

// ============================================================================
// 标识符
// ============================================================================

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

remote_id!(
    /// 告警策略 ID
    PolicyId
);
remote_id!(
    /// 通知渠道 ID
    ChannelId
);
remote_id!(
    /// 告警条件 ID
    ConditionId
);

// ============================================================================
// 远程资源
// ============================================================================

/// 远程告警策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePolicy {
    pub id: PolicyId,
    pub name: String,
}

/// 远程通知渠道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteNotificationChannel {
    pub id: ChannelId,
    #[serde(rename = "type")]
    pub channel_type: String,
    #[serde(default)]
    pub configuration: ChannelConfiguration,
    #[serde(default)]
    pub links: ChannelLinks,
}

impl RemoteNotificationChannel {
    /// 渠道当前是否关联了指定策略
    pub fn is_linked_to(&self, policy_id: PolicyId) -> bool {
        self.links.policy_ids.contains(&policy_id)
    }
}

/// 渠道配置，不同渠道类型字段不同，均为可选
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// 渠道与策略的关联
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelLinks {
    #[serde(default)]
    pub policy_ids: Vec<PolicyId>,
}

/// 远程 NRQL 条件
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCondition {
    pub id: ConditionId,
    pub policy_id: PolicyId,
}

// ============================================================================
// 请求载荷
// ============================================================================

/// 所有策略均使用按策略聚合的 incident
pub const INCIDENT_PREFERENCE: &str = "PER_POLICY";

#[derive(Debug, Serialize)]
pub(crate) struct PolicyRequest<'a> {
    pub policy: PolicyBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PolicyBody<'a> {
    pub incident_preference: &'a str,
    pub name: &'a str,
}

impl<'a> PolicyRequest<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            policy: PolicyBody {
                incident_preference: INCIDENT_PREFERENCE,
                name,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChannelRequest<'a> {
    pub channel: ChannelBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChannelBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub channel_type: &'a str,
    pub configuration: ChannelConfiguration,
}

/// 条件优先级
pub const CONDITION_PRIORITY: &str = "critical";
/// 所有数据点都越过阈值才触发
pub const CONDITION_TIME_FUNCTION: &str = "all";
/// 取单值
pub const CONDITION_VALUE_FUNCTION: &str = "single_value";
/// 查询回溯窗口
pub const CONDITION_SINCE_VALUE: u32 = 5;

#[derive(Debug, Serialize)]
pub(crate) struct NrqlConditionRequest<'a> {
    pub nrql_condition: NrqlConditionBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NrqlConditionBody<'a> {
    pub name: &'a str,
    pub enabled: bool,
    pub terms: Vec<ConditionTerm>,
    pub value_function: &'static str,
    pub nrql: NrqlQuery<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConditionTerm {
    pub duration: u32,
    pub operator: Operator,
    pub priority: &'static str,
    pub threshold: f64,
    pub time_function: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NrqlQuery<'a> {
    pub query: &'a str,
    pub since_value: u32,
}

impl<'a> From<&'a ConditionSpec> for NrqlConditionRequest<'a> {
    fn from(spec: &'a ConditionSpec) -> Self {
        Self {
            nrql_condition: NrqlConditionBody {
                name: &spec.description,
                enabled: true,
                terms: vec![ConditionTerm {
                    duration: spec.duration,
                    operator: spec.operator,
                    priority: CONDITION_PRIORITY,
                    threshold: spec.threshold,
                    time_function: CONDITION_TIME_FUNCTION,
                }],
                value_function: CONDITION_VALUE_FUNCTION,
                nrql: NrqlQuery {
                    query: &spec.query,
                    since_value: CONDITION_SINCE_VALUE,
                },
            },
        }
    }
}

// ============================================================================
// 响应载荷
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct PoliciesResponse {
    #[serde(default)]
    pub policies: Vec<RemotePolicy>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PolicyResponse {
    pub policy: IdOnly<PolicyId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelsResponse {
    #[serde(default)]
    pub channels: Vec<RemoteNotificationChannel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedChannelsResponse {
    #[serde(default)]
    pub channels: Vec<IdOnly<ChannelId>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NrqlConditionsResponse {
    #[serde(default)]
    pub nrql_conditions: Vec<IdOnly<ConditionId>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NrqlConditionResponse {
    pub nrql_condition: IdOnly<ConditionId>,
}

/// 只关心 `id` 字段的响应对象
#[derive(Debug, Deserialize)]
pub(crate) struct IdOnly<T> {
    pub id: T,
}
