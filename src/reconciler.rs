//! 收敛算法 - 将声明的告警策略同步到 New Relic
//!
//! 每次运行流程：
//! 1. 校验所有声明的策略（渠道类型已注册、通知对象合法、名称唯一），任何失败都不会发出远程调用
//! 2. 拉取一次远程快照（策略、通知渠道），之后所有策略共享只读快照
//! 3. 每个策略在独立的 task 中收敛，最后在 `JoinSet` 上统一等待
//!
//! 单个策略内部严格按顺序执行：解析策略 → 解析渠道 → 删除旧条件 → 删除旧关联 → 重新关联 → 创建条件。
//! 删除全部完成后才会发出关联和创建请求。

use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::api::{
    AlertsApi, ApiError, ChannelId, ConditionId, PolicyId, RemoteNotificationChannel, RemotePolicy,
};
use crate::cli::output::progress;
use crate::config::{AlertsConfig, DesiredPolicy};
use crate::notification::{AdapterRegistry, NotificationAdapter};

/// 收敛错误
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Invalid notification type \"{notification_type}\" for policy \"{policy}\"")]
    UnknownNotificationType {
        policy: String,
        notification_type: String,
    },

    #[error("Policy \"{0}\" requires a valid notification object")]
    InvalidNotification(String),

    #[error("Policy \"{0}\" is declared more than once")]
    DuplicatePolicy(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Reconciliation task for policy \"{0}\" did not complete")]
    TaskFailed(String),
}

/// 远程状态快照，每次运行只拉取一次
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub policies: Vec<RemotePolicy>,
    pub channels: Vec<RemoteNotificationChannel>,
}

impl Snapshot {
    /// 按名称精确匹配策略
    pub fn find_policy(&self, name: &str) -> Option<&RemotePolicy> {
        self.policies.iter().find(|policy| policy.name == name)
    }

    /// 用适配器查找与声明渠道对应的远程渠道
    pub fn find_channel(
        &self,
        adapter: &dyn NotificationAdapter,
        declared_channel: &str,
    ) -> Option<&RemoteNotificationChannel> {
        self.channels
            .iter()
            .find(|channel| adapter.is_match(channel, declared_channel))
    }

    /// 当前关联了该策略的所有渠道
    pub fn channels_linked_to(
        &self,
        policy_id: PolicyId,
    ) -> impl Iterator<Item = &RemoteNotificationChannel> {
        self.channels
            .iter()
            .filter(move |channel| channel.is_linked_to(policy_id))
    }
}

/// 策略是新建还是更新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    Created,
    Updated,
}

/// 渠道是新建还是复用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelAction {
    Created,
    Reused,
}

/// 单个策略的收敛结果
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutcome {
    pub policy_id: PolicyId,
    pub policy_action: PolicyAction,
    pub channel_id: ChannelId,
    pub channel_action: ChannelAction,
    pub removed_conditions: usize,
    pub removed_associations: usize,
    pub condition_id: ConditionId,
}

/// 单个策略的报告
#[derive(Debug)]
pub struct PolicyReport {
    pub name: String,
    pub result: Result<PolicyOutcome, ReconcileError>,
}

/// 一次运行的汇总，顺序与配置中的声明顺序一致
#[derive(Debug, Default)]
pub struct RunReport {
    pub policies: Vec<PolicyReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.policies.iter().all(|report| report.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ReconcileError)> {
        self.policies.iter().filter_map(|report| {
            report
                .result
                .as_ref()
                .err()
                .map(|err| (report.name.as_str(), err))
        })
    }

    pub fn outcome(&self, name: &str) -> Option<&PolicyOutcome> {
        self.policies
            .iter()
            .find(|report| report.name == name)
            .and_then(|report| report.result.as_ref().ok())
    }
}

/// 收敛器
pub struct Reconciler<A> {
    api: Arc<A>,
    registry: Arc<AdapterRegistry>,
}

impl<A: AlertsApi + 'static> Reconciler<A> {
    /// 使用内置渠道适配器创建
    pub fn new(api: A) -> Self {
        Self::with_registry(Arc::new(api), Arc::new(AdapterRegistry::with_defaults()))
    }

    pub fn with_registry(api: Arc<A>, registry: Arc<AdapterRegistry>) -> Self {
        Self { api, registry }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 校验所有声明的策略，返回每个策略对应的适配器
    pub fn validate(
        &self,
        policies: &[DesiredPolicy],
    ) -> Result<Vec<Arc<dyn NotificationAdapter>>, ReconcileError> {
        let mut seen = HashSet::new();
        let mut adapters = Vec::with_capacity(policies.len());

        for policy in policies {
            if !seen.insert(policy.name.as_str()) {
                return Err(ReconcileError::DuplicatePolicy(policy.name.clone()));
            }

            let notification_type = &policy.notification.notification_type;
            let adapter = self.registry.get(notification_type).ok_or_else(|| {
                ReconcileError::UnknownNotificationType {
                    policy: policy.name.clone(),
                    notification_type: notification_type.clone(),
                }
            })?;

            if !adapter.is_valid(&policy.notification) {
                return Err(ReconcileError::InvalidNotification(policy.name.clone()));
            }

            adapters.push(adapter);
        }

        Ok(adapters)
    }

    /// 拉取远程快照
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, ReconcileError> {
        progress("Fetching policies");
        let policies = self.api.list_policies().await?;

        progress("Fetching notification channels");
        let channels = self.api.list_notification_channels().await?;

        info!(
            policies = policies.len(),
            channels = channels.len(),
            "Fetched remote snapshot"
        );
        Ok(Snapshot { policies, channels })
    }

    /// 收敛整个配置
    ///
    /// 校验失败或快照拉取失败直接返回错误；单个策略的远程调用失败记录在 `RunReport` 中，
    /// 不会中断其他策略。
    pub async fn run(&self, config: &AlertsConfig) -> Result<RunReport, ReconcileError> {
        let adapters = self.validate(&config.policies)?;
        if config.policies.is_empty() {
            info!("No policies declared");
            return Ok(RunReport::default());
        }

        let snapshot = Arc::new(self.fetch_snapshot().await?);

        let mut tasks = JoinSet::new();
        for (index, (policy, adapter)) in config.policies.iter().cloned().zip(adapters).enumerate() {
            let api = Arc::clone(&self.api);
            let snapshot = Arc::clone(&snapshot);
            tasks.spawn(async move {
                let result =
                    converge_policy(api.as_ref(), adapter.as_ref(), &snapshot, &policy).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<PolicyOutcome, ReconcileError>>> =
            config.policies.iter().map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => error!(error = %e, "Policy reconciliation task failed"),
            }
        }

        let policies = config
            .policies
            .iter()
            .zip(results)
            .map(|(policy, result)| PolicyReport {
                name: policy.name.clone(),
                result: result
                    .unwrap_or_else(|| Err(ReconcileError::TaskFailed(policy.name.clone()))),
            })
            .collect();

        Ok(RunReport { policies })
    }
}

/// 收敛单个策略
///
/// 调用前策略必须已通过 `adapter` 校验。
pub async fn converge_policy<A>(
    api: &A,
    adapter: &dyn NotificationAdapter,
    snapshot: &Snapshot,
    policy: &DesiredPolicy,
) -> Result<PolicyOutcome, ReconcileError>
where
    A: AlertsApi + ?Sized,
{
    let name = policy.name.as_str();
    let notification = &policy.notification;
    progress(&format!("Creating newrelic alert: \"{}\"", name));

    let (policy_id, policy_action) = match snapshot.find_policy(name) {
        Some(existing) => {
            progress(&format!("Updating policy \"{}\"", name));
            (api.update_policy(existing.id, name).await?, PolicyAction::Updated)
        }
        None => {
            progress(&format!("Creating policy \"{}\"", name));
            (api.create_policy(name).await?, PolicyAction::Created)
        }
    };

    let (channel_id, channel_action) = match snapshot.find_channel(adapter, &notification.channel) {
        Some(existing) => (existing.id, ChannelAction::Reused),
        None => {
            progress(&format!("Creating {} notification channel", adapter.channel_type()));
            let id = api
                .create_notification_channel(
                    &notification.notification_type,
                    &notification.url,
                    &notification.channel,
                )
                .await?;
            (id, ChannelAction::Created)
        }
    };

    progress("Removing stale policy conditions");
    let conditions = api.list_conditions_for_policy(policy_id).await?;
    for condition in &conditions {
        api.delete_condition(condition.id).await?;
    }

    progress("Removing stale notification channel associations");
    let mut removed_associations = 0;
    for channel in snapshot.channels_linked_to(policy_id) {
        api.delete_channel_policy_association(policy_id, channel.id)
            .await?;
        removed_associations += 1;
    }

    progress("Associating policy with notification channel");
    api.associate_policy_with_channel(policy_id, channel_id)
        .await?;

    progress("Creating and associating NRQL condition for policy");
    let condition_id = api.create_condition(policy_id, &policy.condition).await?;

    info!(
        policy = name,
        %policy_id,
        %channel_id,
        %condition_id,
        removed_conditions = conditions.len(),
        removed_associations,
        "Policy converged"
    );

    Ok(PolicyOutcome {
        policy_id,
        policy_action,
        channel_id,
        channel_action,
        removed_conditions: conditions.len(),
        removed_associations,
        condition_id,
    })
}
