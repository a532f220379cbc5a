//! 通知渠道适配器 trait 定义

use crate::api::RemoteNotificationChannel;
use crate::config::NotificationSpec;

/// 渠道名称的前导标记字符（如 Slack 的 `#ops`）
pub const CHANNEL_MARKER: char = '#';

/// 通知渠道适配器 trait
pub trait NotificationAdapter: Send + Sync {
    /// 渠道类型标签（用于注册表查找和日志）
    fn channel_type(&self) -> &str;

    /// 声明的通知目标对此渠道类型是否合法
    fn is_valid(&self, spec: &NotificationSpec) -> bool;

    /// 远程渠道是否对应声明的渠道名称
    fn is_match(&self, remote: &RemoteNotificationChannel, declared_channel: &str) -> bool;
}

/// 去掉渠道名称的前导标记字符
pub fn strip_channel_marker(name: &str) -> &str {
    name.strip_prefix(CHANNEL_MARKER).unwrap_or(name)
}
