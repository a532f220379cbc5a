//! Slack 渠道适配器

use crate::api::RemoteNotificationChannel;
use crate::config::NotificationSpec;
use crate::notification::adapter::{strip_channel_marker, NotificationAdapter, CHANNEL_MARKER};

/// Slack incoming webhook 地址前缀
pub const SLACK_WEBHOOK_PREFIX: &str = "https://hooks.slack.com/services/";

/// Slack 渠道类型标签
pub const SLACK_TYPE: &str = "slack";

/// Slack 渠道适配器
#[derive(Debug, Clone, Copy, Default)]
pub struct SlackAdapter;

impl SlackAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationAdapter for SlackAdapter {
    fn channel_type(&self) -> &str {
        SLACK_TYPE
    }

    fn is_valid(&self, spec: &NotificationSpec) -> bool {
        spec.notification_type == SLACK_TYPE
            && spec.url.starts_with(SLACK_WEBHOOK_PREFIX)
            && spec.channel.starts_with(CHANNEL_MARKER)
    }

    fn is_match(&self, remote: &RemoteNotificationChannel, declared_channel: &str) -> bool {
        remote.channel_type == SLACK_TYPE
            && remote.configuration.channel.as_deref() == Some(strip_channel_marker(declared_channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChannelConfiguration, ChannelId, ChannelLinks};

    fn spec(url: &str, channel: &str) -> NotificationSpec {
        NotificationSpec {
            notification_type: SLACK_TYPE.to_string(),
            url: url.to_string(),
            channel: channel.to_string(),
        }
    }

    fn remote(channel_type: &str, channel: Option<&str>) -> RemoteNotificationChannel {
        RemoteNotificationChannel {
            id: ChannelId(1),
            channel_type: channel_type.to_string(),
            configuration: ChannelConfiguration {
                url: None,
                channel: channel.map(str::to_string),
            },
            links: ChannelLinks::default(),
        }
    }

    #[test]
    fn test_valid_slack_notification() {
        let adapter = SlackAdapter::new();
        assert!(adapter.is_valid(&spec("https://hooks.slack.com/services/T0/B0/x", "#ops")));
    }

    #[test]
    fn test_invalid_webhook_url() {
        let adapter = SlackAdapter::new();
        assert!(!adapter.is_valid(&spec("https://example.com/services/T0", "#ops")));
        assert!(!adapter.is_valid(&spec("http://hooks.slack.com/services/T0", "#ops")));
    }

    #[test]
    fn test_channel_requires_marker() {
        let adapter = SlackAdapter::new();
        assert!(!adapter.is_valid(&spec("https://hooks.slack.com/services/T0", "ops")));
    }

    #[test]
    fn test_type_must_be_slack() {
        let adapter = SlackAdapter::new();
        let mut notification = spec("https://hooks.slack.com/services/T0", "#ops");
        notification.notification_type = "email".to_string();
        assert!(!adapter.is_valid(&notification));
    }

    #[test]
    fn test_match_compares_stripped_channel_name() {
        let adapter = SlackAdapter::new();
        assert!(adapter.is_match(&remote("slack", Some("ops")), "#ops"));
        assert!(!adapter.is_match(&remote("slack", Some("#ops")), "#ops"));
        assert!(!adapter.is_match(&remote("slack", Some("dev")), "#ops"));
    }

    #[test]
    fn test_match_requires_slack_type() {
        let adapter = SlackAdapter::new();
        assert!(!adapter.is_match(&remote("email", Some("ops")), "#ops"));
        assert!(!adapter.is_match(&remote("slack", None), "#ops"));
    }
}
