//! 适配器注册表 - 按渠道类型标签查找适配器

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::adapter::NotificationAdapter;
use super::channels::SlackAdapter;

/// 适配器注册表
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn NotificationAdapter>>,
}

impl AdapterRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// 注册所有内置渠道类型
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SlackAdapter::new()));
        registry
    }

    /// 注册适配器，同类型标签的旧适配器会被替换
    pub fn register(&mut self, adapter: Arc<dyn NotificationAdapter>) {
        debug!(channel_type = adapter.channel_type(), "Registering notification adapter");
        self.adapters
            .insert(adapter.channel_type().to_string(), adapter);
    }

    /// 按类型标签查找
    pub fn get(&self, channel_type: &str) -> Option<Arc<dyn NotificationAdapter>> {
        self.adapters.get(channel_type).cloned()
    }

    /// 已注册的渠道类型（排序后）
    pub fn channel_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
