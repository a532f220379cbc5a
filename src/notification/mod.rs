//! 通知渠道适配层
//!
//! # 设计目标
//! 1. 统一接口：每种渠道类型实现 `NotificationAdapter` trait
//! 2. 渠道解耦：reconciler 只通过 `AdapterRegistry` 按类型标签查找适配器
//! 3. 易于扩展：新增渠道类型只需注册一个新的适配器
//!
//! # 使用示例
//! ```ignore
//! use newrelic_alerts::notification::AdapterRegistry;
//!
//! let registry = AdapterRegistry::with_defaults();
//! let adapter = registry.get("slack").expect("slack is registered");
//! assert!(adapter.is_valid(&spec));
//! ```

pub mod adapter;
pub mod channels;
pub mod registry;

pub use adapter::{strip_channel_marker, NotificationAdapter, CHANNEL_MARKER};
pub use channels::SlackAdapter;
pub use registry::AdapterRegistry;
