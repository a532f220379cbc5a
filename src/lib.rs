//! New Relic Alerts - 将声明的告警策略收敛到 New Relic

pub mod api;
pub mod cli;
pub mod config;
pub mod notification;
pub mod reconciler;
pub mod settings;

pub use api::{AlertsApi, ApiError, DryRunApi, NewRelicClient};
pub use config::{AlertsConfig, ConditionSpec, DesiredPolicy, NotificationSpec, Operator};
pub use notification::{AdapterRegistry, NotificationAdapter, SlackAdapter};
pub use reconciler::{PolicyOutcome, ReconcileError, Reconciler, RunReport};
pub use settings::Settings;
