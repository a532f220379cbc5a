//! 基于 reqwest 的 New Relic REST API v2 客户端

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use super::types::*;
use super::{AlertsApi, ApiError};
use crate::config::ConditionSpec;
use crate::notification::strip_channel_marker;
use crate::settings::Settings;

const POLICIES: &str = "alerts_policies.json";
const CHANNELS: &str = "alerts_channels.json";
const POLICY_CHANNELS: &str = "alerts_policy_channels.json";
const NRQL_CONDITIONS: &str = "alerts_nrql_conditions.json";

/// New Relic Alerts API 客户端
#[derive(Debug, Clone)]
pub struct NewRelicClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewRelicClient {
    /// 创建新客户端
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: settings.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, endpoint))
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
    }

    /// 发送请求并返回响应正文；非 2xx 状态视为错误
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<String, ApiError> {
        let start = Instant::now();
        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        debug!(
            endpoint,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "New Relic API request completed"
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let body = self.send(request, endpoint).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn write_policy<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<PolicyId, ApiError> {
        let response: PolicyResponse = self
            .send_json(self.request(method, endpoint).json(body), endpoint)
            .await?;
        Ok(response.policy.id)
    }
}

#[async_trait]
impl AlertsApi for NewRelicClient {
    async fn list_policies(&self) -> Result<Vec<RemotePolicy>, ApiError> {
        let response: PoliciesResponse = self
            .send_json(self.request(Method::GET, POLICIES), POLICIES)
            .await?;
        Ok(response.policies)
    }

    async fn create_policy(&self, name: &str) -> Result<PolicyId, ApiError> {
        self.write_policy(Method::POST, POLICIES, &PolicyRequest::new(name))
            .await
    }

    async fn update_policy(&self, policy_id: PolicyId, name: &str) -> Result<PolicyId, ApiError> {
        let endpoint = format!("alerts_policies/{}.json", policy_id);
        self.write_policy(Method::PUT, &endpoint, &PolicyRequest::new(name))
            .await
    }

    async fn list_notification_channels(&self) -> Result<Vec<RemoteNotificationChannel>, ApiError> {
        let response: ChannelsResponse = self
            .send_json(self.request(Method::GET, CHANNELS), CHANNELS)
            .await?;
        Ok(response.channels)
    }

    async fn create_notification_channel(
        &self,
        channel_type: &str,
        url: &str,
        channel_name: &str,
    ) -> Result<ChannelId, ApiError> {
        let body = ChannelRequest {
            channel: ChannelBody {
                name: channel_name,
                channel_type,
                configuration: ChannelConfiguration {
                    url: Some(url.to_string()),
                    channel: Some(strip_channel_marker(channel_name).to_string()),
                },
            },
        };

        let response: CreatedChannelsResponse = self
            .send_json(self.request(Method::POST, CHANNELS).json(&body), CHANNELS)
            .await?;

        // 响应返回渠道列表，新建的渠道在最后
        response
            .channels
            .last()
            .map(|created| created.id)
            .ok_or_else(|| ApiError::UnexpectedResponse {
                endpoint: CHANNELS.to_string(),
                message: "no channel returned".to_string(),
            })
    }

    async fn delete_channel_policy_association(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, POLICY_CHANNELS).query(&[
            ("policy_id", policy_id.0),
            ("channel_id", channel_id.0),
        ]);
        self.send(request, POLICY_CHANNELS).await?;
        Ok(())
    }

    async fn associate_policy_with_channel(
        &self,
        policy_id: PolicyId,
        channel_id: ChannelId,
    ) -> Result<PolicyId, ApiError> {
        let request = self.request(Method::PUT, POLICY_CHANNELS).query(&[
            ("policy_id", policy_id.0),
            ("channel_ids", channel_id.0),
        ]);
        let response: PolicyResponse = self.send_json(request, POLICY_CHANNELS).await?;
        Ok(response.policy.id)
    }

    async fn list_conditions_for_policy(
        &self,
        policy_id: PolicyId,
    ) -> Result<Vec<RemoteCondition>, ApiError> {
        let request = self
            .request(Method::GET, NRQL_CONDITIONS)
            .query(&[("policy_id", policy_id.0)]);
        let response: NrqlConditionsResponse = self.send_json(request, NRQL_CONDITIONS).await?;

        Ok(response
            .nrql_conditions
            .into_iter()
            .map(|condition| RemoteCondition {
                id: condition.id,
                policy_id,
            })
            .collect())
    }

    async fn delete_condition(&self, condition_id: ConditionId) -> Result<(), ApiError> {
        let endpoint = format!("alerts_conditions/{}.json", condition_id);
        self.send(self.request(Method::DELETE, &endpoint), &endpoint)
            .await?;
        Ok(())
    }

    async fn create_condition(
        &self,
        policy_id: PolicyId,
        condition: &ConditionSpec,
    ) -> Result<ConditionId, ApiError> {
        let endpoint = format!("alerts_nrql_conditions/policies/{}.json", policy_id);
        let body = NrqlConditionRequest::from(condition);
        let response: NrqlConditionResponse = self
            .send_json(self.request(Method::POST, &endpoint).json(&body), &endpoint)
            .await?;
        Ok(response.nrql_condition.id)
    }
}
