//! FCM 推送客户端
//!
//! 通过 FCM HTTP v1 接口逐个设备发送，服务账号 OAuth2 访问令牌带缓存。
//! 分发永远不会向调用方抛错：单设备失败只计数并记录日志。

use std::collections::HashMap;
use std::sync::Mutex;

use application::{DeliveryReport, PushMessage, PushNotifier};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FCM_API_BASE: &str = "https://fcm.googleapis.com";
const OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

#[derive(Debug, Error)]
pub enum PushError {
    #[error("invalid FCM credentials: {0}")]
    Credentials(String),
    #[error("FCM token exchange failed: {0}")]
    Token(String),
    #[error("FCM send failed: {0}")]
    Send(String),
}

/// Google 服务账号密钥（service-account.json 的相关字段）
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &str) -> Result<Self, PushError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| PushError::Credentials(err.to_string()))?;
        serde_json::from_str(&raw).map_err(|err| PushError::Credentials(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct FcmEnvelope<'a> {
    message: FcmMessageContent<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessageContent<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: &'a HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct OauthClaims {
    iss: String,
    scope: String,
    aud: String,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: i64,
}

pub struct FcmNotifier {
    project_id: String,
    credentials: ServiceAccountKey,
    api_base: String,
    http: reqwest::Client,
    token_cache: Mutex<Option<CachedToken>>,
}

impl FcmNotifier {
    pub fn new(project_id: String, credentials: ServiceAccountKey) -> Self {
        Self::with_api_base(project_id, credentials, FCM_API_BASE.to_string())
    }

    pub fn with_api_base(
        project_id: String,
        credentials: ServiceAccountKey,
        api_base: String,
    ) -> Self {
        Self {
            project_id,
            credentials,
            api_base,
            http: reqwest::Client::new(),
            token_cache: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn seed_access_token(&self, access_token: &str) {
        *self.token_cache.lock().unwrap() = Some(CachedToken {
            access_token: access_token.to_string(),
            expires_at: Utc::now().timestamp() + 3600,
        });
    }

    /// 获取访问令牌；缓存仍有至少 60 秒余量时直接复用
    async fn access_token(&self) -> Result<String, PushError> {
        {
            let cache = self.token_cache.lock().unwrap();
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Utc::now().timestamp() + 60 {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        // 以服务账号签发 JWT，换取 OAuth2 访问令牌
        let now = Utc::now();
        let claims = OauthClaims {
            iss: self.credentials.client_email.clone(),
            scope: OAUTH_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|err| PushError::Token(err.to_string()))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|err| PushError::Token(err.to_string()))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|err| PushError::Token(err.to_string()))?;

        if !response.status().is_success() {
            return Err(PushError::Token(format!("status {}", response.status())));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| PushError::Token(err.to_string()))?;

        let expires_at = Utc::now().timestamp() + token.expires_in;
        *self.token_cache.lock().unwrap() = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }

    async fn send_one(
        &self,
        access_token: &str,
        device_token: &str,
        message: &PushMessage,
    ) -> Result<(), PushError> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base, self.project_id
        );

        let payload = FcmEnvelope {
            message: FcmMessageContent {
                token: device_token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
                data: &message.data,
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|err| PushError::Send(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PushError::Send(format!("status {}", response.status())))
        }
    }
}

#[async_trait]
impl PushNotifier for FcmNotifier {
    async fn send_multicast(&self, tokens: &[String], message: PushMessage) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if tokens.is_empty() {
            return report;
        }

        let access_token = match self.access_token().await {
            Ok(token) => token,
            Err(err) => {
                tracing::error!(error = %err, "failed to obtain FCM access token");
                report.failure_count = tokens.len();
                return report;
            }
        };

        for device_token in tokens {
            match self.send_one(&access_token, device_token, &message).await {
                Ok(()) => report.success_count += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "push delivery failed");
                    report.failure_count += 1;
                }
            }
        }

        tracing::debug!(
            success = report.success_count,
            failure = report.failure_count,
            "multicast push dispatched"
        );
        report
    }
}

/// 未配置推送凭证时的空实现
#[derive(Debug, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl PushNotifier for DisabledNotifier {
    async fn send_multicast(&self, tokens: &[String], _message: PushMessage) -> DeliveryReport {
        tracing::debug!(
            recipients = tokens.len(),
            "push notifications disabled, dropping message"
        );
        DeliveryReport {
            success_count: 0,
            failure_count: tokens.len(),
        }
    }
}
