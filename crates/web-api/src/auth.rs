//! JWT 认证和授权模块
//!
//! 提供 JWT token 生成、验证，以及从请求头解析当前主体的访问门卫。
//! 令牌是无状态的：没有吊销列表，登出只是客户端丢弃令牌。

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use config::JwtConfig;
use domain::{User, UserRole};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// JWT Claims 结构
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 主体用户 id
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// 解析后的请求主体
///
/// 这里只携带身份与角色；资源级的所有权（"只有作者能编辑"）
/// 由各领域服务用主体 id 再次校验。
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

/// JWT Token 服务
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 签发携带主体 id、邮箱与角色的访问令牌
    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| ApiError::internal(format!("token generation failed: {}", err)))
    }

    /// 验证并解析令牌；格式错误、签名不符、已过期统一视为未认证
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|_| ApiError::unauthorized("invalid or expired token"))
    }

    /// 从请求头提取 Bearer 令牌并解析主体
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, ApiError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("invalid authorization header format"))?;

        let claims = self.verify_token(token)?;
        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }

    /// 角色门卫：除认证外还要求主体具有指定角色
    pub fn require_role(
        &self,
        headers: &HeaderMap,
        role: UserRole,
    ) -> Result<AuthenticatedUser, ApiError> {
        let subject = self.authenticate(headers)?;
        if subject.role != role {
            return Err(ApiError::forbidden(format!(
                "access denied, role required: {}",
                role
            )));
        }
        Ok(subject)
    }
}
