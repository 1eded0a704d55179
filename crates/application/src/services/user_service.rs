//! 用户用例服务
//!
//! 注册、登录凭证校验与个人资料维护。
//! 邮箱唯一性通过先查后插保证，并发重复注册下不提供强一致性。

use std::sync::Arc;

use domain::{DomainError, User, UserProfilePatch, UserRepository, UserRole};

use crate::{clock::Clock, error::ApplicationError, password::PasswordHasher};

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone)]
pub struct AuthenticateUserRequest {
    pub email: String,
    pub password: String,
}

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, ApplicationError> {
        let email = request.email.trim().to_lowercase();

        if self.deps.user_repository.email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyRegistered.into());
        }

        let password_hash = self.deps.password_hasher.hash(&request.password).await?;

        let user = User::new(
            email,
            password_hash,
            request.full_name.trim(),
            request.role,
            self.deps.clock.now(),
        );
        user.validate()?;

        let stored = self.deps.user_repository.insert(user).await?;
        tracing::info!(user_id = %stored.id, email = %stored.email, "user registered");
        Ok(stored)
    }

    pub async fn authenticate(
        &self,
        request: AuthenticateUserRequest,
    ) -> Result<User, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or(ApplicationError::Authentication)?;

        if !user.is_active {
            return Err(ApplicationError::Authentication);
        }

        let password_ok = self
            .deps
            .password_hasher
            .verify(&request.password, &user.password_hash)
            .await?;
        if !password_ok {
            return Err(ApplicationError::Authentication);
        }

        tracing::info!(user_id = %user.id, "user authenticated");
        Ok(user)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<User, ApplicationError> {
        self.deps
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound.into())
    }

    /// 稀疏更新：只有补丁中携带的字段会被写入；空补丁原样返回当前资料
    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: UserProfilePatch,
    ) -> Result<User, ApplicationError> {
        let current = self
            .deps
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self
            .deps
            .user_repository
            .update_profile(user_id, patch)
            .await?;

        tracing::info!(user_id = %user_id, "user profile updated");
        Ok(updated.unwrap_or(current))
    }

    pub async fn update_push_token(
        &self,
        user_id: &str,
        push_token: &str,
    ) -> Result<User, ApplicationError> {
        let updated = self
            .deps
            .user_repository
            .update_push_token(user_id, push_token)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        tracing::info!(user_id = %user_id, "push token updated");
        Ok(updated)
    }
}
