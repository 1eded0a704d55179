//! 用户实体
//!
//! 角色决定内容权限：组织者发布内容，参与者点赞、评论与浏览。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DomainError, DomainResult};

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Organizer,
    Participant,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Organizer => "organizer",
            UserRole::Participant => "participant",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// 存储层在插入时分配的十六进制 ObjectId
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub bio: Option<String>,
    pub allergies: Vec<String>,
    pub profile_image_url: Option<String>,
    pub push_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// 创建新用户；邮箱统一小写存储，id 由仓储在插入后回填
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        full_name: impl Into<String>,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Self {
        let email: String = email.into();
        Self {
            id: String::new(),
            email: email.to_lowercase(),
            password_hash: password_hash.into(),
            full_name: full_name.into(),
            role,
            is_active: true,
            bio: None,
            allergies: Vec::new(),
            profile_image_url: None,
            push_token: None,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn is_organizer(&self) -> bool {
        self.role == UserRole::Organizer
    }

    pub fn is_participant(&self) -> bool {
        self.role == UserRole::Participant
    }

    /// 是否允许发布帖子与故事
    pub fn can_publish(&self) -> bool {
        self.is_organizer() && self.is_active
    }

    /// 是否允许点赞、评论与浏览
    pub fn can_interact(&self) -> bool {
        self.is_participant() && self.is_active
    }

    /// 写入前的业务规则校验
    pub fn validate(&self) -> DomainResult<()> {
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(DomainError::validation("email", "invalid email format"));
        }
        if self.password_hash.is_empty() {
            return Err(DomainError::validation(
                "password_hash",
                "password hash cannot be empty",
            ));
        }
        if self.full_name.trim().len() < 2 {
            return Err(DomainError::validation(
                "full_name",
                "full name must be at least 2 characters long",
            ));
        }
        Ok(())
    }
}

/// 个人资料的稀疏更新：只有携带的字段会被写入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfilePatch {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub profile_image_url: Option<String>,
    pub push_token: Option<String>,
}

impl UserProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.bio.is_none()
            && self.allergies.is_none()
            && self.profile_image_url.is_none()
            && self.push_token.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        User::new("Alice@Example.com", "$2b$12$hash", "Alice", role, Utc::now())
    }

    #[test]
    fn test_email_is_lowercased() {
        let user = sample_user(UserRole::Participant);
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_role_permissions() {
        let organizer = sample_user(UserRole::Organizer);
        assert!(organizer.can_publish());
        assert!(!organizer.can_interact());

        let participant = sample_user(UserRole::Participant);
        assert!(!participant.can_publish());
        assert!(participant.can_interact());
    }

    #[test]
    fn test_inactive_user_has_no_permissions() {
        let mut organizer = sample_user(UserRole::Organizer);
        organizer.is_active = false;
        assert!(!organizer.can_publish());

        let mut participant = sample_user(UserRole::Participant);
        participant.is_active = false;
        assert!(!participant.can_interact());
    }

    #[test]
    fn test_validate_rejects_short_name() {
        let mut user = sample_user(UserRole::Participant);
        user.full_name = "A".to_string();
        assert!(matches!(
            user.validate(),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut user = sample_user(UserRole::Participant);
        user.email = "not-an-email".to_string();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_empty_patch() {
        assert!(UserProfilePatch::default().is_empty());
        let patch = UserProfilePatch {
            bio: Some("hi".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
