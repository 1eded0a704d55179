//! 请求载荷与响应数据
//!
//! 载荷层只做格式校验（长度、邮箱格式）；业务规则由领域层把关。

use domain::{PostPatch, StoryPatch, User, UserProfilePatch, UserRole};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_role() -> UserRole {
    UserRole::Participant
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub profile_image_url: Option<String>,
    pub fcm_token: Option<String>,
}

impl UpdateProfilePayload {
    pub fn into_patch(self) -> UserProfilePatch {
        UserProfilePatch {
            full_name: self.full_name,
            bio: self.bio,
            allergies: self.allergies,
            profile_image_url: self.profile_image_url,
            push_token: self.fcm_token,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PushTokenPayload {
    #[validate(length(min = 1))]
    pub fcm_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdatePostPayload {
    pub fn into_patch(self) -> PostPatch {
        PostPatch {
            title: self.title,
            content: self.content,
            image_url: self.image_url,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentPayload {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoryPayload {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStoryPayload {
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateStoryPayload {
    pub fn into_patch(self) -> StoryPatch {
        StoryPatch {
            content: self.content,
            image_url: self.image_url,
            is_active: self.is_active,
        }
    }
}

/// 分页查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// skip 默认 0，limit 钳制到 1..=100
    pub fn pagination(&self, default_limit: i64) -> (u64, i64) {
        (
            self.skip.unwrap_or(0),
            self.limit.unwrap_or(default_limit).clamp(1, 100),
        )
    }
}

/// 注册/登录/刷新返回的数据
#[derive(Debug, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

impl TokenData {
    pub fn bearer(access_token: String, user: User) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            user,
        }
    }
}

/// 过期清扫结果
#[derive(Debug, Serialize)]
pub struct ExpireSweepData {
    pub expired_count: u64,
}

/// 健康检查数据
#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}
