//! 故事实体
//!
//! 故事是创建后 24 小时自动过期的临时内容。过期是软删除：
//! 可见性 = `is_active && now < expires_at`，清扫任务只翻转 `is_active`。

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::entities::user::{User, UserRole};
use crate::errors::{DomainError, DomainResult};

/// 故事的生存时长（小时）
pub const STORY_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    pub id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_role: UserRole,
    pub views_count: i64,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Story {
    pub fn new(
        content: impl Into<String>,
        image_url: Option<String>,
        author: &User,
        now: DateTime<Utc>,
    ) -> Self {
        let content: String = content.into();
        Self {
            id: String::new(),
            content: content.trim().to_string(),
            image_url,
            author_id: author.id.clone(),
            author_name: author.full_name.clone(),
            author_role: author.role,
            views_count: 0,
            expires_at: now + Duration::hours(STORY_TTL_HOURS),
            is_active: true,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }

    /// 距离过期的整小时数；已过期返回 0
    pub fn time_remaining_hours(&self, now: DateTime<Utc>) -> i64 {
        if self.is_expired(now) {
            return 0;
        }
        (self.expires_at - now).num_hours()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.content.is_empty() {
            return Err(DomainError::validation(
                "content",
                "story content cannot be empty",
            ));
        }
        if self.author_id.is_empty() || self.author_name.is_empty() {
            return Err(DomainError::validation(
                "author",
                "story requires an author reference",
            ));
        }
        Ok(())
    }
}

/// 故事的稀疏更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryPatch {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl StoryPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.image_url.is_none() && self.is_active.is_none()
    }
}

/// 浏览记录；每个 (user, story) 组合最多一条，由服务层前置检查保证
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryView {
    pub id: String,
    pub story_id: String,
    pub user_id: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoryView {
    pub fn new(story_id: impl Into<String>, viewer: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            story_id: story_id.into(),
            user_id: viewer.id.clone(),
            user_name: viewer.full_name.clone(),
            created_at: now,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.story_id.is_empty() || self.user_id.is_empty() {
            return Err(DomainError::validation(
                "references",
                "story view requires story and user references",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organizer() -> User {
        let mut user = User::new(
            "host@example.com",
            "$2b$12$hash",
            "Host",
            UserRole::Organizer,
            Utc::now(),
        );
        user.id = "64f000000000000000000001".to_string();
        user
    }

    #[test]
    fn test_story_expires_after_24_hours() {
        let now = Utc::now();
        let story = Story::new("behind the scenes", None, &organizer(), now);

        assert_eq!(story.expires_at, now + Duration::hours(24));
        assert!(story.is_visible(now));
        assert!(story.is_visible(now + Duration::hours(23)));
        assert!(story.is_expired(now + Duration::hours(24)));
        assert!(!story.is_visible(now + Duration::hours(25)));
    }

    #[test]
    fn test_inactive_story_is_not_visible() {
        let now = Utc::now();
        let mut story = Story::new("behind the scenes", None, &organizer(), now);
        story.is_active = false;
        assert!(!story.is_visible(now));
    }

    #[test]
    fn test_time_remaining_hours() {
        let now = Utc::now();
        let story = Story::new("soon gone", None, &organizer(), now);

        assert_eq!(story.time_remaining_hours(now), 24);
        assert_eq!(story.time_remaining_hours(now + Duration::hours(23)), 1);
        // 已过期时剩余时间为 0，不产生负值
        assert_eq!(story.time_remaining_hours(now + Duration::hours(30)), 0);
    }

    #[test]
    fn test_story_validate() {
        let now = Utc::now();
        let story = Story::new("   ", None, &organizer(), now);
        assert!(story.validate().is_err());
    }
}
