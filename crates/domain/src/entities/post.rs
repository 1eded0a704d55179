//! 帖子、评论与点赞实体
//!
//! 帖子上的 `likes_count` / `comments_count` 是 likes / comments 集合的
//! 非规范化缓存，由应用层在每次点赞、取消点赞、评论时维护。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::user::{User, UserRole};
use crate::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_role: UserRole,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        image_url: Option<String>,
        author: &User,
        now: DateTime<Utc>,
    ) -> Self {
        let title: String = title.into();
        let content: String = content.into();
        Self {
            id: String::new(),
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            image_url,
            author_id: author.id.clone(),
            author_name: author.full_name.clone(),
            author_role: author.role,
            likes_count: 0,
            comments_count: 0,
            is_active: true,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.title.is_empty() {
            return Err(DomainError::validation("title", "post title cannot be empty"));
        }
        if self.content.is_empty() {
            return Err(DomainError::validation(
                "content",
                "post content cannot be empty",
            ));
        }
        if self.author_id.is_empty() || self.author_name.is_empty() {
            return Err(DomainError::validation(
                "author",
                "post requires an author reference",
            ));
        }
        Ok(())
    }
}

/// 帖子的稀疏更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.image_url.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(
        post_id: impl Into<String>,
        author: &User,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let content: String = content.into();
        Self {
            id: String::new(),
            post_id: post_id.into(),
            user_id: author.id.clone(),
            user_name: author.full_name.clone(),
            content: content.trim().to_string(),
            created_at: now,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.content.is_empty() {
            return Err(DomainError::validation(
                "content",
                "comment content cannot be empty",
            ));
        }
        if self.post_id.is_empty() || self.user_id.is_empty() {
            return Err(DomainError::validation(
                "references",
                "comment requires post and user references",
            ));
        }
        Ok(())
    }
}

/// 每个 (user, post) 组合最多存在一条点赞记录，由服务层前置检查保证
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Like {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Like {
    pub fn new(post_id: impl Into<String>, author: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            post_id: post_id.into(),
            user_id: author.id.clone(),
            user_name: author.full_name.clone(),
            created_at: now,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.post_id.is_empty() || self.user_id.is_empty() {
            return Err(DomainError::validation(
                "references",
                "like requires post and user references",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> User {
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
    fn test_new_post_denormalizes_author() {
        let user = author();
        let post = Post::new("Launch", "We are live", None, &user, Utc::now());
        assert_eq!(post.author_id, user.id);
        assert_eq!(post.author_name, "Host");
        assert_eq!(post.author_role, UserRole::Organizer);
        assert_eq!(post.likes_count, 0);
        assert!(post.is_active);
    }

    #[test]
    fn test_post_title_is_trimmed_and_required() {
        let user = author();
        let post = Post::new("  Launch  ", "body", None, &user, Utc::now());
        assert_eq!(post.title, "Launch");

        let empty = Post::new("   ", "body", None, &user, Utc::now());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_comment_requires_content() {
        let user = author();
        let comment = Comment::new("64f000000000000000000002", &user, "  ", Utc::now());
        assert!(comment.validate().is_err());
    }

    #[test]
    fn test_like_requires_references() {
        let mut user = author();
        user.id = String::new();
        let like = Like::new("64f000000000000000000002", &user, Utc::now());
        assert!(like.validate().is_err());
    }
}
