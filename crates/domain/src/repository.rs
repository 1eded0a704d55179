//! 仓储契约
//!
//! 每个集合一个仓储 trait，由基础设施层的 MongoDB 适配器实现。
//! id 参数为十六进制 ObjectId 字符串；格式非法一律按"未找到"处理。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::post::{Comment, Like, Post, PostPatch};
use crate::entities::story::{Story, StoryPatch, StoryView};
use crate::entities::user::{User, UserProfilePatch};
use crate::errors::RepositoryResult;

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 插入用户并返回带 id 的实体
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;
    /// 按小写邮箱查找
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn email_exists(&self, email: &str) -> RepositoryResult<bool>;
    /// 稀疏更新：只写入补丁中携带的字段
    async fn update_profile(
        &self,
        id: &str,
        patch: UserProfilePatch,
    ) -> RepositoryResult<Option<User>>;
    async fn update_push_token(&self, id: &str, push_token: &str)
        -> RepositoryResult<Option<User>>;
    /// 拥有推送 token 的活跃参与者，用于通知扇出
    async fn participants_with_push_token(&self) -> RepositoryResult<Vec<User>>;
}

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: Post) -> RepositoryResult<Post>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Post>>;
    async fn exists(&self, id: &str) -> RepositoryResult<bool>;
    /// 活跃帖子，按创建时间倒序
    async fn list_active(&self, skip: u64, limit: i64) -> RepositoryResult<Vec<Post>>;
    async fn update(&self, id: &str, patch: PostPatch) -> RepositoryResult<Option<Post>>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
    /// 以 delta（+1/-1）调整点赞计数；与点赞记录的写入不具备原子性
    async fn adjust_likes_count(&self, id: &str, delta: i64) -> RepositoryResult<()>;
    async fn adjust_comments_count(&self, id: &str, delta: i64) -> RepositoryResult<()>;
}

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> RepositoryResult<Comment>;
    /// 帖子下的评论，按创建时间正序
    async fn list_by_post(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Comment>>;
}

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn insert(&self, like: Like) -> RepositoryResult<Like>;
    async fn find_by_user_and_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> RepositoryResult<Option<Like>>;
    async fn list_by_post(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Like>>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait StoryRepository: Send + Sync {
    async fn insert(&self, story: Story) -> RepositoryResult<Story>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Story>>;
    /// 未过期的活跃故事，按创建时间倒序
    async fn list_active(
        &self,
        now: DateTime<Utc>,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Story>>;
    async fn list_active_by_author(
        &self,
        author_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Story>>;
    async fn update(&self, id: &str, patch: StoryPatch) -> RepositoryResult<Option<Story>>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
    async fn increment_views(&self, id: &str) -> RepositoryResult<()>;
    /// 批量翻转已过期但仍标记为活跃的故事，返回翻转数量；幂等
    async fn expire_old(&self, now: DateTime<Utc>) -> RepositoryResult<u64>;
}

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait StoryViewRepository: Send + Sync {
    async fn insert(&self, view: StoryView) -> RepositoryResult<StoryView>;
    async fn find_by_user_and_story(
        &self,
        user_id: &str,
        story_id: &str,
    ) -> RepositoryResult<Option<StoryView>>;
    async fn list_by_story(
        &self,
        story_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<StoryView>>;
}
