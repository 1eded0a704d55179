//! 帖子用例服务
//!
//! 发布、读取充实视图、点赞/取消点赞与评论。
//! 点赞与评论写入后单独调整帖子上的非规范化计数，两步写入不具备原子性。

use std::sync::Arc;

use domain::{
    Comment, CommentRepository, DomainError, Like, LikeRepository, Post, PostPatch,
    PostRepository, UserRepository,
};

use crate::{
    clock::Clock,
    dto::PostDetails,
    error::ApplicationError,
    notifier::{PushMessage, PushNotifier},
};

/// 充实读取时每个帖子附带的点赞/评论记录上限
const ENRICHMENT_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCommentRequest {
    pub content: String,
}

pub struct PostServiceDependencies {
    pub post_repository: Arc<dyn PostRepository>,
    pub comment_repository: Arc<dyn CommentRepository>,
    pub like_repository: Arc<dyn LikeRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub notifier: Arc<dyn PushNotifier>,
    pub clock: Arc<dyn Clock>,
}

pub struct PostService {
    deps: PostServiceDependencies,
}

impl PostService {
    pub fn new(deps: PostServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create_post(
        &self,
        author_id: &str,
        request: CreatePostRequest,
    ) -> Result<Post, ApplicationError> {
        let author = self
            .deps
            .user_repository
            .find_by_id(author_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !author.can_publish() {
            return Err(DomainError::PublishNotAllowed.into());
        }

        let post = Post::new(
            request.title,
            request.content,
            request.image_url,
            &author,
            self.deps.clock.now(),
        );
        post.validate()?;

        let stored = self.deps.post_repository.insert(post).await?;
        tracing::info!(post_id = %stored.id, author_id = %stored.author_id, "post created");

        self.notify_new_post(&stored).await;

        Ok(stored)
    }

    pub async fn list_posts(
        &self,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<PostDetails>, ApplicationError> {
        let posts = self.deps.post_repository.list_active(skip, limit).await?;

        let mut details = Vec::with_capacity(posts.len());
        for post in posts {
            details.push(self.enrich(post).await?);
        }
        Ok(details)
    }

    pub async fn get_post(&self, post_id: &str) -> Result<PostDetails, ApplicationError> {
        let post = self
            .deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        self.enrich(post).await
    }

    pub async fn update_post(
        &self,
        post_id: &str,
        patch: PostPatch,
        subject_id: &str,
    ) -> Result<Post, ApplicationError> {
        let post = self
            .deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        if post.author_id != subject_id {
            return Err(DomainError::NotTheAuthor.into());
        }

        if patch.is_empty() {
            return Ok(post);
        }

        let updated = self.deps.post_repository.update(post_id, patch).await?;
        tracing::info!(post_id = %post_id, "post updated");
        Ok(updated.unwrap_or(post))
    }

    pub async fn delete_post(&self, post_id: &str, subject_id: &str) -> Result<(), ApplicationError> {
        let post = self
            .deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        if post.author_id != subject_id {
            return Err(DomainError::NotTheAuthor.into());
        }

        if !self.deps.post_repository.delete(post_id).await? {
            return Err(DomainError::PostNotFound.into());
        }

        tracing::info!(post_id = %post_id, "post deleted");
        Ok(())
    }

    pub async fn like_post(&self, post_id: &str, subject_id: &str) -> Result<(), ApplicationError> {
        let post = self
            .deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        let user = self
            .deps
            .user_repository
            .find_by_id(subject_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !user.can_interact() {
            return Err(DomainError::InteractionNotAllowed.into());
        }

        if self
            .deps
            .like_repository
            .find_by_user_and_post(&user.id, &post.id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyLiked.into());
        }

        let like = Like::new(&post.id, &user, self.deps.clock.now());
        like.validate()?;

        self.deps.like_repository.insert(like).await?;
        self.deps
            .post_repository
            .adjust_likes_count(&post.id, 1)
            .await?;

        tracing::info!(post_id = %post.id, user_id = %user.id, "post liked");
        Ok(())
    }

    pub async fn unlike_post(
        &self,
        post_id: &str,
        subject_id: &str,
    ) -> Result<(), ApplicationError> {
        let like = self
            .deps
            .like_repository
            .find_by_user_and_post(subject_id, post_id)
            .await?
            .ok_or(DomainError::LikeNotFound)?;

        if self.deps.like_repository.delete(&like.id).await? {
            self.deps
                .post_repository
                .adjust_likes_count(post_id, -1)
                .await?;
        }

        tracing::info!(post_id = %post_id, user_id = %subject_id, "post unliked");
        Ok(())
    }

    pub async fn add_comment(
        &self,
        post_id: &str,
        subject_id: &str,
        request: CreateCommentRequest,
    ) -> Result<Comment, ApplicationError> {
        let post = self
            .deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        let user = self
            .deps
            .user_repository
            .find_by_id(subject_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !user.can_interact() {
            return Err(DomainError::InteractionNotAllowed.into());
        }

        let comment = Comment::new(&post.id, &user, request.content, self.deps.clock.now());
        comment.validate()?;

        let stored = self.deps.comment_repository.insert(comment).await?;
        self.deps
            .post_repository
            .adjust_comments_count(&post.id, 1)
            .await?;

        tracing::info!(post_id = %post.id, comment_id = %stored.id, "comment added");
        Ok(stored)
    }

    pub async fn list_comments(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Comment>, ApplicationError> {
        if !self.deps.post_repository.exists(post_id).await? {
            return Err(DomainError::PostNotFound.into());
        }

        Ok(self
            .deps
            .comment_repository
            .list_by_post(post_id, skip, limit)
            .await?)
    }

    pub async fn list_likes(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Like>, ApplicationError> {
        if !self.deps.post_repository.exists(post_id).await? {
            return Err(DomainError::PostNotFound.into());
        }

        Ok(self
            .deps
            .like_repository
            .list_by_post(post_id, skip, limit)
            .await?)
    }

    async fn enrich(&self, post: Post) -> Result<PostDetails, ApplicationError> {
        let likes = self
            .deps
            .like_repository
            .list_by_post(&post.id, 0, ENRICHMENT_LIMIT)
            .await?;
        let comments = self
            .deps
            .comment_repository
            .list_by_post(&post.id, 0, ENRICHMENT_LIMIT)
            .await?;

        Ok(PostDetails::assemble(post, likes, comments))
    }

    /// 新帖子通知扇出；任何失败只记录日志，不影响发帖结果
    async fn notify_new_post(&self, post: &Post) {
        let recipients = match self.deps.user_repository.participants_with_push_token().await {
            Ok(users) => users,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load notification recipients");
                return;
            }
        };

        let tokens: Vec<String> = recipients
            .into_iter()
            .filter_map(|user| user.push_token)
            .collect();
        if tokens.is_empty() {
            return;
        }

        let report = self
            .deps
            .notifier
            .send_multicast(
                &tokens,
                PushMessage::new_post(&post.id, &post.title, &post.author_name),
            )
            .await;

        tracing::info!(
            success = report.success_count,
            failure = report.failure_count,
            "new post notification dispatched"
        );
    }
}
