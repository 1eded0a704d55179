//! 故事用例服务
//!
//! 故事在创建 24 小时后过期。任何读取或写入都先做过期判定：
//! 已过期的故事返回独立的"已过期"信号，而不是"未找到"。
//! 浏览对每个用户幂等：首次浏览落一条记录并加一次计数，重复浏览是空操作。

use std::sync::Arc;

use domain::{
    DomainError, Story, StoryPatch, StoryRepository, StoryView, StoryViewRepository,
    UserRepository,
};

use crate::{
    clock::Clock,
    dto::StoryViewed,
    error::ApplicationError,
    notifier::{PushMessage, PushNotifier},
};

#[derive(Debug, Clone)]
pub struct CreateStoryRequest {
    pub content: String,
    pub image_url: Option<String>,
}

pub struct StoryServiceDependencies {
    pub story_repository: Arc<dyn StoryRepository>,
    pub story_view_repository: Arc<dyn StoryViewRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub notifier: Arc<dyn PushNotifier>,
    pub clock: Arc<dyn Clock>,
}

pub struct StoryService {
    deps: StoryServiceDependencies,
}

impl StoryService {
    pub fn new(deps: StoryServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create_story(
        &self,
        author_id: &str,
        request: CreateStoryRequest,
    ) -> Result<Story, ApplicationError> {
        let author = self
            .deps
            .user_repository
            .find_by_id(author_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !author.can_publish() {
            return Err(DomainError::PublishNotAllowed.into());
        }

        let story = Story::new(
            request.content,
            request.image_url,
            &author,
            self.deps.clock.now(),
        );
        story.validate()?;

        let stored = self.deps.story_repository.insert(story).await?;
        tracing::info!(story_id = %stored.id, author_id = %stored.author_id, "story created");

        self.notify_new_story(&stored).await;

        Ok(stored)
    }

    pub async fn list_active(
        &self,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Story>, ApplicationError> {
        Ok(self
            .deps
            .story_repository
            .list_active(self.deps.clock.now(), skip, limit)
            .await?)
    }

    /// 浏览故事并登记浏览记录
    ///
    /// 同一用户的重复浏览不再落记录、不再加计数，但仍然成功返回。
    pub async fn view_story(
        &self,
        story_id: &str,
        subject_id: &str,
    ) -> Result<StoryViewed, ApplicationError> {
        let story = self
            .deps
            .story_repository
            .find_by_id(story_id)
            .await?
            .ok_or(DomainError::StoryNotFound)?;

        let now = self.deps.clock.now();
        if story.is_expired(now) {
            return Err(DomainError::StoryExpired.into());
        }

        let viewer = self
            .deps
            .user_repository
            .find_by_id(subject_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let story = if self
            .deps
            .story_view_repository
            .find_by_user_and_story(&viewer.id, &story.id)
            .await?
            .is_none()
        {
            let view = StoryView::new(&story.id, &viewer, now);
            view.validate()?;

            self.deps.story_view_repository.insert(view).await?;
            self.deps.story_repository.increment_views(&story.id).await?;
            tracing::info!(story_id = %story.id, user_id = %viewer.id, "story viewed");

            // 重新读取以反映刚更新的计数
            self.deps
                .story_repository
                .find_by_id(story_id)
                .await?
                .unwrap_or(story)
        } else {
            story
        };

        Ok(StoryViewed {
            time_remaining_hours: story.time_remaining_hours(now),
            story,
        })
    }

    pub async fn update_story(
        &self,
        story_id: &str,
        patch: StoryPatch,
        subject_id: &str,
    ) -> Result<Story, ApplicationError> {
        let story = self
            .deps
            .story_repository
            .find_by_id(story_id)
            .await?
            .ok_or(DomainError::StoryNotFound)?;

        if story.author_id != subject_id {
            return Err(DomainError::NotTheAuthor.into());
        }

        if story.is_expired(self.deps.clock.now()) {
            return Err(DomainError::StoryExpired.into());
        }

        if patch.is_empty() {
            return Ok(story);
        }

        let updated = self.deps.story_repository.update(story_id, patch).await?;
        tracing::info!(story_id = %story_id, "story updated");
        Ok(updated.unwrap_or(story))
    }

    pub async fn delete_story(
        &self,
        story_id: &str,
        subject_id: &str,
    ) -> Result<(), ApplicationError> {
        let story = self
            .deps
            .story_repository
            .find_by_id(story_id)
            .await?
            .ok_or(DomainError::StoryNotFound)?;

        if story.author_id != subject_id {
            return Err(DomainError::NotTheAuthor.into());
        }

        if story.is_expired(self.deps.clock.now()) {
            return Err(DomainError::StoryExpired.into());
        }

        if !self.deps.story_repository.delete(story_id).await? {
            return Err(DomainError::StoryNotFound.into());
        }

        tracing::info!(story_id = %story_id, "story deleted");
        Ok(())
    }

    /// 浏览记录只对作者可见
    pub async fn story_views(
        &self,
        story_id: &str,
        subject_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<StoryView>, ApplicationError> {
        let story = self
            .deps
            .story_repository
            .find_by_id(story_id)
            .await?
            .ok_or(DomainError::StoryNotFound)?;

        if story.author_id != subject_id {
            return Err(DomainError::NotTheAuthor.into());
        }

        Ok(self
            .deps
            .story_view_repository
            .list_by_story(story_id, skip, limit)
            .await?)
    }

    pub async fn stories_by_author(
        &self,
        author_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Story>, ApplicationError> {
        Ok(self
            .deps
            .story_repository
            .list_active_by_author(author_id, self.deps.clock.now(), skip, limit)
            .await?)
    }

    /// 批量过期清扫，供外部调度器周期性调用；幂等，返回翻转数量
    pub async fn expire_old_stories(&self) -> Result<u64, ApplicationError> {
        let expired = self
            .deps
            .story_repository
            .expire_old(self.deps.clock.now())
            .await?;

        if expired > 0 {
            tracing::info!(expired, "expired old stories");
        }
        Ok(expired)
    }

    /// 新故事通知扇出；任何失败只记录日志，不影响创建结果
    async fn notify_new_story(&self, story: &Story) {
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
            .send_multicast(&tokens, PushMessage::new_story(&story.id, &story.author_name))
            .await;

        tracing::info!(
            success = report.success_count,
            failure = report.failure_count,
            "new story notification dispatched"
        );
    }
}
