//! 故事服务单元测试
//!
//! 通过手动时钟驱动 24 小时过期语义。

#[cfg(test)]
mod story_service_tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use domain::{DomainError, StoryPatch, User, UserRepository, UserRole};

    use crate::clock::Clock;
    use crate::error::ApplicationError;
    use crate::services::story_service::{
        CreateStoryRequest, StoryService, StoryServiceDependencies,
    };
    use crate::services::test_support::{
        InMemoryStories, InMemoryStoryViews, InMemoryUsers, ManualClock, RecordingNotifier,
    };

    struct Harness {
        service: StoryService,
        users: Arc<InMemoryUsers>,
        notifier: Arc<RecordingNotifier>,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        let users = Arc::new(InMemoryUsers::default());
        let stories = Arc::new(InMemoryStories::default());
        let views = Arc::new(InMemoryStoryViews::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));

        let service = StoryService::new(StoryServiceDependencies {
            story_repository: stories,
            story_view_repository: views,
            user_repository: users.clone(),
            notifier: notifier.clone(),
            clock: clock.clone(),
        });

        Harness {
            service,
            users,
            notifier,
            clock,
        }
    }

    async fn seed_user(harness: &Harness, email: &str, role: UserRole) -> User {
        let user = User::new(email, "plain:pw", "Seeded User", role, Utc::now());
        harness.users.insert(user).await.unwrap()
    }

    fn draft(content: &str) -> CreateStoryRequest {
        CreateStoryRequest {
            content: content.to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_story_sets_24h_expiry() {
        let harness = harness();
        let organizer = seed_user(&harness, "host@example.com", UserRole::Organizer).await;

        let now = harness.clock.now();
        let story = harness
            .service
            .create_story(&organizer.id, draft("backstage"))
            .await
            .unwrap();

        assert_eq!(story.expires_at, now + Duration::hours(24));
        assert!(story.is_active);
        assert_eq!(story.views_count, 0);
    }

    #[tokio::test]
    async fn test_create_story_requires_organizer() {
        let harness = harness();
        let participant = seed_user(&harness, "p@example.com", UserRole::Participant).await;

        let result = harness
            .service
            .create_story(&participant.id, draft("backstage"))
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::PublishNotAllowed))
        ));
    }

    #[tokio::test]
    async fn test_create_story_notifies_participants() {
        let harness = harness();
        let organizer = seed_user(&harness, "host@example.com", UserRole::Organizer).await;
        let mut participant = User::new(
            "p@example.com",
            "plain:pw",
            "Pat",
            UserRole::Participant,
            Utc::now(),
        );
        participant.push_token = Some("token-1".to_string());
        harness.users.insert(participant).await.unwrap();

        let story = harness
            .service
            .create_story(&organizer.id, draft("backstage"))
            .await
            .unwrap();

        let sent = harness.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (tokens, message) = &sent[0];
        assert_eq!(tokens, &vec!["token-1".to_string()]);
        assert_eq!(message.data.get("type").map(String::as_str), Some("new_story"));
        assert_eq!(
            message.data.get("story_id").map(String::as_str),
            Some(story.id.as_str())
        );
    }

    #[tokio::test]
    async fn test_view_story_is_idempotent_per_user() {
        let harness = harness();
        let organizer = seed_user(&harness, "host@example.com", UserRole::Organizer).await;
        let viewer = seed_user(&harness, "p@example.com", UserRole::Participant).await;

        let story = harness
            .service
            .create_story(&organizer.id, draft("backstage"))
            .await
            .unwrap();

        harness.clock.advance_hours(1);
        let viewed = harness.service.view_story(&story.id, &viewer.id).await.unwrap();
        assert_eq!(viewed.story.views_count, 1);
        assert_eq!(viewed.time_remaining_hours, 23);

        // 同一用户再次浏览：不再加计数，但仍然成功
        harness.clock.advance_hours(1);
        let viewed = harness.service.view_story(&story.id, &viewer.id).await.unwrap();
        assert_eq!(viewed.story.views_count, 1);

        // 另一位用户浏览则计数加一
        let second = seed_user(&harness, "p2@example.com", UserRole::Participant).await;
        let viewed = harness.service.view_story(&story.id, &second.id).await.unwrap();
        assert_eq!(viewed.story.views_count, 2);

        let views = harness
            .service
            .story_views(&story.id, &organizer.id, 0, 50)
            .await
            .unwrap();
        assert_eq!(views.len(), 2);
    }

    #[tokio::test]
    async fn test_view_story_after_expiry_is_gone() {
        let harness = harness();
        let organizer = seed_user(&harness, "host@example.com", UserRole::Organizer).await;
        let viewer = seed_user(&harness, "p@example.com", UserRole::Participant).await;

        let story = harness
            .service
            .create_story(&organizer.id, draft("backstage"))
            .await
            .unwrap();

        harness.clock.advance_hours(25);
        let result = harness.service.view_story(&story.id, &viewer.id).await;

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::StoryExpired))
        ));
    }

    #[tokio::test]
    async fn test_view_missing_story_is_not_found() {
        let harness = harness();
        let viewer = seed_user(&harness, "p@example.com", UserRole::Participant).await;

        let result = harness
            .service
            .view_story("64f000000000000000000099", &viewer.id)
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::StoryNotFound))
        ));
    }

    #[tokio::test]
    async fn test_list_active_hides_expired_stories() {
        let harness = harness();
        let organizer = seed_user(&harness, "host@example.com", UserRole::Organizer).await;

        harness
            .service
            .create_story(&organizer.id, draft("early"))
            .await
            .unwrap();

        harness.clock.advance_hours(20);
        let late = harness
            .service
            .create_story(&organizer.id, draft("late"))
            .await
            .unwrap();

        // 20 小时后两条都可见
        assert_eq!(harness.service.list_active(0, 20).await.unwrap().len(), 2);

        // 再过 5 小时，第一条已过期
        harness.clock.advance_hours(5);
        let listed = harness.service.list_active(0, 20).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, late.id);
    }

    #[tokio::test]
    async fn test_expire_old_stories_is_idempotent() {
        let harness = harness();
        let organizer = seed_user(&harness, "host@example.com", UserRole::Organizer).await;

        harness
            .service
            .create_story(&organizer.id, draft("one"))
            .await
            .unwrap();
        harness
            .service
            .create_story(&organizer.id, draft("two"))
            .await
            .unwrap();

        harness.clock.advance_hours(25);

        assert_eq!(harness.service.expire_old_stories().await.unwrap(), 2);
        // 第二次运行没有可翻转的故事
        assert_eq!(harness.service.expire_old_stories().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_story_is_author_only() {
        let harness = harness();
        let author = seed_user(&harness, "host@example.com", UserRole::Organizer).await;
        let other = seed_user(&harness, "other@example.com", UserRole::Organizer).await;

        let story = harness
            .service
            .create_story(&author.id, draft("backstage"))
            .await
            .unwrap();

        let patch = StoryPatch {
            content: Some("edited".to_string()),
            ..Default::default()
        };

        let result = harness
            .service
            .update_story(&story.id, patch.clone(), &other.id)
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::NotTheAuthor))
        ));

        let updated = harness
            .service
            .update_story(&story.id, patch, &author.id)
            .await
            .unwrap();
        assert_eq!(updated.content, "edited");
    }

    #[tokio::test]
    async fn test_update_expired_story_is_gone() {
        let harness = harness();
        let author = seed_user(&harness, "host@example.com", UserRole::Organizer).await;

        let story = harness
            .service
            .create_story(&author.id, draft("backstage"))
            .await
            .unwrap();

        harness.clock.advance_hours(25);

        let result = harness
            .service
            .update_story(
                &story.id,
                StoryPatch {
                    content: Some("too late".to_string()),
                    ..Default::default()
                },
                &author.id,
            )
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::StoryExpired))
        ));
    }

    #[tokio::test]
    async fn test_delete_expired_story_is_gone() {
        let harness = harness();
        let author = seed_user(&harness, "host@example.com", UserRole::Organizer).await;

        let story = harness
            .service
            .create_story(&author.id, draft("backstage"))
            .await
            .unwrap();

        harness.clock.advance_hours(25);

        let result = harness.service.delete_story(&story.id, &author.id).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::StoryExpired))
        ));
    }

    #[tokio::test]
    async fn test_story_views_are_author_only() {
        let harness = harness();
        let author = seed_user(&harness, "host@example.com", UserRole::Organizer).await;
        let viewer = seed_user(&harness, "p@example.com", UserRole::Participant).await;

        let story = harness
            .service
            .create_story(&author.id, draft("backstage"))
            .await
            .unwrap();

        harness.service.view_story(&story.id, &viewer.id).await.unwrap();

        let result = harness
            .service
            .story_views(&story.id, &viewer.id, 0, 50)
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::NotTheAuthor))
        ));
    }

    #[tokio::test]
    async fn test_stories_by_author_filters() {
        let harness = harness();
        let first = seed_user(&harness, "a@example.com", UserRole::Organizer).await;
        let second = seed_user(&harness, "b@example.com", UserRole::Organizer).await;

        harness
            .service
            .create_story(&first.id, draft("from a"))
            .await
            .unwrap();
        harness
            .service
            .create_story(&second.id, draft("from b"))
            .await
            .unwrap();

        let listed = harness
            .service
            .stories_by_author(&first.id, 0, 20)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].author_id, first.id);
    }
}
