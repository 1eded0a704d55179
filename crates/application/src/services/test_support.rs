//! 服务测试的内存替身
//!
//! 以 `Mutex<Vec<_>>` 模拟各文档集合，行为与 MongoDB 适配器保持一致：
//! 插入时分配 24 位十六进制 id，更新时盖章 `updated_at`。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use domain::{
    Comment, CommentRepository, Like, LikeRepository, Post, PostPatch, PostRepository,
    RepositoryResult, Story, StoryPatch, StoryRepository, StoryView, StoryViewRepository, User,
    UserProfilePatch, UserRepository,
};

use crate::clock::Clock;
use crate::notifier::{DeliveryReport, PushMessage, PushNotifier};
use crate::password::{PasswordHasher, PasswordHasherError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// 生成 24 位十六进制 id，形态与 ObjectId 一致
pub fn next_id() -> String {
    format!("{:024x}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

fn page<T: Clone>(items: Vec<T>, skip: u64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(skip as usize)
        .take(limit.max(0) as usize)
        .collect()
}

/// 手动推进的时钟，用于过期场景
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance_hours(&self, hours: i64) {
        let mut now = self.now.lock().unwrap();
        *now = *now + Duration::hours(hours);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 明文"哈希"，仅用于测试
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("plain:{plaintext}"))
    }

    async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        Ok(hashed == format!("plain:{plaintext}"))
    }
}

/// 记录每次多播调用的通知替身
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(Vec<String>, PushMessage)>>,
}

#[async_trait]
impl PushNotifier for RecordingNotifier {
    async fn send_multicast(&self, tokens: &[String], message: PushMessage) -> DeliveryReport {
        self.sent.lock().unwrap().push((tokens.to_vec(), message));
        DeliveryReport {
            success_count: tokens.len(),
            failure_count: 0,
        }
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        if user.id.is_empty() {
            user.id = next_id();
        }
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> RepositoryResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|user| user.email == email))
    }

    async fn update_profile(
        &self,
        id: &str,
        patch: UserProfilePatch,
    ) -> RepositoryResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };

        if let Some(full_name) = patch.full_name {
            user.full_name = full_name;
        }
        if let Some(bio) = patch.bio {
            user.bio = Some(bio);
        }
        if let Some(allergies) = patch.allergies {
            user.allergies = allergies;
        }
        if let Some(profile_image_url) = patch.profile_image_url {
            user.profile_image_url = Some(profile_image_url);
        }
        if let Some(push_token) = patch.push_token {
            user.push_token = Some(push_token);
        }
        user.updated_at = Some(Utc::now());
        Ok(Some(user.clone()))
    }

    async fn update_push_token(
        &self,
        id: &str,
        push_token: &str,
    ) -> RepositoryResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        user.push_token = Some(push_token.to_string());
        user.updated_at = Some(Utc::now());
        Ok(Some(user.clone()))
    }

    async fn participants_with_push_token(&self) -> RepositoryResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|user| user.is_participant() && user.is_active && user.push_token.is_some())
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryPosts {
    posts: Mutex<Vec<Post>>,
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn insert(&self, mut post: Post) -> RepositoryResult<Post> {
        if post.id.is_empty() {
            post.id = next_id();
        }
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Post>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.posts.lock().unwrap().iter().any(|post| post.id == id))
    }

    async fn list_active(&self, skip: u64, limit: i64) -> RepositoryResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| post.is_active)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(posts, skip, limit))
    }

    async fn update(&self, id: &str, patch: PostPatch) -> RepositoryResult<Option<Post>> {
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = Some(image_url);
        }
        if let Some(is_active) = patch.is_active {
            post.is_active = is_active;
        }
        post.updated_at = Some(Utc::now());
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(posts.len() < before)
    }

    async fn adjust_likes_count(&self, id: &str, delta: i64) -> RepositoryResult<()> {
        let mut posts = self.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
            post.likes_count += delta;
            post.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn adjust_comments_count(&self, id: &str, delta: i64) -> RepositoryResult<()> {
        let mut posts = self.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
            post.comments_count += delta;
            post.updated_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryComments {
    comments: Mutex<Vec<Comment>>,
}

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn insert(&self, mut comment: Comment) -> RepositoryResult<Comment> {
        if comment.id.is_empty() {
            comment.id = next_id();
        }
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn list_by_post(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(page(comments, skip, limit))
    }
}

#[derive(Default)]
pub struct InMemoryLikes {
    likes: Mutex<Vec<Like>>,
}

#[async_trait]
impl LikeRepository for InMemoryLikes {
    async fn insert(&self, mut like: Like) -> RepositoryResult<Like> {
        if like.id.is_empty() {
            like.id = next_id();
        }
        self.likes.lock().unwrap().push(like.clone());
        Ok(like)
    }

    async fn find_by_user_and_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> RepositoryResult<Option<Like>> {
        Ok(self
            .likes
            .lock()
            .unwrap()
            .iter()
            .find(|like| like.user_id == user_id && like.post_id == post_id)
            .cloned())
    }

    async fn list_by_post(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Like>> {
        let likes: Vec<Like> = self
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|like| like.post_id == post_id)
            .cloned()
            .collect();
        Ok(page(likes, skip, limit))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let mut likes = self.likes.lock().unwrap();
        let before = likes.len();
        likes.retain(|like| like.id != id);
        Ok(likes.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryStories {
    stories: Mutex<Vec<Story>>,
}

#[async_trait]
impl StoryRepository for InMemoryStories {
    async fn insert(&self, mut story: Story) -> RepositoryResult<Story> {
        if story.id.is_empty() {
            story.id = next_id();
        }
        self.stories.lock().unwrap().push(story.clone());
        Ok(story)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Story>> {
        Ok(self
            .stories
            .lock()
            .unwrap()
            .iter()
            .find(|story| story.id == id)
            .cloned())
    }

    async fn list_active(
        &self,
        now: DateTime<Utc>,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Story>> {
        let mut stories: Vec<Story> = self
            .stories
            .lock()
            .unwrap()
            .iter()
            .filter(|story| story.is_active && story.expires_at > now)
            .cloned()
            .collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(stories, skip, limit))
    }

    async fn list_active_by_author(
        &self,
        author_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Story>> {
        let mut stories: Vec<Story> = self
            .stories
            .lock()
            .unwrap()
            .iter()
            .filter(|story| {
                story.author_id == author_id && story.is_active && story.expires_at > now
            })
            .cloned()
            .collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(stories, skip, limit))
    }

    async fn update(&self, id: &str, patch: StoryPatch) -> RepositoryResult<Option<Story>> {
        let mut stories = self.stories.lock().unwrap();
        let Some(story) = stories.iter_mut().find(|story| story.id == id) else {
            return Ok(None);
        };

        if let Some(content) = patch.content {
            story.content = content;
        }
        if let Some(image_url) = patch.image_url {
            story.image_url = Some(image_url);
        }
        if let Some(is_active) = patch.is_active {
            story.is_active = is_active;
        }
        story.updated_at = Some(Utc::now());
        Ok(Some(story.clone()))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let mut stories = self.stories.lock().unwrap();
        let before = stories.len();
        stories.retain(|story| story.id != id);
        Ok(stories.len() < before)
    }

    async fn increment_views(&self, id: &str) -> RepositoryResult<()> {
        let mut stories = self.stories.lock().unwrap();
        if let Some(story) = stories.iter_mut().find(|story| story.id == id) {
            story.views_count += 1;
            story.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn expire_old(&self, now: DateTime<Utc>) -> RepositoryResult<u64> {
        let mut stories = self.stories.lock().unwrap();
        let mut flipped = 0;
        for story in stories
            .iter_mut()
            .filter(|story| story.is_active && story.expires_at <= now)
        {
            story.is_active = false;
            story.updated_at = Some(Utc::now());
            flipped += 1;
        }
        Ok(flipped)
    }
}

#[derive(Default)]
pub struct InMemoryStoryViews {
    views: Mutex<Vec<StoryView>>,
}

#[async_trait]
impl StoryViewRepository for InMemoryStoryViews {
    async fn insert(&self, mut view: StoryView) -> RepositoryResult<StoryView> {
        if view.id.is_empty() {
            view.id = next_id();
        }
        self.views.lock().unwrap().push(view.clone());
        Ok(view)
    }

    async fn find_by_user_and_story(
        &self,
        user_id: &str,
        story_id: &str,
    ) -> RepositoryResult<Option<StoryView>> {
        Ok(self
            .views
            .lock()
            .unwrap()
            .iter()
            .find(|view| view.user_id == user_id && view.story_id == story_id)
            .cloned())
    }

    async fn list_by_story(
        &self,
        story_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<StoryView>> {
        let views: Vec<StoryView> = self
            .views
            .lock()
            .unwrap()
            .iter()
            .filter(|view| view.story_id == story_id)
            .cloned()
            .collect();
        Ok(page(views, skip, limit))
    }
}
