//! 故事仓储实现
//!
//! 过期清扫是一条 update_many：把 `expires_at` 已过且仍活跃的故事
//! 批量翻转为非活跃。重复执行不会再匹配到任何文档。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};

use domain::{RepositoryResult, Story, StoryPatch, StoryRepository};

use crate::db::documents::{to_bson_datetime, StoryDocument};
use crate::db::repository::DocumentRepository;
use crate::db::MongoStore;

const COLLECTION: &str = "stories";

pub struct MongoStoryRepository {
    repo: DocumentRepository<StoryDocument>,
}

impl MongoStoryRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            repo: DocumentRepository::new(store.database().collection(COLLECTION)),
        }
    }
}

#[async_trait]
impl StoryRepository for MongoStoryRepository {
    async fn insert(&self, story: Story) -> RepositoryResult<Story> {
        let document = StoryDocument::from(&story);
        let id = self.repo.insert(&document).await?;
        Ok(Story {
            id: id.to_hex(),
            ..story
        })
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Story>> {
        Ok(self.repo.find_by_id(id).await?.map(Story::from))
    }

    async fn list_active(
        &self,
        now: DateTime<Utc>,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Story>> {
        let filter = doc! {
            "is_active": true,
            "expires_at": {"$gt": to_bson_datetime(now)},
        };

        let documents = self
            .repo
            .find(filter, skip, limit, Some(doc! {"created_at": -1}))
            .await?;
        Ok(documents.into_iter().map(Story::from).collect())
    }

    async fn list_active_by_author(
        &self,
        author_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Story>> {
        let filter = doc! {
            "author_id": author_id,
            "is_active": true,
            "expires_at": {"$gt": to_bson_datetime(now)},
        };

        let documents = self
            .repo
            .find(filter, skip, limit, Some(doc! {"created_at": -1}))
            .await?;
        Ok(documents.into_iter().map(Story::from).collect())
    }

    async fn update(&self, id: &str, patch: StoryPatch) -> RepositoryResult<Option<Story>> {
        let mut set = Document::new();
        if let Some(content) = patch.content {
            set.insert("content", content);
        }
        if let Some(image_url) = patch.image_url {
            set.insert("image_url", image_url);
        }
        if let Some(is_active) = patch.is_active {
            set.insert("is_active", is_active);
        }

        Ok(self
            .repo
            .update(id, doc! {"$set": set})
            .await?
            .map(Story::from))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        self.repo.delete(id).await
    }

    async fn increment_views(&self, id: &str) -> RepositoryResult<()> {
        self.repo
            .update(id, doc! {"$inc": {"views_count": 1}})
            .await?;
        Ok(())
    }

    async fn expire_old(&self, now: DateTime<Utc>) -> RepositoryResult<u64> {
        let timestamp = to_bson_datetime(now);
        let filter = doc! {
            "expires_at": {"$lte": timestamp},
            "is_active": true,
        };
        let update = doc! {
            "$set": {"is_active": false, "updated_at": timestamp},
        };

        self.repo.update_many(filter, update).await
    }
}
