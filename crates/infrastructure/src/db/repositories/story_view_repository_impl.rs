//! 浏览记录仓储实现

use async_trait::async_trait;
use mongodb::bson::doc;

use domain::{RepositoryResult, StoryView, StoryViewRepository};

use crate::db::documents::StoryViewDocument;
use crate::db::repository::DocumentRepository;
use crate::db::MongoStore;

const COLLECTION: &str = "story_views";

pub struct MongoStoryViewRepository {
    repo: DocumentRepository<StoryViewDocument>,
}

impl MongoStoryViewRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            repo: DocumentRepository::new(store.database().collection(COLLECTION)),
        }
    }
}

#[async_trait]
impl StoryViewRepository for MongoStoryViewRepository {
    async fn insert(&self, view: StoryView) -> RepositoryResult<StoryView> {
        let document = StoryViewDocument::from(&view);
        let id = self.repo.insert(&document).await?;
        Ok(StoryView {
            id: id.to_hex(),
            ..view
        })
    }

    async fn find_by_user_and_story(
        &self,
        user_id: &str,
        story_id: &str,
    ) -> RepositoryResult<Option<StoryView>> {
        Ok(self
            .repo
            .find_one(doc! {"user_id": user_id, "story_id": story_id})
            .await?
            .map(StoryView::from))
    }

    async fn list_by_story(
        &self,
        story_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<StoryView>> {
        let documents = self
            .repo
            .find(doc! {"story_id": story_id}, skip, limit, None)
            .await?;
        Ok(documents.into_iter().map(StoryView::from).collect())
    }
}
