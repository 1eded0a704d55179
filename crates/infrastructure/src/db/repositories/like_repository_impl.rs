//! 点赞仓储实现

use async_trait::async_trait;
use mongodb::bson::doc;

use domain::{Like, LikeRepository, RepositoryResult};

use crate::db::documents::LikeDocument;
use crate::db::repository::DocumentRepository;
use crate::db::MongoStore;

const COLLECTION: &str = "likes";

pub struct MongoLikeRepository {
    repo: DocumentRepository<LikeDocument>,
}

impl MongoLikeRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            repo: DocumentRepository::new(store.database().collection(COLLECTION)),
        }
    }
}

#[async_trait]
impl LikeRepository for MongoLikeRepository {
    async fn insert(&self, like: Like) -> RepositoryResult<Like> {
        let document = LikeDocument::from(&like);
        let id = self.repo.insert(&document).await?;
        Ok(Like {
            id: id.to_hex(),
            ..like
        })
    }

    async fn find_by_user_and_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> RepositoryResult<Option<Like>> {
        Ok(self
            .repo
            .find_one(doc! {"user_id": user_id, "post_id": post_id})
            .await?
            .map(Like::from))
    }

    async fn list_by_post(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Like>> {
        let documents = self
            .repo
            .find(doc! {"post_id": post_id}, skip, limit, None)
            .await?;
        Ok(documents.into_iter().map(Like::from).collect())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        self.repo.delete(id).await
    }
}
