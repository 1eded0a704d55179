//! 帖子仓储实现

use async_trait::async_trait;
use mongodb::bson::{doc, Document};

use domain::{Post, PostPatch, PostRepository, RepositoryResult};

use crate::db::documents::PostDocument;
use crate::db::repository::DocumentRepository;
use crate::db::MongoStore;

const COLLECTION: &str = "posts";

pub struct MongoPostRepository {
    repo: DocumentRepository<PostDocument>,
}

impl MongoPostRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            repo: DocumentRepository::new(store.database().collection(COLLECTION)),
        }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn insert(&self, post: Post) -> RepositoryResult<Post> {
        let document = PostDocument::from(&post);
        let id = self.repo.insert(&document).await?;
        Ok(Post {
            id: id.to_hex(),
            ..post
        })
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Post>> {
        Ok(self.repo.find_by_id(id).await?.map(Post::from))
    }

    async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        self.repo.exists(id).await
    }

    async fn list_active(&self, skip: u64, limit: i64) -> RepositoryResult<Vec<Post>> {
        let documents = self
            .repo
            .find(
                doc! {"is_active": true},
                skip,
                limit,
                Some(doc! {"created_at": -1}),
            )
            .await?;
        Ok(documents.into_iter().map(Post::from).collect())
    }

    async fn update(&self, id: &str, patch: PostPatch) -> RepositoryResult<Option<Post>> {
        let mut set = Document::new();
        if let Some(title) = patch.title {
            set.insert("title", title);
        }
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
            .map(Post::from))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        self.repo.delete(id).await
    }

    async fn adjust_likes_count(&self, id: &str, delta: i64) -> RepositoryResult<()> {
        self.repo
            .update(id, doc! {"$inc": {"likes_count": delta}})
            .await?;
        Ok(())
    }

    async fn adjust_comments_count(&self, id: &str, delta: i64) -> RepositoryResult<()> {
        self.repo
            .update(id, doc! {"$inc": {"comments_count": delta}})
            .await?;
        Ok(())
    }
}
