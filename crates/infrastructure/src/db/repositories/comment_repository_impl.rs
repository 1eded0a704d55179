//! 评论仓储实现

use async_trait::async_trait;
use mongodb::bson::doc;

use domain::{Comment, CommentRepository, RepositoryResult};

use crate::db::documents::CommentDocument;
use crate::db::repository::DocumentRepository;
use crate::db::MongoStore;

const COLLECTION: &str = "comments";

pub struct MongoCommentRepository {
    repo: DocumentRepository<CommentDocument>,
}

impl MongoCommentRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            repo: DocumentRepository::new(store.database().collection(COLLECTION)),
        }
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn insert(&self, comment: Comment) -> RepositoryResult<Comment> {
        let document = CommentDocument::from(&comment);
        let id = self.repo.insert(&document).await?;
        Ok(Comment {
            id: id.to_hex(),
            ..comment
        })
    }

    async fn list_by_post(
        &self,
        post_id: &str,
        skip: u64,
        limit: i64,
    ) -> RepositoryResult<Vec<Comment>> {
        let documents = self
            .repo
            .find(
                doc! {"post_id": post_id},
                skip,
                limit,
                Some(doc! {"created_at": 1}),
            )
            .await?;
        Ok(documents.into_iter().map(Comment::from).collect())
    }
}
