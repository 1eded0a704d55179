//! 用户仓储实现

use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};

use domain::{RepositoryResult, User, UserProfilePatch, UserRepository};

use crate::db::documents::UserDocument;
use crate::db::repository::DocumentRepository;
use crate::db::MongoStore;

const COLLECTION: &str = "users";

/// 通知扇出一次加载的收件人上限
const FANOUT_LIMIT: i64 = 100;

pub struct MongoUserRepository {
    repo: DocumentRepository<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            repo: DocumentRepository::new(store.database().collection(COLLECTION)),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: User) -> RepositoryResult<User> {
        let document = UserDocument::from(&user);
        let id = self.repo.insert(&document).await?;
        Ok(User {
            id: id.to_hex(),
            ..user
        })
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.repo.find_by_id(id).await?.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .repo
            .find_one(doc! {"email": email.to_lowercase()})
            .await?
            .map(User::from))
    }

    async fn email_exists(&self, email: &str) -> RepositoryResult<bool> {
        Ok(self.repo.count(doc! {"email": email.to_lowercase()}).await? > 0)
    }

    async fn update_profile(
        &self,
        id: &str,
        patch: UserProfilePatch,
    ) -> RepositoryResult<Option<User>> {
        let mut set = Document::new();
        if let Some(full_name) = patch.full_name {
            set.insert("full_name", full_name);
        }
        if let Some(bio) = patch.bio {
            set.insert("bio", bio);
        }
        if let Some(allergies) = patch.allergies {
            set.insert("allergies", allergies);
        }
        if let Some(profile_image_url) = patch.profile_image_url {
            set.insert("profile_image_url", profile_image_url);
        }
        if let Some(push_token) = patch.push_token {
            set.insert("push_token", push_token);
        }

        Ok(self
            .repo
            .update(id, doc! {"$set": set})
            .await?
            .map(User::from))
    }

    async fn update_push_token(
        &self,
        id: &str,
        push_token: &str,
    ) -> RepositoryResult<Option<User>> {
        Ok(self
            .repo
            .update(id, doc! {"$set": {"push_token": push_token}})
            .await?
            .map(User::from))
    }

    async fn participants_with_push_token(&self) -> RepositoryResult<Vec<User>> {
        let filter = doc! {
            "role": "participant",
            "is_active": true,
            "push_token": {"$ne": Bson::Null, "$exists": true},
        };

        let documents = self.repo.find(filter, 0, FANOUT_LIMIT, None).await?;
        Ok(documents.into_iter().map(User::from).collect())
    }
}
