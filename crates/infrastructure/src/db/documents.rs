//! 文档模型
//!
//! 存储原生类型（ObjectId、BSON DateTime）只出现在这一层；
//! 领域实体使用字符串 id 与 chrono 时间，转换在此完成。

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use domain::{Comment, Like, Post, Story, StoryView, User, UserRole};

/// chrono -> BSON，毫秒精度
pub(crate) fn to_bson_datetime(value: ChronoDateTime<Utc>) -> DateTime {
    DateTime::from_millis(value.timestamp_millis())
}

/// BSON -> chrono
pub(crate) fn to_chrono_datetime(value: DateTime) -> ChronoDateTime<Utc> {
    ChronoDateTime::from_timestamp_millis(value.timestamp_millis())
        .unwrap_or(ChronoDateTime::<Utc>::UNIX_EPOCH)
}

fn object_id_to_hex(id: Option<ObjectId>) -> String {
    id.map(|oid| oid.to_hex()).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub push_token: Option<String>,
    pub created_at: DateTime,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: ObjectId::parse_str(&user.id).ok(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_active: user.is_active,
            bio: user.bio.clone(),
            allergies: user.allergies.clone(),
            profile_image_url: user.profile_image_url.clone(),
            push_token: user.push_token.clone(),
            created_at: to_bson_datetime(user.created_at),
            updated_at: user.updated_at.map(to_bson_datetime),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: object_id_to_hex(doc.id),
            email: doc.email,
            password_hash: doc.password_hash,
            full_name: doc.full_name,
            role: doc.role,
            is_active: doc.is_active,
            bio: doc.bio,
            allergies: doc.allergies,
            profile_image_url: doc.profile_image_url,
            push_token: doc.push_token,
            created_at: to_chrono_datetime(doc.created_at),
            updated_at: doc.updated_at.map(to_chrono_datetime),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_role: UserRole,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_active: bool,
    pub created_at: DateTime,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        Self {
            id: ObjectId::parse_str(&post.id).ok(),
            title: post.title.clone(),
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            author_id: post.author_id.clone(),
            author_name: post.author_name.clone(),
            author_role: post.author_role,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
            is_active: post.is_active,
            created_at: to_bson_datetime(post.created_at),
            updated_at: post.updated_at.map(to_bson_datetime),
        }
    }
}

impl From<PostDocument> for Post {
    fn from(doc: PostDocument) -> Self {
        Self {
            id: object_id_to_hex(doc.id),
            title: doc.title,
            content: doc.content,
            image_url: doc.image_url,
            author_id: doc.author_id,
            author_name: doc.author_name,
            author_role: doc.author_role,
            likes_count: doc.likes_count,
            comments_count: doc.comments_count,
            is_active: doc.is_active,
            created_at: to_chrono_datetime(doc.created_at),
            updated_at: doc.updated_at.map(to_chrono_datetime),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl From<&Comment> for CommentDocument {
    fn from(comment: &Comment) -> Self {
        Self {
            id: ObjectId::parse_str(&comment.id).ok(),
            post_id: comment.post_id.clone(),
            user_id: comment.user_id.clone(),
            user_name: comment.user_name.clone(),
            content: comment.content.clone(),
            created_at: to_bson_datetime(comment.created_at),
            updated_at: comment.updated_at.map(to_bson_datetime),
        }
    }
}

impl From<CommentDocument> for Comment {
    fn from(doc: CommentDocument) -> Self {
        Self {
            id: object_id_to_hex(doc.id),
            post_id: doc.post_id,
            user_id: doc.user_id,
            user_name: doc.user_name,
            content: doc.content,
            created_at: to_chrono_datetime(doc.created_at),
            updated_at: doc.updated_at.map(to_chrono_datetime),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post_id: String,
    pub user_id: String,
    pub user_name: String,
    pub created_at: DateTime,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl From<&Like> for LikeDocument {
    fn from(like: &Like) -> Self {
        Self {
            id: ObjectId::parse_str(&like.id).ok(),
            post_id: like.post_id.clone(),
            user_id: like.user_id.clone(),
            user_name: like.user_name.clone(),
            created_at: to_bson_datetime(like.created_at),
            updated_at: like.updated_at.map(to_bson_datetime),
        }
    }
}

impl From<LikeDocument> for Like {
    fn from(doc: LikeDocument) -> Self {
        Self {
            id: object_id_to_hex(doc.id),
            post_id: doc.post_id,
            user_id: doc.user_id,
            user_name: doc.user_name,
            created_at: to_chrono_datetime(doc.created_at),
            updated_at: doc.updated_at.map(to_chrono_datetime),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_role: UserRole,
    pub views_count: i64,
    pub expires_at: DateTime,
    pub is_active: bool,
    pub created_at: DateTime,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl From<&Story> for StoryDocument {
    fn from(story: &Story) -> Self {
        Self {
            id: ObjectId::parse_str(&story.id).ok(),
            content: story.content.clone(),
            image_url: story.image_url.clone(),
            author_id: story.author_id.clone(),
            author_name: story.author_name.clone(),
            author_role: story.author_role,
            views_count: story.views_count,
            expires_at: to_bson_datetime(story.expires_at),
            is_active: story.is_active,
            created_at: to_bson_datetime(story.created_at),
            updated_at: story.updated_at.map(to_bson_datetime),
        }
    }
}

impl From<StoryDocument> for Story {
    fn from(doc: StoryDocument) -> Self {
        Self {
            id: object_id_to_hex(doc.id),
            content: doc.content,
            image_url: doc.image_url,
            author_id: doc.author_id,
            author_name: doc.author_name,
            author_role: doc.author_role,
            views_count: doc.views_count,
            expires_at: to_chrono_datetime(doc.expires_at),
            is_active: doc.is_active,
            created_at: to_chrono_datetime(doc.created_at),
            updated_at: doc.updated_at.map(to_chrono_datetime),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryViewDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub story_id: String,
    pub user_id: String,
    pub user_name: String,
    pub created_at: DateTime,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl From<&StoryView> for StoryViewDocument {
    fn from(view: &StoryView) -> Self {
        Self {
            id: ObjectId::parse_str(&view.id).ok(),
            story_id: view.story_id.clone(),
            user_id: view.user_id.clone(),
            user_name: view.user_name.clone(),
            created_at: to_bson_datetime(view.created_at),
            updated_at: view.updated_at.map(to_bson_datetime),
        }
    }
}

impl From<StoryViewDocument> for StoryView {
    fn from(doc: StoryViewDocument) -> Self {
        Self {
            id: object_id_to_hex(doc.id),
            story_id: doc.story_id,
            user_id: doc.user_id,
            user_name: doc.user_name,
            created_at: to_chrono_datetime(doc.created_at),
            updated_at: doc.updated_at.map(to_chrono_datetime),
        }
    }
}
