//! 基础设施层
//!
//! MongoDB 持久化适配器、bcrypt 密码哈希与 FCM 推送客户端。

pub mod db;
pub mod password;
pub mod push;

pub use db::repositories::{
    MongoCommentRepository, MongoLikeRepository, MongoPostRepository, MongoStoryRepository,
    MongoStoryViewRepository, MongoUserRepository,
};
pub use db::MongoStore;
pub use password::BcryptPasswordHasher;
pub use push::{DisabledNotifier, FcmNotifier, PushError, ServiceAccountKey};
