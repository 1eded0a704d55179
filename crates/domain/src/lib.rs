//! 领域层
//!
//! 定义核心业务实体、业务规则校验、错误类型以及仓储契约。
//! 该层不包含任何 I/O，持久化与推送由基础设施层实现。

pub mod entities;
pub mod errors;
pub mod repository;

pub use entities::post::{Comment, Like, Post, PostPatch};
pub use entities::story::{Story, StoryPatch, StoryView, STORY_TTL_HOURS};
pub use entities::user::{User, UserProfilePatch, UserRole};
pub use errors::{DomainError, DomainResult, RepositoryError, RepositoryResult};
pub use repository::{
    CommentRepository, LikeRepository, PostRepository, StoryRepository, StoryViewRepository,
    UserRepository,
};
