//! 应用层
//!
//! 编排领域实体、仓储与外部依赖（密码哈希、推送、时钟），
//! 实现用户、帖子与故事三个用例服务。

pub mod clock;
pub mod dto;
pub mod error;
pub mod notifier;
pub mod password;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use dto::{PostDetails, StoryViewed};
pub use error::ApplicationError;
pub use notifier::{DeliveryReport, PushMessage, PushNotifier};
pub use password::{PasswordHasher, PasswordHasherError};
pub use services::{
    AuthenticateUserRequest, CreateCommentRequest, CreatePostRequest, CreateStoryRequest,
    PostService, PostServiceDependencies, RegisterUserRequest, StoryService,
    StoryServiceDependencies, UserService, UserServiceDependencies,
};
