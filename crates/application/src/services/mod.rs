pub mod post_service;
pub mod story_service;
pub mod user_service;

#[cfg(test)]
mod test_support;

mod story_service_tests;

pub use post_service::{
    CreateCommentRequest, CreatePostRequest, PostService, PostServiceDependencies,
};
pub use story_service::{CreateStoryRequest, StoryService, StoryServiceDependencies};
pub use user_service::{
    AuthenticateUserRequest, RegisterUserRequest, UserService, UserServiceDependencies,
};
