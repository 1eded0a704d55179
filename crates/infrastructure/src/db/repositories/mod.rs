//! 各集合的仓储实现

mod comment_repository_impl;
mod like_repository_impl;
mod post_repository_impl;
mod story_repository_impl;
mod story_view_repository_impl;
mod user_repository_impl;

pub use comment_repository_impl::MongoCommentRepository;
pub use like_repository_impl::MongoLikeRepository;
pub use post_repository_impl::MongoPostRepository;
pub use story_repository_impl::MongoStoryRepository;
pub use story_view_repository_impl::MongoStoryViewRepository;
pub use user_repository_impl::MongoUserRepository;
