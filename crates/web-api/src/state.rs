use std::sync::Arc;

use application::{PostService, StoryService, UserService};
use infrastructure::MongoStore;

use crate::auth::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
    pub story_service: Arc<StoryService>,
    pub jwt_service: Arc<JwtService>,
    /// 健康检查使用的存储句柄
    pub store: MongoStore,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        post_service: Arc<PostService>,
        story_service: Arc<StoryService>,
        jwt_service: Arc<JwtService>,
        store: MongoStore,
    ) -> Self {
        Self {
            user_service,
            post_service,
            story_service,
            jwt_service,
            store,
        }
    }
}
