//! 主应用程序入口
//!
//! 装配配置、MongoDB 仓储、应用服务与 Axum 路由并启动服务。

use std::sync::Arc;

use application::{
    services::{
        PostService, PostServiceDependencies, StoryService, StoryServiceDependencies, UserService,
        UserServiceDependencies,
    },
    PushNotifier, SystemClock,
};
use config::AppConfig;
use infrastructure::{
    BcryptPasswordHasher, DisabledNotifier, FcmNotifier, MongoCommentRepository,
    MongoLikeRepository, MongoPostRepository, MongoStore, MongoStoryRepository,
    MongoStoryViewRepository, MongoUserRepository, ServiceAccountKey,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 读取环境变量配置
    let config = AppConfig::from_env_with_defaults();

    // 连接 MongoDB
    let store = MongoStore::connect(&config.database.url, &config.database.name).await?;

    // 创建仓储
    let user_repository = Arc::new(MongoUserRepository::new(&store));
    let post_repository = Arc::new(MongoPostRepository::new(&store));
    let comment_repository = Arc::new(MongoCommentRepository::new(&store));
    let like_repository = Arc::new(MongoLikeRepository::new(&store));
    let story_repository = Arc::new(MongoStoryRepository::new(&store));
    let story_view_repository = Arc::new(MongoStoryViewRepository::new(&store));

    // 密码哈希与时钟
    let password_hasher = Arc::new(BcryptPasswordHasher::new(config.server.bcrypt_cost));
    let clock = Arc::new(SystemClock);

    // 推送通知：凭证缺失时降级为空实现
    let notifier: Arc<dyn PushNotifier> =
        match (&config.push.project_id, &config.push.credentials_path) {
            (Some(project_id), Some(path)) => {
                let credentials = ServiceAccountKey::from_file(path)?;
                tracing::info!(project_id = %project_id, "FCM push notifications enabled");
                Arc::new(FcmNotifier::new(project_id.clone(), credentials))
            }
            _ => {
                tracing::warn!("FCM credentials not configured, push notifications disabled");
                Arc::new(DisabledNotifier)
            }
        };

    // 应用层服务
    let user_service = Arc::new(UserService::new(UserServiceDependencies {
        user_repository: user_repository.clone(),
        password_hasher,
        clock: clock.clone(),
    }));

    let post_service = Arc::new(PostService::new(PostServiceDependencies {
        post_repository,
        comment_repository,
        like_repository,
        user_repository: user_repository.clone(),
        notifier: notifier.clone(),
        clock: clock.clone(),
    }));

    let story_service = Arc::new(StoryService::new(StoryServiceDependencies {
        story_repository,
        story_view_repository,
        user_repository,
        notifier,
        clock,
    }));

    // JWT 服务
    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    // 应用状态与路由
    let state = AppState::new(user_service, post_service, story_service, jwt_service, store);
    let app = router(state);

    // 启动 Web 服务器
    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!("event social server listening on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
