//! Web API 层
//!
//! 提供 Axum 路由，将 HTTP 请求委托给应用层的用例服务，
//! 并以统一信封 `{success, message, data, errors}` 返回。

mod auth;
mod auth_routes;
mod dto;
mod error;
mod post_routes;
mod response;
mod routes;
mod state;
mod story_routes;

pub use auth::{AuthenticatedUser, Claims, JwtService};
pub use config::JwtConfig;
pub use error::ApiError;
pub use response::{ApiResponse, ErrorDetail};
pub use routes::router;
pub use state::AppState;
