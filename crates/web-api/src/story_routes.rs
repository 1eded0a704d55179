//! 故事接口
//!
//! 读取已过期的故事返回 410，而不是 404。
//! `POST /stories/expire-old` 供外部调度器周期性调用，未做认证。

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use application::{CreateStoryRequest, StoryViewed};
use domain::{Story, StoryView, UserRole};

use crate::dto::{CreateStoryPayload, ExpireSweepData, ListQuery, UpdateStoryPayload};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stories", post(create_story).get(list_stories))
        .route("/stories/expire-old", post(expire_old_stories))
        .route(
            "/stories/{story_id}",
            get(view_story).put(update_story).delete(delete_story),
        )
        .route("/stories/{story_id}/views", get(story_views))
        .route("/stories/author/{author_id}", get(stories_by_author))
}

async fn create_story(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateStoryPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Story>>), ApiError> {
    let subject = state.jwt_service.require_role(&headers, UserRole::Organizer)?;
    payload.validate()?;

    let created = state
        .story_service
        .create_story(
            &subject.user_id,
            CreateStoryRequest {
                content: payload.content,
                image_url: payload.image_url,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("story created successfully", created)),
    ))
}

async fn list_stories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Story>>>, ApiError> {
    state.jwt_service.authenticate(&headers)?;
    let (skip, limit) = query.pagination(20);

    let stories = state.story_service.list_active(skip, limit).await?;
    Ok(Json(ApiResponse::ok(
        "active stories fetched successfully",
        stories,
    )))
}

/// 读取故事并登记浏览
async fn view_story(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(story_id): Path<String>,
) -> Result<Json<ApiResponse<StoryViewed>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;

    let viewed = state
        .story_service
        .view_story(&story_id, &subject.user_id)
        .await?;

    Ok(Json(ApiResponse::ok("story fetched successfully", viewed)))
}

async fn update_story(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(story_id): Path<String>,
    Json(payload): Json<UpdateStoryPayload>,
) -> Result<Json<ApiResponse<Story>>, ApiError> {
    let subject = state.jwt_service.require_role(&headers, UserRole::Organizer)?;
    payload.validate()?;

    let updated = state
        .story_service
        .update_story(&story_id, payload.into_patch(), &subject.user_id)
        .await?;

    Ok(Json(ApiResponse::ok("story updated successfully", updated)))
}

async fn delete_story(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(story_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let subject = state.jwt_service.require_role(&headers, UserRole::Organizer)?;

    state
        .story_service
        .delete_story(&story_id, &subject.user_id)
        .await?;

    Ok(Json(ApiResponse::ok_message("story deleted successfully")))
}

/// 浏览记录，只有作者可见
async fn story_views(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(story_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<StoryView>>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;
    let (skip, limit) = query.pagination(50);

    let views = state
        .story_service
        .story_views(&story_id, &subject.user_id, skip, limit)
        .await?;

    Ok(Json(ApiResponse::ok(
        "story views fetched successfully",
        views,
    )))
}

async fn stories_by_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(author_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Story>>>, ApiError> {
    state.jwt_service.authenticate(&headers)?;
    let (skip, limit) = query.pagination(20);

    let stories = state
        .story_service
        .stories_by_author(&author_id, skip, limit)
        .await?;

    Ok(Json(ApiResponse::ok(
        "author stories fetched successfully",
        stories,
    )))
}

async fn expire_old_stories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ExpireSweepData>>, ApiError> {
    let expired_count = state.story_service.expire_old_stories().await?;

    Ok(Json(ApiResponse::ok(
        format!("expired {} stories", expired_count),
        ExpireSweepData { expired_count },
    )))
}
