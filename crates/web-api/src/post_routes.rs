//! 帖子接口
//!
//! 创建与编辑要求组织者角色；点赞、评论的参与者角色检查在服务层完成。

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use application::{CreateCommentRequest, CreatePostRequest, PostDetails};
use domain::{Comment, Like, Post, UserRole};

use crate::dto::{CreateCommentPayload, CreatePostPayload, ListQuery, UpdatePostPayload};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post).get(list_posts))
        .route(
            "/posts/{post_id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{post_id}/like", post(like_post).delete(unlike_post))
        .route(
            "/posts/{post_id}/comments",
            post(add_comment).get(list_comments),
        )
        .route("/posts/{post_id}/likes", get(list_likes))
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), ApiError> {
    let subject = state.jwt_service.require_role(&headers, UserRole::Organizer)?;
    payload.validate()?;

    let created = state
        .post_service
        .create_post(
            &subject.user_id,
            CreatePostRequest {
                title: payload.title,
                content: payload.content,
                image_url: payload.image_url,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("post created successfully", created)),
    ))
}

async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<PostDetails>>>, ApiError> {
    state.jwt_service.authenticate(&headers)?;
    let (skip, limit) = query.pagination(20);

    let posts = state.post_service.list_posts(skip, limit).await?;
    Ok(Json(ApiResponse::ok("posts fetched successfully", posts)))
}

async fn get_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<PostDetails>>, ApiError> {
    state.jwt_service.authenticate(&headers)?;

    let details = state.post_service.get_post(&post_id).await?;
    Ok(Json(ApiResponse::ok("post fetched successfully", details)))
}

async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePostPayload>,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let subject = state.jwt_service.require_role(&headers, UserRole::Organizer)?;
    payload.validate()?;

    let updated = state
        .post_service
        .update_post(&post_id, payload.into_patch(), &subject.user_id)
        .await?;

    Ok(Json(ApiResponse::ok("post updated successfully", updated)))
}

async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let subject = state.jwt_service.require_role(&headers, UserRole::Organizer)?;

    state
        .post_service
        .delete_post(&post_id, &subject.user_id)
        .await?;

    Ok(Json(ApiResponse::ok_message("post deleted successfully")))
}

async fn like_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;

    state
        .post_service
        .like_post(&post_id, &subject.user_id)
        .await?;

    Ok(Json(ApiResponse::ok_message("like added successfully")))
}

async fn unlike_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;

    state
        .post_service
        .unlike_post(&post_id, &subject.user_id)
        .await?;

    Ok(Json(ApiResponse::ok_message("like removed successfully")))
}

async fn add_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>), ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;
    payload.validate()?;

    let comment = state
        .post_service
        .add_comment(
            &post_id,
            &subject.user_id,
            CreateCommentRequest {
                content: payload.content,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("comment added successfully", comment)),
    ))
}

async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Comment>>>, ApiError> {
    state.jwt_service.authenticate(&headers)?;
    let (skip, limit) = query.pagination(50);

    let comments = state
        .post_service
        .list_comments(&post_id, skip, limit)
        .await?;

    Ok(Json(ApiResponse::ok(
        "comments fetched successfully",
        comments,
    )))
}

async fn list_likes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Like>>>, ApiError> {
    state.jwt_service.authenticate(&headers)?;
    let (skip, limit) = query.pagination(50);

    let likes = state.post_service.list_likes(&post_id, skip, limit).await?;

    Ok(Json(ApiResponse::ok("likes fetched successfully", likes)))
}
