//! 认证与个人资料接口

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use application::{AuthenticateUserRequest, RegisterUserRequest};
use domain::User;

use crate::dto::{
    LoginPayload, PushTokenPayload, RegisterPayload, TokenData, UpdateProfilePayload,
};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(profile).put(update_profile))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/fcm-token", post(update_push_token))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<ApiResponse<TokenData>>), ApiError> {
    payload.validate()?;

    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
            role: payload.role,
        })
        .await?;

    let token = state.jwt_service.issue_token(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "user registered successfully",
            TokenData::bearer(token, user),
        )),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<ApiResponse<TokenData>>, ApiError> {
    let user = state
        .user_service
        .authenticate(AuthenticateUserRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let token = state.jwt_service.issue_token(&user)?;

    Ok(Json(ApiResponse::ok(
        "login successful",
        TokenData::bearer(token, user),
    )))
}

async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;
    let user = state.user_service.get_profile(&subject.user_id).await?;

    Ok(Json(ApiResponse::ok("profile fetched successfully", user)))
}

async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;
    payload.validate()?;

    let user = state
        .user_service
        .update_profile(&subject.user_id, payload.into_patch())
        .await?;

    Ok(Json(ApiResponse::ok("profile updated successfully", user)))
}

async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TokenData>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;

    // 重新读取用户，确认账号仍然有效后再续签
    let user = state.user_service.get_profile(&subject.user_id).await?;
    if !user.is_active {
        return Err(ApiError::unauthorized("account disabled"));
    }

    let token = state.jwt_service.issue_token(&user)?;

    Ok(Json(ApiResponse::ok(
        "token refreshed successfully",
        TokenData::bearer(token, user),
    )))
}

async fn update_push_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PushTokenPayload>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let subject = state.jwt_service.authenticate(&headers)?;
    payload.validate()?;

    let user = state
        .user_service
        .update_push_token(&subject.user_id, &payload.fcm_token)
        .await?;

    Ok(Json(ApiResponse::ok(
        "push token updated successfully",
        user,
    )))
}
