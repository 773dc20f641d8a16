use crate::{
    auth::{expired_session_cookie, session_cookie, CurrentUser, SessionToken},
    error::AppResult,
    extract::AppJson,
    models::{Role, User, UserView},
    SharedPortal,
};
use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct SignupRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: Role,
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    #[serde(flatten)]
    user: UserView,
    token: String,
}

fn signed_in(status: StatusCode, user: &User, token: String) -> impl IntoResponse {
    (
        status,
        [(SET_COOKIE, session_cookie(&token))],
        Json(SessionResponse {
            user: user.into(),
            token,
        }),
    )
}

async fn signup(
    Extension(portal): Extension<SharedPortal>,
    AppJson(req): AppJson<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let (user, token) = portal
        .identity
        .signup(&req.username, &req.password, req.role)
        .await?;
    Ok(signed_in(StatusCode::CREATED, &user, token))
}

async fn login(
    Extension(portal): Extension<SharedPortal>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let (user, token) = portal
        .identity
        .login(&req.username, &req.password)
        .await?;
    Ok(signed_in(StatusCode::OK, &user, token))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserView> {
    Json(UserView::from(&user))
}

async fn logout(
    Extension(portal): Extension<SharedPortal>,
    SessionToken(token): SessionToken,
) -> impl IntoResponse {
    if let Some(token) = token {
        portal.identity.logout(&token).await;
    }
    (
        [(SET_COOKIE, expired_session_cookie())],
        Json(serde_json::json!({ "success": true })),
    )
}

pub fn app() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
}
