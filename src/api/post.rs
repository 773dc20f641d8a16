use crate::{
    auth::CurrentUser,
    error::{required, AppResult, Error},
    extract::AppJson,
    models::Post,
    policy::{self, Action, Ownership},
    SharedPortal,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use itertools::Itertools;
use nanoid::nanoid;
use serde::Deserialize;

#[derive(Deserialize)]
struct NewPost {
    #[serde(default)]
    content: String,
    image: Option<String>,
}

async fn list(Extension(portal): Extension<SharedPortal>) -> Json<Vec<Post>> {
    let posts = portal
        .posts
        .list()
        .await
        .into_iter()
        .sorted_by(|a, b| b.created_at.cmp(&a.created_at))
        .collect();
    Json(posts)
}

async fn create(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<NewPost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    policy::authorize(Action::CreatePost, &user, Ownership::Unowned)?;
    let post = Post {
        id: nanoid!(),
        author_id: user.id.clone(),
        content: required(&req.content, "content")?,
        image: req.image,
        likes: 0,
        created_at: Utc::now(),
    };
    Ok((StatusCode::CREATED, Json(portal.posts.insert(post).await)))
}

async fn like(
    Extension(portal): Extension<SharedPortal>,
    Path(post_id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Post>> {
    policy::authorize(Action::LikePost, &user, Ownership::Unowned)?;
    let post = portal
        .posts
        .update(&post_id, |p| p.likes = p.likes.saturating_add(1))
        .await
        .ok_or(Error::NotFound("post"))?;
    Ok(Json(post))
}

pub fn app() -> Router {
    Router::new()
        .route("/posts", get(list).post(create))
        .route("/posts/:post_id/like", post(like))
}
