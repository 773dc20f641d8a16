use crate::{
    auth::CurrentUser,
    error::{required, AppResult},
    extract::AppJson,
    models::Announcement,
    policy::{self, Action, Ownership},
    SharedPortal,
};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use chrono::Utc;
use itertools::Itertools;
use nanoid::nanoid;
use serde::Deserialize;

#[derive(Deserialize)]
struct NewAnnouncement {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    category: Option<String>,
}

/// Newest first.
async fn list(Extension(portal): Extension<SharedPortal>) -> Json<Vec<Announcement>> {
    let announcements = portal
        .announcements
        .list()
        .await
        .into_iter()
        .sorted_by(|a, b| b.created_at.cmp(&a.created_at))
        .collect();
    Json(announcements)
}

async fn create(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<NewAnnouncement>,
) -> AppResult<(StatusCode, Json<Announcement>)> {
    policy::authorize(Action::CreateAnnouncement, &user, Ownership::Unowned)?;
    let announcement = Announcement {
        id: nanoid!(),
        title: required(&req.title, "title")?,
        content: required(&req.content, "content")?,
        category: req.category.filter(|c| !c.trim().is_empty()),
        author_id: user.id.clone(),
        author_role: user.role,
        created_at: Utc::now(),
    };
    tracing::info!(announcement = %announcement.id, author = %user.id, "announcement posted");
    Ok((
        StatusCode::CREATED,
        Json(portal.announcements.insert(announcement).await),
    ))
}

pub fn app() -> Router {
    Router::new().route("/announcements", get(list).post(create))
}
