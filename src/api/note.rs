use crate::{
    auth::CurrentUser,
    error::{required, AppResult},
    extract::AppJson,
    models::Note,
    policy::{self, Action, Ownership},
    SharedPortal,
};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use chrono::Utc;
use nanoid::nanoid;
use serde::Deserialize;

#[derive(Deserialize)]
struct NewNote {
    #[serde(default)]
    title: String,
    subject: Option<String>,
    content: Option<String>,
}

async fn list(Extension(portal): Extension<SharedPortal>) -> Json<Vec<Note>> {
    Json(portal.notes.list().await)
}

async fn create(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<NewNote>,
) -> AppResult<(StatusCode, Json<Note>)> {
    policy::authorize(Action::CreateNote, &user, Ownership::Unowned)?;
    let note = Note {
        id: nanoid!(),
        title: required(&req.title, "title")?,
        subject: req.subject,
        content: req.content,
        creator_id: user.id.clone(),
        created_at: Utc::now(),
    };
    Ok((StatusCode::CREATED, Json(portal.notes.insert(note).await)))
}

pub fn app() -> Router {
    Router::new().route("/notes", get(list).post(create))
}
