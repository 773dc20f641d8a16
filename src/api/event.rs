use crate::{
    auth::CurrentUser,
    error::AppResult,
    events::EventDraft,
    extract::AppJson,
    models::{Event, EventAttendee},
    SharedPortal,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

async fn list(Extension(portal): Extension<SharedPortal>) -> Json<Vec<Event>> {
    Json(portal.events.list().await)
}

async fn info(
    Extension(portal): Extension<SharedPortal>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Event>> {
    Ok(Json(portal.events.get(&event_id).await?))
}

async fn create(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
    AppJson(draft): AppJson<EventDraft>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = portal.events.create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn register(
    Extension(portal): Extension<SharedPortal>,
    Path(event_id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<(StatusCode, Json<EventAttendee>)> {
    let attendee = portal.events.register(&event_id, &user).await?;
    Ok((StatusCode::CREATED, Json(attendee)))
}

async fn attendees(
    Extension(portal): Extension<SharedPortal>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<EventAttendee>>> {
    Ok(Json(portal.events.attendees(&event_id).await?))
}

pub fn app() -> Router {
    Router::new()
        .route("/events", get(list).post(create))
        .route("/events/:event_id", get(info))
        .route("/events/:event_id/register", post(register))
        .route("/events/:event_id/attendees", get(attendees))
}
