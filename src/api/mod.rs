use axum::Router;

pub mod announcement;
pub mod auth;
pub mod club;
pub mod event;
pub mod location;
pub mod note;
pub mod post;
pub mod whatsapp;

pub fn app() -> Router {
    Router::new()
        .nest("/auth", auth::app())
        .merge(club::app())
        .merge(announcement::app())
        .merge(note::app())
        .merge(post::app())
        .merge(location::app())
        .merge(whatsapp::app())
        .merge(event::app())
}
