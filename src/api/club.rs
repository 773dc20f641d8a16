use crate::{
    auth::CurrentUser,
    clubs::{ClubDraft, ClubSetup},
    error::AppResult,
    extract::{AppJson, OptionalJson},
    models::{Club, ClubStatus},
    SharedPortal,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

async fn list(Extension(portal): Extension<SharedPortal>) -> AppResult<Json<Vec<Club>>> {
    Ok(Json(portal.clubs.list_live().await?))
}

async fn create(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
    AppJson(draft): AppJson<ClubDraft>,
) -> AppResult<(StatusCode, Json<Club>)> {
    let club = portal.clubs.create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(club)))
}

async fn info(
    Extension(portal): Extension<SharedPortal>,
    Path(club_id): Path<String>,
    user: Option<CurrentUser>,
) -> AppResult<Json<Club>> {
    let caller = user.map(|CurrentUser(u)| u);
    Ok(Json(portal.clubs.get(&club_id, caller.as_ref()).await?))
}

async fn my_drafts(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Club>>> {
    Ok(Json(portal.clubs.list_mine(&user, true).await?))
}

async fn my_approved(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Club>>> {
    Ok(Json(
        portal
            .clubs
            .list_mine_with_status(&user, ClubStatus::Approved)
            .await?,
    ))
}

async fn my_rejected(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Club>>> {
    Ok(Json(
        portal
            .clubs
            .list_mine_with_status(&user, ClubStatus::Rejected)
            .await?,
    ))
}

async fn pending(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Club>>> {
    Ok(Json(portal.clubs.list_pending(&user).await?))
}

async fn approve(
    Extension(portal): Extension<SharedPortal>,
    Path(club_id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Club>> {
    Ok(Json(portal.clubs.approve(&club_id, &user).await?))
}

async fn reject(
    Extension(portal): Extension<SharedPortal>,
    Path(club_id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Club>> {
    Ok(Json(portal.clubs.reject(&club_id, &user).await?))
}

async fn submit(
    Extension(portal): Extension<SharedPortal>,
    Path(club_id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Club>> {
    Ok(Json(portal.clubs.submit(&club_id, &user).await?))
}

// serves both /setup and /publish
async fn setup(
    Extension(portal): Extension<SharedPortal>,
    Path(club_id): Path<String>,
    CurrentUser(user): CurrentUser,
    OptionalJson(details): OptionalJson<ClubSetup>,
) -> AppResult<Json<Club>> {
    let details = details.unwrap_or_default();
    Ok(Json(portal.clubs.setup(&club_id, &user, details).await?))
}

pub fn app() -> Router {
    Router::new()
        .route("/clubs", get(list).post(create))
        .route("/clubs/my-drafts", get(my_drafts))
        .route("/clubs/pending", get(pending))
        .route("/clubs/:club_id", get(info))
        .route("/clubs/:club_id/approve", patch(approve))
        .route("/clubs/:club_id/reject", patch(reject))
        .route("/clubs/:club_id/submit", patch(submit))
        .route("/clubs/:club_id/setup", patch(setup))
        .route("/clubs/:club_id/publish", patch(setup))
        .route("/my-clubs/approved", get(my_approved))
        .route("/my-clubs/rejected", get(my_rejected))
}
