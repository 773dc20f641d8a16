use crate::{
    auth::CurrentUser,
    error::{required, AppResult, Error},
    extract::AppJson,
    models::{GroupMember, WhatsappGroup},
    policy::{self, Action, Ownership},
    SharedPortal,
};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use chrono::Utc;
use itertools::Itertools;
use nanoid::nanoid;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewGroup {
    #[serde(default)]
    group_name: String,
    #[serde(default)]
    members: Vec<MemberInput>,
}

#[derive(Deserialize)]
struct MemberInput {
    #[serde(default)]
    name: String,
    #[serde(default)]
    summary: String,
}

/// Drops nameless entries and repeated names, keeping the first summary seen.
fn roster(members: Vec<MemberInput>) -> Vec<GroupMember> {
    members
        .into_iter()
        .filter_map(|m| {
            let name = m.name.trim();
            (!name.is_empty()).then(|| GroupMember {
                name: name.to_owned(),
                summary: m.summary.trim().to_owned(),
            })
        })
        .unique_by(|m| m.name.to_lowercase())
        .collect()
}

async fn list(Extension(portal): Extension<SharedPortal>) -> Json<Vec<WhatsappGroup>> {
    Json(portal.whatsapp_groups.list().await)
}

async fn create(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<NewGroup>,
) -> AppResult<(StatusCode, Json<WhatsappGroup>)> {
    policy::authorize(Action::CreateWhatsappGroup, &user, Ownership::Unowned)?;
    let group_name = required(&req.group_name, "groupName")?;
    let members = roster(req.members);
    if members.is_empty() {
        return Err(Error::validation("members are required").into());
    }

    let group = WhatsappGroup {
        id: nanoid!(),
        group_name,
        members,
        created_at: Utc::now(),
    };
    Ok((
        StatusCode::CREATED,
        Json(portal.whatsapp_groups.insert(group).await),
    ))
}

pub fn app() -> Router {
    Router::new().route("/whatsapp-groups", get(list).post(create))
}
