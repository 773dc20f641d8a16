use crate::{
    auth::CurrentUser,
    error::{required, AppResult, Error},
    extract::AppJson,
    models::Location,
    policy::{self, Action, Ownership},
    SharedPortal,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use nanoid::nanoid;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

#[derive(Deserialize)]
struct NewLocation {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
}

#[derive(Default, Deserialize)]
struct LocationPatch {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
}

impl LocationPatch {
    fn apply(self, loc: &mut Location) {
        if let Some(name) = self.name {
            loc.name = name;
        }
        if let Some(kind) = self.kind {
            loc.kind = kind;
        }
        if let Some(latitude) = self.latitude {
            loc.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            loc.longitude = longitude;
        }
        if self.address.is_some() {
            loc.address = self.address;
        }
        if self.phone.is_some() {
            loc.phone = self.phone;
        }
        if self.website.is_some() {
            loc.website = self.website;
        }
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

fn validate(loc: &Location) -> Result<(), Error> {
    required(&loc.name, "name")?;
    required(&loc.kind, "type")?;
    if !(-90.0..=90.0).contains(&loc.latitude) {
        return Err(Error::validation("latitude must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&loc.longitude) {
        return Err(Error::validation("longitude must be between -180 and 180"));
    }
    if let Some(website) = &loc.website {
        Url::parse(website).map_err(|_| Error::validation("website must be an absolute URL"))?;
    }
    Ok(())
}

fn mentions(loc: &Location, needle: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(needle);
    hit(&loc.name) || hit(&loc.kind) || loc.address.as_deref().map_or(false, hit)
}

async fn list(Extension(portal): Extension<SharedPortal>) -> Json<Vec<Location>> {
    Json(portal.locations.list().await)
}

async fn search(
    Extension(portal): Extension<SharedPortal>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Location>>> {
    let needle = required(&query.q, "search query")?.to_lowercase();
    Ok(Json(portal.locations.filter(|l| mentions(l, &needle)).await))
}

async fn info(
    Extension(portal): Extension<SharedPortal>,
    Path(location_id): Path<String>,
) -> AppResult<Json<Location>> {
    let location = portal
        .locations
        .get(&location_id)
        .await
        .ok_or(Error::NotFound("location"))?;
    Ok(Json(location))
}

async fn create(
    Extension(portal): Extension<SharedPortal>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<NewLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    policy::authorize(Action::ManageLocations, &user, Ownership::Unowned)?;
    let location = Location {
        id: nanoid!(),
        name: req.name.trim().to_owned(),
        kind: req.kind.trim().to_owned(),
        latitude: req.latitude,
        longitude: req.longitude,
        address: req.address,
        phone: req.phone,
        website: req.website,
    };
    validate(&location)?;
    Ok((
        StatusCode::CREATED,
        Json(portal.locations.insert(location).await),
    ))
}

async fn edit(
    Extension(portal): Extension<SharedPortal>,
    Path(location_id): Path<String>,
    CurrentUser(user): CurrentUser,
    AppJson(patch): AppJson<LocationPatch>,
) -> AppResult<Json<Location>> {
    policy::authorize(Action::ManageLocations, &user, Ownership::Unowned)?;
    let mut location = portal
        .locations
        .get(&location_id)
        .await
        .ok_or(Error::NotFound("location"))?;
    patch.apply(&mut location);
    validate(&location)?;

    let updated = portal
        .locations
        .update(&location_id, |l| *l = location)
        .await
        .ok_or(Error::NotFound("location"))?;
    Ok(Json(updated))
}

async fn delete(
    Extension(portal): Extension<SharedPortal>,
    Path(location_id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Value>> {
    policy::authorize(Action::ManageLocations, &user, Ownership::Unowned)?;
    if !portal.locations.remove(&location_id).await {
        return Err(Error::NotFound("location").into());
    }
    tracing::info!(location = %location_id, by = %user.id, "location deleted");
    Ok(Json(json!({ "success": true })))
}

pub fn app() -> Router {
    Router::new()
        .route("/locations", get(list).post(create))
        .route("/locations/search", get(search))
        .route(
            "/locations/:location_id",
            get(info).patch(edit).delete(delete),
        )
}
