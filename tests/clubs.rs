mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use campus_portal::models::Role;
use common::{Caller, TestApp};
use serde_json::{json, Value};

async fn propose(app: &TestApp, creator: &Caller, name: &str) -> String {
    let (status, club) = app
        .post(
            "/api/clubs",
            Some(creator),
            json!({ "name": name, "description": "draft", "category": "tech" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(club["status"], "pending");
    club["id"].as_str().unwrap().to_owned()
}

fn ids(clubs: &Value) -> Vec<&str> {
    clubs
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn approved_club_goes_live_after_setup() {
    let app = TestApp::new();
    let student = app.caller("1RN21CS001", Role::Student).await;
    let principal = app.caller("PRINCIPAL001", Role::Principal).await;
    let club = propose(&app, &student, "Robotics").await;

    let (status, _) = app.get("/api/clubs", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, approved) = app
        .patch(&format!("/api/clubs/{club}/approve"), &principal, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approvedBy"], principal.id.as_str());

    let (status, live) = app
        .patch(
            &format!("/api/clubs/{club}/setup"),
            &student,
            Some(json!({ "description": "X" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(live["isSetup"], true);

    let (_, clubs) = app.get("/api/clubs", None).await;
    let listed = clubs
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == club.as_str())
        .expect("live club is listed");
    assert_eq!(listed["description"], "X");
    assert_eq!(listed["status"], "live");
    assert_eq!(listed["category"], "tech");

    let (_, drafts) = app.get("/api/clubs/my-drafts", Some(&student)).await;
    assert!(!ids(&drafts).contains(&club.as_str()));
}

#[tokio::test]
async fn only_the_creator_can_set_up() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;
    let other = app.caller("other", Role::Student).await;
    let principal = app.caller("principal", Role::Principal).await;
    let club = propose(&app, &creator, "Chess").await;
    app.patch(&format!("/api/clubs/{club}/approve"), &principal, None)
        .await;

    let (status, body) = app
        .patch(
            &format!("/api/clubs/{club}/setup"),
            &other,
            Some(json!({ "description": "hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);

    let (_, approved) = app.get("/api/my-clubs/approved", Some(&creator)).await;
    assert_eq!(approved[0]["status"], "approved");
    assert_eq!(approved[0]["description"], "draft");
}

#[tokio::test]
async fn non_principal_cannot_approve() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;
    let lecturer = app.caller("lecturer", Role::Lecturer).await;
    let principal = app.caller("principal", Role::Principal).await;
    let club = propose(&app, &creator, "Drama").await;

    let (status, body) = app
        .patch(&format!("/api/clubs/{club}/approve"), &lecturer, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only principal can approve clubs");

    let (status, _) = app.get("/api/clubs/pending", Some(&lecturer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, pending) = app.get("/api/clubs/pending", Some(&principal)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&pending), [club.as_str()]);
}

#[tokio::test]
async fn setup_before_approval_is_rejected() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;
    let club = propose(&app, &creator, "Music").await;

    let (status, body) = app
        .patch(&format!("/api/clubs/{club}/publish"), &creator, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cannot setup a pending club");
}

#[tokio::test]
async fn rejected_club_can_be_resubmitted() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;
    let principal = app.caller("principal", Role::Principal).await;
    let club = propose(&app, &creator, "Quiz").await;

    let (status, _) = app
        .patch(&format!("/api/clubs/{club}/reject"), &principal, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, rejected) = app.get("/api/my-clubs/rejected", Some(&creator)).await;
    assert_eq!(ids(&rejected), [club.as_str()]);

    let (status, resubmitted) = app
        .patch(&format!("/api/clubs/{club}/submit"), &creator, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resubmitted["status"], "pending");

    let (_, pending) = app.get("/api/clubs/pending", Some(&principal)).await;
    assert_eq!(ids(&pending), [club.as_str()]);
}

#[tokio::test]
async fn unpublished_clubs_are_hidden_from_strangers() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;
    let stranger = app.caller("stranger", Role::Student).await;
    let club = propose(&app, &creator, "Photography").await;
    let uri = format!("/api/clubs/{club}");

    assert_eq!(app.get(&uri, None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&uri, Some(&stranger)).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&uri, Some(&creator)).await.0, StatusCode::OK);
    assert_eq!(
        app.get("/api/clubs/nope", Some(&creator)).await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn creating_a_club_needs_a_session() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/clubs", None, json!({ "name": "Ghost", "description": "", "category": "" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

fn raw_post(uri: &str, caller: &Caller, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", caller.token));
    if let Some(content_type) = content_type {
        req = req.header(header::CONTENT_TYPE, content_type);
    }
    req.body(Body::from(body.to_owned())).unwrap()
}

#[tokio::test]
async fn unreadable_bodies_are_json_validation_errors() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;

    let (status, body) = app
        .post(
            "/api/clubs",
            Some(&creator),
            json!({ "name": 5, "description": "d", "category": "c" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let json = Some("application/json");
    for req in [
        raw_post("/api/clubs", &creator, json, "{not json"),
        raw_post("/api/clubs", &creator, None, r#"{"name":"a","description":"b","category":"c"}"#),
    ] {
        let (status, body) = app.send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    let (_, drafts) = app.get("/api/clubs/my-drafts", Some(&creator)).await;
    assert!(ids(&drafts).is_empty());
}

#[tokio::test]
async fn unreadable_setup_body_leaves_the_club_approved() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;
    let principal = app.caller("principal", Role::Principal).await;
    let club = propose(&app, &creator, "Debate").await;
    app.patch(&format!("/api/clubs/{club}/approve"), &principal, None)
        .await;

    let (status, body) = app
        .patch(
            &format!("/api/clubs/{club}/setup"),
            &creator,
            Some(json!({ "description": 42 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (_, approved) = app.get("/api/my-clubs/approved", Some(&creator)).await;
    assert_eq!(ids(&approved), [club.as_str()]);
    let (_, live) = app.get("/api/clubs", None).await;
    assert!(ids(&live).is_empty());
}

#[tokio::test]
async fn live_club_can_be_sent_back_to_review() {
    let app = TestApp::new();
    let creator = app.caller("creator", Role::Student).await;
    let principal = app.caller("principal", Role::Principal).await;
    let club = propose(&app, &creator, "Astronomy").await;
    app.patch(&format!("/api/clubs/{club}/approve"), &principal, None)
        .await;
    app.patch(&format!("/api/clubs/{club}/setup"), &creator, None)
        .await;

    let (status, resubmitted) = app
        .patch(&format!("/api/clubs/{club}/submit"), &creator, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resubmitted["status"], "pending");
    assert_eq!(resubmitted["approvedBy"], principal.id.as_str());

    let (_, live) = app.get("/api/clubs", None).await;
    assert!(ids(&live).is_empty());
}
