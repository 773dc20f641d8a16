#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Extension, Router,
};
use campus_portal::{models::Role, Portal};
use serde_json::Value;
use tower::ServiceExt;

pub struct Caller {
    pub id: String,
    pub token: String,
}

pub struct TestApp {
    pub portal: Arc<Portal>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let portal = Arc::new(Portal::in_memory());
        let router = campus_portal::app("assets").layer(Extension(portal.clone()));
        Self { portal, router }
    }

    /// Signs up `username` directly through the portal.
    pub async fn caller(&self, username: &str, role: Role) -> Caller {
        let (user, token) = self
            .portal
            .identity
            .signup(username, "secret", role)
            .await
            .unwrap();
        Caller { id: user.id, token }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&Caller>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", caller.token));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(serde_json::to_vec(&body).unwrap())),
            None => req.body(Body::empty()),
        }
        .unwrap();
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, caller: Option<&Caller>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, caller, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        caller: Option<&Caller>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, uri, caller, Some(body)).await
    }

    pub async fn patch(
        &self,
        uri: &str,
        caller: &Caller,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(caller), body).await
    }
}
