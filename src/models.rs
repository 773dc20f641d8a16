use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::auth::Credential;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Lecturer,
    Principal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Lecturer => "lecturer",
            Role::Principal => "principal",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: Credential,
    pub role: Role,
}

/// The public face of a [`User`]; never carries the credential.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Where a club sits in its approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubStatus {
    Pending,
    Approved,
    Rejected,
    Live,
}

impl ClubStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubStatus::Pending => "pending",
            ClubStatus::Approved => "approved",
            ClubStatus::Rejected => "rejected",
            ClubStatus::Live => "live",
        }
    }
}

impl fmt::Display for ClubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClubStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => ClubStatus::Pending,
            "approved" => ClubStatus::Approved,
            "rejected" => ClubStatus::Rejected,
            "live" => ClubStatus::Live,
            other => anyhow::bail!("unknown club status `{other}`"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub banner: Option<String>,
    pub creator_id: String,
    pub status: ClubStatus,
    pub approved_by: Option<String>,
    pub is_setup: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub author_id: String,
    pub author_role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub image: Option<String>,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub name: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsappGroup {
    pub id: String,
    pub group_name: String,
    pub members: Vec<GroupMember>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub banner: Option<String>,
    /// Calendar date as entered by the organizer, `YYYY-MM-DD`.
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub organizer_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub registered_at: DateTime<Utc>,
}
