//! The club approval workflow.
//!
//! ```text
//! create ──► pending ──approve──► approved ──setup/publish──► live
//!               │ ▲
//!        reject │ │ submit (creator, from any state, live included)
//!               ▼ │
//!            rejected
//! ```
//!
//! Review (approve/reject) is not guarded against repeats: re-approving an
//! approved club re-sets the status and the approver. Concurrent reviews of
//! the same club are last-write-wins.

use chrono::Utc;
use nanoid::nanoid;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{required, Error},
    models::{Club, ClubStatus, User},
    policy::{self, Action, Ownership},
    store::ClubStore,
};

/// What a student fills in to propose a club.
#[derive(Debug, Default, Deserialize)]
pub struct ClubDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub banner: Option<String>,
}

/// Final details given when an approved club goes live. Blank fields keep
/// what the club already has.
#[derive(Debug, Default, Deserialize)]
pub struct ClubSetup {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

pub struct ClubLifecycle {
    store: Arc<dyn ClubStore>,
}

impl ClubLifecycle {
    pub fn new(store: Arc<dyn ClubStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, creator: &User, draft: ClubDraft) -> anyhow::Result<Club> {
        policy::authorize(Action::CreateClub, creator, Ownership::Unowned)?;
        let club = Club {
            id: nanoid!(),
            name: required(&draft.name, "name")?,
            description: required(&draft.description, "description")?,
            category: required(&draft.category, "category")?,
            banner: draft.banner.filter(|b| !b.trim().is_empty()),
            creator_id: creator.id.clone(),
            status: ClubStatus::Pending,
            approved_by: None,
            is_setup: false,
            created_at: Utc::now(),
        };
        self.store.insert(&club).await?;
        info!(club = %club.id, creator = %creator.id, name = %club.name, "club proposed");
        Ok(club)
    }

    /// The public directory.
    pub async fn list_live(&self) -> anyhow::Result<Vec<Club>> {
        self.store.with_status(ClubStatus::Live).await
    }

    pub async fn list_mine(&self, user: &User, exclude_live: bool) -> anyhow::Result<Vec<Club>> {
        let mut clubs = self.store.created_by(&user.id).await?;
        if exclude_live {
            clubs.retain(|c| c.status != ClubStatus::Live);
        }
        Ok(clubs)
    }

    pub async fn list_mine_with_status(
        &self,
        user: &User,
        status: ClubStatus,
    ) -> anyhow::Result<Vec<Club>> {
        let mut clubs = self.store.created_by(&user.id).await?;
        clubs.retain(|c| c.status == status);
        Ok(clubs)
    }

    pub async fn list_pending(&self, caller: &User) -> anyhow::Result<Vec<Club>> {
        policy::authorize(Action::ListPendingClubs, caller, Ownership::Unowned)?;
        self.store.with_status(ClubStatus::Pending).await
    }

    /// Live clubs are public. Anything else is only visible to its creator and
    /// the principal, and looks absent to everyone else.
    pub async fn get(&self, id: &str, caller: Option<&User>) -> anyhow::Result<Club> {
        let club = self.load(id).await?;
        if club.status == ClubStatus::Live {
            return Ok(club);
        }
        match caller {
            Some(user)
                if policy::permits(
                    Action::ViewClub,
                    user.role,
                    Ownership::of(&club.creator_id, user),
                ) =>
            {
                Ok(club)
            }
            _ => Err(Error::NotFound("club").into()),
        }
    }

    pub async fn approve(&self, id: &str, caller: &User) -> anyhow::Result<Club> {
        self.review(id, caller, Action::ApproveClub, ClubStatus::Approved)
            .await
    }

    pub async fn reject(&self, id: &str, caller: &User) -> anyhow::Result<Club> {
        self.review(id, caller, Action::RejectClub, ClubStatus::Rejected)
            .await
    }

    async fn review(
        &self,
        id: &str,
        caller: &User,
        action: Action,
        to: ClubStatus,
    ) -> anyhow::Result<Club> {
        policy::authorize(action, caller, Ownership::Unowned)?;
        let mut club = self.load(id).await?;
        let from = club.status;
        club.status = to;
        club.approved_by = Some(caller.id.clone());
        self.store.replace(&club).await?;
        info!(club = %club.id, %from, %to, by = %caller.id, "club reviewed");
        Ok(club)
    }

    /// Makes an approved club live. `publish` is the same transition.
    pub async fn setup(&self, id: &str, caller: &User, details: ClubSetup) -> anyhow::Result<Club> {
        let mut club = self.load(id).await?;
        policy::authorize(
            Action::SetupClub,
            caller,
            Ownership::of(&club.creator_id, caller),
        )?;
        if club.status != ClubStatus::Approved {
            return Err(Error::InvalidTransition {
                from: club.status,
                action: "setup",
            }
            .into());
        }

        if let Some(description) = non_blank(details.description) {
            club.description = description;
        }
        if let Some(category) = non_blank(details.category) {
            club.category = category;
        }
        club.status = ClubStatus::Live;
        club.is_setup = true;
        self.store.replace(&club).await?;
        info!(club = %club.id, by = %caller.id, "club is live");
        Ok(club)
    }

    /// Sends a club (back) to review from whatever state it is in. A live club
    /// leaves the directory until it is approved and set up again. The last
    /// approver stays recorded.
    pub async fn submit(&self, id: &str, caller: &User) -> anyhow::Result<Club> {
        let mut club = self.load(id).await?;
        policy::authorize(
            Action::SubmitClub,
            caller,
            Ownership::of(&club.creator_id, caller),
        )?;

        let from = club.status;
        club.status = ClubStatus::Pending;
        self.store.replace(&club).await?;
        info!(club = %club.id, %from, by = %caller.id, "club submitted for review");
        Ok(club)
    }

    async fn load(&self, id: &str) -> anyhow::Result<Club> {
        Ok(self.store.get(id).await?.ok_or(Error::NotFound("club"))?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
