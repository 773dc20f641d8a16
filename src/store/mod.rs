use axum::async_trait;

use crate::models::{Club, ClubStatus};

pub mod collection;
pub mod memory;
pub mod pg;

pub use collection::{Collection, Record};
pub use memory::MemClubStore;
pub use pg::PgClubStore;

/// Persistence for club records.
///
/// The lifecycle rules never look past this trait, so the in-memory store and
/// the PostgreSQL store are interchangeable. Listings come back in creation
/// order.
#[async_trait]
pub trait ClubStore: Send + Sync {
    async fn insert(&self, club: &Club) -> anyhow::Result<()>;

    async fn get(&self, id: &str) -> anyhow::Result<Option<Club>>;

    async fn all(&self) -> anyhow::Result<Vec<Club>>;

    /// Overwrites the stored record that has `club.id`. Last write wins.
    async fn replace(&self, club: &Club) -> anyhow::Result<()>;

    async fn with_status(&self, status: ClubStatus) -> anyhow::Result<Vec<Club>> {
        let mut clubs = self.all().await?;
        clubs.retain(|c| c.status == status);
        Ok(clubs)
    }

    async fn created_by(&self, creator_id: &str) -> anyhow::Result<Vec<Club>> {
        let mut clubs = self.all().await?;
        clubs.retain(|c| c.creator_id == creator_id);
        Ok(clubs)
    }
}
