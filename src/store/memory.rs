use axum::async_trait;

use super::{ClubStore, Collection};
use crate::models::{Club, ClubStatus};

/// Club store that lives and dies with the process.
#[derive(Default)]
pub struct MemClubStore {
    clubs: Collection<Club>,
}

#[async_trait]
impl ClubStore for MemClubStore {
    async fn insert(&self, club: &Club) -> anyhow::Result<()> {
        self.clubs.insert(club.clone()).await;
        Ok(())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Club>> {
        Ok(self.clubs.get(id).await)
    }

    async fn all(&self) -> anyhow::Result<Vec<Club>> {
        Ok(self.clubs.list().await)
    }

    async fn replace(&self, club: &Club) -> anyhow::Result<()> {
        self.clubs
            .update(&club.id, |stored| *stored = club.clone())
            .await
            .ok_or_else(|| anyhow::anyhow!("club {} vanished from the store", club.id))?;
        Ok(())
    }

    async fn with_status(&self, status: ClubStatus) -> anyhow::Result<Vec<Club>> {
        Ok(self.clubs.filter(|c| c.status == status).await)
    }

    async fn created_by(&self, creator_id: &str) -> anyhow::Result<Vec<Club>> {
        Ok(self.clubs.filter(|c| c.creator_id == creator_id).await)
    }
}
