use axum::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::ClubStore;
use crate::{
    models::{Club, ClubStatus},
    schema::clubs,
    DbPool,
};

/// Club store backed by the `clubs` table.
pub struct PgClubStore {
    pool: DbPool,
}

impl PgClubStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = clubs)]
struct ClubRow {
    id: String,
    name: String,
    description: String,
    category: String,
    banner: Option<String>,
    creator_id: String,
    status: String,
    approved_by: Option<String>,
    is_setup: bool,
    created_at: DateTime<Utc>,
}

#[derive(AsChangeset)]
#[diesel(table_name = clubs)]
struct ClubChanges<'a> {
    description: &'a str,
    category: &'a str,
    status: &'a str,
    approved_by: Option<&'a str>,
    is_setup: bool,
}

impl From<&Club> for ClubRow {
    fn from(club: &Club) -> Self {
        Self {
            id: club.id.clone(),
            name: club.name.clone(),
            description: club.description.clone(),
            category: club.category.clone(),
            banner: club.banner.clone(),
            creator_id: club.creator_id.clone(),
            status: club.status.as_str().to_owned(),
            approved_by: club.approved_by.clone(),
            is_setup: club.is_setup,
            created_at: club.created_at,
        }
    }
}

impl TryFrom<ClubRow> for Club {
    type Error = anyhow::Error;

    fn try_from(row: ClubRow) -> anyhow::Result<Self> {
        Ok(Self {
            status: row.status.parse()?,
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            banner: row.banner,
            creator_id: row.creator_id,
            approved_by: row.approved_by,
            is_setup: row.is_setup,
            created_at: row.created_at,
        })
    }
}

fn into_clubs(rows: Vec<ClubRow>) -> anyhow::Result<Vec<Club>> {
    rows.into_iter().map(Club::try_from).collect()
}

#[async_trait]
impl ClubStore for PgClubStore {
    async fn insert(&self, club: &Club) -> anyhow::Result<()> {
        let conn = &mut self.pool.get().await?;

        diesel::insert_into(clubs::table)
            .values(ClubRow::from(club))
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Club>> {
        let conn = &mut self.pool.get().await?;

        clubs::table
            .find(id)
            .first::<ClubRow>(conn)
            .await
            .optional()?
            .map(Club::try_from)
            .transpose()
    }

    async fn all(&self) -> anyhow::Result<Vec<Club>> {
        let conn = &mut self.pool.get().await?;

        into_clubs(
            clubs::table
                .order(clubs::created_at.asc())
                .load::<ClubRow>(conn)
                .await?,
        )
    }

    async fn replace(&self, club: &Club) -> anyhow::Result<()> {
        let conn = &mut self.pool.get().await?;

        let updated = diesel::update(clubs::table.find(club.id.as_str()))
            .set(ClubChanges {
                description: &club.description,
                category: &club.category,
                status: club.status.as_str(),
                approved_by: club.approved_by.as_deref(),
                is_setup: club.is_setup,
            })
            .execute(conn)
            .await?;
        anyhow::ensure!(updated == 1, "club {} vanished from the store", club.id);
        Ok(())
    }

    async fn with_status(&self, status: ClubStatus) -> anyhow::Result<Vec<Club>> {
        let conn = &mut self.pool.get().await?;

        into_clubs(
            clubs::table
                .filter(clubs::status.eq(status.as_str()))
                .order(clubs::created_at.asc())
                .load::<ClubRow>(conn)
                .await?,
        )
    }

    async fn created_by(&self, creator_id: &str) -> anyhow::Result<Vec<Club>> {
        let conn = &mut self.pool.get().await?;

        into_clubs(
            clubs::table
                .filter(clubs::creator_id.eq(creator_id))
                .order(clubs::created_at.asc())
                .load::<ClubRow>(conn)
                .await?,
        )
    }
}
