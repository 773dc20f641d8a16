use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::{
    auth::{PasswordScheme, Sessions},
    clubs::ClubLifecycle,
    config::Config,
    connect_to_db,
    events::Events,
    identity::Identity,
    models::{Announcement, Location, Note, Post, WhatsappGroup},
    seed,
    store::{ClubStore, Collection, MemClubStore, PgClubStore},
};

/// Everything a request handler can reach.
pub struct Portal {
    pub identity: Identity,
    pub clubs: ClubLifecycle,
    pub announcements: Collection<Announcement>,
    pub notes: Collection<Note>,
    pub posts: Collection<Post>,
    pub locations: Collection<Location>,
    pub whatsapp_groups: Collection<WhatsappGroup>,
    pub events: Events,
}

impl Portal {
    pub fn new(identity: Identity, clubs: Arc<dyn ClubStore>) -> Self {
        Self {
            identity,
            clubs: ClubLifecycle::new(clubs),
            announcements: Collection::new(),
            notes: Collection::new(),
            posts: Collection::new(),
            locations: Collection::new(),
            whatsapp_groups: Collection::new(),
            events: Events::default(),
        }
    }

    /// An empty portal with plaintext passwords and throwaway signing keys.
    pub fn in_memory() -> Self {
        Self::new(
            Identity::new(
                Sessions::ephemeral(Duration::from_secs(24 * 60 * 60)),
                PasswordScheme::Plaintext,
            ),
            Arc::new(MemClubStore::default()),
        )
    }

    pub async fn from_config(config: &Config) -> anyhow::Result<Arc<Self>> {
        let sessions = match &config.jwt_secret {
            Some(secret) => Sessions::from_base64_secret(secret, config.session_ttl())?,
            None => {
                warn!("JWT_SECRET not set, sessions will not survive a restart");
                Sessions::ephemeral(config.session_ttl())
            }
        };

        let clubs: Arc<dyn ClubStore> = match &config.db_url {
            Some(url) => {
                info!("storing clubs in postgres");
                Arc::new(PgClubStore::new(connect_to_db(url)?))
            }
            None => {
                info!("storing clubs in memory");
                Arc::new(MemClubStore::default())
            }
        };

        let portal = Self::new(Identity::new(sessions, config.password_scheme), clubs);
        if config.seed_demo_data {
            seed::install(&portal).await?;
        }
        Ok(Arc::new(portal))
    }
}
