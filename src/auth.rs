use argon2::Argon2;
use axum::{
    async_trait,
    extract::{FromRequest, RequestParts},
    headers::{authorization::Bearer, Authorization, Cookie},
    Extension, TypedHeader,
};
use jsonwebtoken::{
    errors::Result as JwtResult, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use nanoid::nanoid;
use password_hash::{
    self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr, time::Duration};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, Error},
    models::User,
    SharedPortal,
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

pub fn hash_password(password: impl AsRef<[u8]>) -> password_hash::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_ref(), &salt)
        .map(|h| h.to_string())
}

pub fn verify_password(
    password: impl AsRef<[u8]>,
    password_hash: impl AsRef<str>,
) -> password_hash::Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash.as_ref())?;
    Ok(Argon2::default()
        .verify_password(password.as_ref(), &parsed_hash)
        .is_ok())
}

/// How newly stored passwords are kept.
///
/// Plaintext is the default because that is what existing accounts use;
/// switching to argon2 is an explicit deployment decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    #[default]
    Plaintext,
    Argon2,
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(PasswordScheme::Plaintext),
            "argon2" => Ok(PasswordScheme::Argon2),
            other => Err(format!("unknown password scheme `{other}`")),
        }
    }
}

/// A stored password.
#[derive(Debug, Clone)]
pub enum Credential {
    Plain(String),
    /// Argon2 PHC string.
    Hashed(String),
}

impl Credential {
    pub fn new(password: &str, scheme: PasswordScheme) -> password_hash::Result<Self> {
        Ok(match scheme {
            PasswordScheme::Plaintext => Credential::Plain(password.to_owned()),
            PasswordScheme::Argon2 => Credential::Hashed(hash_password(password)?),
        })
    }

    pub fn matches(&self, password: &str) -> bool {
        match self {
            Credential::Plain(stored) => stored == password,
            Credential::Hashed(hash) => verify_password(password, hash).unwrap_or(false),
        }
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Session id, must still be registered for the token to count.
    pub sid: String,
    pub exp: u64,
}

struct Session {
    user_id: String,
    /// Same instant as the token's `exp`, in seconds since the epoch.
    exp: u64,
}

/// Server-side session registry plus the keys used to sign session tokens.
///
/// Expired sessions are pruned whenever a new one opens, so the registry only
/// grows with the number of sessions that are still valid.
pub struct Sessions {
    keys: Keys,
    ttl: Duration,
    live: RwLock<HashMap<String, Session>>,
}

impl Sessions {
    pub fn from_base64_secret(secret: &str, ttl: Duration) -> JwtResult<Self> {
        Ok(Self::with_keys(
            Keys {
                encoding: EncodingKey::from_base64_secret(secret)?,
                decoding: DecodingKey::from_base64_secret(secret)?,
            },
            ttl,
        ))
    }

    /// Signs with a secret that only lives as long as this process.
    pub fn ephemeral(ttl: Duration) -> Self {
        let secret: [u8; 32] = rand::random();
        Self::with_keys(
            Keys {
                encoding: EncodingKey::from_secret(&secret),
                decoding: DecodingKey::from_secret(&secret),
            },
            ttl,
        )
    }

    fn with_keys(keys: Keys, ttl: Duration) -> Self {
        Self {
            keys,
            ttl,
            live: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new session for `user_id` and returns its token.
    pub async fn open(&self, user_id: &str) -> JwtResult<String> {
        let sid = nanoid!();
        let now = jsonwebtoken::get_current_timestamp();
        let exp = now + self.ttl.as_secs();
        let token = jsonwebtoken::encode(
            &Header::default(),
            &Claims {
                sub: user_id.to_owned(),
                sid: sid.clone(),
                exp,
            },
            &self.keys.encoding,
        )?;

        let mut live = self.live.write().await;
        live.retain(|_, session| session.exp > now);
        live.insert(
            sid,
            Session {
                user_id: user_id.to_owned(),
                exp,
            },
        );
        Ok(token)
    }

    /// Returns the user id behind a token that is signed, unexpired and not logged out.
    pub async fn resolve(&self, token: &str) -> Result<String, Error> {
        let claims = self.decode(token).ok_or(Error::Unauthenticated)?.claims;
        let now = jsonwebtoken::get_current_timestamp();
        let expired = match self.live.read().await.get(&claims.sid) {
            Some(session) if session.exp > now => {
                return if session.user_id == claims.sub {
                    Ok(claims.sub)
                } else {
                    Err(Error::Unauthenticated)
                };
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.live.write().await.remove(&claims.sid);
        }
        Err(Error::Unauthenticated)
    }

    /// Forgets the session behind `token`. Unknown or invalid tokens are ignored.
    pub async fn close(&self, token: &str) {
        if let Some(data) = self.decode(token) {
            self.live.write().await.remove(&data.claims.sid);
        }
    }

    fn decode(&self, token: &str) -> Option<TokenData<Claims>> {
        jsonwebtoken::decode::<Claims>(token, &self.keys.decoding, &Validation::default()).ok()
    }
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// The raw session token of a request, if it carries one.
///
/// A bearer token wins over the session cookie.
pub struct SessionToken(pub Option<String>);

#[async_trait]
impl<B: Send> FromRequest<B> for SessionToken {
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        if let Ok(TypedHeader(Authorization(bearer))) =
            TypedHeader::<Authorization<Bearer>>::from_request(req).await
        {
            return Ok(Self(Some(bearer.token().to_owned())));
        }
        let token = TypedHeader::<Cookie>::from_request(req)
            .await
            .ok()
            .and_then(|TypedHeader(cookie)| cookie.get(SESSION_COOKIE).map(str::to_owned))
            .filter(|token| !token.is_empty());
        Ok(Self(token))
    }
}

/// The authenticated caller. Rejects with 401 when there is no live session.
pub struct CurrentUser(pub User);

#[async_trait]
impl<B: Send> FromRequest<B> for CurrentUser {
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(portal) = Extension::<SharedPortal>::from_request(req)
            .await
            .map_err(|e| anyhow::anyhow!("portal state missing: {e}"))?;
        let SessionToken(token) = SessionToken::from_request(req).await?;
        let token = token.ok_or(Error::Unauthenticated)?;
        Ok(Self(portal.identity.current_user(&token).await?))
    }
}
