use nanoid::nanoid;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    auth::{Credential, PasswordScheme, Sessions},
    error::{required, Error},
    models::{Role, User},
};

/// User accounts and their sessions.
pub struct Identity {
    users: RwLock<HashMap<String, User>>,
    sessions: Sessions,
    scheme: PasswordScheme,
}

impl Identity {
    pub fn new(sessions: Sessions, scheme: PasswordScheme) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            sessions,
            scheme,
        }
    }

    /// Creates an account without opening a session.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> anyhow::Result<User> {
        let username = required(username, "username")?;
        if password.is_empty() {
            return Err(Error::validation("password is required").into());
        }
        let password = Credential::new(password, self.scheme)
            .map_err(|e| anyhow::anyhow!("failed to store password: {e}"))?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == username) {
            return Err(Error::Conflict("username has been taken".into()).into());
        }
        let user = User {
            id: nanoid!(),
            username,
            password,
            role,
        };
        users.insert(user.id.clone(), user.clone());
        info!(user = %user.id, username = %user.username, role = %user.role, "account created");
        Ok(user)
    }

    /// Creates an account and signs it in.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> anyhow::Result<(User, String)> {
        let user = self.register(username, password, role).await?;
        let token = self.sessions.open(&user.id).await?;
        Ok((user, token))
    }

    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<(User, String)> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::validation("missing credentials").into());
        }
        let user = self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .filter(|u| u.password.matches(password))
            .cloned()
            .ok_or(Error::InvalidCredentials)?;
        let token = self.sessions.open(&user.id).await?;
        info!(user = %user.id, "logged in");
        Ok((user, token))
    }

    pub async fn current_user(&self, token: &str) -> anyhow::Result<User> {
        let user_id = self.sessions.resolve(token).await?;
        // the account may be gone even though the session is not
        Ok(self.user(&user_id).await.ok_or(Error::Unauthenticated)?)
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.close(token).await;
    }

    pub async fn user(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn identity(scheme: PasswordScheme) -> Identity {
        Identity::new(Sessions::ephemeral(Duration::from_secs(3600)), scheme)
    }

    fn domain(err: &anyhow::Error) -> &Error {
        err.downcast_ref::<Error>().expect("domain error")
    }

    #[tokio::test]
    async fn login_opens_a_session() {
        let id = identity(PasswordScheme::Plaintext);
        let user = id
            .register("PRINCIPAL001", "principal123", Role::Principal)
            .await
            .unwrap();

        let (logged_in, token) = id.login("PRINCIPAL001", "principal123").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(id.current_user(&token).await.unwrap().role, Role::Principal);

        id.logout(&token).await;
        let err = id.current_user(&token).await.unwrap_err();
        assert!(matches!(domain(&err), Error::Unauthenticated));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let id = identity(PasswordScheme::Argon2);
        id.register("RNSIT0001", "lecturer123", Role::Lecturer)
            .await
            .unwrap();

        let err = id.login("RNSIT0001", "lecturer124").await.unwrap_err();
        assert!(matches!(domain(&err), Error::InvalidCredentials));
        let err = id.login("nobody", "lecturer123").await.unwrap_err();
        assert!(matches!(domain(&err), Error::InvalidCredentials));
        let err = id.login("", "").await.unwrap_err();
        assert!(matches!(domain(&err), Error::Validation(_)));

        assert!(id.login("RNSIT0001", "lecturer123").await.is_ok());
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let id = identity(PasswordScheme::Plaintext);
        id.register("1RN21CS001", "a", Role::Student).await.unwrap();
        let err = id
            .signup("1RN21CS001", "b", Role::Student)
            .await
            .unwrap_err();
        assert!(matches!(domain(&err), Error::Conflict(_)));
    }

    #[tokio::test]
    async fn signup_needs_both_fields() {
        let id = identity(PasswordScheme::Plaintext);
        for (u, p) in [("", "pw"), ("  ", "pw"), ("someone", "")] {
            let err = id.signup(u, p, Role::Student).await.unwrap_err();
            assert!(matches!(domain(&err), Error::Validation(_)));
        }
    }
}
