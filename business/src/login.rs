/*  kokpit-auth: Reporting Portal Authenticator
 *  Copyright (C) 2023 The kokpit-auth developers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use crate::clock::Clock;
use crate::data::identity::DirectoryIdentity;
use crate::data::user::User;
use crate::directory;
use crate::directory::DirectoryStore;
use crate::rate_limiter::RateLimiter;
use crate::store;
use crate::store::UserStore;
use crate::token::EncodedSessionToken;
use crate::token::TokenCreator;
use std::sync::Arc;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::instrument;
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("too many attempts")]
    RateLimited,
    #[error("username or password wrong")]
    WrongCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("identifier is ambiguous in the directory")]
    AmbiguousIdentity,
    #[error("directory unavailable")]
    DirectoryUnavailable,
    #[error("backend error")]
    BackendError,
}

#[derive(Debug)]
pub struct AuthenticatedSession {
    pub user: User,

    pub token: EncodedSessionToken,
}

/// Drives a login attempt from identifier + password to an issued session:
/// directory resolution, credential verification, local account lookup or
/// provisioning, token issuance. Accounts unknown to the directory fall back
/// to their stored password hash; a directory outage never does.
pub struct Authenticator {
    directory: Arc<dyn DirectoryStore>,

    user_store: Arc<dyn UserStore>,

    rate_limiter: Arc<dyn RateLimiter>,

    token_creator: TokenCreator,

    clock: Arc<dyn Clock>,

    pepper: String,

    auto_provision: bool,
}

impl Authenticator {
    #[instrument(skip_all, fields(user = identifier))]
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, Error> {
        let now = self.clock.now();
        self.rate_limiter.record_event(identifier, now).await;

        if self
            .rate_limiter
            .is_rate_above_maximum(identifier, now)
            .await
        {
            warn!("tried to authenticate too often");
            self.rate_limiter.remove_event(identifier, now).await;
            return Err(Error::RateLimited);
        }

        let user = match self.directory.resolve(identifier).await {
            Ok(identity) => self.login_directory_user(identity, password).await?,
            Err(directory::Error::IdentityNotFound) => {
                self.login_local_user(identifier, password).await?
            }
            Err(e) => return Err(map_directory_error(e)),
        };

        if !user.active {
            debug!("account is deactivated");
            return Err(Error::WrongCredentials);
        }

        let token = self.token_creator.issue(&user).map_err(|e| {
            error!(%e, "token issuance failed");
            Error::BackendError
        })?;
        self.rate_limiter.remove_event(identifier, now).await;
        Ok(AuthenticatedSession { user, token })
    }

    async fn login_directory_user(
        &self,
        identity: DirectoryIdentity,
        password: &str,
    ) -> Result<User, Error> {
        match self
            .directory
            .verify(&identity.distinguished_name, password)
            .await
        {
            Err(e) => Err(map_directory_error(e)),
            Ok(false) => {
                debug!("directory rejected the credential");
                Err(Error::WrongCredentials)
            }
            Ok(true) => self.resolve_local_user(identity).await,
        }
    }

    async fn resolve_local_user(&self, identity: DirectoryIdentity) -> Result<User, Error> {
        let key = match identity.local_user_key() {
            None => {
                warn!("directory entry carries no usable identifier");
                return Err(Error::UserNotFound);
            }
            Some(v) => v,
        };
        match self.user_store.get(key).await {
            Ok(user) => Ok(user),
            Err(store::Error::NotFound) if self.auto_provision => {
                let user = User::provisioned_from(&identity);
                info!(name = %user.name, "provisioning account on first login");
                self.user_store.put(user.clone()).await.map_err(|e| {
                    error!(%e, "provisioning failed");
                    Error::BackendError
                })?;
                Ok(user)
            }
            Err(store::Error::NotFound) => {
                debug!("no portal account for verified directory identity");
                Err(Error::UserNotFound)
            }
            Err(e) => {
                error!(%e, "user store failure");
                Err(Error::BackendError)
            }
        }
    }

    async fn login_local_user(&self, identifier: &str, password: &str) -> Result<User, Error> {
        let user = match self.user_store.get(identifier).await {
            Err(store::Error::NotFound) => {
                debug!("unknown in directory and store");
                return Err(Error::UserNotFound);
            }
            Err(e) => {
                error!(%e, "user store failure");
                return Err(Error::BackendError);
            }
            Ok(user) => user,
        };
        match &user.password {
            None => {
                debug!("account has no local credential");
                Err(Error::UserNotFound)
            }
            Some(stored) if stored.verify(password, &self.pepper) => Ok(user),
            Some(_) => {
                debug!("local password wrong");
                Err(Error::WrongCredentials)
            }
        }
    }
}

fn map_directory_error(error: directory::Error) -> Error {
    match error {
        directory::Error::Connection => Error::DirectoryUnavailable,
        directory::Error::Authentication => Error::WrongCredentials,
        directory::Error::IdentityNotFound => Error::UserNotFound,
        directory::Error::AmbiguousIdentity => Error::AmbiguousIdentity,
        directory::Error::Search | directory::Error::BackendErrorWithContext(_) => {
            Error::BackendError
        }
    }
}

pub mod inject {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    pub fn authenticator(
        directory: Arc<dyn DirectoryStore>,
        user_store: Arc<dyn UserStore>,
        rate_limiter: Arc<dyn RateLimiter>,
        token_creator: TokenCreator,
        clock: Arc<dyn Clock>,
        pepper: &str,
        auto_provision: bool,
    ) -> Arc<Authenticator> {
        Arc::new(Authenticator {
            directory,
            user_store,
            rate_limiter,
            token_creator,
            clock,
            pepper: pepper.to_owned(),
            auto_provision,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::password::Password;
    use crate::data::user::Role;
    use crate::directory::MockDirectoryStore;
    use crate::rate_limiter;
    use crate::store::MemoryUserStore;
    use crate::token;
    use chrono::Duration;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use rstest::fixture;
    use rstest::rstest;
    use test_log::test;

    const PEPPER: &str = "pepper";
    const DN: &str = "CN=Kokpit User,OU=Users,DC=loomis,DC=com";

    #[rstest]
    #[test(tokio::test)]
    async fn directory_login_issues_session(identity: DirectoryIdentity, user: User) {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .with(eq("kokpituser2"))
            .times(1)
            .returning(move |_| Ok(identity.clone()));
        directory
            .expect_verify()
            .with(eq(DN), eq("secret"))
            .times(1)
            .returning(|_, _| Ok(true));
        let uut = uut(directory, vec![user], false);

        let actual = uut.authenticate("kokpituser2", "secret").await.unwrap();

        assert_eq!("kokpituser2", actual.user.name);
        assert!(!actual.token.as_ref().is_empty());
    }

    #[rstest]
    #[test(tokio::test)]
    async fn wrong_directory_password_is_rejected(identity: DirectoryIdentity, user: User) {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(move |_| Ok(identity.clone()));
        directory.expect_verify().returning(|_, _| Ok(false));
        let uut = uut(directory, vec![user], false);

        let actual = uut.authenticate("kokpituser2", "wrong").await;

        assert!(matches!(actual.unwrap_err(), Error::WrongCredentials));
    }

    #[rstest]
    #[test(tokio::test)]
    async fn ambiguous_identity_is_never_verified(user: User) {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(|_| Err(directory::Error::AmbiguousIdentity));
        let uut = uut(directory, vec![user], false);

        let actual = uut.authenticate("kokpituser2", "secret").await;

        assert!(matches!(actual.unwrap_err(), Error::AmbiguousIdentity));
    }

    #[rstest]
    #[test(tokio::test)]
    async fn unknown_identifier_is_not_found() {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(|_| Err(directory::Error::IdentityNotFound));
        let uut = uut(directory, vec![], false);

        let actual = uut.authenticate("nobody", "secret").await;

        assert!(matches!(actual.unwrap_err(), Error::UserNotFound));
    }

    #[rstest]
    #[test(tokio::test)]
    async fn directory_outage_is_reported(user: User) {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(|_| Err(directory::Error::Connection));
        let uut = uut(directory, vec![user], false);

        let actual = uut.authenticate("kokpituser2", "secret").await;

        assert!(matches!(actual.unwrap_err(), Error::DirectoryUnavailable));
    }

    #[rstest]
    #[test(tokio::test)]
    async fn first_login_provisions_account(identity: DirectoryIdentity) {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(move |_| Ok(identity.clone()));
        directory.expect_verify().returning(|_, _| Ok(true));
        let uut = uut(directory, vec![], true);

        let actual = uut.authenticate("kokpituser2", "secret").await.unwrap();

        assert_eq!("kokpituser2", actual.user.name);
        assert_eq!(Role::User, actual.user.role);
        assert!(actual.user.active);
    }

    #[rstest]
    #[test(tokio::test)]
    async fn verified_identity_without_account_is_rejected(identity: DirectoryIdentity) {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(move |_| Ok(identity.clone()));
        directory.expect_verify().returning(|_, _| Ok(true));
        let uut = uut(directory, vec![], false);

        let actual = uut.authenticate("kokpituser2", "secret").await;

        assert!(matches!(actual.unwrap_err(), Error::UserNotFound));
    }

    #[rstest]
    #[test(tokio::test)]
    async fn deactivated_account_is_rejected(identity: DirectoryIdentity, mut user: User) {
        user.active = false;
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(move |_| Ok(identity.clone()));
        directory.expect_verify().returning(|_, _| Ok(true));
        let uut = uut(directory, vec![user], false);

        let actual = uut.authenticate("kokpituser2", "secret").await;

        assert!(matches!(actual.unwrap_err(), Error::WrongCredentials));
    }

    #[rstest]
    #[test(tokio::test)]
    async fn local_account_falls_back_to_stored_hash(mut user: User) {
        user.password = Some(Password::new("local-secret", PEPPER));
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(|_| Err(directory::Error::IdentityNotFound));
        let uut = uut(directory, vec![user], false);

        let actual = uut.authenticate("kokpituser2", "local-secret").await;

        assert_eq!("kokpituser2", actual.unwrap().user.name);
    }

    #[rstest]
    #[test(tokio::test)]
    async fn local_fallback_rejects_wrong_password(mut user: User) {
        user.password = Some(Password::new("local-secret", PEPPER));
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_resolve()
            .returning(|_| Err(directory::Error::IdentityNotFound));
        let uut = uut(directory, vec![user], false);

        let actual = uut.authenticate("kokpituser2", "wrong").await;

        assert!(matches!(actual.unwrap_err(), Error::WrongCredentials));
    }

    #[rstest]
    #[test(tokio::test)]
    async fn too_many_attempts_are_rejected(user: User) {
        let uut = Authenticator {
            directory: Arc::new(MockDirectoryStore::new()),
            user_store: Arc::new(MemoryUserStore::from(vec![user])),
            rate_limiter: rate_limiter::inject::rate_limiter(0, Duration::minutes(5)),
            token_creator: token_creator(),
            clock: crate::clock::inject::clock(),
            pepper: PEPPER.to_owned(),
            auto_provision: false,
        };

        let actual = uut.authenticate("kokpituser2", "secret").await;

        assert!(matches!(actual.unwrap_err(), Error::RateLimited));
    }

    fn uut(directory: MockDirectoryStore, users: Vec<User>, auto_provision: bool) -> Authenticator {
        Authenticator {
            directory: Arc::new(directory),
            user_store: Arc::new(MemoryUserStore::from(users)),
            rate_limiter: rate_limiter::inject::rate_limiter(3, Duration::minutes(5)),
            token_creator: token_creator(),
            clock: crate::clock::inject::clock(),
            pepper: PEPPER.to_owned(),
            auto_provision,
        }
    }

    fn token_creator() -> TokenCreator {
        token::inject::token_creator(
            "changeme",
            "https://kokpit.example.com",
            Duration::days(7),
            crate::clock::inject::clock(),
        )
    }

    #[fixture]
    fn identity() -> DirectoryIdentity {
        DirectoryIdentity {
            account_name: Some("kokpituser2".to_owned()),
            principal_name: Some("kokpituser2@loomis.com".to_owned()),
            display_name: Some("Kokpit User".to_owned()),
            email: Some("kokpituser2@loomis.com".to_owned()),
            distinguished_name: DN.to_owned(),
        }
    }

    #[fixture]
    fn user(identity: DirectoryIdentity) -> User {
        User::provisioned_from(&identity)
    }
}
