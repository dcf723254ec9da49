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

use crate::data::user::User;
use crate::store::Error;
use crate::store::UserStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory account store, keyed by lowercased account name with a secondary
/// email index. The portal population is small, this is also the production
/// store for local fallback accounts loaded at startup.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl From<Vec<User>> for MemoryUserStore {
    fn from(value: Vec<User>) -> Self {
        let users = value
            .into_iter()
            .map(|user| (user.name.to_lowercase(), user))
            .collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, key: &str) -> Result<User, Error> {
        let key = key.to_lowercase();
        let users = self.users.read().await;
        if let Some(user) = users.get(&key) {
            return Ok(user.clone());
        }
        users
            .values()
            .find(|user| {
                user.email
                    .as_ref()
                    .is_some_and(|email| email.to_lowercase() == key)
            })
            .cloned()
            .inspect(|_| debug!("found by email"))
            .ok_or(Error::NotFound)
    }

    async fn put(&self, user: User) -> Result<(), Error> {
        let mut users = self.users.write().await;
        users.insert(user.name.to_lowercase(), user);
        Ok(())
    }
}

pub mod inject {
    use super::*;

    pub fn user_store(users: Vec<User>) -> Arc<MemoryUserStore> {
        Arc::new(MemoryUserStore::from(users))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::user::Role;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test(tokio::test)]
    async fn user_is_found_by_name() {
        let uut = MemoryUserStore::from(vec![user()]);

        let actual = uut.get("Kokpituser2").await;

        assert_eq!("kokpituser2", actual.unwrap().name);
    }

    #[test(tokio::test)]
    async fn user_is_found_by_email() {
        let uut = MemoryUserStore::from(vec![user()]);

        let actual = uut.get("kokpituser2@loomis.com").await;

        assert_eq!("kokpituser2", actual.unwrap().name);
    }

    #[test(tokio::test)]
    async fn unknown_user_is_not_found() {
        let uut = MemoryUserStore::from(vec![user()]);

        let actual = uut.get("somebody.else").await;

        assert!(matches!(actual.unwrap_err(), Error::NotFound));
    }

    #[test(tokio::test)]
    async fn stored_user_is_returned() {
        let uut = MemoryUserStore::default();

        uut.put(user()).await.unwrap();
        let actual = uut.get("kokpituser2").await;

        assert_eq!("kokpituser2", actual.unwrap().name);
    }

    fn user() -> User {
        User {
            id: uuid::Uuid::new_v4(),
            name: "kokpituser2".to_owned(),
            display_name: Some("Kokpit User".to_owned()),
            email: Some("Kokpituser2@loomis.com".to_owned()),
            role: Role::User,
            active: true,
            password: None,
            groups: Default::default(),
            favourite_reports: Default::default(),
        }
    }
}
