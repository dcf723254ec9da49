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

use crate::connect::Connector;
use crate::error::LdapError;
use crate::resolve::ResolutionOutcome;
use crate::resolve::SearchStrategy;
use crate::resolve::AMBIGUITY_PROBE_SIZE;
use async_trait::async_trait;
use kokpit_auth_business::data::identity::DirectoryIdentity;
use kokpit_auth_business::directory::DirectoryStore;
use kokpit_auth_business::directory::Error;
use kokpit_auth_business::util::wrap_err;
use ldap3::{Ldap, Scope, SearchEntry, SearchOptions};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

const DISPLAY_NAME_ATTRIBUTE: &str = "displayName";
const MAIL_ATTRIBUTE: &str = "mail";

const RESULT_SUCCESS: u32 = 0;
const RESULT_INVALID_CREDENTIALS: u32 = 49;
const RESULT_SIZE_LIMIT_EXCEEDED: u32 = 4;

pub struct LdapDirectory {
    pub(crate) connector: Connector,
    pub(crate) bind_dn: String,
    pub(crate) bind_dn_password: String,
    pub(crate) base_dn: String,
    pub(crate) operation_timeout: Duration,
    pub(crate) strategies: Vec<SearchStrategy>,
    pub(crate) account_attribute: String,
    pub(crate) principal_attribute: String,
}

#[async_trait]
impl DirectoryStore for LdapDirectory {
    #[instrument(skip_all, fields(user = identifier))]
    async fn resolve(&self, identifier: &str) -> Result<DirectoryIdentity, Error> {
        let mut ldap = self.connect().await?;
        let result = self.resolve_on(&mut ldap, identifier).await;
        close(ldap).await;
        result
    }

    #[instrument(skip_all)]
    async fn verify(&self, distinguished_name: &str, password: &str) -> Result<bool, Error> {
        if password.is_empty() {
            // an empty credential would be an anonymous bind
            debug!("rejecting empty password");
            return Ok(false);
        }

        // fresh connection, the service-bound one is never reused here
        let mut ldap = self.connect().await?;
        let result = simple_bind(
            &mut ldap,
            distinguished_name,
            password,
            self.operation_timeout,
        )
        .await;
        close(ldap).await;

        match result {
            Ok(v) => Ok(v),
            Err(LdapError::BindError) => Err(Error::Authentication),
            Err(e @ LdapError::BindErrorWithContext(_)) => {
                warn!(%e, "transport failure while binding");
                Err(Error::Connection)
            }
            Err(e) => Err(wrap_err(e)),
        }
    }
}

impl LdapDirectory {
    async fn connect(&self) -> Result<Ldap, Error> {
        self.connector.connect().await.map_err(|e| {
            warn!(%e, "directory unreachable");
            Error::Connection
        })
    }

    async fn resolve_on(
        &self,
        ldap: &mut Ldap,
        identifier: &str,
    ) -> Result<DirectoryIdentity, Error> {
        self.bind_service_account(ldap).await?;

        for strategy in &self.strategies {
            let filter = strategy.filter(identifier);
            debug!(strategy = strategy.name, %filter, base_dn = %self.base_dn, "searching");
            let result = match ldap
                .with_search_options(
                    SearchOptions::new()
                        .sizelimit(AMBIGUITY_PROBE_SIZE)
                        .timelimit(self.operation_timeout.as_secs() as i32),
                )
                .with_timeout(self.operation_timeout)
                .search(
                    &self.base_dn,
                    Scope::Subtree,
                    &filter,
                    self.requested_attributes(),
                )
                .await
            {
                Ok(v) => v,
                Err(e) => {
                    warn!(%e, %filter, base_dn = %self.base_dn, "search failed");
                    return Err(Error::Search);
                }
            };

            let result_code = result.1.rc;
            if result_code != RESULT_SUCCESS && result_code != RESULT_SIZE_LIMIT_EXCEEDED {
                warn!(
                    result_code,
                    text = %result.1.text,
                    %filter,
                    base_dn = %self.base_dn,
                    "directory reported search failure"
                );
                return Err(Error::Search);
            }

            match ResolutionOutcome::from_search(result.0, result_code) {
                ResolutionOutcome::NotFound => continue,
                ResolutionOutcome::Ambiguous => {
                    error!(
                        strategy = strategy.name,
                        "identifier matches more than one directory entry"
                    );
                    return Err(Error::AmbiguousIdentity);
                }
                ResolutionOutcome::Unique(entry) => {
                    debug!(strategy = strategy.name, "matched");
                    return Ok(self.to_identity(entry));
                }
            }
        }
        debug!("no strategy matched");
        Err(Error::IdentityNotFound)
    }

    async fn bind_service_account(&self, ldap: &mut Ldap) -> Result<(), Error> {
        match simple_bind(ldap, &self.bind_dn, &self.bind_dn_password, self.operation_timeout).await
        {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("service account bind was rejected");
                Err(Error::Authentication)
            }
            Err(LdapError::BindError) => Err(Error::Authentication),
            Err(e) => {
                warn!(%e, "service account bind failed");
                Err(Error::Connection)
            }
        }
    }

    fn requested_attributes(&self) -> Vec<&str> {
        vec![
            self.account_attribute.as_str(),
            self.principal_attribute.as_str(),
            DISPLAY_NAME_ATTRIBUTE,
            MAIL_ATTRIBUTE,
        ]
    }

    fn to_identity(&self, entry: SearchEntry) -> DirectoryIdentity {
        DirectoryIdentity {
            account_name: single_value(&entry, &self.account_attribute),
            principal_name: single_value(&entry, &self.principal_attribute),
            display_name: single_value(&entry, DISPLAY_NAME_ATTRIBUTE),
            email: single_value(&entry, MAIL_ATTRIBUTE),
            distinguished_name: entry.dn,
        }
    }
}

fn single_value(entry: &SearchEntry, attribute: &str) -> Option<String> {
    entry
        .attrs
        .get(attribute)
        .and_then(|values| values.first())
        .cloned()
}

pub(crate) async fn simple_bind(
    ldap: &mut Ldap,
    bind_dn: &str,
    password: &str,
    timeout: Duration,
) -> Result<bool, LdapError> {
    debug!("binding as '{}'", bind_dn);
    let result = ldap
        .with_timeout(timeout)
        .simple_bind(bind_dn, password)
        .await
        .map_err(LdapError::BindErrorWithContext)?;
    match result.rc {
        RESULT_SUCCESS => Ok(true),
        RESULT_INVALID_CREDENTIALS => {
            debug!("wrong username or password");
            Ok(false)
        }
        v => {
            warn!(
                "unexpected LDAP result code while binding: {}. {}",
                v, result.text
            );
            Err(LdapError::BindError)
        }
    }
}

pub(crate) async fn close(mut ldap: Ldap) {
    if let Err(e) = ldap.unbind().await {
        debug!(%e, "unbind failed");
    }
}
