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

use crate::data::identity::DirectoryIdentity;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("directory unreachable")]
    Connection,
    #[error("directory bind rejected")]
    Authentication,
    #[error("no directory entry matched")]
    IdentityNotFound,
    #[error("more than one directory entry matched")]
    AmbiguousIdentity,
    #[error("directory search failed")]
    Search,
    #[error("backend error: {0}")]
    BackendErrorWithContext(#[from] Arc<dyn StdError + Send + Sync>),
}

/// Gateway to the organisation directory. One implementation per protocol,
/// the portal only ever talks LDAP.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Map a login identifier to exactly one directory entry. Zero matches
    /// across all strategies is [Error::IdentityNotFound], more than one
    /// match within a single strategy is [Error::AmbiguousIdentity].
    async fn resolve(&self, identifier: &str) -> Result<DirectoryIdentity, Error>;

    /// Bind as `distinguished_name` on a fresh connection. `Ok(false)` means
    /// the directory rejected the credential, without telling why.
    async fn verify(&self, distinguished_name: &str, password: &str) -> Result<bool, Error>;
}
