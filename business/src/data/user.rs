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
use crate::data::password::Password;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[default]
    #[serde(rename = "user")]
    User,
}

/// A portal account. Directory-backed accounts carry no password, accounts
/// predating the directory integration keep a local hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub name: String,

    #[serde(default)]
    #[serde(rename = "display name")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub role: Role,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub password: Option<Password>,

    #[serde(default)]
    pub groups: BTreeSet<String>,

    #[serde(default)]
    #[serde(rename = "favourite reports")]
    pub favourite_reports: BTreeSet<String>,
}

fn default_active() -> bool {
    true
}

impl User {
    /// First-login record for a directory identity. Provisioned accounts are
    /// plain active users, promotion to admin happens in the portal itself.
    pub fn provisioned_from(identity: &DirectoryIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: identity
                .account_name
                .clone()
                .unwrap_or_else(|| identity.distinguished_name.clone()),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            role: Role::User,
            active: true,
            password: None,
            groups: BTreeSet::default(),
            favourite_reports: BTreeSet::default(),
        }
    }
}
