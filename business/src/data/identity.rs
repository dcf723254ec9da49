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

/// A single directory entry as seen during login. Lives for the duration of
/// one authentication attempt and is dropped once the local user is resolved.
#[derive(Clone, Debug)]
pub struct DirectoryIdentity {
    pub account_name: Option<String>,

    pub principal_name: Option<String>,

    pub display_name: Option<String>,

    pub email: Option<String>,

    pub distinguished_name: String,
}

impl DirectoryIdentity {
    /// Key used to find the matching portal account: mail wins over UPN wins
    /// over the bare account name.
    pub fn local_user_key(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.principal_name.as_deref())
            .or(self.account_name.as_deref())
    }
}
