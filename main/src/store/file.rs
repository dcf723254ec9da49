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

use crate::util::iterate_directory;
use crate::util::read_file;
use kokpit_auth_business::data::user::User;
use tracing::debug;
use tracing::error;

/// Reads local fallback accounts, one YAML file per user. Malformed files
/// are skipped so a single typo cannot take the whole service down.
pub fn read_local_users(base: &str) -> Vec<User> {
    let mut result = Vec::new();
    let files = match iterate_directory(base) {
        None => return result,
        Some(v) => v,
    };
    for file in files {
        let file = match file {
            Err(e) => {
                error!(%e, "could not read store file");
                continue;
            }
            Ok(v) => v,
        };
        let path = file.path();
        if path
            .extension()
            .map_or(true, |v| v != "yml" && v != "yaml")
        {
            continue;
        }
        let raw = match read_file(&path) {
            Err(e) => {
                error!(%e, path = %path.display(), "could not read user file");
                continue;
            }
            Ok(v) => v,
        };
        match serde_yaml::from_str::<User>(&raw) {
            Err(e) => error!(%e, path = %path.display(), "malformed user file"),
            Ok(user) => {
                debug!(name = %user.name, "loaded local user");
                result.push(user);
            }
        }
    }
    result
}

#[cfg(test)]
mod test {
    use kokpit_auth_business::data::user::Role;
    use kokpit_auth_business::data::user::User;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn user_file_is_parsed() {
        let raw = r#"
name: reporting.admin
display name: Reporting Admin
email: reporting.admin@loomis.com
role: admin
password: !pbkdf2
  credential: YWJj
  iterations: 100000
  salt: ZGVm
groups:
  - cash-ops
favourite reports:
  - weekly-cash-flow
"#;

        let actual: User = serde_yaml::from_str(raw).unwrap();

        assert_eq!("reporting.admin", actual.name);
        assert_eq!(Role::Admin, actual.role);
        assert!(actual.active);
        assert!(actual.password.is_some());
        assert!(actual.groups.contains("cash-ops"));
        assert!(actual.favourite_reports.contains("weekly-cash-flow"));
    }
}
