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

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::random;
use ring::digest;
use ring::pbkdf2;
use serde::Deserialize;
use serde::Serialize;
use std::num::NonZeroU32;
use tracing::warn;

const HASH_ITERATIONS: u32 = 100_000;

/// Stored credential of a local fallback account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Password {
    #[serde(rename = "pbkdf2")]
    Pbkdf2HmacSha256 {
        credential: String,

        iterations: NonZeroU32,

        salt: String,
    },

    #[serde(rename = "plain")]
    Plain(String),
}

impl Password {
    pub fn new(password: &str, pepper: &str) -> Self {
        let salt: [u8; 16] = random();
        let mut salt_and_pepper = salt.to_vec();
        salt_and_pepper.extend(pepper.as_bytes());
        let mut credential = [0u8; digest::SHA256_OUTPUT_LEN];
        let iterations = NonZeroU32::new(HASH_ITERATIONS).expect("nonzero constant");
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            &salt_and_pepper,
            password.as_bytes(),
            &mut credential,
        );
        Self::Pbkdf2HmacSha256 {
            credential: STANDARD.encode(credential),
            iterations,
            salt: STANDARD.encode(salt),
        }
    }

    pub fn verify(&self, password_to_check: &str, pepper: &str) -> bool {
        match self {
            Self::Pbkdf2HmacSha256 {
                credential,
                iterations,
                salt,
            } => {
                let credential = match STANDARD.decode(credential) {
                    Err(e) => {
                        warn!(%e, "stored credential is no valid base64");
                        return false;
                    }
                    Ok(v) => v,
                };
                let mut salt_and_pepper = match STANDARD.decode(salt) {
                    Err(e) => {
                        warn!(%e, "stored salt is no valid base64");
                        return false;
                    }
                    Ok(v) => v,
                };
                salt_and_pepper.extend(pepper.as_bytes());
                pbkdf2::verify(
                    pbkdf2::PBKDF2_HMAC_SHA256,
                    *iterations,
                    &salt_and_pepper,
                    password_to_check.as_bytes(),
                    &credential,
                )
                .is_ok()
            }
            Self::Plain(password) => password == password_to_check,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn correct_password_is_accepted() {
        let uut = Password::new("secret", "pepper");

        assert!(uut.verify("secret", "pepper"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let uut = Password::new("secret", "pepper");

        assert!(!uut.verify("Secret", "pepper"));
    }

    #[test]
    fn wrong_pepper_is_rejected() {
        let uut = Password::new("secret", "pepper");

        assert!(!uut.verify("secret", "paprika"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = Password::new("secret", "pepper");
        let second = Password::new("secret", "pepper");

        assert!(first != second);
    }

    #[test]
    fn plain_password_compares_literally() {
        let uut = Password::Plain("secret".to_owned());

        assert_eq!(true, uut.verify("secret", ""));
        assert_eq!(false, uut.verify("wrong", ""));
    }
}
