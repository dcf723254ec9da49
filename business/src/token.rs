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
use crate::data::user::Role;
use crate::data::user::User;
use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Claims of a portal session. The payload carries the local user id and
/// role, never anything the directory returned.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SessionToken {
    #[serde(rename = "iss")]
    issuer: String,

    #[serde(rename = "sub")]
    pub subject: String,

    #[serde(rename = "exp")]
    pub expiration: i64,

    #[serde(rename = "iat")]
    pub issuance_time: i64,

    pub name: String,

    pub role: Role,
}

#[derive(Clone, Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(transparent)]
pub struct EncodedSessionToken(String);

impl From<EncodedSessionToken> for String {
    fn from(value: EncodedSessionToken) -> Self {
        value.0
    }
}

impl AsRef<str> for EncodedSessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
pub struct TokenCreator {
    key: EncodingKey,

    issuer: String,

    validity: Duration,

    clock: Arc<dyn Clock>,
}

impl TokenCreator {
    pub fn issue(&self, user: &User) -> Result<EncodedSessionToken, jsonwebtoken::errors::Error> {
        let now = self.clock.now();
        let token = SessionToken {
            issuer: self.issuer.clone(),
            subject: user.id.to_string(),
            expiration: (now + self.validity).timestamp(),
            issuance_time: now.timestamp(),
            name: user.name.clone(),
            role: user.role,
        };
        encode(&Header::new(Algorithm::HS256), &token, &self.key).map(EncodedSessionToken)
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }
}

pub struct TokenValidator {
    key: DecodingKey,

    validation: Validation,
}

impl TokenValidator {
    pub fn validate(&self, token: &str) -> Option<SessionToken> {
        decode::<SessionToken>(token, &self.key, &self.validation)
            .map(|v| v.claims)
            .map_err(|e| {
                debug!(%e, "token rejected");
                e
            })
            .ok()
    }
}

pub mod inject {
    use super::*;

    pub fn token_creator(
        secret: &str,
        issuer: &str,
        validity: Duration,
        clock: Arc<dyn Clock>,
    ) -> TokenCreator {
        TokenCreator {
            key: EncodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_owned(),
            validity,
            clock,
        }
    }

    pub fn token_validator(secret: &str, issuer: &str) -> Arc<TokenValidator> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        validation.set_issuer(&[issuer]);
        Arc::new(TokenValidator {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::identity::DirectoryIdentity;
    use chrono::DateTime;
    use chrono::Local;
    use pretty_assertions::assert_eq;
    use rstest::fixture;
    use rstest::rstest;
    use test_log::test;

    const SECRET: &str = "changeme";
    const ISSUER: &str = "https://kokpit.example.com";

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    #[rstest]
    #[test]
    fn issued_token_is_accepted(user: User) {
        let uut = creator(Local::now(), Duration::days(7));

        let token = uut.issue(&user).unwrap();
        let actual = inject::token_validator(SECRET, ISSUER).validate(token.as_ref());

        let actual = actual.unwrap();
        assert_eq!(user.id.to_string(), actual.subject);
        assert_eq!(user.name, actual.name);
        assert_eq!(user.role, actual.role);
    }

    #[rstest]
    #[test]
    fn expired_token_is_rejected(user: User) {
        let uut = creator(Local::now() - Duration::days(8), Duration::days(7));

        let token = uut.issue(&user).unwrap();
        let actual = inject::token_validator(SECRET, ISSUER).validate(token.as_ref());

        assert_eq!(None, actual);
    }

    #[rstest]
    #[test]
    fn foreign_issuer_is_rejected(user: User) {
        let uut = creator(Local::now(), Duration::days(7));

        let token = uut.issue(&user).unwrap();
        let actual =
            inject::token_validator(SECRET, "https://elsewhere.example.com").validate(token.as_ref());

        assert_eq!(None, actual);
    }

    #[rstest]
    #[test]
    fn tampered_token_is_rejected(user: User) {
        let uut = creator(Local::now(), Duration::days(7));

        let token: String = uut.issue(&user).unwrap().into();
        let actual = inject::token_validator("other secret", ISSUER).validate(&token);

        assert_eq!(None, actual);
    }

    fn creator(now: DateTime<Local>, validity: Duration) -> TokenCreator {
        inject::token_creator(SECRET, ISSUER, validity, Arc::new(FixedClock(now)))
    }

    #[fixture]
    fn user() -> User {
        User::provisioned_from(&DirectoryIdentity {
            account_name: Some("kokpituser2".to_owned()),
            principal_name: Some("kokpituser2@loomis.com".to_owned()),
            display_name: Some("Kokpit User".to_owned()),
            email: Some("kokpituser2@loomis.com".to_owned()),
            distinguished_name: "CN=Kokpit User,OU=Users,DC=loomis,DC=com".to_owned(),
        })
    }
}
