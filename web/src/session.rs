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

use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::cookie::SameSite;

pub const SESSION_COOKIE: &str = "kokpit_session";

#[derive(Clone)]
pub struct SessionCookieConfig {
    pub validity: chrono::Duration,

    /// Turned off for plain-http development setups only.
    pub secure: bool,
}

/// The token travels exclusively in an HTTP-only cookie, scripts never see it.
pub fn session_cookie(token: String, config: &SessionCookieConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(config.validity.num_seconds()))
        .finish()
}

pub fn removal_cookie(config: &SessionCookieConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::fixture;
    use rstest::rstest;
    use test_log::test;

    #[rstest]
    #[test]
    fn session_cookie_is_locked_down(config: SessionCookieConfig) {
        let actual = session_cookie("token".to_owned(), &config);

        assert_eq!(SESSION_COOKIE, actual.name());
        assert_eq!(Some("/"), actual.path());
        assert_eq!(Some(true), actual.http_only());
        assert_eq!(Some(true), actual.secure());
        assert_eq!(Some(SameSite::Lax), actual.same_site());
        assert_eq!(Some(Duration::days(7)), actual.max_age());
    }

    #[rstest]
    #[test]
    fn removal_cookie_clears_the_session(config: SessionCookieConfig) {
        let actual = removal_cookie(&config);

        assert_eq!(SESSION_COOKIE, actual.name());
        assert_eq!("", actual.value());
        assert_eq!(Some(Duration::ZERO), actual.max_age());
    }

    #[fixture]
    fn config() -> SessionCookieConfig {
        SessionCookieConfig {
            validity: chrono::Duration::days(7),
            secure: true,
        }
    }
}
