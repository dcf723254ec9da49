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

pub mod authenticate;
pub mod health;
pub mod logout;
pub mod userinfo;

use actix_web::HttpResponse;
use kokpit_auth_business::login;
use serde_derive::Serialize;

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: &'static str,
}

/// Uniform failure bodies. Directory detail (DNs, filters, attributes) stays
/// in the logs, never in a response.
pub(crate) fn render_login_error(error: &login::Error) -> HttpResponse {
    match error {
        login::Error::RateLimited => HttpResponse::TooManyRequests().json(ErrorResponse {
            error: "too many attempts",
        }),
        login::Error::WrongCredentials => HttpResponse::Unauthorized().json(ErrorResponse {
            error: "wrong username or password",
        }),
        login::Error::UserNotFound => HttpResponse::Unauthorized().json(ErrorResponse {
            error: "user not found",
        }),
        login::Error::AmbiguousIdentity | login::Error::BackendError => {
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "authentication failed",
            })
        }
        login::Error::DirectoryUnavailable => {
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "service unavailable",
            })
        }
    }
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse {
        error: "not authenticated",
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::http::StatusCode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use test_log::test;

    #[rstest]
    #[case(login::Error::RateLimited, StatusCode::TOO_MANY_REQUESTS)]
    #[case(login::Error::WrongCredentials, StatusCode::UNAUTHORIZED)]
    #[case(login::Error::UserNotFound, StatusCode::UNAUTHORIZED)]
    #[case(login::Error::AmbiguousIdentity, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(login::Error::BackendError, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(login::Error::DirectoryUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
    #[test_log::test]
    fn login_errors_map_to_uniform_responses(
        #[case] error: login::Error,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(expected, render_login_error(&error).status());
    }
}
