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

use crate::endpoints::render_login_error;
use crate::endpoints::ErrorResponse;
use crate::session::session_cookie;
use crate::session::SessionCookieConfig;
use actix_web::web;
use actix_web::web::Data;
use actix_web::HttpResponse;
use kokpit_auth_business::data::user::Role;
use kokpit_auth_business::data::user::User;
use kokpit_auth_business::login::Authenticator;
use kokpit_auth_business::serde::deserialise_empty_as_none;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tracing::debug;
use tracing::instrument;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct Request {
    #[serde(default)]
    #[serde(deserialize_with = "deserialise_empty_as_none")]
    username: Option<String>,

    #[serde(default)]
    #[serde(deserialize_with = "deserialise_empty_as_none")]
    password: Option<String>,
}

#[derive(Serialize)]
pub struct Response {
    pub id: Uuid,

    pub name: String,

    #[serde(rename = "displayName")]
    pub display_name: Option<String>,

    pub email: Option<String>,

    pub role: Role,
}

impl From<&User> for Response {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[instrument(skip_all, name = "authenticate")]
pub async fn post(
    request: web::Json<Request>,
    authenticator: Data<Authenticator>,
    cookie_config: Data<SessionCookieConfig>,
) -> HttpResponse {
    let request = request.into_inner();
    let (username, password) = match (request.username, request.password) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            debug!("missing username or password");
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "missing username or password",
            });
        }
    };

    match authenticator.authenticate(&username, &password).await {
        Ok(session) => HttpResponse::Ok()
            .cookie(session_cookie(session.token.into(), &cookie_config))
            .json(Response::from(&session.user)),
        Err(e) => {
            debug!(%e, "authentication failed");
            render_login_error(&e)
        }
    }
}
