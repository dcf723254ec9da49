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

use crate::endpoints::unauthorized;
use crate::session::SESSION_COOKIE;
use actix_web::web::Data;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use kokpit_auth_business::data::user::Role;
use kokpit_auth_business::token::TokenValidator;
use serde_derive::Serialize;
use tracing::debug;
use tracing::instrument;

#[derive(Serialize)]
pub struct Response {
    pub name: String,

    pub role: Role,

    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

#[instrument(skip_all, name = "userinfo")]
pub async fn get(request: HttpRequest, validator: Data<TokenValidator>) -> HttpResponse {
    let token = match request.cookie(SESSION_COOKIE) {
        None => {
            debug!("no session cookie");
            return unauthorized();
        }
        Some(cookie) => cookie.value().to_owned(),
    };

    match validator.validate(&token) {
        None => unauthorized(),
        Some(claims) => HttpResponse::Ok().json(Response {
            name: claims.name,
            role: claims.role,
            expires_at: claims.expiration,
        }),
    }
}
