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

use crate::session::removal_cookie;
use crate::session::SessionCookieConfig;
use actix_web::web::Data;
use actix_web::HttpResponse;
use tracing::instrument;

/// Sessions are stateless, forgetting the cookie is all there is to do.
#[instrument(skip_all, name = "logout")]
pub async fn post(cookie_config: Data<SessionCookieConfig>) -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(removal_cookie(&cookie_config))
        .finish()
}
