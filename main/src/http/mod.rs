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

use crate::config::Config;
use crate::constructor::Constructor;
use crate::runtime::Error;
use actix_web::dev::Server;
use actix_web::http::KeepAlive;
use actix_web::web::get;
use actix_web::web::post;
use actix_web::web::to;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use kokpit_auth_web::endpoints;
use tracing::error;

pub fn build(config: Config) -> Result<Server, Error> {
    let bind = config.web.bind.clone();
    let workers = config.web.workers;
    let shutdown_timeout = config.web.shutdown_timeout;

    let constructor = Constructor::new(&config);
    let authenticator = constructor.authenticator();
    let token_validator = constructor.token_validator();
    let health_checker = constructor.health_checker();
    let cookie_config = constructor.session_cookie_config();

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(Data::from(authenticator.clone()))
            .app_data(Data::from(token_validator.clone()))
            .app_data(Data::from(health_checker.clone()))
            .app_data(Data::new(cookie_config.clone()))
            .route("/authenticate", post().to(endpoints::authenticate::post))
            .route("/logout", post().to(endpoints::logout::post))
            .route("/userinfo", get().to(endpoints::userinfo::get))
            .route("/health", get().to(endpoints::health::get))
            .default_service(to(not_found))
    })
    .keep_alive(KeepAlive::default())
    .shutdown_timeout(shutdown_timeout);

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    let server = server.bind(&bind).map_err(|e| {
        error!(%e, %bind, "failed to bind");
        Error::StdIoError(e)
    })?;
    Ok(server.run())
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().finish()
}
