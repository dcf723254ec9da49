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
use crate::http;
use crate::terminate::terminator;

use std::convert::From;
use std::fmt::Display;

use tracing::error;

#[derive(Debug)]
pub enum Error {
    LoggedBeforeError,

    StdIoError(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoggedBeforeError => write!(f, "Error: See above"),
            Self::StdIoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::StdIoError(error)
    }
}

pub fn run(config: Config) -> Result<(), Error> {
    let actor_system = actix_rt::System::with_tokio_rt(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .thread_name(env!("CARGO_PKG_NAME"))
            .build()
            .map_err(|e| {
                error!("failed to start tokio runtime: {}", e);
                e
            })
            .unwrap()
    });
    actor_system.block_on(async move {
        let srv = match http::build(config) {
            Err(e) => {
                error!("startup failed: {}", e);
                return;
            }
            Ok(srv) => srv,
        };
        tokio::spawn(terminator(srv.handle()));
        if let Err(e) = srv.await {
            error!("HTTP server failed: {}", e);
        }
    });
    Ok(())
}
