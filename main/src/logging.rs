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

use crate::config::Log;
use tracing::{debug, error, info};
use tracing_log::LogTracer;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::reload::Layer as ReloadLayer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

pub type FilterHandle = Handle<EnvFilter, Registry>;

/// Logging comes up before the config file is read, so verbosity starts from
/// the command line and the config file takes over afterwards.
pub fn initialise_from_verbosity(verbosity_level: u8) -> FilterHandle {
    let filter = match verbosity_level {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::new(filter);
    let (filter_layer, reload_handle) = ReloadLayer::new(filter_layer);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer())
        .init();
    init_log();

    reload_handle
}

pub fn reload_with_config(config: &Log, filter_handle: &FilterHandle) {
    if config.filter.is_empty() {
        return;
    }
    debug!("swapping log filter");
    let mut new_filter = match EnvFilter::try_new(config.filter.join(",")) {
        Ok(v) => v,
        Err(e) => {
            error!(%e, "invalid log filters");
            return;
        }
    };
    if let Err(e) = filter_handle.modify(|filter| {
        std::mem::swap(&mut new_filter, filter);
    }) {
        error!(%e, "failed to update log filter");
        return;
    }
    info!("log filter updated");
}

fn init_log() {
    if let Err(e) = LogTracer::init() {
        eprintln!("failed to initialise log crate bridge: {}", e);
        std::process::exit(1);
    }
}
