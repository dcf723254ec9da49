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
use crate::util::read_file as read;

use std::fs;
use std::process::exit;

use tracing::{debug, error, warn};

const EXIT_CODE: i32 = 1;

pub fn parse_config(path: &str) -> Config {
    let raw_config = read_config(path);
    debug!(
        "complete configuration:\n{}",
        raw_config
            .iter()
            .flat_map(|s| s.chars())
            .collect::<String>()
    );
    parse_raw_config(&raw_config)
}

fn read_config(path: &str) -> Vec<String> {
    match fs::metadata(path) {
        Err(e) => {
            error!("failed to read metadata of {}: {}", path, e);
            exit(EXIT_CODE);
        }
        Ok(metadata) => {
            if metadata.file_type().is_dir() {
                traverse_directory(path)
            } else if metadata.file_type().is_file() {
                read_file(path)
            } else {
                warn!("ignoring file {}", path);
                Vec::new()
            }
        }
    }
}

fn read_file(path: &str) -> Vec<String> {
    match read(path) {
        Err(error) => {
            error!("failed to read file {}: {}", path, error);
            exit(EXIT_CODE)
        }
        Ok(content) => vec![content],
    }
}

fn traverse_directory(path: &str) -> Vec<String> {
    let content = match fs::read_dir(path) {
        Err(err) => {
            error!("failed to get directory content of {}: {}", path, err);
            exit(EXIT_CODE);
        }
        Ok(v) => v,
    };

    let mut result = Vec::new();
    for entry in content {
        let entry = match entry {
            Err(err) => {
                error!("failed to read {}: {}", path, err);
                exit(EXIT_CODE);
            }
            Ok(v) => v,
        };
        let entry_path = entry.path();
        match entry_path.to_str() {
            None => {
                warn!("ignoring non-utf8 path {}", entry_path.display());
            }
            Some(entry_path) => result.extend(read_config(entry_path)),
        }
    }
    result
}

fn parse_raw_config(raw_config: &[String]) -> Config {
    match serde_yaml::from_str(&raw_config.join("\n")) {
        Err(e) => {
            error!("could not parse config: {}", e);
            exit(EXIT_CODE);
        }
        Ok(config) => config,
    }
}
