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

use clap::Arg;
use clap::Command;
use kokpit_auth_business::data::password::Password;
use serde_derive::Serialize;
use std::io::stdin;
use std::process::exit;

const FLAG_PEPPER: &str = "pepper";

#[derive(Serialize)]
struct Output {
    password: Password,
}

/// Encodes the password of a local fallback account for its user file. The
/// password is read from stdin so it stays out of the shell history.
fn main() {
    let arguments = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Encode a password for a local user file")
        .arg(
            Arg::new(FLAG_PEPPER)
                .short('p')
                .long(FLAG_PEPPER)
                .value_name("PEPPER")
                .help("The pepper configured under crypto.pepper")
                .num_args(1)
                .required(true),
        )
        .get_matches();

    let pepper: &String = arguments
        .get_one(FLAG_PEPPER)
        .expect("required by definition");

    let mut password = String::new();
    if let Err(e) = stdin().read_line(&mut password) {
        eprintln!("failed to read password: {}", e);
        exit(1);
    }
    let password = password.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        eprintln!("refusing to encode an empty password");
        exit(1);
    }

    let encoded = Output {
        password: Password::new(password, pepper),
    };
    match serde_yaml::to_string(&encoded) {
        Err(e) => {
            eprintln!("failed to render password: {}", e);
            exit(1);
        }
        Ok(v) => print!("{}", v),
    }
}
