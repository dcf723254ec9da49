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

pub mod parser;

use chrono::Duration;
use serde_derive::Deserialize;
use url::Url;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub directory: Directory,

    pub web: Web,

    pub crypto: Crypto,

    #[serde(default)]
    #[serde(alias = "rate limit")]
    pub rate_limit: RateLimit,

    #[serde(default)]
    pub log: Log,

    #[serde(default)]
    #[serde(alias = "local users")]
    pub local_users: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Directory {
    pub urls: Vec<Url>,

    #[serde(rename = "bind dn")]
    pub bind_dn: String,

    #[serde(rename = "bind dn password")]
    pub bind_dn_password: String,

    #[serde(rename = "base dn")]
    pub base_dn: String,

    #[serde(default = "default_connect_timeout")]
    #[serde(rename = "connect timeout in seconds")]
    pub connect_timeout_in_seconds: u64,

    #[serde(default = "default_operation_timeout")]
    #[serde(rename = "operation timeout in seconds")]
    pub operation_timeout_in_seconds: u64,

    #[serde(default)]
    pub starttls: bool,

    #[serde(default = "default_account_attribute")]
    #[serde(rename = "account attribute")]
    pub account_attribute: String,

    #[serde(default = "default_principal_attribute")]
    #[serde(rename = "principal attribute")]
    pub principal_attribute: String,

    #[serde(rename = "principal suffix")]
    pub principal_suffix: String,

    #[serde(default)]
    #[serde(rename = "alternate principal suffixes")]
    pub alternate_principal_suffixes: Vec<String>,

    #[serde(default)]
    #[serde(rename = "auto provision")]
    pub auto_provision: bool,
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_operation_timeout() -> u64 {
    10
}

fn default_account_attribute() -> String {
    "sAMAccountName".to_string()
}

fn default_principal_attribute() -> String {
    "userPrincipalName".to_string()
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Web {
    pub bind: String,

    #[serde(alias = "public host")]
    pub public_host: Host,

    pub workers: Option<usize>,

    #[serde(default = "default_shutdown_timeout")]
    #[serde(rename = "shutdown timeout in seconds")]
    pub shutdown_timeout: u64,

    #[serde(default = "default_session_timeout")]
    #[serde(alias = "session timeout in days")]
    pub session_timeout_in_days: i64,

    #[serde(default = "default_secure_cookies")]
    #[serde(alias = "secure cookies")]
    pub secure_cookies: bool,

    #[serde(alias = "secret key")]
    pub secret_key: String,
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_session_timeout() -> i64 {
    Duration::days(7).num_days()
}

fn default_secure_cookies() -> bool {
    true
}

#[derive(Default, Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Host {
    pub domain: String,

    pub port: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Crypto {
    pub pepper: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RateLimit {
    pub events: usize,

    #[serde(alias = "period in seconds")]
    pub period_in_seconds: i64,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            events: 3,
            period_in_seconds: Duration::minutes(5).num_seconds(),
        }
    }
}

#[derive(Default, Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    #[serde(default)]
    pub filter: Vec<String>,
}
