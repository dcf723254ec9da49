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

use crate::connect::Connector;
use crate::health::LdapHealth;
use crate::resolve::ResolutionConfig;
use crate::resolve::SearchStrategy;
use crate::store::LdapDirectory;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub struct DirectoryConfig {
    pub bind_dn: String,
    pub bind_dn_password: String,
    pub base_dn: String,
    pub operation_timeout: Duration,
    pub resolution: ResolutionConfig,
}

pub fn connector(urls: &[Url], connect_timeout: Duration, starttls: bool) -> Connector {
    Connector {
        urls: urls.to_vec(),
        connect_timeout,
        starttls,
    }
}

pub fn directory(connector: Connector, config: DirectoryConfig) -> Arc<LdapDirectory> {
    Arc::new(LdapDirectory {
        connector,
        bind_dn: config.bind_dn,
        bind_dn_password: config.bind_dn_password,
        base_dn: config.base_dn,
        operation_timeout: config.operation_timeout,
        strategies: SearchStrategy::priority_order(&config.resolution),
        account_attribute: config.resolution.account_attribute,
        principal_attribute: config.resolution.principal_attribute,
    })
}

pub fn directory_health(
    connector: Connector,
    bind_dn: &str,
    bind_dn_password: &str,
    operation_timeout: Duration,
) -> Arc<LdapHealth> {
    Arc::new(LdapHealth {
        connector,
        bind_dn: bind_dn.to_owned(),
        bind_dn_password: bind_dn_password.to_owned(),
        operation_timeout,
    })
}
