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
use crate::store::{close, simple_bind};
use async_trait::async_trait;
use kokpit_auth_business::health::HealthCheckCommand;
use std::time::Duration;
use tracing::warn;

pub struct LdapHealth {
    pub(crate) connector: Connector,
    pub(crate) bind_dn: String,
    pub(crate) bind_dn_password: String,
    pub(crate) operation_timeout: Duration,
}

#[async_trait]
impl HealthCheckCommand for LdapHealth {
    async fn check(&self) -> bool {
        match self.connector.connect().await {
            Err(e) => {
                warn!(%e, "ldap health check failed");
                false
            }
            Ok(mut ldap) => {
                let result = simple_bind(
                    &mut ldap,
                    &self.bind_dn,
                    &self.bind_dn_password,
                    self.operation_timeout,
                )
                .await;
                close(ldap).await;
                match result {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(%e, "ldap health check failed");
                        false
                    }
                }
            }
        }
    }
}
