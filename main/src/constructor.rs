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
use crate::store::file::read_local_users;
use chrono::Duration;
use kokpit_auth_business::clock;
use kokpit_auth_business::health::inject::health_check;
use kokpit_auth_business::health::HealthChecker;
use kokpit_auth_business::login;
use kokpit_auth_business::login::Authenticator;
use kokpit_auth_business::rate_limiter;
use kokpit_auth_business::store::memory;
use kokpit_auth_business::token;
use kokpit_auth_business::token::TokenValidator;
use kokpit_auth_ldap::inject as ldap;
use kokpit_auth_ldap::Connector;
use kokpit_auth_ldap::ResolutionConfig;
use kokpit_auth_web::session::SessionCookieConfig;
use std::sync::Arc;
use std::time::Duration as StdDuration;

pub struct Constructor {
    authenticator: Arc<Authenticator>,

    token_validator: Arc<TokenValidator>,

    health_checker: Arc<HealthChecker>,

    session_cookie_config: SessionCookieConfig,
}

impl Constructor {
    pub fn new(config: &Config) -> Self {
        let clock = clock::inject::clock();
        let session_validity = Duration::days(config.web.session_timeout_in_days);

        let local_users = config
            .local_users
            .as_deref()
            .map(read_local_users)
            .unwrap_or_default();
        let user_store = memory::inject::user_store(local_users);

        let directory = ldap::directory(
            Self::build_connector(config),
            ldap::DirectoryConfig {
                bind_dn: config.directory.bind_dn.clone(),
                bind_dn_password: config.directory.bind_dn_password.clone(),
                base_dn: config.directory.base_dn.clone(),
                operation_timeout: StdDuration::from_secs(
                    config.directory.operation_timeout_in_seconds,
                ),
                resolution: Self::build_resolution_config(config),
            },
        );

        let issuer = Self::build_issuer_url(config);
        let token_creator = token::inject::token_creator(
            &config.web.secret_key,
            &issuer,
            session_validity,
            clock.clone(),
        );
        let token_validator = token::inject::token_validator(&config.web.secret_key, &issuer);

        let rate_limiter = rate_limiter::inject::rate_limiter(
            config.rate_limit.events,
            Duration::seconds(config.rate_limit.period_in_seconds),
        );

        let authenticator = login::inject::authenticator(
            directory,
            user_store,
            rate_limiter,
            token_creator,
            clock,
            &config.crypto.pepper,
            config.directory.auto_provision,
        );

        let health_checker = Arc::new(HealthChecker(vec![health_check(
            "ldap",
            ldap::directory_health(
                Self::build_connector(config),
                &config.directory.bind_dn,
                &config.directory.bind_dn_password,
                StdDuration::from_secs(config.directory.operation_timeout_in_seconds),
            ),
        )]));

        Self {
            authenticator,
            token_validator,
            health_checker,
            session_cookie_config: SessionCookieConfig {
                validity: session_validity,
                secure: config.web.secure_cookies,
            },
        }
    }

    pub fn authenticator(&self) -> Arc<Authenticator> {
        self.authenticator.clone()
    }

    pub fn token_validator(&self) -> Arc<TokenValidator> {
        self.token_validator.clone()
    }

    pub fn health_checker(&self) -> Arc<HealthChecker> {
        self.health_checker.clone()
    }

    pub fn session_cookie_config(&self) -> SessionCookieConfig {
        self.session_cookie_config.clone()
    }

    fn build_connector(config: &Config) -> Connector {
        ldap::connector(
            &config.directory.urls,
            StdDuration::from_secs(config.directory.connect_timeout_in_seconds),
            config.directory.starttls,
        )
    }

    fn build_resolution_config(config: &Config) -> ResolutionConfig {
        ResolutionConfig {
            account_attribute: config.directory.account_attribute.clone(),
            principal_attribute: config.directory.principal_attribute.clone(),
            principal_suffix: config.directory.principal_suffix.clone(),
            alternate_principal_suffixes: config.directory.alternate_principal_suffixes.clone(),
        }
    }

    fn build_issuer_url(config: &Config) -> String {
        let host = &config.web.public_host;
        match &host.port {
            Some(port) => format!("https://{}:{}", host.domain, port),
            None => format!("https://{}", host.domain),
        }
    }
}
