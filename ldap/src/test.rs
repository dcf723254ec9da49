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

use crate::inject::{connector, directory, DirectoryConfig};
use crate::resolve::ResolutionConfig;
use crate::store::LdapDirectory;
use kokpit_auth_business::directory::DirectoryStore;
use kokpit_auth_business::directory::Error;
use pretty_assertions::assert_eq;
use rstest::fixture;
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use test_log::test;
use testcontainers::clients::Cli;
use testcontainers::core::WaitFor;
use testcontainers::GenericImage;
use url::Url;

const USER_DN: &str = "cn=user01,ou=users,dc=example,dc=org";

#[rstest]
#[test(tokio::test)]
async fn unreachable_directory_is_reported() {
    let uut = uut(1390);

    let actual = uut.resolve("user01").await;

    assert!(matches!(actual.unwrap_err(), Error::Connection));
}

#[rstest]
#[test(tokio::test)]
async fn empty_password_is_rejected_without_binding() {
    let uut = uut(1390);

    let actual = uut.verify(USER_DN, "").await;

    assert_eq!(false, actual.unwrap());
}

#[rstest]
#[test(tokio::test)]
#[ignore = "needs a container runtime"]
async fn account_name_strategy_finds_user(image: GenericImage) {
    let cli = Cli::default();
    let container = cli.run(image);
    let uut = uut(container.get_host_port_ipv4(1389));

    let actual = uut.resolve("user01").await;

    assert_eq!(USER_DN, actual.unwrap().distinguished_name);
}

#[rstest]
#[test(tokio::test)]
#[ignore = "needs a container runtime"]
async fn unknown_user_is_not_found(image: GenericImage) {
    let cli = Cli::default();
    let container = cli.run(image);
    let uut = uut(container.get_host_port_ipv4(1389));

    let actual = uut.resolve("nobody").await;

    assert!(matches!(actual.unwrap_err(), Error::IdentityNotFound));
}

#[rstest]
#[test(tokio::test)]
#[ignore = "needs a container runtime"]
async fn successful_authentication_works(image: GenericImage) {
    let cli = Cli::default();
    let container = cli.run(image);
    let uut = uut(container.get_host_port_ipv4(1389));

    let resolved = uut.resolve("user01").await.unwrap();
    let actual = uut.verify(&resolved.distinguished_name, "bitnami1").await;

    assert_eq!(true, actual.unwrap());
}

#[rstest]
#[test(tokio::test)]
#[ignore = "needs a container runtime"]
async fn failing_authentication_works(image: GenericImage) {
    let cli = Cli::default();
    let container = cli.run(image);
    let uut = uut(container.get_host_port_ipv4(1389));

    let resolved = uut.resolve("user01").await.unwrap();
    let actual = uut.verify(&resolved.distinguished_name, "wrong").await;

    assert_eq!(false, actual.unwrap());
}

fn uut(port: u16) -> Arc<LdapDirectory> {
    let url = Url::parse(&format!("ldap://localhost:{}", port)).unwrap();
    directory(
        connector(&[url], Duration::from_millis(50), false),
        DirectoryConfig {
            bind_dn: "cn=admin,dc=example,dc=org".to_owned(),
            bind_dn_password: "adminpassword".to_owned(),
            base_dn: "dc=example,dc=org".to_owned(),
            operation_timeout: Duration::from_secs(5),
            resolution: ResolutionConfig {
                account_attribute: "uid".to_owned(),
                principal_attribute: "mail".to_owned(),
                principal_suffix: "example.org".to_owned(),
                alternate_principal_suffixes: Vec::new(),
            },
        },
    )
}

#[fixture]
fn image() -> GenericImage {
    GenericImage::new("docker.io/bitnami/openldap", "latest")
        .with_exposed_port(1389)
        .with_wait_for(WaitFor::StdErrMessage {
            message: "slapd starting".to_string(),
        })
}
