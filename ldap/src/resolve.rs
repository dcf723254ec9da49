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

use ldap3::ldap_escape;
use ldap3::ResultEntry;
use ldap3::SearchEntry;

/// Searches probe for a second entry only, one more than a unique match may
/// return.
pub(crate) const AMBIGUITY_PROBE_SIZE: i32 = 2;

const SIZE_LIMIT_EXCEEDED: u32 = 4;

/// Directory schemas are inconsistent across deployments (bare account names
/// vs. UPNs vs. UPNs under a legacy suffix), so attribute names and suffixes
/// come from configuration instead of being baked in.
#[derive(Clone)]
pub struct ResolutionConfig {
    pub account_attribute: String,
    pub principal_attribute: String,
    pub principal_suffix: String,
    pub alternate_principal_suffixes: Vec<String>,
}

/// One filter per trust level, evaluated in order: exact account-name match,
/// principal name under the primary suffix, then a broad OR across every
/// known spelling.
pub(crate) struct SearchStrategy {
    pub(crate) name: &'static str,
    filter: Filter,
}

impl SearchStrategy {
    pub(crate) fn filter(&self, identifier: &str) -> String {
        self.filter.render(identifier)
    }

    pub(crate) fn priority_order(config: &ResolutionConfig) -> Vec<SearchStrategy> {
        let mut any = vec![
            Filter::Attribute {
                attribute: config.account_attribute.clone(),
            },
            Filter::Principal {
                attribute: config.principal_attribute.clone(),
                suffix: config.principal_suffix.clone(),
            },
        ];
        any.extend(
            config
                .alternate_principal_suffixes
                .iter()
                .map(|suffix| Filter::Principal {
                    attribute: config.principal_attribute.clone(),
                    suffix: suffix.clone(),
                }),
        );

        vec![
            SearchStrategy {
                name: "account name",
                filter: Filter::Attribute {
                    attribute: config.account_attribute.clone(),
                },
            },
            SearchStrategy {
                name: "principal name",
                filter: Filter::Principal {
                    attribute: config.principal_attribute.clone(),
                    suffix: config.principal_suffix.clone(),
                },
            },
            SearchStrategy {
                name: "any known suffix",
                filter: Filter::Or(any),
            },
        ]
    }
}

enum Filter {
    Attribute { attribute: String },
    Principal { attribute: String, suffix: String },
    Or(Vec<Filter>),
}

impl Filter {
    fn render(&self, identifier: &str) -> String {
        match self {
            Self::Attribute { attribute } => {
                format!("({}={})", attribute, ldap_escape(identifier))
            }
            Self::Principal { attribute, suffix } => {
                if identifier.contains('@') {
                    format!("({}={})", attribute, ldap_escape(identifier))
                } else {
                    format!("({}={}@{})", attribute, ldap_escape(identifier), suffix)
                }
            }
            Self::Or(filters) => {
                let mut result = String::from("(|");
                for filter in filters {
                    result.push_str(&filter.render(identifier));
                }
                result.push(')');
                result
            }
        }
    }
}

/// Three-way branch of one strategy's search, spelled out so the caller
/// cannot accidentally treat an ambiguous result as a match.
pub(crate) enum ResolutionOutcome {
    NotFound,
    Unique(SearchEntry),
    Ambiguous,
}

impl ResolutionOutcome {
    pub(crate) fn from_search(mut entries: Vec<ResultEntry>, result_code: u32) -> Self {
        if is_ambiguous(entries.len(), result_code) {
            Self::Ambiguous
        } else if entries.is_empty() {
            Self::NotFound
        } else {
            Self::Unique(SearchEntry::construct(entries.remove(0)))
        }
    }
}

/// The server signalling a clipped result set counts as a second entry.
fn is_ambiguous(entry_count: usize, result_code: u32) -> bool {
    entry_count > 1 || (entry_count == 1 && result_code == SIZE_LIMIT_EXCEEDED)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::fixture;
    use rstest::rstest;
    use test_log::test;

    #[rstest]
    #[test]
    fn strategies_come_in_priority_order(config: ResolutionConfig) {
        let actual = SearchStrategy::priority_order(&config);

        assert_eq!(3, actual.len());
        assert_eq!("account name", actual[0].name);
        assert_eq!("principal name", actual[1].name);
        assert_eq!("any known suffix", actual[2].name);
    }

    #[rstest]
    #[test]
    fn account_filter_matches_exactly(config: ResolutionConfig) {
        let strategies = SearchStrategy::priority_order(&config);

        let actual = strategies[0].filter("kokpituser2");

        assert_eq!("(sAMAccountName=kokpituser2)", actual);
    }

    #[rstest]
    #[test]
    fn principal_filter_appends_primary_suffix(config: ResolutionConfig) {
        let strategies = SearchStrategy::priority_order(&config);

        let actual = strategies[1].filter("kokpituser2");

        assert_eq!("(userPrincipalName=kokpituser2@loomis.com)", actual);
    }

    #[rstest]
    #[test]
    fn principal_filter_keeps_an_existing_suffix(config: ResolutionConfig) {
        let strategies = SearchStrategy::priority_order(&config);

        let actual = strategies[1].filter("kokpituser2@loomis.com");

        assert_eq!("(userPrincipalName=kokpituser2@loomis.com)", actual);
    }

    #[rstest]
    #[test]
    fn combined_filter_spans_all_suffixes(config: ResolutionConfig) {
        let strategies = SearchStrategy::priority_order(&config);

        let actual = strategies[2].filter("kokpituser2");

        assert_eq!(
            "(|(sAMAccountName=kokpituser2)\
             (userPrincipalName=kokpituser2@loomis.com)\
             (userPrincipalName=kokpituser2@ad.loomis.net))",
            actual
        );
    }

    #[rstest]
    #[test]
    fn filter_metacharacters_are_escaped(config: ResolutionConfig) {
        let strategies = SearchStrategy::priority_order(&config);

        let actual = strategies[0].filter("kok*)(pit");

        assert_eq!("(sAMAccountName=kok\\2a\\29\\28pit)", actual);
    }

    #[rstest]
    #[case(0, 0, false)]
    #[case(1, 0, false)]
    #[case(2, 0, true)]
    #[case(2, 4, true)]
    #[case(1, 4, true)]
    #[test_log::test]
    fn ambiguity_is_detected(
        #[case] entry_count: usize,
        #[case] result_code: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(expected, is_ambiguous(entry_count, result_code));
    }

    #[fixture]
    fn config() -> ResolutionConfig {
        ResolutionConfig {
            account_attribute: "sAMAccountName".to_owned(),
            principal_attribute: "userPrincipalName".to_owned(),
            principal_suffix: "loomis.com".to_owned(),
            alternate_principal_suffixes: vec!["ad.loomis.net".to_owned()],
        }
    }
}
