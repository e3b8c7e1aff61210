use std::collections::{BTreeMap, HashMap};

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::activity::PrivacyConfig;
use crate::error::BidGuardError;
use crate::openrtb::MediaType;
use crate::postprocess::bidder::{StaticBidderAliases, StaticBidderCatalog};
use crate::postprocess::BidderInfo;

pub const ENVIRONMENT_VARIABLE_PREFIX: &str = "BIDGUARD";
pub const ENVIRONMENT_VARIABLE_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountAuctionConfig {
    /// Preferred media type per bidder, for bidders that reject multi-format
    /// impressions.
    #[serde(default, rename = "preferredmediatypes")]
    pub preferred_media_types: HashMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct Account {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub auction: AccountAuctionConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub privacy: PrivacyConfig,
    /// Bidder catalog keyed by adapter name.
    #[serde(default)]
    #[validate(nested)]
    pub bidders: HashMap<String, BidderInfo>,
    /// Alias name to adapter name.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    #[validate(nested)]
    pub account: Account,
}

impl Settings {
    /// Parses settings from TOML, applies `BIDGUARD__` environment overrides
    /// and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`BidGuardError::Configuration`] if the TOML is malformed,
    /// does not match the settings shape, or fails validation.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<BidGuardError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_VARIABLE_PREFIX)
            .separator(ENVIRONMENT_VARIABLE_SEPARATOR);

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(BidGuardError::configuration("Failed to build configuration"))?;

        let settings: Self = config
            .try_deserialize()
            .change_context(BidGuardError::configuration("Failed to deserialize settings"))?;

        settings
            .validate()
            .change_context(BidGuardError::configuration("Settings validation failed"))?;

        for (alias, bidder) in &settings.aliases {
            if !settings.bidders.contains_key(bidder) {
                log::warn!("Alias '{alias}' points at unknown bidder '{bidder}'");
            }
        }

        Ok(settings)
    }

    #[must_use]
    pub fn bidder_catalog(&self) -> StaticBidderCatalog {
        StaticBidderCatalog::new(self.bidders.clone())
    }

    #[must_use]
    pub fn bidder_aliases(&self) -> StaticBidderAliases {
        StaticBidderAliases::new(self.aliases.clone())
    }
}

/// Deserializes a `Vec<T>` from either a sequence or a map keyed by index.
///
/// Environment overrides can only express lists as `VAR__0__FIELD`, which
/// arrives as a map. Entries are ordered by numeric key; non-numeric keys
/// sort after numeric ones, by name.
pub(crate) fn vec_from_seq_or_map<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SeqOrMap<T> {
        Seq(Vec<T>),
        Map(BTreeMap<String, T>),
    }

    Ok(match SeqOrMap::deserialize(deserializer)? {
        SeqOrMap::Seq(items) => items,
        SeqOrMap::Map(entries) => {
            let mut entries: Vec<(String, T)> = entries.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| {
                match (left.parse::<usize>(), right.parse::<usize>()) {
                    (Ok(left), Ok(right)) => left.cmp(&right),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => left.cmp(right),
                }
            });
            entries.into_iter().map(|(_, item)| item).collect()
        }
    })
}

#[cfg(test)]
mod tests {
    use crate::activity::config::{Enforcement, RuleConfig};
    use crate::postprocess::bidder::{BidderAliases, BidderCatalog, Channel};
    use crate::test_support::tests::crate_test_settings_str;

    use super::*;

    #[test]
    fn test_settings_from_canonical_toml() {
        let settings = temp_env::with_var_unset("BIDGUARD__ACCOUNT__ID", || {
            Settings::from_toml(&crate_test_settings_str()).expect("should parse")
        });

        assert_eq!(settings.account.id, "test-account");
        assert_eq!(
            settings.account.auction.preferred_media_types.get("rubicon"),
            Some(&MediaType::Video)
        );
        assert_eq!(settings.privacy.modules[0].enforcement, Enforcement::Enforce);
        let (_, sync_user) = settings
            .privacy
            .activities
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("syncUser"))
            .expect("should configure syncUser");
        assert!(matches!(
            sync_user.rules[0],
            RuleConfig::Condition { allow: false, .. }
        ));

        let catalog = settings.bidder_catalog();
        let rubicon = catalog.bidder_info("rubicon").expect("should have rubicon");
        assert_eq!(
            rubicon.accepted_currencies.as_deref(),
            Some(&["USD".to_string(), "EUR".to_string()][..])
        );
        assert!(!rubicon.multiformat_supported);
        assert_eq!(
            rubicon.supported_media_types(Channel::Site),
            &[MediaType::Banner, MediaType::Video]
        );

        assert_eq!(settings.bidder_aliases().resolve_bidder("rubiconalt"), "rubicon");
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let settings = Settings::from_toml("").expect("should parse empty settings");

        assert!(settings.bidders.is_empty());
        assert!(settings.privacy.activities.is_empty());
        assert_eq!(settings.account.auction, AccountAuctionConfig::default());
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let err = Settings::from_toml("[account\nid = 1").expect_err("should fail");
        assert!(matches!(
            err.current_context(),
            BidGuardError::Configuration { .. }
        ));
    }

    #[test]
    fn test_validation_rejects_empty_currency_list() {
        let toml_str = r#"
            [bidders.rubicon]
            accepted_currencies = []
            "#;

        let err = Settings::from_toml(toml_str).expect_err("should fail validation");
        assert!(
            format!("{err:?}").contains("Settings validation failed"),
            "Should report validation failure"
        );
    }

    #[test]
    fn test_unknown_media_type_is_rejected() {
        let toml_str = r#"
            [account.auction.preferredmediatypes]
            rubicon = "hologram"
            "#;

        assert!(
            Settings::from_toml(toml_str).is_err(),
            "Unknown media types should fail deserialization"
        );
    }

    #[test]
    fn test_override_env() {
        temp_env::with_var("BIDGUARD__ACCOUNT__ID", Some("env-account"), || {
            let settings =
                Settings::from_toml(&crate_test_settings_str()).expect("should parse");
            assert_eq!(settings.account.id, "env-account");
        });
    }

    #[test]
    fn test_env_list_as_index_map() {
        temp_env::with_vars(
            [
                ("BIDGUARD__PRIVACY__MODULES__0__CODE", Some("iab.usgeneral")),
                ("BIDGUARD__PRIVACY__MODULES__0__ENFORCEMENT", Some("warn")),
            ],
            || {
                let settings = Settings::from_toml("").expect("should parse");
                assert_eq!(settings.privacy.modules.len(), 1);
                assert_eq!(settings.privacy.modules[0].code, "iab.usgeneral");
                assert_eq!(settings.privacy.modules[0].enforcement, Enforcement::Warn);
            },
        );
    }

    #[test]
    fn test_vec_from_seq_or_map_orders_numeric_keys() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "vec_from_seq_or_map")]
            items: Vec<String>,
        }

        let from_map: Wrapper = serde_json::from_value(serde_json::json!({
            "items": {"10": "c", "2": "b", "0": "a"}
        }))
        .expect("should parse map");
        assert_eq!(from_map.items, vec!["a", "b", "c"]);

        let from_seq: Wrapper = serde_json::from_value(serde_json::json!({"items": ["x", "y"]}))
            .expect("should parse sequence");
        assert_eq!(from_seq.items, vec!["x", "y"]);
    }
}
