//! `[privacy]` settings: activities, their rules, and privacy modules.
//!
//! ```toml
//! [privacy]
//! trace = "basic"
//!
//! [[privacy.modules]]
//! code = "iab.usgeneral"
//! enforcement = "enforce"
//! skip_sids = [8]
//!
//! [privacy.activities.syncUser]
//! default = true
//!
//! [[privacy.activities.syncUser.rules]]
//! allow = false
//! condition = { component_type = ["bidder"], component_name = ["rubicon"] }
//!
//! [[privacy.activities.syncUser.rules]]
//! privacyreg = ["iab.usgeneral"]
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::debug::TraceLevel;
use super::ComponentType;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct PrivacyConfig {
    #[serde(default, deserialize_with = "crate::settings::vec_from_seq_or_map")]
    #[validate(nested)]
    pub modules: Vec<PrivacyModuleConfig>,
    /// Keyed by activity config name, e.g. `transmitPreciseGeo`.
    #[serde(default)]
    pub activities: HashMap<String, ActivityConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActivityConfig {
    /// Result when every rule abstains; allow when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(default, deserialize_with = "crate::settings::vec_from_seq_or_map")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleConfig {
    /// Defer to the named privacy modules, in order.
    PrivacyModules { privacyreg: Vec<String> },
    Condition {
        condition: ConditionConfig,
        #[serde(default = "default_allow")]
        allow: bool,
    },
}

fn default_allow() -> bool {
    true
}

/// Conditions of a rule. Absent conditions match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionConfig {
    #[serde(default, alias = "componentType", skip_serializing_if = "Option::is_none")]
    pub component_type: Option<Vec<ComponentType>>,
    #[serde(default, alias = "componentName", skip_serializing_if = "Option::is_none")]
    pub component_name: Option<Vec<String>>,
    #[serde(default, alias = "gppSid", skip_serializing_if = "Option::is_none")]
    pub gpp_sid: Option<Vec<i32>>,
    /// `COUNTRY` or `COUNTRY.REGION` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    Skip,
    #[default]
    Enforce,
    /// Evaluate and log, but never disallow.
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct PrivacyModuleConfig {
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub enforcement: Enforcement,
    /// GPP section ids the module ignores.
    #[serde(default, alias = "skipSids")]
    pub skip_sids: Vec<i32>,
}
