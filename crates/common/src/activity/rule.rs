use std::sync::Arc;

use error_stack::Report;
use serde_json::{json, Value};

use crate::error::BidGuardError;

use super::config::ConditionConfig;
use super::usnat::PrivacyModule;
use super::{ActivityInvocationPayload, GeoScope, Invocation, RuleResult};

/// One compiled rule of an activity.
pub trait Rule: Send + Sync {
    fn proceed(&self, invocation: &Invocation<'_>) -> RuleResult;

    /// Serializable description for verbose traces.
    fn describe(&self) -> Value;

    /// Privacy modules this rule names that are configured to be skipped.
    fn skipped_privacy_modules(&self) -> &[&'static str] {
        &[]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GeoCondition {
    country: String,
    region: Option<String>,
}

impl GeoCondition {
    fn parse(value: &str) -> Result<Self, Report<BidGuardError>> {
        let (country, region) = match value.split_once('.') {
            Some((country, region)) => (country, Some(region)),
            None => (value, None),
        };
        if country.is_empty() || region.is_some_and(str::is_empty) {
            return Err(Report::new(BidGuardError::configuration(format!(
                "Malformed geo condition '{value}', expected COUNTRY or COUNTRY.REGION"
            ))));
        }

        Ok(Self {
            country: country.to_string(),
            region: region.map(str::to_string),
        })
    }

    fn matches(&self, geo: &GeoScope) -> bool {
        self.country.eq_ignore_ascii_case(&geo.country)
            && self.region.as_deref().is_none_or(|region| {
                geo.region
                    .as_deref()
                    .is_some_and(|actual| region.eq_ignore_ascii_case(actual))
            })
    }
}

/// Allows or disallows when every configured condition matches; abstains
/// otherwise.
pub struct ConditionRule {
    condition: ConditionConfig,
    geo: Option<Vec<GeoCondition>>,
    allow: bool,
}

impl ConditionRule {
    /// # Errors
    ///
    /// Returns [`BidGuardError::Configuration`] for malformed geo entries.
    pub fn new(condition: ConditionConfig, allow: bool) -> Result<Self, Report<BidGuardError>> {
        let geo = condition
            .geo
            .as_deref()
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| GeoCondition::parse(entry))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            condition,
            geo,
            allow,
        })
    }

    fn matches(&self, payload: &ActivityInvocationPayload) -> bool {
        let component_type = self
            .condition
            .component_type
            .as_ref()
            .is_none_or(|types| types.contains(&payload.component_type));
        let component_name = self
            .condition
            .component_name
            .as_ref()
            .is_none_or(|names| {
                names
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(&payload.component_name))
            });
        let gpp_sid = self.condition.gpp_sid.as_ref().is_none_or(|sids| {
            payload
                .gpp_sid
                .as_ref()
                .is_some_and(|scope| scope.iter().any(|sid| sids.contains(sid)))
        });
        let geo = self.geo.as_ref().is_none_or(|conditions| {
            payload
                .geo
                .as_ref()
                .is_some_and(|geo| conditions.iter().any(|condition| condition.matches(geo)))
        });

        component_type && component_name && gpp_sid && geo
    }
}

impl Rule for ConditionRule {
    fn proceed(&self, invocation: &Invocation<'_>) -> RuleResult {
        if self.matches(invocation.payload) {
            RuleResult::from_allow(self.allow)
        } else {
            RuleResult::Abstain
        }
    }

    fn describe(&self) -> Value {
        json!({
            "condition": self.condition,
            "allow": self.allow,
        })
    }
}

#[derive(Clone)]
pub(crate) enum ConfiguredModule {
    Active(Arc<dyn PrivacyModule>),
    Skipped(&'static str),
}

/// Defers to privacy modules in order; the first one that does not abstain
/// decides.
pub struct PrivacyModulesRule {
    modules: Vec<ConfiguredModule>,
    skipped: Vec<&'static str>,
}

impl PrivacyModulesRule {
    pub(crate) fn new(modules: Vec<ConfiguredModule>) -> Self {
        let skipped = modules
            .iter()
            .filter_map(|module| match module {
                ConfiguredModule::Skipped(code) => Some(*code),
                ConfiguredModule::Active(_) => None,
            })
            .collect();
        Self { modules, skipped }
    }
}

impl Rule for PrivacyModulesRule {
    fn proceed(&self, invocation: &Invocation<'_>) -> RuleResult {
        self.modules
            .iter()
            .filter_map(|module| match module {
                ConfiguredModule::Active(module) => Some(module.proceed(invocation)),
                ConfiguredModule::Skipped(_) => None,
            })
            .find(|result| *result != RuleResult::Abstain)
            .unwrap_or(RuleResult::Abstain)
    }

    fn describe(&self) -> Value {
        let modules: Vec<Value> = self
            .modules
            .iter()
            .map(|module| match module {
                ConfiguredModule::Active(module) => module.describe(),
                ConfiguredModule::Skipped(code) => json!({
                    "privacy_module": code,
                    "skipped": true,
                    "result": RuleResult::Abstain,
                }),
            })
            .collect();
        json!({ "privacyreg": modules })
    }

    fn skipped_privacy_modules(&self) -> &[&'static str] {
        &self.skipped
    }
}
