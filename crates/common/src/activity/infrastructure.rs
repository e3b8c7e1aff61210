use std::collections::HashMap;
use std::sync::Arc;

use error_stack::{Report, ResultExt};

use crate::error::BidGuardError;
use crate::gpp::ConsentModel;

use super::config::{Enforcement, PrivacyConfig, PrivacyModuleConfig, RuleConfig};
use super::debug::{ActivityDebug, TraceLevel};
use super::rule::{ConditionRule, ConfiguredModule, PrivacyModulesRule, Rule};
use super::usnat::{UsNatModule, US_GENERAL_CODE};
use super::{Activity, ActivityInvocationPayload, Invocation, RuleResult};

struct ActivityController {
    allow_by_default: bool,
    rules: Vec<Box<dyn Rule>>,
}

/// Compiled activity configuration.
///
/// Built once from `[privacy]` settings and shared across requests; every
/// evaluation is a pure function of its inputs.
pub struct ActivityInfrastructure {
    activities: HashMap<Activity, ActivityController>,
    trace_level: Option<TraceLevel>,
}

impl ActivityInfrastructure {
    /// Compiles the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BidGuardError::Configuration`] for unknown activity names,
    /// unknown or duplicated privacy modules, and malformed rule conditions.
    pub fn from_config(config: &PrivacyConfig) -> Result<Self, Report<BidGuardError>> {
        let modules = build_modules(&config.modules)?;

        let mut activities = HashMap::with_capacity(config.activities.len());
        for (name, activity_config) in &config.activities {
            let activity: Activity = name.parse()?;
            let rules = activity_config
                .rules
                .iter()
                .map(|rule| build_rule(rule, &modules))
                .collect::<Result<Vec<_>, _>>()
                .attach(format!("while compiling rules of activity '{name}'"))?;

            let controller = ActivityController {
                allow_by_default: activity_config.default.unwrap_or(true),
                rules,
            };
            if activities.insert(activity, controller).is_some() {
                return Err(Report::new(BidGuardError::configuration(format!(
                    "Activity '{activity}' is configured more than once"
                ))));
            }
        }

        log::debug!(
            "Activity infrastructure configured for {} activities, {} privacy modules",
            activities.len(),
            modules.len()
        );
        Ok(Self {
            activities,
            trace_level: config.trace,
        })
    }

    /// A fresh trace collector at the configured level.
    #[must_use]
    pub fn new_debug(&self) -> ActivityDebug {
        ActivityDebug::new(self.trace_level)
    }

    /// Whether `activity` may proceed for `payload`, without tracing.
    #[must_use]
    pub fn is_allowed(
        &self,
        activity: Activity,
        payload: &ActivityInvocationPayload,
        consent: Option<&dyn ConsentModel>,
    ) -> bool {
        self.evaluate(activity, payload, consent, &mut ActivityDebug::new(None))
    }

    /// Whether `activity` may proceed, recording the evaluation in `debug`.
    ///
    /// The first rule that does not abstain decides. When all abstain the
    /// activity default applies. Unconfigured activities are allowed.
    pub fn evaluate(
        &self,
        activity: Activity,
        payload: &ActivityInvocationPayload,
        consent: Option<&dyn ConsentModel>,
        debug: &mut ActivityDebug,
    ) -> bool {
        debug.emit_invocation(activity, payload);

        let Some(controller) = self.activities.get(&activity) else {
            debug.emit_default_result(true);
            debug.emit_invocation_result(activity, true);
            return true;
        };
        debug.emit_default_result(controller.allow_by_default);

        let invocation = Invocation {
            activity,
            payload,
            consent,
        };
        let mut allowed = controller.allow_by_default;
        for rule in &controller.rules {
            let result = rule.proceed(&invocation);
            debug.emit_processed_rule(|| rule.describe(), rule.skipped_privacy_modules(), result);
            if result != RuleResult::Abstain {
                allowed = result == RuleResult::Allow;
                break;
            }
        }

        debug.emit_invocation_result(activity, allowed);
        allowed
    }
}

fn build_modules(
    configs: &[PrivacyModuleConfig],
) -> Result<HashMap<&'static str, ConfiguredModule>, Report<BidGuardError>> {
    let mut modules = HashMap::with_capacity(configs.len());
    for config in configs {
        if config.code != US_GENERAL_CODE {
            return Err(Report::new(BidGuardError::configuration(format!(
                "Unknown privacy module '{}'",
                config.code
            ))));
        }

        let module = match config.enforcement {
            Enforcement::Skip => ConfiguredModule::Skipped(US_GENERAL_CODE),
            Enforcement::Enforce | Enforcement::Warn => {
                ConfiguredModule::Active(Arc::new(UsNatModule::new(config)))
            }
        };
        if modules.insert(US_GENERAL_CODE, module).is_some() {
            return Err(Report::new(BidGuardError::configuration(format!(
                "Privacy module '{US_GENERAL_CODE}' is configured more than once"
            ))));
        }
    }
    Ok(modules)
}

fn build_rule(
    config: &RuleConfig,
    modules: &HashMap<&'static str, ConfiguredModule>,
) -> Result<Box<dyn Rule>, Report<BidGuardError>> {
    match config {
        RuleConfig::Condition { condition, allow } => {
            Ok(Box::new(ConditionRule::new(condition.clone(), *allow)?))
        }
        RuleConfig::PrivacyModules { privacyreg } => {
            let mut selected = Vec::with_capacity(privacyreg.len());
            for code in privacyreg {
                if code != US_GENERAL_CODE {
                    return Err(Report::new(BidGuardError::configuration(format!(
                        "Unknown privacy module '{code}'"
                    ))));
                }
                // Named but not configured: the module stays out of the rule.
                if let Some(module) = modules.get(US_GENERAL_CODE) {
                    selected.push(module.clone());
                }
            }
            Ok(Box::new(PrivacyModulesRule::new(selected)))
        }
    }
}
