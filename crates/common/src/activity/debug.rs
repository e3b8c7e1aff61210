//! Trace of activity gate evaluations, returned to callers that ask for it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Activity, ActivityInvocationPayload, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Basic,
    /// Adds a description of every processed rule.
    Verbose,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TraceEntry {
    Invocation {
        description: &'static str,
        activity: Activity,
        payload: ActivityInvocationPayload,
    },
    Rule {
        description: &'static str,
        #[serde(rename = "rule_configuration", skip_serializing_if = "Option::is_none")]
        rule: Option<Value>,
        result: RuleResult,
    },
    DefaultResult {
        description: &'static str,
        allow_by_default: bool,
    },
    InvocationResult {
        description: &'static str,
        activity: Activity,
        allowed: bool,
    },
}

/// Collects trace entries and skipped privacy modules for one request.
#[derive(Debug, Default)]
pub struct ActivityDebug {
    trace_level: Option<TraceLevel>,
    trace: Vec<TraceEntry>,
    skipped_privacy_modules: Vec<&'static str>,
}

impl ActivityDebug {
    #[must_use]
    pub fn new(trace_level: Option<TraceLevel>) -> Self {
        Self {
            trace_level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    #[must_use]
    pub fn skipped_privacy_modules(&self) -> &[&'static str] {
        &self.skipped_privacy_modules
    }

    pub(crate) fn emit_invocation(&mut self, activity: Activity, payload: &ActivityInvocationPayload) {
        if self.trace_level.is_some() {
            self.trace.push(TraceEntry::Invocation {
                description: "Invocation of Activity Infrastructure.",
                activity,
                payload: payload.clone(),
            });
        }
    }

    /// `describe` is only called at verbose level.
    pub(crate) fn emit_processed_rule(
        &mut self,
        describe: impl FnOnce() -> Value,
        skipped_modules: &[&'static str],
        result: RuleResult,
    ) {
        for code in skipped_modules {
            if !self.skipped_privacy_modules.contains(code) {
                self.skipped_privacy_modules.push(*code);
            }
        }

        let rule = match self.trace_level {
            None => return,
            Some(TraceLevel::Basic) => None,
            Some(TraceLevel::Verbose) => Some(describe()),
        };
        self.trace.push(TraceEntry::Rule {
            description: "Processing rule.",
            rule,
            result,
        });
    }

    pub(crate) fn emit_default_result(&mut self, allow_by_default: bool) {
        if self.trace_level.is_some() {
            self.trace.push(TraceEntry::DefaultResult {
                description: "Setting the default invocation result.",
                allow_by_default,
            });
        }
    }

    pub(crate) fn emit_invocation_result(&mut self, activity: Activity, allowed: bool) {
        if !allowed {
            log::debug!("Activity {activity} disallowed");
        }
        if self.trace_level.is_some() {
            self.trace.push(TraceEntry::InvocationResult {
                description: "Activity Infrastructure invocation result.",
                activity,
                allowed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::activity::ComponentType;

    use super::*;

    fn payload() -> ActivityInvocationPayload {
        ActivityInvocationPayload::new(ComponentType::Bidder, "rubicon")
    }

    #[test]
    fn test_without_trace_level_records_nothing_but_skipped_modules() {
        let mut debug = ActivityDebug::new(None);

        debug.emit_invocation(Activity::CallBidder, &payload());
        debug.emit_processed_rule(|| json!("rule"), &["iab.usgeneral"], RuleResult::Abstain);
        debug.emit_default_result(true);
        debug.emit_invocation_result(Activity::CallBidder, true);

        assert!(debug.trace().is_empty());
        assert_eq!(debug.skipped_privacy_modules(), &["iab.usgeneral"]);
    }

    #[test]
    fn test_basic_level_omits_rule_description() {
        let mut debug = ActivityDebug::new(Some(TraceLevel::Basic));

        debug.emit_processed_rule(
            || panic!("description should not be built at basic level"),
            &[],
            RuleResult::Allow,
        );

        assert_eq!(
            debug.trace(),
            &[TraceEntry::Rule {
                description: "Processing rule.",
                rule: None,
                result: RuleResult::Allow,
            }]
        );
    }

    #[test]
    fn test_verbose_level_serializes_full_trace() {
        let mut debug = ActivityDebug::new(Some(TraceLevel::Verbose));

        debug.emit_invocation(Activity::CallBidder, &payload());
        debug.emit_processed_rule(
            || json!({"allow": false}),
            &[],
            RuleResult::Disallow,
        );
        debug.emit_invocation_result(Activity::CallBidder, false);

        assert_eq!(
            serde_json::to_value(debug.trace()).expect("should serialize"),
            json!([
                {
                    "description": "Invocation of Activity Infrastructure.",
                    "activity": "fetchBids",
                    "payload": {"componentType": "bidder", "componentName": "rubicon"}
                },
                {
                    "description": "Processing rule.",
                    "rule_configuration": {"allow": false},
                    "result": "DISALLOW"
                },
                {
                    "description": "Activity Infrastructure invocation result.",
                    "activity": "fetchBids",
                    "allowed": false
                }
            ])
        );
    }
}
