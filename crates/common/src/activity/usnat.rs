//! The `iab.usgeneral` privacy module.
//!
//! Reads the US sections in the request's GPP scope through the normalized
//! [`UsNatReader`] signal set and disallows an activity when any in-scope
//! section opts out of it.

use serde_json::{json, Value};

use crate::gpp::model::US_SECTION_IDS;
use crate::gpp::reader::Slots;
use crate::gpp::{UsNatReader, UsSectionReader};

use super::config::{Enforcement, PrivacyModuleConfig};
use super::{Activity, Invocation, RuleResult};

pub const US_GENERAL_CODE: &str = "iab.usgeneral";

/// A privacy regulation module a rule can defer to.
pub trait PrivacyModule: Send + Sync {
    fn code(&self) -> &'static str;

    fn proceed(&self, invocation: &Invocation<'_>) -> RuleResult;

    /// Serializable description for verbose traces.
    fn describe(&self) -> Value;
}

pub struct UsNatModule {
    enforcement: Enforcement,
    skip_sids: Vec<i32>,
}

impl UsNatModule {
    #[must_use]
    pub fn new(config: &PrivacyModuleConfig) -> Self {
        Self {
            enforcement: config.enforcement,
            skip_sids: config.skip_sids.clone(),
        }
    }

    fn readers<'a>(&self, invocation: &Invocation<'a>) -> Vec<UsSectionReader<'a>> {
        let Some(consent) = invocation.consent else {
            return Vec::new();
        };
        let scope = invocation.payload.gpp_sid.as_deref().unwrap_or_default();

        scope
            .iter()
            .copied()
            .filter(|section_id| US_SECTION_IDS.contains(section_id))
            .filter(|section_id| !self.skip_sids.contains(section_id))
            .filter_map(|section_id| UsSectionReader::for_section_id(section_id, consent))
            .collect()
    }
}

impl PrivacyModule for UsNatModule {
    fn code(&self) -> &'static str {
        US_GENERAL_CODE
    }

    fn proceed(&self, invocation: &Invocation<'_>) -> RuleResult {
        if self.enforcement == Enforcement::Skip {
            return RuleResult::Abstain;
        }

        let readers = self.readers(invocation);
        if readers.is_empty() {
            log::debug!(
                "{US_GENERAL_CODE}: no US section in scope for {}",
                invocation.activity
            );
            return RuleResult::Abstain;
        }

        let mut disallowed = false;
        for reader in &readers {
            match disallows(invocation.activity, reader.as_reader()) {
                None => return RuleResult::Abstain,
                Some(true) => disallowed = true,
                Some(false) => {}
            }
        }

        match (disallowed, self.enforcement) {
            (false, _) => RuleResult::Allow,
            (true, Enforcement::Warn) => {
                log::warn!(
                    "{US_GENERAL_CODE} would disallow {} for {} '{}'",
                    invocation.activity,
                    invocation.payload.component_type.as_str(),
                    invocation.payload.component_name
                );
                RuleResult::Abstain
            }
            (true, _) => RuleResult::Disallow,
        }
    }

    fn describe(&self) -> Value {
        json!({
            "privacy_module": US_GENERAL_CODE,
            "enforcement": self.enforcement,
            "skip_sids": self.skip_sids,
        })
    }
}

/// Whether `reader` disallows `activity`; `None` when the module has no
/// opinion on the activity.
fn disallows(activity: Activity, reader: &dyn UsNatReader) -> Option<bool> {
    match activity {
        Activity::SyncUser => Some(sync_user_disallowed(reader)),
        Activity::TransmitUfpd | Activity::TransmitEids => {
            Some(sync_user_disallowed(reader) || sensitive_data_disallowed(reader))
        }
        Activity::TransmitPreciseGeo => Some(precise_geo_disallowed(reader)),
        Activity::CallBidder
        | Activity::EnrichUfpd
        | Activity::ReportAnalytics
        | Activity::TransmitTid => None,
    }
}

fn is(value: Option<i32>, expected: i32) -> bool {
    value == Some(expected)
}

fn slot(slots: Option<&Slots<'_>>, index: usize) -> Option<i32> {
    slots.and_then(|slots| slots.get(index).copied().flatten())
}

fn any_slot(
    slots: Option<&Slots<'_>>,
    indices: impl IntoIterator<Item = usize>,
    expected: &[i32],
) -> bool {
    indices
        .into_iter()
        .any(|index| slot(slots, index).is_some_and(|value| expected.contains(&value)))
}

fn child_consent_given(reader: &dyn UsNatReader) -> bool {
    let consents = reader.known_child_sensitive_data_consents();
    any_slot(consents.as_ref(), 0..2, &[1, 2])
}

fn common_disallowed(reader: &dyn UsNatReader) -> bool {
    is(reader.mspa_service_provider_mode(), 1)
        || reader.gpc() == Some(true)
        || child_consent_given(reader)
        || is(reader.personal_data_consents(), 2)
}

fn sync_user_disallowed(reader: &dyn UsNatReader) -> bool {
    common_disallowed(reader)
        || sale_disallowed(reader)
        || sharing_disallowed(reader)
        || targeted_advertising_disallowed(reader)
}

fn sale_disallowed(reader: &dyn UsNatReader) -> bool {
    let opt_out = reader.sale_opt_out();
    let notice = reader.sale_opt_out_notice();
    is(opt_out, 1) || is(notice, 2) || (is(opt_out, 2) && is(notice, 0))
}

fn sharing_disallowed(reader: &dyn UsNatReader) -> bool {
    let opt_out = reader.sharing_opt_out();
    let opt_out_notice = reader.sharing_opt_out_notice();
    let notice = reader.sharing_notice();
    is(opt_out, 1)
        || is(opt_out_notice, 2)
        || is(notice, 2)
        || (is(opt_out, 2) && (is(notice, 0) || is(opt_out_notice, 0)))
}

fn targeted_advertising_disallowed(reader: &dyn UsNatReader) -> bool {
    let opt_out = reader.targeted_advertising_opt_out();
    let notice = reader.targeted_advertising_opt_out_notice();
    is(opt_out, 1) || is(notice, 2) || (is(opt_out, 2) && is(notice, 0))
}

fn sensitive_notices(reader: &dyn UsNatReader) -> (Option<i32>, Option<i32>) {
    (
        reader.sensitive_data_processing_opt_out_notice(),
        reader.sensitive_data_limit_use_notice(),
    )
}

fn sensitive_data_disallowed(reader: &dyn UsNatReader) -> bool {
    let (opt_out_notice, limit_use_notice) = sensitive_notices(reader);
    let processing = reader.sensitive_data_processing();
    let processing = processing.as_ref();
    let slot_count = processing.map_or(0, |slots| slots.len());

    is(opt_out_notice, 2)
        || is(limit_use_notice, 2)
        || ((is(opt_out_notice, 0) || is(limit_use_notice, 0))
            && any_slot(processing, 0..slot_count, &[2]))
        || any_slot(processing, [0, 1, 2, 3, 4, 10, 11], &[1, 2])
        || any_slot(processing, 5..=9, &[1])
}

fn precise_geo_disallowed(reader: &dyn UsNatReader) -> bool {
    let (opt_out_notice, limit_use_notice) = sensitive_notices(reader);
    let processing = reader.sensitive_data_processing();
    let geo = slot(processing.as_ref(), 7);

    common_disallowed(reader)
        || is(opt_out_notice, 2)
        || is(limit_use_notice, 2)
        || ((is(opt_out_notice, 0) || is(limit_use_notice, 0)) && is(geo, 2))
        || is(geo, 1)
}
