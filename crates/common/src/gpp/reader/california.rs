use std::borrow::Cow;

use crate::gpp::model::{ConsentModel, UsCaSection};

use super::{children_affected, no_children_affected, remap_slots, Slots, UsNatReader};

/// Raw California slot feeding each national sensitive data slot.
///
/// Slots 4 and 10 have no California counterpart.
const SENSITIVE_DATA_INDICES: [Option<usize>; 12] = [
    Some(3),
    Some(3),
    Some(7),
    Some(8),
    None,
    Some(5),
    Some(6),
    Some(2),
    Some(0),
    Some(1),
    None,
    Some(4),
];

/// Reader over the California section.
///
/// California has no targeted advertising or sharing notice concepts; those
/// signals are always `None`.
pub struct UsCaliforniaReader<'a> {
    section: Option<&'a dyn UsCaSection>,
}

impl<'a> UsCaliforniaReader<'a> {
    #[must_use]
    pub fn new(model: Option<&'a dyn ConsentModel>) -> Self {
        Self {
            section: model.and_then(ConsentModel::us_ca),
        }
    }
}

impl UsNatReader for UsCaliforniaReader<'_> {
    fn is_section_present(&self) -> bool {
        self.section.is_some()
    }

    fn version(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::version)
    }

    fn gpc(&self) -> Option<bool> {
        self.section.and_then(UsCaSection::gpc)
    }

    fn gpc_segment_type(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::gpc_segment_type)
    }

    fn gpc_segment_included(&self) -> Option<bool> {
        self.section.and_then(UsCaSection::gpc_segment_included)
    }

    fn sale_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::sale_opt_out)
    }

    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::sale_opt_out_notice)
    }

    fn sharing_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::sharing_opt_out)
    }

    fn sharing_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::sharing_opt_out_notice)
    }

    fn sensitive_data_limit_use_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsCaSection::sensitive_data_limit_use_notice)
    }

    fn sensitive_data_processing(&self) -> Option<Slots<'_>> {
        self.section
            .and_then(UsCaSection::sensitive_data_processing)
            .map(|raw| Cow::Owned(remap_slots(raw, &SENSITIVE_DATA_INDICES)))
    }

    /// Any child slot at 1 or 2 marks both age groups as affected. An absent
    /// section or field is treated as affecting children.
    fn known_child_sensitive_data_consents(&self) -> Option<Slots<'_>> {
        let Some(section) = self.section else {
            return Some(children_affected());
        };
        let consents = match section.known_child_sensitive_data_consents() {
            Some(raw) if !raw.iter().any(|slot| matches!(slot, Some(1 | 2))) => {
                no_children_affected()
            }
            _ => children_affected(),
        };
        Some(consents)
    }

    fn personal_data_consents(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::personal_data_consents)
    }

    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::mspa_covered_transaction)
    }

    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::mspa_opt_out_option_mode)
    }

    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.section.and_then(UsCaSection::mspa_service_provider_mode)
    }
}
