use std::borrow::Cow;

use crate::gpp::model::{ConsentModel, UsUtSection};

use super::{expand_child_consent_code, remap_slots, Slots, UsNatReader};

/// Raw Utah slot feeding each national sensitive data slot.
const SENSITIVE_DATA_INDICES: [Option<usize>; 8] = [
    Some(0),
    Some(1),
    Some(4),
    Some(2),
    Some(3),
    Some(5),
    Some(6),
    Some(7),
];

/// Reader over the Utah section. Utah carries no GPC sub-section.
pub struct UsUtahReader<'a> {
    section: Option<&'a dyn UsUtSection>,
}

impl<'a> UsUtahReader<'a> {
    #[must_use]
    pub fn new(model: Option<&'a dyn ConsentModel>) -> Self {
        Self {
            section: model.and_then(ConsentModel::us_ut),
        }
    }
}

impl UsNatReader for UsUtahReader<'_> {
    fn is_section_present(&self) -> bool {
        self.section.is_some()
    }

    fn version(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::version)
    }

    fn sale_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::sale_opt_out)
    }

    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::sale_opt_out_notice)
    }

    fn sharing_notice(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::sharing_notice)
    }

    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::targeted_advertising_opt_out)
    }

    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsUtSection::targeted_advertising_opt_out_notice)
    }

    fn sensitive_data_processing(&self) -> Option<Slots<'_>> {
        self.section
            .and_then(UsUtSection::sensitive_data_processing)
            .map(|raw| Cow::Owned(remap_slots(raw, &SENSITIVE_DATA_INDICES)))
    }

    fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsUtSection::sensitive_data_processing_opt_out_notice)
    }

    fn known_child_sensitive_data_consents(&self) -> Option<Slots<'_>> {
        expand_child_consent_code(
            self.section
                .and_then(UsUtSection::known_child_sensitive_data_consents),
        )
    }

    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::mspa_covered_transaction)
    }

    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::mspa_opt_out_option_mode)
    }

    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.section.and_then(UsUtSection::mspa_service_provider_mode)
    }
}
