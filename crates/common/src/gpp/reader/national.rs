use std::borrow::Cow;

use crate::gpp::model::{ConsentModel, UsNatSection};

use super::{Slots, UsNatReader};

/// Reader over the US national section. Every field passes through as is.
pub struct UsNationalReader<'a> {
    section: Option<&'a dyn UsNatSection>,
}

impl<'a> UsNationalReader<'a> {
    #[must_use]
    pub fn new(model: Option<&'a dyn ConsentModel>) -> Self {
        Self {
            section: model.and_then(ConsentModel::us_nat),
        }
    }
}

impl UsNatReader for UsNationalReader<'_> {
    fn is_section_present(&self) -> bool {
        self.section.is_some()
    }

    fn version(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::version)
    }

    fn gpc(&self) -> Option<bool> {
        self.section.and_then(UsNatSection::gpc)
    }

    fn gpc_segment_type(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::gpc_segment_type)
    }

    fn gpc_segment_included(&self) -> Option<bool> {
        self.section.and_then(UsNatSection::gpc_segment_included)
    }

    fn sale_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::sale_opt_out)
    }

    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::sale_opt_out_notice)
    }

    fn sharing_notice(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::sharing_notice)
    }

    fn sharing_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::sharing_opt_out)
    }

    fn sharing_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::sharing_opt_out_notice)
    }

    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::targeted_advertising_opt_out)
    }

    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsNatSection::targeted_advertising_opt_out_notice)
    }

    fn sensitive_data_limit_use_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsNatSection::sensitive_data_limit_use_notice)
    }

    fn sensitive_data_processing(&self) -> Option<Slots<'_>> {
        self.section
            .and_then(UsNatSection::sensitive_data_processing)
            .map(Cow::Borrowed)
    }

    fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsNatSection::sensitive_data_processing_opt_out_notice)
    }

    fn known_child_sensitive_data_consents(&self) -> Option<Slots<'_>> {
        self.section
            .and_then(UsNatSection::known_child_sensitive_data_consents)
            .map(Cow::Borrowed)
    }

    fn personal_data_consents(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::personal_data_consents)
    }

    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::mspa_covered_transaction)
    }

    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::mspa_opt_out_option_mode)
    }

    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.section.and_then(UsNatSection::mspa_service_provider_mode)
    }
}
