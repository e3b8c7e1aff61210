use std::borrow::Cow;

use crate::gpp::model::{ConsentModel, UsCtSection};

use super::{children_affected, Slots, UsNatReader};

/// Reader over the Connecticut section.
pub struct UsConnecticutReader<'a> {
    section: Option<&'a dyn UsCtSection>,
}

impl<'a> UsConnecticutReader<'a> {
    #[must_use]
    pub fn new(model: Option<&'a dyn ConsentModel>) -> Self {
        Self {
            section: model.and_then(ConsentModel::us_ct),
        }
    }
}

impl UsNatReader for UsConnecticutReader<'_> {
    fn is_section_present(&self) -> bool {
        self.section.is_some()
    }

    fn version(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::version)
    }

    fn gpc(&self) -> Option<bool> {
        self.section.and_then(UsCtSection::gpc)
    }

    fn gpc_segment_type(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::gpc_segment_type)
    }

    fn gpc_segment_included(&self) -> Option<bool> {
        self.section.and_then(UsCtSection::gpc_segment_included)
    }

    fn sale_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::sale_opt_out)
    }

    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::sale_opt_out_notice)
    }

    fn sharing_notice(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::sharing_notice)
    }

    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::targeted_advertising_opt_out)
    }

    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsCtSection::targeted_advertising_opt_out_notice)
    }

    fn sensitive_data_processing(&self) -> Option<Slots<'_>> {
        self.section
            .and_then(UsCtSection::sensitive_data_processing)
            .map(Cow::Borrowed)
    }

    /// Connecticut stores `[_, under 13, 13 to 16]`. The under 13 slot is
    /// taken as is (null counts as 1); the 13 to 16 slot is 1 unless it
    /// holds a value other than 2. An absent section or field is treated as
    /// affecting children.
    fn known_child_sensitive_data_consents(&self) -> Option<Slots<'_>> {
        let Some(raw) = self
            .section
            .and_then(UsCtSection::known_child_sensitive_data_consents)
        else {
            return Some(children_affected());
        };

        let slot = |index: usize| raw.get(index).copied().flatten();
        let under_13 = slot(1).unwrap_or(1);
        let between_13_and_16 = match slot(2) {
            Some(value) if value != 2 => 0,
            _ => 1,
        };
        Some(Cow::Owned(vec![Some(under_13), Some(between_13_and_16)]))
    }

    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::mspa_covered_transaction)
    }

    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::mspa_opt_out_option_mode)
    }

    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.section.and_then(UsCtSection::mspa_service_provider_mode)
    }
}
