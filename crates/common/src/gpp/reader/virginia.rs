use std::borrow::Cow;

use crate::gpp::model::{ConsentModel, UsVaSection};

use super::{expand_child_consent_code, Slots, UsNatReader};

/// Reader over the Virginia section. Virginia carries no GPC sub-section.
pub struct UsVirginiaReader<'a> {
    section: Option<&'a dyn UsVaSection>,
}

impl<'a> UsVirginiaReader<'a> {
    #[must_use]
    pub fn new(model: Option<&'a dyn ConsentModel>) -> Self {
        Self {
            section: model.and_then(ConsentModel::us_va),
        }
    }
}

impl UsNatReader for UsVirginiaReader<'_> {
    fn is_section_present(&self) -> bool {
        self.section.is_some()
    }

    fn version(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::version)
    }

    fn sale_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::sale_opt_out)
    }

    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::sale_opt_out_notice)
    }

    fn sharing_notice(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::sharing_notice)
    }

    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::targeted_advertising_opt_out)
    }

    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsVaSection::targeted_advertising_opt_out_notice)
    }

    fn sensitive_data_processing(&self) -> Option<Slots<'_>> {
        self.section
            .and_then(UsVaSection::sensitive_data_processing)
            .map(Cow::Borrowed)
    }

    fn known_child_sensitive_data_consents(&self) -> Option<Slots<'_>> {
        expand_child_consent_code(
            self.section
                .and_then(UsVaSection::known_child_sensitive_data_consents),
        )
    }

    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::mspa_covered_transaction)
    }

    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::mspa_opt_out_option_mode)
    }

    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.section.and_then(UsVaSection::mspa_service_provider_mode)
    }
}
