use std::borrow::Cow;

use crate::gpp::model::{ConsentModel, UsCoSection};

use super::{expand_child_consent_code, Slots, UsNatReader};

/// Reader over the Colorado section.
///
/// Sensitive data already follows the national order. Child consents are a
/// single combined code; a section without that code reports `None`.
pub struct UsColoradoReader<'a> {
    section: Option<&'a dyn UsCoSection>,
}

impl<'a> UsColoradoReader<'a> {
    #[must_use]
    pub fn new(model: Option<&'a dyn ConsentModel>) -> Self {
        Self {
            section: model.and_then(ConsentModel::us_co),
        }
    }
}

impl UsNatReader for UsColoradoReader<'_> {
    fn is_section_present(&self) -> bool {
        self.section.is_some()
    }

    fn version(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::version)
    }

    fn gpc(&self) -> Option<bool> {
        self.section.and_then(UsCoSection::gpc)
    }

    fn gpc_segment_type(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::gpc_segment_type)
    }

    fn gpc_segment_included(&self) -> Option<bool> {
        self.section.and_then(UsCoSection::gpc_segment_included)
    }

    fn sale_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::sale_opt_out)
    }

    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::sale_opt_out_notice)
    }

    fn sharing_notice(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::sharing_notice)
    }

    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::targeted_advertising_opt_out)
    }

    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.section
            .and_then(UsCoSection::targeted_advertising_opt_out_notice)
    }

    fn sensitive_data_processing(&self) -> Option<Slots<'_>> {
        self.section
            .and_then(UsCoSection::sensitive_data_processing)
            .map(Cow::Borrowed)
    }

    fn known_child_sensitive_data_consents(&self) -> Option<Slots<'_>> {
        expand_child_consent_code(
            self.section
                .and_then(UsCoSection::known_child_sensitive_data_consents),
        )
    }

    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::mspa_covered_transaction)
    }

    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::mspa_opt_out_option_mode)
    }

    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.section.and_then(UsCoSection::mspa_service_provider_mode)
    }
}

#[cfg(test)]
mod tests {
    use crate::gpp::model::{GppModel, UsCoV1};
    use crate::gpp::reader::tests::{assert_all_signals_absent, CountingModel};

    use super::*;

    fn model_with(section: UsCoV1) -> GppModel {
        GppModel {
            usco: Some(section),
            ..GppModel::default()
        }
    }

    fn child_consents(code: Option<i32>) -> Option<Vec<Option<i32>>> {
        let model = model_with(UsCoV1 {
            known_child_sensitive_data_consents: code,
            ..UsCoV1::default()
        });
        let reader = UsColoradoReader::new(Some(&model));
        reader
            .known_child_sensitive_data_consents()
            .map(Cow::into_owned)
    }

    #[test]
    fn test_absent_model_or_section_yields_none() {
        assert_all_signals_absent(&UsColoradoReader::new(None), None);
        assert_all_signals_absent(&UsColoradoReader::new(Some(&GppModel::default())), None);
    }

    #[test]
    fn test_combined_child_code_is_expanded() {
        assert_eq!(child_consents(Some(1)), Some(vec![Some(1), Some(1)]));
        assert_eq!(child_consents(Some(2)), Some(vec![Some(1), Some(1)]));
        assert_eq!(child_consents(Some(0)), Some(vec![Some(0), Some(0)]));
    }

    #[test]
    fn test_missing_child_code_is_unknown() {
        assert_eq!(child_consents(None), None);
    }

    #[test]
    fn test_sensitive_data_is_borrowed_unchanged() {
        let model = model_with(UsCoV1 {
            sensitive_data_processing: Some(vec![Some(0), Some(1), None, Some(2)]),
            ..UsCoV1::default()
        });
        let reader = UsColoradoReader::new(Some(&model));

        let sensitive = reader
            .sensitive_data_processing()
            .expect("sensitive data should be present");
        assert!(matches!(sensitive, Cow::Borrowed(_)));
        assert_eq!(&*sensitive, &[Some(0), Some(1), None, Some(2)][..]);
    }

    #[test]
    fn test_undefined_signals_never_touch_section() {
        let model = CountingModel::default();
        let reader = UsColoradoReader::new(Some(&model));

        assert_eq!(reader.sharing_opt_out(), None);
        assert_eq!(reader.sharing_opt_out_notice(), None);
        assert_eq!(reader.sensitive_data_limit_use_notice(), None);
        assert_eq!(reader.sensitive_data_processing_opt_out_notice(), None);
        assert_eq!(reader.personal_data_consents(), None);
        assert_eq!(model.section.calls(), 0, "Section should not be consulted");
    }

    #[test]
    fn test_defined_signals_delegate() {
        let model = model_with(UsCoV1 {
            sharing_notice: Some(1),
            sale_opt_out: Some(2),
            targeted_advertising_opt_out: Some(1),
            gpc: Some(true),
            mspa_opt_out_option_mode: Some(2),
            ..UsCoV1::default()
        });
        let reader = UsColoradoReader::new(Some(&model));

        assert_eq!(reader.sharing_notice(), Some(1));
        assert_eq!(reader.sale_opt_out(), Some(2));
        assert_eq!(reader.targeted_advertising_opt_out(), Some(1));
        assert_eq!(reader.gpc(), Some(true));
        assert_eq!(reader.mspa_opt_out_option_mode(), Some(2));
    }
}
