//! Per-jurisdiction readers over the US GPP sections.
//!
//! Every reader exposes the US national signal set through [`UsNatReader`].
//! A reader built from an absent model, or from a model without its section,
//! answers `None` for every signal without touching the section, except the
//! child consents of California and Connecticut, which default to both age
//! groups affected. Signals a
//! jurisdiction does not define are `None` as well and never reach the
//! section.

use std::borrow::Cow;

use crate::gpp::model::{
    ConsentModel, US_CA_SECTION_ID, US_CO_SECTION_ID, US_CT_SECTION_ID, US_NAT_SECTION_ID,
    US_SECTION_IDS, US_UT_SECTION_ID, US_VA_SECTION_ID,
};

mod california;
mod colorado;
mod connecticut;
mod national;
mod utah;
mod virginia;

pub use california::UsCaliforniaReader;
pub use colorado::UsColoradoReader;
pub use connecticut::UsConnecticutReader;
pub use national::UsNationalReader;
pub use utah::UsUtahReader;
pub use virginia::UsVirginiaReader;

/// Optional integer slots, as used by sensitive data and child consents.
pub type Slots<'a> = Cow<'a, [Option<i32>]>;

static CHILDREN_AFFECTED: [Option<i32>; 2] = [Some(1), Some(1)];
static NO_CHILDREN_AFFECTED: [Option<i32>; 2] = [Some(0), Some(0)];

/// Normalized view of a US section.
///
/// Signals default to `None`; each reader overrides the ones its
/// jurisdiction defines.
pub trait UsNatReader {
    /// Whether the reader's section exists in the consent model.
    fn is_section_present(&self) -> bool;

    fn version(&self) -> Option<i32>;

    fn gpc(&self) -> Option<bool> {
        None
    }

    fn gpc_segment_type(&self) -> Option<i32> {
        None
    }

    fn gpc_segment_included(&self) -> Option<bool> {
        None
    }

    fn sale_opt_out(&self) -> Option<i32>;

    fn sale_opt_out_notice(&self) -> Option<i32>;

    fn sharing_notice(&self) -> Option<i32> {
        None
    }

    fn sharing_opt_out(&self) -> Option<i32> {
        None
    }

    fn sharing_opt_out_notice(&self) -> Option<i32> {
        None
    }

    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        None
    }

    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        None
    }

    fn sensitive_data_limit_use_notice(&self) -> Option<i32> {
        None
    }

    /// Sensitive data processing slots in US national category order.
    fn sensitive_data_processing(&self) -> Option<Slots<'_>>;

    fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32> {
        None
    }

    /// `[under 13, 13 to 16]` child consents.
    fn known_child_sensitive_data_consents(&self) -> Option<Slots<'_>>;

    fn personal_data_consents(&self) -> Option<i32> {
        None
    }

    fn mspa_covered_transaction(&self) -> Option<i32>;

    fn mspa_opt_out_option_mode(&self) -> Option<i32>;

    fn mspa_service_provider_mode(&self) -> Option<i32>;
}

/// Reader for whichever US section a consent model carries.
pub enum UsSectionReader<'a> {
    National(UsNationalReader<'a>),
    California(UsCaliforniaReader<'a>),
    Virginia(UsVirginiaReader<'a>),
    Colorado(UsColoradoReader<'a>),
    Utah(UsUtahReader<'a>),
    Connecticut(UsConnecticutReader<'a>),
}

impl<'a> UsSectionReader<'a> {
    /// Reader for the first populated US section, by ascending section id.
    ///
    /// Returns `None` when the model is absent or carries no US section.
    #[must_use]
    pub fn from_model(model: Option<&'a dyn ConsentModel>) -> Option<Self> {
        let model = model?;
        US_SECTION_IDS
            .into_iter()
            .find_map(|section_id| Self::for_section_id(section_id, model))
    }

    /// Reader for a specific GPP section id, if that section is present.
    #[must_use]
    pub fn for_section_id(section_id: i32, model: &'a dyn ConsentModel) -> Option<Self> {
        let model = Some(model);
        let reader = match section_id {
            US_NAT_SECTION_ID => Self::National(UsNationalReader::new(model)),
            US_CA_SECTION_ID => Self::California(UsCaliforniaReader::new(model)),
            US_VA_SECTION_ID => Self::Virginia(UsVirginiaReader::new(model)),
            US_CO_SECTION_ID => Self::Colorado(UsColoradoReader::new(model)),
            US_UT_SECTION_ID => Self::Utah(UsUtahReader::new(model)),
            US_CT_SECTION_ID => Self::Connecticut(UsConnecticutReader::new(model)),
            _ => return None,
        };

        reader.as_reader().is_section_present().then_some(reader)
    }

    /// GPP section id this reader covers.
    #[must_use]
    pub fn section_id(&self) -> i32 {
        match self {
            Self::National(_) => US_NAT_SECTION_ID,
            Self::California(_) => US_CA_SECTION_ID,
            Self::Virginia(_) => US_VA_SECTION_ID,
            Self::Colorado(_) => US_CO_SECTION_ID,
            Self::Utah(_) => US_UT_SECTION_ID,
            Self::Connecticut(_) => US_CT_SECTION_ID,
        }
    }

    #[must_use]
    pub fn as_reader(&self) -> &dyn UsNatReader {
        match self {
            Self::National(reader) => reader,
            Self::California(reader) => reader,
            Self::Virginia(reader) => reader,
            Self::Colorado(reader) => reader,
            Self::Utah(reader) => reader,
            Self::Connecticut(reader) => reader,
        }
    }
}

/// Reorders raw sensitive data slots; `output[i] = raw[indices[i]]`.
///
/// `None` indices and indices past the end of `raw` produce `None`.
fn remap_slots(raw: &[Option<i32>], indices: &[Option<usize>]) -> Vec<Option<i32>> {
    indices
        .iter()
        .map(|index| index.and_then(|index| raw.get(index).copied().flatten()))
        .collect()
}

fn children_affected() -> Slots<'static> {
    Cow::Borrowed(&CHILDREN_AFFECTED[..])
}

fn no_children_affected() -> Slots<'static> {
    Cow::Borrowed(&NO_CHILDREN_AFFECTED[..])
}

/// Expands a single combined child consent code into both age slots.
fn expand_child_consent_code(code: Option<i32>) -> Option<Slots<'static>> {
    match code? {
        0 => Some(no_children_affected()),
        1 | 2 => Some(children_affected()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use crate::gpp::model::{
        ConsentModel, GppModel, UsCaSection, UsCoSection, UsCtSection, UsNatSection,
        UsUtSection, UsVaSection,
    };

    use super::*;

    static SLOTS: [Option<i32>; 3] = [Some(1), Some(1), Some(1)];

    /// Section double answering every field of every jurisdiction while
    /// counting how often it was asked.
    #[derive(Default)]
    pub(crate) struct CountingSection {
        calls: Cell<usize>,
    }

    impl CountingSection {
        pub(crate) fn calls(&self) -> usize {
            self.calls.get()
        }

        fn int(&self) -> Option<i32> {
            self.calls.set(self.calls.get() + 1);
            Some(1)
        }

        fn flag(&self) -> Option<bool> {
            self.calls.set(self.calls.get() + 1);
            Some(true)
        }

        fn slots(&self) -> Option<&[Option<i32>]> {
            self.calls.set(self.calls.get() + 1);
            Some(&SLOTS[..])
        }
    }

    /// Consent model returning the same counting section for every jurisdiction.
    #[derive(Default)]
    pub(crate) struct CountingModel {
        pub(crate) section: CountingSection,
    }

    impl ConsentModel for CountingModel {
        fn us_nat(&self) -> Option<&dyn UsNatSection> {
            Some(&self.section)
        }
        fn us_ca(&self) -> Option<&dyn UsCaSection> {
            Some(&self.section)
        }
        fn us_va(&self) -> Option<&dyn UsVaSection> {
            Some(&self.section)
        }
        fn us_co(&self) -> Option<&dyn UsCoSection> {
            Some(&self.section)
        }
        fn us_ut(&self) -> Option<&dyn UsUtSection> {
            Some(&self.section)
        }
        fn us_ct(&self) -> Option<&dyn UsCtSection> {
            Some(&self.section)
        }
    }

    impl UsNatSection for CountingSection {
        fn version(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_limit_use_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn personal_data_consents(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_covered_transaction(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_opt_out_option_mode(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_service_provider_mode(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_type(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_included(&self) -> Option<bool> {
            self.flag()
        }
        fn gpc(&self) -> Option<bool> {
            self.flag()
        }
    }

    impl UsCaSection for CountingSection {
        fn version(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_limit_use_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn personal_data_consents(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_covered_transaction(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_opt_out_option_mode(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_service_provider_mode(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_type(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_included(&self) -> Option<bool> {
            self.flag()
        }
        fn gpc(&self) -> Option<bool> {
            self.flag()
        }
    }

    impl UsVaSection for CountingSection {
        fn version(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn known_child_sensitive_data_consents(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_covered_transaction(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_opt_out_option_mode(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_service_provider_mode(&self) -> Option<i32> {
            self.int()
        }
    }

    impl UsCoSection for CountingSection {
        fn version(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn known_child_sensitive_data_consents(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_covered_transaction(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_opt_out_option_mode(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_service_provider_mode(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_type(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_included(&self) -> Option<bool> {
            self.flag()
        }
        fn gpc(&self) -> Option<bool> {
            self.flag()
        }
    }

    impl UsUtSection for CountingSection {
        fn version(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn known_child_sensitive_data_consents(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_covered_transaction(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_opt_out_option_mode(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_service_provider_mode(&self) -> Option<i32> {
            self.int()
        }
    }

    impl UsCtSection for CountingSection {
        fn version(&self) -> Option<i32> {
            self.int()
        }
        fn sharing_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
            self.int()
        }
        fn sale_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn targeted_advertising_opt_out(&self) -> Option<i32> {
            self.int()
        }
        fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]> {
            self.slots()
        }
        fn mspa_covered_transaction(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_opt_out_option_mode(&self) -> Option<i32> {
            self.int()
        }
        fn mspa_service_provider_mode(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_type(&self) -> Option<i32> {
            self.int()
        }
        fn gpc_segment_included(&self) -> Option<bool> {
            self.flag()
        }
        fn gpc(&self) -> Option<bool> {
            self.flag()
        }
    }

    /// Every signal is `None` except the child consents, which carry the
    /// jurisdiction's absent default.
    pub(crate) fn assert_all_signals_absent(
        reader: &dyn UsNatReader,
        child_consents_default: Option<&[Option<i32>]>,
    ) {
        assert!(!reader.is_section_present(), "Section should be absent");
        assert_eq!(reader.version(), None);
        assert_eq!(reader.gpc(), None);
        assert_eq!(reader.gpc_segment_type(), None);
        assert_eq!(reader.gpc_segment_included(), None);
        assert_eq!(reader.sale_opt_out(), None);
        assert_eq!(reader.sale_opt_out_notice(), None);
        assert_eq!(reader.sharing_notice(), None);
        assert_eq!(reader.sharing_opt_out(), None);
        assert_eq!(reader.sharing_opt_out_notice(), None);
        assert_eq!(reader.targeted_advertising_opt_out(), None);
        assert_eq!(reader.targeted_advertising_opt_out_notice(), None);
        assert_eq!(reader.sensitive_data_limit_use_notice(), None);
        assert_eq!(reader.sensitive_data_processing(), None);
        assert_eq!(reader.sensitive_data_processing_opt_out_notice(), None);
        assert_eq!(
            reader.known_child_sensitive_data_consents().as_deref(),
            child_consents_default
        );
        assert_eq!(reader.personal_data_consents(), None);
        assert_eq!(reader.mspa_covered_transaction(), None);
        assert_eq!(reader.mspa_opt_out_option_mode(), None);
        assert_eq!(reader.mspa_service_provider_mode(), None);
    }

    #[test]
    fn test_remap_slots_reads_out_of_range_as_none() {
        let raw = [Some(5), Some(6)];
        assert_eq!(
            remap_slots(&raw, &[Some(1), None, Some(7), Some(0)]),
            vec![Some(6), None, None, Some(5)]
        );
    }

    #[test]
    fn test_expand_child_consent_code() {
        assert_eq!(
            expand_child_consent_code(Some(0)).as_deref(),
            Some(&[Some(0), Some(0)][..])
        );
        assert_eq!(
            expand_child_consent_code(Some(1)).as_deref(),
            Some(&[Some(1), Some(1)][..])
        );
        assert_eq!(
            expand_child_consent_code(Some(2)).as_deref(),
            Some(&[Some(1), Some(1)][..])
        );
        assert_eq!(expand_child_consent_code(Some(3)), None);
        assert_eq!(expand_child_consent_code(None), None);
    }

    #[test]
    fn test_from_model_picks_first_section_by_id() {
        let model = GppModel {
            usct: Some(Default::default()),
            usco: Some(Default::default()),
            ..GppModel::default()
        };

        let reader = UsSectionReader::from_model(Some(&model)).expect("should select a reader");
        assert_eq!(reader.section_id(), US_CO_SECTION_ID);
        assert!(matches!(reader, UsSectionReader::Colorado(_)));
    }

    #[test]
    fn test_from_model_without_us_section_is_none() {
        assert!(UsSectionReader::from_model(None).is_none());
        assert!(UsSectionReader::from_model(Some(&GppModel::default())).is_none());
    }

    #[test]
    fn test_for_section_id_requires_present_section() {
        let model = GppModel {
            usnat: Some(Default::default()),
            ..GppModel::default()
        };

        assert!(UsSectionReader::for_section_id(US_NAT_SECTION_ID, &model).is_some());
        assert!(UsSectionReader::for_section_id(US_CA_SECTION_ID, &model).is_none());
        assert!(UsSectionReader::for_section_id(2, &model).is_none());
    }
}
