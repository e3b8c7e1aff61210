//! Decoded GPP consent model.
//!
//! Bit-level decoding of the GPP string is the job of an external decoder.
//! The core only sees the decoded sections through the traits below, so any
//! decoder (or a test double) can stand behind them. [`GppModel`] is a plain
//! serde container used when the decoded sections arrive as JSON or TOML.

use serde::{Deserialize, Serialize};

/// GPP section id of the US national section.
pub const US_NAT_SECTION_ID: i32 = 7;
/// GPP section id of the California section.
pub const US_CA_SECTION_ID: i32 = 8;
/// GPP section id of the Virginia section.
pub const US_VA_SECTION_ID: i32 = 9;
/// GPP section id of the Colorado section.
pub const US_CO_SECTION_ID: i32 = 10;
/// GPP section id of the Utah section.
pub const US_UT_SECTION_ID: i32 = 11;
/// GPP section id of the Connecticut section.
pub const US_CT_SECTION_ID: i32 = 12;

/// Every US section id, in detection order.
pub const US_SECTION_IDS: [i32; 6] = [
    US_NAT_SECTION_ID,
    US_CA_SECTION_ID,
    US_VA_SECTION_ID,
    US_CO_SECTION_ID,
    US_UT_SECTION_ID,
    US_CT_SECTION_ID,
];

/// Raw fields of the US national section (id 7).
pub trait UsNatSection {
    fn version(&self) -> Option<i32>;
    fn sharing_notice(&self) -> Option<i32>;
    fn sale_opt_out_notice(&self) -> Option<i32>;
    fn sharing_opt_out_notice(&self) -> Option<i32>;
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32>;
    fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32>;
    fn sensitive_data_limit_use_notice(&self) -> Option<i32>;
    fn sale_opt_out(&self) -> Option<i32>;
    fn sharing_opt_out(&self) -> Option<i32>;
    fn targeted_advertising_opt_out(&self) -> Option<i32>;
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]>;
    fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]>;
    fn personal_data_consents(&self) -> Option<i32>;
    fn mspa_covered_transaction(&self) -> Option<i32>;
    fn mspa_opt_out_option_mode(&self) -> Option<i32>;
    fn mspa_service_provider_mode(&self) -> Option<i32>;
    fn gpc_segment_type(&self) -> Option<i32>;
    fn gpc_segment_included(&self) -> Option<bool>;
    fn gpc(&self) -> Option<bool>;
}

/// Raw fields of the California section (id 8).
///
/// Sensitive data is stored in California's own category order and the
/// child consents as a two element list.
pub trait UsCaSection {
    fn version(&self) -> Option<i32>;
    fn sale_opt_out_notice(&self) -> Option<i32>;
    fn sharing_opt_out_notice(&self) -> Option<i32>;
    fn sensitive_data_limit_use_notice(&self) -> Option<i32>;
    fn sale_opt_out(&self) -> Option<i32>;
    fn sharing_opt_out(&self) -> Option<i32>;
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]>;
    fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]>;
    fn personal_data_consents(&self) -> Option<i32>;
    fn mspa_covered_transaction(&self) -> Option<i32>;
    fn mspa_opt_out_option_mode(&self) -> Option<i32>;
    fn mspa_service_provider_mode(&self) -> Option<i32>;
    fn gpc_segment_type(&self) -> Option<i32>;
    fn gpc_segment_included(&self) -> Option<bool>;
    fn gpc(&self) -> Option<bool>;
}

/// Raw fields of the Virginia section (id 9). No GPC sub-section.
pub trait UsVaSection {
    fn version(&self) -> Option<i32>;
    fn sharing_notice(&self) -> Option<i32>;
    fn sale_opt_out_notice(&self) -> Option<i32>;
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32>;
    fn sale_opt_out(&self) -> Option<i32>;
    fn targeted_advertising_opt_out(&self) -> Option<i32>;
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]>;
    /// Single combined code: 0 no children affected, 1 or 2 children affected.
    fn known_child_sensitive_data_consents(&self) -> Option<i32>;
    fn mspa_covered_transaction(&self) -> Option<i32>;
    fn mspa_opt_out_option_mode(&self) -> Option<i32>;
    fn mspa_service_provider_mode(&self) -> Option<i32>;
}

/// Raw fields of the Colorado section (id 10).
pub trait UsCoSection {
    fn version(&self) -> Option<i32>;
    fn sharing_notice(&self) -> Option<i32>;
    fn sale_opt_out_notice(&self) -> Option<i32>;
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32>;
    fn sale_opt_out(&self) -> Option<i32>;
    fn targeted_advertising_opt_out(&self) -> Option<i32>;
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]>;
    /// Single combined code: 0 no children affected, 1 or 2 children affected.
    fn known_child_sensitive_data_consents(&self) -> Option<i32>;
    fn mspa_covered_transaction(&self) -> Option<i32>;
    fn mspa_opt_out_option_mode(&self) -> Option<i32>;
    fn mspa_service_provider_mode(&self) -> Option<i32>;
    fn gpc_segment_type(&self) -> Option<i32>;
    fn gpc_segment_included(&self) -> Option<bool>;
    fn gpc(&self) -> Option<bool>;
}

/// Raw fields of the Utah section (id 11). No GPC sub-section.
pub trait UsUtSection {
    fn version(&self) -> Option<i32>;
    fn sharing_notice(&self) -> Option<i32>;
    fn sale_opt_out_notice(&self) -> Option<i32>;
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32>;
    fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32>;
    fn sale_opt_out(&self) -> Option<i32>;
    fn targeted_advertising_opt_out(&self) -> Option<i32>;
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]>;
    /// Single combined code: 0 no children affected, 1 or 2 children affected.
    fn known_child_sensitive_data_consents(&self) -> Option<i32>;
    fn mspa_covered_transaction(&self) -> Option<i32>;
    fn mspa_opt_out_option_mode(&self) -> Option<i32>;
    fn mspa_service_provider_mode(&self) -> Option<i32>;
}

/// Raw fields of the Connecticut section (id 12).
///
/// Child consents are a three element list.
pub trait UsCtSection {
    fn version(&self) -> Option<i32>;
    fn sharing_notice(&self) -> Option<i32>;
    fn sale_opt_out_notice(&self) -> Option<i32>;
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32>;
    fn sale_opt_out(&self) -> Option<i32>;
    fn targeted_advertising_opt_out(&self) -> Option<i32>;
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]>;
    fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]>;
    fn mspa_covered_transaction(&self) -> Option<i32>;
    fn mspa_opt_out_option_mode(&self) -> Option<i32>;
    fn mspa_service_provider_mode(&self) -> Option<i32>;
    fn gpc_segment_type(&self) -> Option<i32>;
    fn gpc_segment_included(&self) -> Option<bool>;
    fn gpc(&self) -> Option<bool>;
}

/// A decoded GPP string: zero or more jurisdiction sections.
///
/// A missing section is reported as `None`; callers never see a partially
/// decoded section.
pub trait ConsentModel {
    fn us_nat(&self) -> Option<&dyn UsNatSection>;
    fn us_ca(&self) -> Option<&dyn UsCaSection>;
    fn us_va(&self) -> Option<&dyn UsVaSection>;
    fn us_co(&self) -> Option<&dyn UsCoSection>;
    fn us_ut(&self) -> Option<&dyn UsUtSection>;
    fn us_ct(&self) -> Option<&dyn UsCtSection>;

    /// Ids of the US sections present in the model, ascending.
    fn section_ids(&self) -> Vec<i32> {
        US_SECTION_IDS
            .into_iter()
            .filter(|id| match *id {
                US_NAT_SECTION_ID => self.us_nat().is_some(),
                US_CA_SECTION_ID => self.us_ca().is_some(),
                US_VA_SECTION_ID => self.us_va().is_some(),
                US_CO_SECTION_ID => self.us_co().is_some(),
                US_UT_SECTION_ID => self.us_ut().is_some(),
                US_CT_SECTION_ID => self.us_ct().is_some(),
                _ => false,
            })
            .collect()
    }
}

/// Owned, serde-friendly consent model.
///
/// ```json
/// {"usca": {"saleOptOut": 1, "sensitiveDataProcessing": [0, 1, 2]}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GppModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usnat: Option<UsNatV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usca: Option<UsCaV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usva: Option<UsVaV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usco: Option<UsCoV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usut: Option<UsUtV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usct: Option<UsCtV1>,
}

impl ConsentModel for GppModel {
    fn us_nat(&self) -> Option<&dyn UsNatSection> {
        self.usnat.as_ref().map(|section| section as &dyn UsNatSection)
    }

    fn us_ca(&self) -> Option<&dyn UsCaSection> {
        self.usca.as_ref().map(|section| section as &dyn UsCaSection)
    }

    fn us_va(&self) -> Option<&dyn UsVaSection> {
        self.usva.as_ref().map(|section| section as &dyn UsVaSection)
    }

    fn us_co(&self) -> Option<&dyn UsCoSection> {
        self.usco.as_ref().map(|section| section as &dyn UsCoSection)
    }

    fn us_ut(&self) -> Option<&dyn UsUtSection> {
        self.usut.as_ref().map(|section| section as &dyn UsUtSection)
    }

    fn us_ct(&self) -> Option<&dyn UsCtSection> {
        self.usct.as_ref().map(|section| section as &dyn UsCtSection)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsNatV1 {
    pub version: Option<i32>,
    pub sharing_notice: Option<i32>,
    pub sale_opt_out_notice: Option<i32>,
    pub sharing_opt_out_notice: Option<i32>,
    pub targeted_advertising_opt_out_notice: Option<i32>,
    pub sensitive_data_processing_opt_out_notice: Option<i32>,
    pub sensitive_data_limit_use_notice: Option<i32>,
    pub sale_opt_out: Option<i32>,
    pub sharing_opt_out: Option<i32>,
    pub targeted_advertising_opt_out: Option<i32>,
    pub sensitive_data_processing: Option<Vec<Option<i32>>>,
    pub known_child_sensitive_data_consents: Option<Vec<Option<i32>>>,
    pub personal_data_consents: Option<i32>,
    pub mspa_covered_transaction: Option<i32>,
    pub mspa_opt_out_option_mode: Option<i32>,
    pub mspa_service_provider_mode: Option<i32>,
    pub gpc_segment_type: Option<i32>,
    pub gpc_segment_included: Option<bool>,
    pub gpc: Option<bool>,
}

impl UsNatSection for UsNatV1 {
    fn version(&self) -> Option<i32> {
        self.version
    }
    fn sharing_notice(&self) -> Option<i32> {
        self.sharing_notice
    }
    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.sale_opt_out_notice
    }
    fn sharing_opt_out_notice(&self) -> Option<i32> {
        self.sharing_opt_out_notice
    }
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.targeted_advertising_opt_out_notice
    }
    fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32> {
        self.sensitive_data_processing_opt_out_notice
    }
    fn sensitive_data_limit_use_notice(&self) -> Option<i32> {
        self.sensitive_data_limit_use_notice
    }
    fn sale_opt_out(&self) -> Option<i32> {
        self.sale_opt_out
    }
    fn sharing_opt_out(&self) -> Option<i32> {
        self.sharing_opt_out
    }
    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.targeted_advertising_opt_out
    }
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
        self.sensitive_data_processing.as_deref()
    }
    fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]> {
        self.known_child_sensitive_data_consents.as_deref()
    }
    fn personal_data_consents(&self) -> Option<i32> {
        self.personal_data_consents
    }
    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.mspa_covered_transaction
    }
    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.mspa_opt_out_option_mode
    }
    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.mspa_service_provider_mode
    }
    fn gpc_segment_type(&self) -> Option<i32> {
        self.gpc_segment_type
    }
    fn gpc_segment_included(&self) -> Option<bool> {
        self.gpc_segment_included
    }
    fn gpc(&self) -> Option<bool> {
        self.gpc
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsCaV1 {
    pub version: Option<i32>,
    pub sale_opt_out_notice: Option<i32>,
    pub sharing_opt_out_notice: Option<i32>,
    pub sensitive_data_limit_use_notice: Option<i32>,
    pub sale_opt_out: Option<i32>,
    pub sharing_opt_out: Option<i32>,
    pub sensitive_data_processing: Option<Vec<Option<i32>>>,
    pub known_child_sensitive_data_consents: Option<Vec<Option<i32>>>,
    pub personal_data_consents: Option<i32>,
    pub mspa_covered_transaction: Option<i32>,
    pub mspa_opt_out_option_mode: Option<i32>,
    pub mspa_service_provider_mode: Option<i32>,
    pub gpc_segment_type: Option<i32>,
    pub gpc_segment_included: Option<bool>,
    pub gpc: Option<bool>,
}

impl UsCaSection for UsCaV1 {
    fn version(&self) -> Option<i32> {
        self.version
    }
    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.sale_opt_out_notice
    }
    fn sharing_opt_out_notice(&self) -> Option<i32> {
        self.sharing_opt_out_notice
    }
    fn sensitive_data_limit_use_notice(&self) -> Option<i32> {
        self.sensitive_data_limit_use_notice
    }
    fn sale_opt_out(&self) -> Option<i32> {
        self.sale_opt_out
    }
    fn sharing_opt_out(&self) -> Option<i32> {
        self.sharing_opt_out
    }
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
        self.sensitive_data_processing.as_deref()
    }
    fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]> {
        self.known_child_sensitive_data_consents.as_deref()
    }
    fn personal_data_consents(&self) -> Option<i32> {
        self.personal_data_consents
    }
    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.mspa_covered_transaction
    }
    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.mspa_opt_out_option_mode
    }
    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.mspa_service_provider_mode
    }
    fn gpc_segment_type(&self) -> Option<i32> {
        self.gpc_segment_type
    }
    fn gpc_segment_included(&self) -> Option<bool> {
        self.gpc_segment_included
    }
    fn gpc(&self) -> Option<bool> {
        self.gpc
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsVaV1 {
    pub version: Option<i32>,
    pub sharing_notice: Option<i32>,
    pub sale_opt_out_notice: Option<i32>,
    pub targeted_advertising_opt_out_notice: Option<i32>,
    pub sale_opt_out: Option<i32>,
    pub targeted_advertising_opt_out: Option<i32>,
    pub sensitive_data_processing: Option<Vec<Option<i32>>>,
    pub known_child_sensitive_data_consents: Option<i32>,
    pub mspa_covered_transaction: Option<i32>,
    pub mspa_opt_out_option_mode: Option<i32>,
    pub mspa_service_provider_mode: Option<i32>,
}

impl UsVaSection for UsVaV1 {
    fn version(&self) -> Option<i32> {
        self.version
    }
    fn sharing_notice(&self) -> Option<i32> {
        self.sharing_notice
    }
    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.sale_opt_out_notice
    }
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.targeted_advertising_opt_out_notice
    }
    fn sale_opt_out(&self) -> Option<i32> {
        self.sale_opt_out
    }
    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.targeted_advertising_opt_out
    }
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
        self.sensitive_data_processing.as_deref()
    }
    fn known_child_sensitive_data_consents(&self) -> Option<i32> {
        self.known_child_sensitive_data_consents
    }
    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.mspa_covered_transaction
    }
    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.mspa_opt_out_option_mode
    }
    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.mspa_service_provider_mode
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsCoV1 {
    pub version: Option<i32>,
    pub sharing_notice: Option<i32>,
    pub sale_opt_out_notice: Option<i32>,
    pub targeted_advertising_opt_out_notice: Option<i32>,
    pub sale_opt_out: Option<i32>,
    pub targeted_advertising_opt_out: Option<i32>,
    pub sensitive_data_processing: Option<Vec<Option<i32>>>,
    pub known_child_sensitive_data_consents: Option<i32>,
    pub mspa_covered_transaction: Option<i32>,
    pub mspa_opt_out_option_mode: Option<i32>,
    pub mspa_service_provider_mode: Option<i32>,
    pub gpc_segment_type: Option<i32>,
    pub gpc_segment_included: Option<bool>,
    pub gpc: Option<bool>,
}

impl UsCoSection for UsCoV1 {
    fn version(&self) -> Option<i32> {
        self.version
    }
    fn sharing_notice(&self) -> Option<i32> {
        self.sharing_notice
    }
    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.sale_opt_out_notice
    }
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.targeted_advertising_opt_out_notice
    }
    fn sale_opt_out(&self) -> Option<i32> {
        self.sale_opt_out
    }
    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.targeted_advertising_opt_out
    }
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
        self.sensitive_data_processing.as_deref()
    }
    fn known_child_sensitive_data_consents(&self) -> Option<i32> {
        self.known_child_sensitive_data_consents
    }
    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.mspa_covered_transaction
    }
    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.mspa_opt_out_option_mode
    }
    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.mspa_service_provider_mode
    }
    fn gpc_segment_type(&self) -> Option<i32> {
        self.gpc_segment_type
    }
    fn gpc_segment_included(&self) -> Option<bool> {
        self.gpc_segment_included
    }
    fn gpc(&self) -> Option<bool> {
        self.gpc
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsUtV1 {
    pub version: Option<i32>,
    pub sharing_notice: Option<i32>,
    pub sale_opt_out_notice: Option<i32>,
    pub targeted_advertising_opt_out_notice: Option<i32>,
    pub sensitive_data_processing_opt_out_notice: Option<i32>,
    pub sale_opt_out: Option<i32>,
    pub targeted_advertising_opt_out: Option<i32>,
    pub sensitive_data_processing: Option<Vec<Option<i32>>>,
    pub known_child_sensitive_data_consents: Option<i32>,
    pub mspa_covered_transaction: Option<i32>,
    pub mspa_opt_out_option_mode: Option<i32>,
    pub mspa_service_provider_mode: Option<i32>,
}

impl UsUtSection for UsUtV1 {
    fn version(&self) -> Option<i32> {
        self.version
    }
    fn sharing_notice(&self) -> Option<i32> {
        self.sharing_notice
    }
    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.sale_opt_out_notice
    }
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.targeted_advertising_opt_out_notice
    }
    fn sensitive_data_processing_opt_out_notice(&self) -> Option<i32> {
        self.sensitive_data_processing_opt_out_notice
    }
    fn sale_opt_out(&self) -> Option<i32> {
        self.sale_opt_out
    }
    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.targeted_advertising_opt_out
    }
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
        self.sensitive_data_processing.as_deref()
    }
    fn known_child_sensitive_data_consents(&self) -> Option<i32> {
        self.known_child_sensitive_data_consents
    }
    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.mspa_covered_transaction
    }
    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.mspa_opt_out_option_mode
    }
    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.mspa_service_provider_mode
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsCtV1 {
    pub version: Option<i32>,
    pub sharing_notice: Option<i32>,
    pub sale_opt_out_notice: Option<i32>,
    pub targeted_advertising_opt_out_notice: Option<i32>,
    pub sale_opt_out: Option<i32>,
    pub targeted_advertising_opt_out: Option<i32>,
    pub sensitive_data_processing: Option<Vec<Option<i32>>>,
    pub known_child_sensitive_data_consents: Option<Vec<Option<i32>>>,
    pub mspa_covered_transaction: Option<i32>,
    pub mspa_opt_out_option_mode: Option<i32>,
    pub mspa_service_provider_mode: Option<i32>,
    pub gpc_segment_type: Option<i32>,
    pub gpc_segment_included: Option<bool>,
    pub gpc: Option<bool>,
}

impl UsCtSection for UsCtV1 {
    fn version(&self) -> Option<i32> {
        self.version
    }
    fn sharing_notice(&self) -> Option<i32> {
        self.sharing_notice
    }
    fn sale_opt_out_notice(&self) -> Option<i32> {
        self.sale_opt_out_notice
    }
    fn targeted_advertising_opt_out_notice(&self) -> Option<i32> {
        self.targeted_advertising_opt_out_notice
    }
    fn sale_opt_out(&self) -> Option<i32> {
        self.sale_opt_out
    }
    fn targeted_advertising_opt_out(&self) -> Option<i32> {
        self.targeted_advertising_opt_out
    }
    fn sensitive_data_processing(&self) -> Option<&[Option<i32>]> {
        self.sensitive_data_processing.as_deref()
    }
    fn known_child_sensitive_data_consents(&self) -> Option<&[Option<i32>]> {
        self.known_child_sensitive_data_consents.as_deref()
    }
    fn mspa_covered_transaction(&self) -> Option<i32> {
        self.mspa_covered_transaction
    }
    fn mspa_opt_out_option_mode(&self) -> Option<i32> {
        self.mspa_opt_out_option_mode
    }
    fn mspa_service_provider_mode(&self) -> Option<i32> {
        self.mspa_service_provider_mode
    }
    fn gpc_segment_type(&self) -> Option<i32> {
        self.gpc_segment_type
    }
    fn gpc_segment_included(&self) -> Option<bool> {
        self.gpc_segment_included
    }
    fn gpc(&self) -> Option<bool> {
        self.gpc
    }
}
