use std::collections::BTreeMap;
use std::fmt;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BidGuardError;

/// Subset of the OpenRTB 2.x bid request consumed by the privacy engine and
/// the bidder-request post-processors.
///
/// Anything the core does not inspect is preserved in the flattened `extra`
/// maps so a request survives a parse/serialize cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidRequest {
    /// Unique ID of the bid request, provided by the exchange.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub imp: Vec<Imp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Site>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dooh: Option<Dooh>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regs: Option<Regs>,
    /// Currencies allowed for bids on this request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cur: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<RequestExt>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl BidRequest {
    /// Parses a request body and checks the invariants the pipeline relies on:
    /// a non-empty request id and unique impression ids.
    ///
    /// # Errors
    ///
    /// Returns [`BidGuardError::InvalidRequest`] for malformed JSON, a missing
    /// id or duplicated impression ids.
    pub fn from_slice(body: &[u8]) -> Result<Self, Report<BidGuardError>> {
        let request: Self =
            serde_json::from_slice(body).change_context(BidGuardError::InvalidRequest {
                message: "Failed to parse bid request".to_string(),
            })?;

        if request.id.is_empty() {
            return Err(Report::new(BidGuardError::InvalidRequest {
                message: "Bid request has no id".to_string(),
            }));
        }
        let mut seen = std::collections::HashSet::with_capacity(request.imp.len());
        if let Some(imp) = request.imp.iter().find(|imp| !seen.insert(imp.id.as_str())) {
            return Err(Report::new(BidGuardError::InvalidRequest {
                message: format!("Duplicate imp id '{}'", imp.id),
            }));
        }

        Ok(request)
    }

    /// Prebid extension of the request, if any.
    #[must_use]
    pub fn ext_prebid(&self) -> Option<&ExtRequestPrebid> {
        self.ext.as_ref().and_then(|ext| ext.prebid.as_ref())
    }
}

/// Media types an impression can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Banner,
    Video,
    Audio,
    Native,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Banner,
        MediaType::Video,
        MediaType::Audio,
        MediaType::Native,
    ];

    /// Lowercase OpenRTB name of the media type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Banner => "banner",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Native => "native",
        }
    }

    /// Parse a media type name, ignoring ASCII case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|media_type| media_type.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Imp {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(rename = "native", skip_serializing_if = "Option::is_none")]
    pub native: Option<Native>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl Imp {
    /// Media types present on this impression, in canonical order.
    #[must_use]
    pub fn media_types(&self) -> Vec<MediaType> {
        MediaType::ALL
            .into_iter()
            .filter(|media_type| self.has_media_type(*media_type))
            .collect()
    }

    #[must_use]
    pub fn has_media_type(&self, media_type: MediaType) -> bool {
        match media_type {
            MediaType::Banner => self.banner.is_some(),
            MediaType::Video => self.video.is_some(),
            MediaType::Audio => self.audio.is_some(),
            MediaType::Native => self.native.is_some(),
        }
    }

    /// Remove the media object of the given type from the impression.
    pub fn clear_media_type(&mut self, media_type: MediaType) {
        match media_type {
            MediaType::Banner => self.banner = None,
            MediaType::Video => self.video = None,
            MediaType::Audio => self.audio = None,
            MediaType::Native => self.native = None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<i64>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Format {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audio {
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Native {
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct App {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

/// Digital out-of-home placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dooh {
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// ISO-3166-1 alpha-3 country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO-3166-2 region code without the country prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyeruid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yob: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Data>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<UserExt>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserExt {
    /// First-party data supplied by the publisher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<UserTime>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userdow: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userhour: Option<i64>,
}

/// Third-party data segment container on `user.data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<Vec<Segment>>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Regs {
    /// Raw GPP consent string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpp: Option<String>,
    /// Section ids the GPP string applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpp_sid: Option<Vec<i32>>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestExt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prebid: Option<ExtRequestPrebid>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

/// `ext.prebid` of the bid request.
///
/// Fields that are scoped to a bidder (adjustments, alternate codes, bidder
/// controls) are typed so they can be narrowed per bidder; the rest are
/// carried as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtRequestPrebid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidadjustmentfactors: Option<BidAdjustmentFactors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidadjustments: Option<BidAdjustments>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatebiddercodes: Option<AlternateBidderCodes>,
    /// Per-bidder controls keyed by bidder name, e.g. `{"appnexus": {"prefmtype": "video"}}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biddercontrols: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returnallbidstatus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliasgvlids: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targeting: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nosale: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passthrough: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kvps: Option<Value>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

/// Bid adjustment factors: bidder name to multiplier, plus per-media-type
/// overrides under `mediatypes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidAdjustmentFactors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mediatypes: Option<BTreeMap<String, BTreeMap<String, f64>>>,
    #[serde(default, flatten)]
    pub bidders: BTreeMap<String, f64>,
}

/// Bid adjustment rules keyed by media type, then bidder, then deal id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidAdjustments {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mediatype: BTreeMap<String, BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlternateBidderCodes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidders: Option<BTreeMap<String, Value>>,
}
