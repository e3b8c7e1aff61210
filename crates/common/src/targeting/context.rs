//! Read-only projection of a bid request and one of its impressions onto
//! targeting categories.

use error_stack::Report;
use serde::Serialize;
use serde_json::Value;

use crate::error::BidGuardError;
use crate::openrtb::{BidRequest, Geo, Imp, User, UserTime};
use crate::targeting::category::{TargetingCategory, TargetingCategoryType};

const EXT_PREBID_BIDDER: &str = "prebid.bidder";
const EXT_CONTEXT_DATA: &str = "context.data";
const BIDDER_CONFIG_SITE_DATA: &str = "config.ortb2.site.ext.data";

/// Impression ext paths holding the ad slot, highest priority first.
const ADSLOT_PATHS: [&str; 4] = [
    "context.data.pbadslot",
    "context.data.adserver.adslot",
    "data.pbadslot",
    "data.adserver.adslot",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Resolves targeting categories against one impression of a request.
///
/// Every lookup answers `Ok(None)` when the value is missing or has the wrong
/// shape, and fails with [`BidGuardError::TargetingSyntax`] when the category
/// cannot be fetched with that lookup at all.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    bid_request: &'a BidRequest,
    imp: &'a Imp,
}

impl<'a> RequestContext<'a> {
    #[must_use]
    pub fn new(bid_request: &'a BidRequest, imp: &'a Imp) -> Self {
        Self { bid_request, imp }
    }

    #[must_use]
    pub fn bid_request(&self) -> &'a BidRequest {
        self.bid_request
    }

    #[must_use]
    pub fn imp(&self) -> &'a Imp {
        self.imp
    }

    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] for categories without a
    /// single string value.
    pub fn lookup_string(
        &self,
        category: &TargetingCategory,
    ) -> Result<Option<&'a str>, Report<BidGuardError>> {
        let path = category.path().unwrap_or_default();
        let value = match category.category_type() {
            TargetingCategoryType::Domain => self.site_domain().or_else(|| self.publisher_domain()),
            TargetingCategoryType::PublisherDomain => self.publisher_domain(),
            TargetingCategoryType::Referrer => self
                .bid_request
                .site
                .as_ref()
                .and_then(|site| site.page.as_deref()),
            TargetingCategoryType::AppBundle => self
                .bid_request
                .app
                .as_ref()
                .and_then(|app| app.bundle.as_deref()),
            TargetingCategoryType::Adslot => ADSLOT_PATHS
                .iter()
                .find_map(|adslot_path| walk(self.imp_ext(), adslot_path).and_then(Value::as_str)),
            TargetingCategoryType::DeviceGeoExt => {
                walk(self.geo_ext(), path).and_then(Value::as_str)
            }
            TargetingCategoryType::DeviceExt => {
                walk(self.device_ext(), path).and_then(Value::as_str)
            }
            TargetingCategoryType::DeviceGeoCountry => {
                self.geo().and_then(|geo| geo.country.as_deref())
            }
            TargetingCategoryType::DeviceGeoRegion => {
                self.geo().and_then(|geo| geo.region.as_deref())
            }
            TargetingCategoryType::BidderParam => {
                walk(self.bidder_params(), path).and_then(Value::as_str)
            }
            TargetingCategoryType::UserFirstPartyData => self
                .user_string_attribute(path)
                .or_else(|| walk(self.user_data(), path).and_then(Value::as_str)),
            TargetingCategoryType::SiteFirstPartyData => {
                self.site_first_party_data(path, Value::as_str)
            }
            other => return Err(unexpected_category("string", other)),
        };

        Ok(value)
    }

    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] for categories without a
    /// single integer value.
    pub fn lookup_integer(
        &self,
        category: &TargetingCategory,
    ) -> Result<Option<i64>, Report<BidGuardError>> {
        let path = category.path().unwrap_or_default();
        let value = match category.category_type() {
            TargetingCategoryType::PagePosition => {
                self.imp.banner.as_ref().and_then(|banner| banner.pos)
            }
            TargetingCategoryType::Dow => self.user_time().and_then(|time| time.userdow),
            TargetingCategoryType::Hour => self.user_time().and_then(|time| time.userhour),
            TargetingCategoryType::DeviceGeoExt => {
                walk(self.geo_ext(), path).and_then(Value::as_i64)
            }
            TargetingCategoryType::BidderParam => {
                walk(self.bidder_params(), path).and_then(Value::as_i64)
            }
            TargetingCategoryType::UserFirstPartyData => self
                .user_integer_attribute(path)
                .or_else(|| walk(self.user_data(), path).and_then(Value::as_i64)),
            TargetingCategoryType::SiteFirstPartyData => {
                self.site_first_party_data(path, Value::as_i64)
            }
            other => return Err(unexpected_category("integer", other)),
        };

        Ok(value)
    }

    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] for categories without a
    /// list of strings.
    pub fn lookup_strings(
        &self,
        category: &TargetingCategory,
    ) -> Result<Option<Vec<&'a str>>, Report<BidGuardError>> {
        let path = category.path().unwrap_or_default();
        let values = match category.category_type() {
            TargetingCategoryType::MediaType => self.media_types(),
            TargetingCategoryType::BidderParam => {
                walk(self.bidder_params(), path).and_then(strings)
            }
            TargetingCategoryType::UserSegment => self.user_segments(path),
            TargetingCategoryType::UserFirstPartyData => {
                walk(self.user_data(), path).and_then(strings)
            }
            TargetingCategoryType::SiteFirstPartyData => {
                self.site_first_party_data(path, strings)
            }
            other => return Err(unexpected_category("strings", other)),
        };

        Ok(values.filter(|values| !values.is_empty()))
    }

    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] for categories without a
    /// list of integers.
    pub fn lookup_integers(
        &self,
        category: &TargetingCategory,
    ) -> Result<Option<Vec<i64>>, Report<BidGuardError>> {
        let path = category.path().unwrap_or_default();
        let values = match category.category_type() {
            TargetingCategoryType::BidderParam => {
                walk(self.bidder_params(), path).and_then(integers)
            }
            TargetingCategoryType::UserFirstPartyData => {
                walk(self.user_data(), path).and_then(integers)
            }
            TargetingCategoryType::SiteFirstPartyData => {
                self.site_first_party_data(path, integers)
            }
            other => return Err(unexpected_category("integers", other)),
        };

        Ok(values.filter(|values| !values.is_empty()))
    }

    /// Banner sizes of the impression.
    ///
    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] unless `category` is `size`.
    pub fn lookup_sizes(
        &self,
        category: &TargetingCategory,
    ) -> Result<Option<Vec<Size>>, Report<BidGuardError>> {
        if category.category_type() != TargetingCategoryType::Size {
            return Err(unexpected_category("sizes", category.category_type()));
        }

        let sizes: Vec<Size> = self
            .imp
            .banner
            .iter()
            .flat_map(|banner| &banner.format)
            .map(|format| Size {
                w: format.w,
                h: format.h,
            })
            .collect();

        Ok((!sizes.is_empty()).then_some(sizes))
    }

    /// Device coordinates; both latitude and longitude must be present.
    ///
    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] unless `category` is
    /// `location`.
    pub fn lookup_geo_location(
        &self,
        category: &TargetingCategory,
    ) -> Result<Option<GeoLocation>, Report<BidGuardError>> {
        if category.category_type() != TargetingCategoryType::Location {
            return Err(unexpected_category("geo location", category.category_type()));
        }

        Ok(self
            .geo()
            .and_then(|geo| Some(GeoLocation {
                lat: geo.lat?,
                lon: geo.lon?,
            })))
    }

    fn site_domain(&self) -> Option<&'a str> {
        self.bid_request
            .site
            .as_ref()
            .and_then(|site| site.domain.as_deref())
    }

    fn publisher_domain(&self) -> Option<&'a str> {
        self.bid_request
            .site
            .as_ref()
            .and_then(|site| site.publisher.as_ref())
            .and_then(|publisher| publisher.domain.as_deref())
    }

    fn imp_ext(&self) -> Option<&'a Value> {
        self.imp.ext.as_ref()
    }

    fn bidder_params(&self) -> Option<&'a Value> {
        walk(self.imp_ext(), EXT_PREBID_BIDDER)
    }

    fn geo(&self) -> Option<&'a Geo> {
        self.bid_request
            .device
            .as_ref()
            .and_then(|device| device.geo.as_ref())
    }

    fn geo_ext(&self) -> Option<&'a Value> {
        self.geo().and_then(|geo| geo.ext.as_ref())
    }

    fn device_ext(&self) -> Option<&'a Value> {
        self.bid_request
            .device
            .as_ref()
            .and_then(|device| device.ext.as_ref())
    }

    fn user(&self) -> Option<&'a User> {
        self.bid_request.user.as_ref()
    }

    fn user_data(&self) -> Option<&'a Value> {
        self.user()
            .and_then(|user| user.ext.as_ref())
            .and_then(|ext| ext.data.as_ref())
    }

    fn user_time(&self) -> Option<UserTime> {
        self.user()
            .and_then(|user| user.ext.as_ref())
            .and_then(|ext| ext.time)
    }

    /// Top-level string attribute of `user`; dotted paths never match.
    fn user_string_attribute(&self, name: &str) -> Option<&'a str> {
        let user = self.user()?;
        match name {
            "id" => user.id.as_deref(),
            "buyeruid" => user.buyeruid.as_deref(),
            "gender" => user.gender.as_deref(),
            "keywords" => user.keywords.as_deref(),
            _ => None,
        }
    }

    fn user_integer_attribute(&self, name: &str) -> Option<i64> {
        match name {
            "yob" => self.user().and_then(|user| user.yob),
            _ => None,
        }
    }

    fn user_segments(&self, source: &str) -> Option<Vec<&'a str>> {
        let segments = self
            .user()
            .and_then(|user| user.data.as_ref())
            .into_iter()
            .flatten()
            .filter(|data| data.id.as_deref() == Some(source))
            .flat_map(|data| data.segment.iter().flatten())
            .filter_map(|segment| segment.id.as_deref())
            .collect();
        Some(segments)
    }

    fn media_types(&self) -> Option<Vec<&'a str>> {
        let imp = self.imp;
        let media_types = [
            (imp.banner.is_some(), "banner"),
            (imp.video.is_some(), "video"),
            (imp.native.is_some(), "native"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect();
        Some(media_types)
    }

    /// Impression context data, then site ext data, then app ext data, then
    /// the site data of each `ext.prebid.bidderconfig` entry.
    fn site_first_party_data<T>(
        &self,
        path: &str,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let site_data = self
            .bid_request
            .site
            .as_ref()
            .and_then(|site| walk(site.ext.as_ref(), "data"));
        let app_data = self
            .bid_request
            .app
            .as_ref()
            .and_then(|app| walk(app.ext.as_ref(), "data"));

        let bidder_config_data = self
            .bid_request
            .ext_prebid()
            .and_then(|prebid| prebid.extra.get("bidderconfig"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|entry| walk(Some(entry), BIDDER_CONFIG_SITE_DATA));

        [walk(self.imp_ext(), EXT_CONTEXT_DATA), site_data, app_data]
            .into_iter()
            .chain(bidder_config_data)
            .find_map(|root| walk(root, path).and_then(&extract))
    }
}

/// Follows a dot-separated path through nested JSON objects.
fn walk<'v>(root: Option<&'v Value>, path: &str) -> Option<&'v Value> {
    path.split('.')
        .try_fold(root?, |node, segment| node.as_object()?.get(segment))
}

/// A single string, or the string elements of an array.
fn strings(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::String(value) => Some(vec![value.as_str()]),
        Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

/// A single integer, or the integer elements of an array.
fn integers(value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::Number(_) => value.as_i64().map(|value| vec![value]),
        Value::Array(items) => Some(items.iter().filter_map(Value::as_i64).collect()),
        _ => None,
    }
}

fn unexpected_category(
    shape: &str,
    category_type: TargetingCategoryType,
) -> Report<BidGuardError> {
    Report::new(BidGuardError::targeting_syntax(format!(
        "Unexpected category for fetching {shape} for: {category_type}"
    )))
}
