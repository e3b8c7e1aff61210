//! Bidder catalog and alias lookups consulted by the post-processors.

use std::collections::HashMap;

use error_stack::Report;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::BidGuardError;
use crate::openrtb::{BidRequest, MediaType};

/// Inventory channel of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Site,
    App,
    Dooh,
}

impl Channel {
    /// Site if present, then app, then DOOH. A request with none of them is
    /// treated as site traffic.
    #[must_use]
    pub fn of(bid_request: &BidRequest) -> Self {
        if bid_request.site.is_some() {
            Self::Site
        } else if bid_request.app.is_some() {
            Self::App
        } else if bid_request.dooh.is_some() {
            Self::Dooh
        } else {
            Self::Site
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlatformCapabilities {
    #[serde(default, rename = "mediatypes")]
    pub media_types: Vec<MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BidderCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<PlatformCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<PlatformCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dooh: Option<PlatformCapabilities>,
}

/// Static description of a bidder adapter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct BidderInfo {
    /// Currencies the bidder bids in; absent or empty means any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub accepted_currencies: Option<Vec<String>>,
    #[serde(default)]
    pub capabilities: BidderCapabilities,
    /// Whether the bidder accepts impressions carrying several media types.
    #[serde(default = "default_multiformat_supported")]
    pub multiformat_supported: bool,
}

fn default_multiformat_supported() -> bool {
    true
}

impl Default for BidderInfo {
    fn default() -> Self {
        Self {
            accepted_currencies: None,
            capabilities: BidderCapabilities::default(),
            multiformat_supported: default_multiformat_supported(),
        }
    }
}

impl BidderInfo {
    /// Media types the bidder accepts on the given channel.
    #[must_use]
    pub fn supported_media_types(&self, channel: Channel) -> &[MediaType] {
        let platform = match channel {
            Channel::Site => self.capabilities.site.as_ref(),
            Channel::App => self.capabilities.app.as_ref(),
            Channel::Dooh => self.capabilities.dooh.as_ref(),
        };
        platform.map_or(&[], |platform| platform.media_types.as_slice())
    }
}

/// Read-only bidder metadata lookup.
pub trait BidderCatalog: Send + Sync {
    fn bidder_info(&self, name: &str) -> Option<&BidderInfo>;
}

/// Catalog entry for `name`.
///
/// # Errors
///
/// Returns [`BidGuardError::BidderCatalog`] when the catalog has no entry.
pub(crate) fn require_bidder_info<'c>(
    catalog: &'c dyn BidderCatalog,
    name: &str,
) -> Result<&'c BidderInfo, Report<BidGuardError>> {
    catalog.bidder_info(name).ok_or_else(|| {
        Report::new(BidGuardError::BidderCatalog {
            message: format!("No bidder info for bidder '{name}'"),
        })
    })
}

/// Resolves bidder aliases to canonical adapter names.
pub trait BidderAliases: Send + Sync {
    /// The canonical name for `name`, or `name` itself when it is no alias.
    fn resolve_bidder<'a>(&'a self, name: &'a str) -> &'a str;
}

/// Catalog backed by the `[bidders]` settings table.
#[derive(Debug, Clone, Default)]
pub struct StaticBidderCatalog {
    bidders: HashMap<String, BidderInfo>,
}

impl StaticBidderCatalog {
    #[must_use]
    pub fn new(bidders: HashMap<String, BidderInfo>) -> Self {
        Self { bidders }
    }
}

impl BidderCatalog for StaticBidderCatalog {
    fn bidder_info(&self, name: &str) -> Option<&BidderInfo> {
        self.bidders.get(name)
    }
}

/// Alias table backed by the `[aliases]` settings table.
#[derive(Debug, Clone, Default)]
pub struct StaticBidderAliases {
    aliases: HashMap<String, String>,
}

impl StaticBidderAliases {
    #[must_use]
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }
}

impl BidderAliases for StaticBidderAliases {
    fn resolve_bidder<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }
}
