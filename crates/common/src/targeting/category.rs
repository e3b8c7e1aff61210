use std::fmt;
use std::str::FromStr;

use error_stack::Report;

use crate::error::BidGuardError;

/// Kind of value a targeting category resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetingCategoryType {
    Size,
    MediaType,
    Adslot,
    Domain,
    PublisherDomain,
    Referrer,
    AppBundle,
    DeviceGeoExt,
    DeviceExt,
    DeviceGeoCountry,
    DeviceGeoRegion,
    PagePosition,
    Location,
    BidderParam,
    UserSegment,
    UserFirstPartyData,
    SiteFirstPartyData,
    Dow,
    Hour,
}

impl TargetingCategoryType {
    const ALL: [TargetingCategoryType; 19] = [
        Self::Size,
        Self::MediaType,
        Self::Adslot,
        Self::Domain,
        Self::PublisherDomain,
        Self::Referrer,
        Self::AppBundle,
        Self::DeviceGeoExt,
        Self::DeviceExt,
        Self::DeviceGeoCountry,
        Self::DeviceGeoRegion,
        Self::PagePosition,
        Self::Location,
        Self::BidderParam,
        Self::UserSegment,
        Self::UserFirstPartyData,
        Self::SiteFirstPartyData,
        Self::Dow,
        Self::Hour,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::MediaType => "mediaType",
            Self::Adslot => "adslot",
            Self::Domain => "domain",
            Self::PublisherDomain => "publisherDomain",
            Self::Referrer => "referrer",
            Self::AppBundle => "appBundle",
            Self::DeviceGeoExt => "deviceGeoExt",
            Self::DeviceExt => "deviceExt",
            Self::DeviceGeoCountry => "deviceGeoCountry",
            Self::DeviceGeoRegion => "deviceGeoRegion",
            Self::PagePosition => "pagePosition",
            Self::Location => "location",
            Self::BidderParam => "bidderParam",
            Self::UserSegment => "userSegment",
            Self::UserFirstPartyData => "userFirstPartyData",
            Self::SiteFirstPartyData => "siteFirstPartyData",
            Self::Dow => "dow",
            Self::Hour => "hour",
        }
    }

    /// Whether categories of this type address a nested attribute by path.
    #[must_use]
    pub fn requires_path(&self) -> bool {
        matches!(
            self,
            Self::BidderParam
                | Self::UserSegment
                | Self::UserFirstPartyData
                | Self::SiteFirstPartyData
                | Self::DeviceGeoExt
                | Self::DeviceExt
        )
    }
}

impl fmt::Display for TargetingCategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetingCategoryType {
    type Err = Report<BidGuardError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category_type| category_type.as_str() == value)
            .ok_or_else(|| {
                Report::new(BidGuardError::targeting_syntax(format!(
                    "Unrecognized targeting category: {value}"
                )))
            })
    }
}

/// A targeting category: a type plus, for nested types, a dotted path.
///
/// Parses from `"domain"` or `"bidderParam.rubicon.siteId"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetingCategory {
    category_type: TargetingCategoryType,
    path: Option<String>,
}

impl TargetingCategory {
    /// Category without a path.
    ///
    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] if the type requires a path.
    pub fn new(category_type: TargetingCategoryType) -> Result<Self, Report<BidGuardError>> {
        Self::build(category_type, None)
    }

    /// Category addressing `path` below the type's root.
    ///
    /// # Errors
    ///
    /// Returns [`BidGuardError::TargetingSyntax`] if the type does not take a
    /// path or the path is empty.
    pub fn with_path(
        category_type: TargetingCategoryType,
        path: impl Into<String>,
    ) -> Result<Self, Report<BidGuardError>> {
        Self::build(category_type, Some(path.into()))
    }

    fn build(
        category_type: TargetingCategoryType,
        path: Option<String>,
    ) -> Result<Self, Report<BidGuardError>> {
        let problem = match path.as_deref() {
            None if category_type.requires_path() => {
                Some(format!("Category {category_type} requires a path"))
            }
            Some(_) if !category_type.requires_path() => {
                Some(format!("Category {category_type} does not accept a path"))
            }
            Some(path) if path.split('.').any(str::is_empty) => Some(format!(
                "Malformed path '{path}' for category {category_type}"
            )),
            _ => None,
        };

        match problem {
            Some(message) => Err(Report::new(BidGuardError::targeting_syntax(message))),
            None => Ok(Self {
                category_type,
                path,
            }),
        }
    }

    #[must_use]
    pub fn category_type(&self) -> TargetingCategoryType {
        self.category_type
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl fmt::Display for TargetingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}.{path}", self.category_type),
            None => write!(f, "{}", self.category_type),
        }
    }
}

impl FromStr for TargetingCategory {
    type Err = Report<BidGuardError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('.') {
            Some((category_type, path)) => Self::with_path(category_type.parse()?, path),
            None => Self::new(value.parse()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_category() {
        let category: TargetingCategory = "domain".parse().expect("should parse");
        assert_eq!(category.category_type(), TargetingCategoryType::Domain);
        assert_eq!(category.path(), None);
    }

    #[test]
    fn test_parse_nested_category_keeps_full_path() {
        let category: TargetingCategory = "bidderParam.rubicon.siteId"
            .parse()
            .expect("should parse");
        assert_eq!(category.category_type(), TargetingCategoryType::BidderParam);
        assert_eq!(category.path(), Some("rubicon.siteId"));
        assert_eq!(category.to_string(), "bidderParam.rubicon.siteId");
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = "planet".parse::<TargetingCategory>().expect_err("should fail");
        assert!(matches!(
            err.current_context(),
            BidGuardError::TargetingSyntax { .. }
        ));
        assert!(err.to_string().contains("planet"));
    }

    #[test]
    fn test_parse_rejects_missing_or_extra_path() {
        assert!(
            "userFirstPartyData".parse::<TargetingCategory>().is_err(),
            "Nested categories need a path"
        );
        assert!(
            "domain.www".parse::<TargetingCategory>().is_err(),
            "Flat categories take no path"
        );
        assert!(
            "bidderParam.rubicon..siteId".parse::<TargetingCategory>().is_err(),
            "Empty path segments are malformed"
        );
    }
}
