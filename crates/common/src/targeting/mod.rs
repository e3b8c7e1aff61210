//! Targeting category lookups over a bid request and impression.

pub mod category;
pub mod context;

pub use category::{TargetingCategory, TargetingCategoryType};
pub use context::{GeoLocation, RequestContext, Size};
