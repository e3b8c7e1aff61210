//! Privacy gating and per-bidder request shaping for a header bidding server.
//!
//! # Modules
//!
//! - [`activity`]: Activity rules, privacy modules and the allow/deny gate
//! - [`error`]: Error types and error handling utilities
//! - [`gpp`]: Decoded GPP sections and the US jurisdiction readers
//! - [`logging`]: Logger initialization for binaries
//! - [`openrtb`]: The subset of OpenRTB 2.x the pipeline reads and rewrites
//! - [`postprocess`]: Bidder request post-processors and their chain
//! - [`settings`]: Configuration management and validation
//! - [`targeting`]: Targeting categories and per-impression lookups
//! - [`test_support`]: Testing utilities

pub mod activity;
pub mod error;
pub mod gpp;
pub mod logging;
pub mod openrtb;
pub mod postprocess;
pub mod settings;
pub mod targeting;
