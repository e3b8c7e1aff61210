//! GPP (Global Privacy Platform) consent handling.
//!
//! - [`model`]: the decoded consent container and per-section raw traits
//! - [`reader`]: per-jurisdiction readers normalizing sections onto the
//!   US national signal set

pub mod model;
pub mod reader;

pub use model::{ConsentModel, GppModel};
pub use reader::{UsNatReader, UsSectionReader};
