//! # Axiom Common
//!
//! Shared types, traits, and utilities used across the Axiom site crates.
//!
//! ## Modules
//! - `types` - Form submissions, CAPTCHA verdicts, email and CMS documents
//! - `validate` - Field-level validation of inbound form submissions
//! - `error` - Common error taxonomy
//! - `constants` - Shared configuration constants

pub mod constants;
pub mod error;
pub mod types;
pub mod validate;

pub use error::AxiomError;
pub use types::*;
pub use validate::Validate;
