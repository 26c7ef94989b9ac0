//! Read-only access to the headless CMS.

mod client;
mod queries;

pub use client::CmsClient;
