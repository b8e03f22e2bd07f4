//! Support code for the annotdb client binaries.
//!
//! - [`config`]: TOML client configuration
//! - [`document`]: JSON documents describing schemas and stored cells

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod document;
