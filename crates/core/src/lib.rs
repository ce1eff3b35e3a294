//! Core types for tooli
//!
//! This crate holds everything tooli keeps on the local machine:
//! - [`tools`] - tool descriptors and platform identification
//! - [`config`] - the JSON configuration file
//! - [`cache`] - the record of installed versions
//! - [`paths`] - where those files live
//!
//! Network access and installation live in `tooli-tools-github`.

pub mod cache;
pub mod config;
mod error;
mod json_file;
pub mod paths;
pub mod tools;

pub use cache::VersionCache;
pub use config::Configuration;
pub use error::{Error, Result};
