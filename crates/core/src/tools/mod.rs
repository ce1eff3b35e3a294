//! Tool descriptors and platform identification.
//!
//! A [`ToolDescriptor`] names a GitHub repository, one asset regex per
//! [`Platform`], and the [`BinarySpec`]s to pull out of the selected asset.

mod descriptor;
mod platform;

pub use descriptor::{BinarySpec, ToolDescriptor, is_plain_file_name};
pub use platform::{Platform, WINDOWS_EXE_SUFFIX};
