mod bundler;
mod cache;
mod child_compiler;
mod generate_stage;
mod runtime;
mod scan_stage;
mod types;
mod utils;

pub use crate::{
  bundler::Bundler,
  cache::{BuildCache, SharedBuildCache},
  types::bundle_output::BundleOutput,
};
pub use houdini_common::*;
pub use houdini_error::{BuildError, BuildResult};
pub use houdini_plugin::{Plugin, SharedPlugin};
