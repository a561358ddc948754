pub mod build_cancelled;
pub mod bundle_output;

use std::sync::Arc;

use houdini_common::{Module, ModuleIdx, NormalizedBundlerOptions, OutputAsset};
use houdini_resolver::Resolver;
use oxc_index::IndexVec;

pub type IndexModules = IndexVec<ModuleIdx, Module>;

pub type SharedResolver = Arc<Resolver>;
pub type SharedOptions = Arc<NormalizedBundlerOptions>;

/// Files emitted by child compilers, added to the output of the build that started them.
pub type SharedEmittedAssets = Arc<std::sync::Mutex<Vec<OutputAsset>>>;
