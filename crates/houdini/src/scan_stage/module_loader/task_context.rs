use houdini_fs::OsFileSystem;
use houdini_plugin::SharedPluginDriver;
use tokio_util::sync::CancellationToken;

use crate::{
  cache::SharedBuildCache,
  types::{SharedOptions, SharedResolver},
};

/// Used to store common data shared between all tasks.
pub struct TaskContext {
  pub fs: OsFileSystem,
  pub options: SharedOptions,
  pub resolver: SharedResolver,
  pub plugin_driver: SharedPluginDriver,
  pub cache: Option<SharedBuildCache>,
  pub cancellation_token: CancellationToken,
}
