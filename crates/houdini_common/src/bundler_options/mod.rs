pub mod filename_template;
pub mod input_item;
pub mod module_type;
pub mod normalized_bundler_options;
pub mod platform;
pub mod wasm_loading;

use std::path::PathBuf;

use crate::{InputItem, Platform, WasmLoading};

#[derive(Default, Debug, Clone)]
pub struct BundlerOptions {
  // --- Input
  pub input: Option<Vec<InputItem>>,
  pub cwd: Option<PathBuf>,
  /// Directory entries are resolved from. Defaults to `cwd`.
  pub context: Option<PathBuf>,
  pub platform: Option<Platform>,

  // --- Output
  pub entry_filenames: Option<String>,
  pub chunk_filenames: Option<String>,
  pub asset_filenames: Option<String>,
  pub dir: Option<String>,
  pub public_path: Option<String>,
  /// The expression the runtime uses to reach the global scope.
  pub global_object: Option<String>,
  pub wasm_loading: Option<WasmLoading>,
}
