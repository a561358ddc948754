use std::path::PathBuf;

use crate::{InputItem, Platform, WasmLoading};

#[derive(Debug, Clone)]
pub struct NormalizedBundlerOptions {
  // --- Input
  pub input: Vec<InputItem>,
  pub cwd: PathBuf,
  pub context: PathBuf,
  pub platform: Platform,

  // --- Output
  pub entry_filenames: String,
  pub chunk_filenames: String,
  pub asset_filenames: String,
  pub dir: String,
  pub public_path: String,
  pub global_object: String,
  pub wasm_loading: WasmLoading,
}

impl NormalizedBundlerOptions {
  pub fn out_dir(&self) -> PathBuf {
    self.cwd.join(&self.dir)
  }

  pub fn is_auto_public_path(&self) -> bool {
    self.public_path == "auto"
  }
}
