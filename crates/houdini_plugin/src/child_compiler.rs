use std::path::PathBuf;

use async_trait::async_trait;
use houdini_common::{InputItem, Platform, WasmLoading};
use tokio_util::sync::CancellationToken;

use crate::SharedPlugin;

/// Options of a nested build started by a plugin.
#[derive(Debug, Clone)]
pub struct ChildCompilerOptions {
  /// Shown in logs, e.g. `CssWorkletPlugin`.
  pub name: String,
  /// Directory the entry is resolved from.
  pub context: PathBuf,
  pub entry: InputItem,
  pub entry_filenames: String,
  pub chunk_filenames: String,
  pub global_object: String,
  pub platform: Platform,
  pub wasm_loading: WasmLoading,
  /// Plugins applied to the child compiler, in order.
  pub plugins: Vec<SharedPlugin>,
  /// Namespace of the parent's build cache the child compiler reads from and writes to.
  /// `None` disables caching for the child compiler.
  pub cache_namespace: Option<String>,
  pub cancellation_token: CancellationToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
  pub name: Option<String>,
  /// Files emitted for the entry, relative to the output directory. The first one is the chunk.
  pub files: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ChildCompilation {
  pub entries: Vec<ChildEntry>,
  pub errors: Vec<anyhow::Error>,
}

impl ChildCompilation {
  pub fn first_file(&self) -> Option<&str> {
    self.entries.first().and_then(|entry| entry.files.first()).map(String::as_str)
  }
}

/// Implemented by the host bundler. Files emitted by the child compiler are added to the output
/// of the parent build, and its warnings are merged into the parent's diagnostics.
#[async_trait]
pub trait ChildCompilerRunner: Send + Sync {
  async fn run_as_child(&self, options: ChildCompilerOptions) -> anyhow::Result<ChildCompilation>;
}

#[test]
fn test_first_file() {
  let entry = |files: &[&str]| ChildEntry {
    name: Some("0".to_string()),
    files: files.iter().map(ToString::to_string).collect(),
  };
  let files = entry(&["0.worklet.js", "assets/noise.wasm"]);
  let compilation = ChildCompilation { entries: vec![files], errors: vec![] };
  assert_eq!(compilation.first_file(), Some("0.worklet.js"));

  let compilation = ChildCompilation { entries: vec![entry(&[])], errors: vec![] };
  assert_eq!(compilation.first_file(), None);
  assert_eq!(ChildCompilation::default().first_file(), None);
}
