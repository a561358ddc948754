use std::sync::{Arc, PoisonError};

use anyhow::Context;
use houdini_common::{BundlerOptions, NormalizedBundlerOptions, OutputAsset};
use houdini_error::BuildResult;
use houdini_fs::{FileSystem, OsFileSystem};
use houdini_plugin::{PluginContext, PluginDriver, SharedDiagnostics, SharedPlugin};
use houdini_resolver::Resolver;
use tokio_util::sync::CancellationToken;

use crate::{
  cache::SharedBuildCache,
  child_compiler::ChildCompilerHost,
  generate_stage::{finalize_assets, GenerateStage},
  scan_stage::{module_loader::task_context::TaskContext, ScanStage},
  types::{
    build_cancelled::BuildCancelled, bundle_output::BundleOutput, SharedEmittedAssets,
    SharedOptions, SharedResolver,
  },
  utils::normalize_options::normalize_options,
};

pub struct Bundler {
  pub(crate) fs: OsFileSystem,
  pub(crate) options: SharedOptions,
  pub(crate) resolver: SharedResolver,
  plugins: Vec<SharedPlugin>,
  cache: SharedBuildCache,
  cancellation_token: CancellationToken,
}

impl Bundler {
  pub fn new(options: BundlerOptions) -> BuildResult<Self> {
    Self::with_plugins(options, vec![])
  }

  pub fn with_plugins(options: BundlerOptions, plugins: Vec<SharedPlugin>) -> BuildResult<Self> {
    let options = normalize_options(options)?;
    let resolver: SharedResolver = Resolver::new(options.platform, options.cwd.clone()).into();

    Ok(Bundler {
      fs: OsFileSystem,
      options: Arc::new(options),
      resolver,
      plugins,
      cache: SharedBuildCache::default(),
      cancellation_token: CancellationToken::new(),
    })
  }

  pub fn options(&self) -> &NormalizedBundlerOptions {
    &self.options
  }

  /// Scan results kept across builds of this bundler.
  pub fn cache(&self) -> &SharedBuildCache {
    &self.cache
  }

  /// Cancelling the token aborts the running build and every nested build it started. The next
  /// build gets a fresh token.
  pub fn cancellation_token(&self) -> CancellationToken {
    self.cancellation_token.clone()
  }

  pub async fn generate(&mut self) -> BuildResult<BundleOutput> {
    self.build(false).await
  }

  /// Writes to `cwd/dir` once the whole build succeeded.
  pub async fn write(&mut self) -> BuildResult<BundleOutput> {
    self.build(true).await
  }

  async fn build(&mut self, is_write: bool) -> BuildResult<BundleOutput> {
    self.resolver.clear_cache();
    let diagnostics = SharedDiagnostics::default();

    let result = build(BuildContext {
      fs: self.fs,
      options: Arc::clone(&self.options),
      resolver: Arc::clone(&self.resolver),
      plugins: self.plugins.clone(),
      cache: Some(Arc::clone(&self.cache)),
      diagnostics: Arc::clone(&diagnostics),
      cancellation_token: self.cancellation_token.clone(),
    })
    .await;

    if self.cancellation_token.is_cancelled() {
      self.cancellation_token = CancellationToken::new();
    }

    let output = BundleOutput { assets: result?, warnings: diagnostics.take_warnings() };
    if is_write {
      self.write_output(&output.assets)?;
    }
    Ok(output)
  }

  fn write_output(&self, assets: &[OutputAsset]) -> BuildResult<()> {
    let dir = self.options.out_dir();
    for asset in assets {
      let dest = dir.join(&asset.filename);
      if let Some(parent) = dest.parent() {
        self
          .fs
          .create_dir_all(parent)
          .with_context(|| format!("Failed to create directory {}", parent.display()))?;
      }
      self
        .fs
        .write(&dest, asset.content_as_bytes())
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    }
    Ok(())
  }
}

/// Everything one build needs. Top-level builds and nested builds started by plugins differ only
/// in what they put here.
pub(crate) struct BuildContext {
  pub fs: OsFileSystem,
  pub options: SharedOptions,
  pub resolver: SharedResolver,
  pub plugins: Vec<SharedPlugin>,
  pub cache: Option<SharedBuildCache>,
  pub diagnostics: SharedDiagnostics,
  pub cancellation_token: CancellationToken,
}

pub(crate) async fn build(ctx: BuildContext) -> BuildResult<Vec<OutputAsset>> {
  let BuildContext { fs, options, resolver, plugins, cache, diagnostics, cancellation_token } = ctx;
  if cancellation_token.is_cancelled() {
    return Err(anyhow::Error::from(BuildCancelled).into());
  }

  let emitted = SharedEmittedAssets::default();
  let child_compiler = Arc::new(ChildCompilerHost {
    fs,
    parent_options: Arc::clone(&options),
    cache: cache.clone(),
    diagnostics: Arc::clone(&diagnostics),
    emitted: Arc::clone(&emitted),
  });
  let plugin_driver = PluginDriver::new_shared(PluginContext::new(
    Arc::clone(&options),
    plugins,
    diagnostics,
    child_compiler,
    cancellation_token.clone(),
  ));
  plugin_driver.build_start().await?;

  let task_context = TaskContext {
    fs,
    options: Arc::clone(&options),
    resolver,
    plugin_driver,
    cache,
    cancellation_token,
  };
  let scan_output = ScanStage::new(&task_context).scan().await?;
  if task_context.cancellation_token.is_cancelled() {
    return Err(anyhow::Error::from(BuildCancelled).into());
  }

  let mut assets = GenerateStage::new(&options, &scan_output).generate();
  // Nested builds of one wave finish in any order.
  let mut emitted = std::mem::take(&mut *emitted.lock().unwrap_or_else(PoisonError::into_inner));
  emitted.sort_by(|a, b| a.filename.cmp(&b.filename));
  assets.extend(emitted);
  finalize_assets(assets)
}
