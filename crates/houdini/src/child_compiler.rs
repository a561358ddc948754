use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use houdini_common::BundlerOptions;
use houdini_fs::OsFileSystem;
use houdini_plugin::{
  ChildCompilation, ChildCompilerOptions, ChildCompilerRunner, ChildEntry, SharedDiagnostics,
};
use houdini_resolver::Resolver;

use crate::{
  bundler::{build, BuildContext},
  cache::{PartitionGuard, SharedBuildCache},
  types::{build_cancelled::BuildCancelled, SharedEmittedAssets, SharedOptions},
  utils::normalize_options::normalize_options,
};

/// Runs nested builds for the plugins of one build. Files emitted by a nested build are collected
/// into `emitted` and become part of the output of the build that started it.
pub struct ChildCompilerHost {
  pub fs: OsFileSystem,
  pub parent_options: SharedOptions,
  pub cache: Option<SharedBuildCache>,
  pub diagnostics: SharedDiagnostics,
  pub emitted: SharedEmittedAssets,
}

#[async_trait]
impl ChildCompilerRunner for ChildCompilerHost {
  async fn run_as_child(&self, options: ChildCompilerOptions) -> anyhow::Result<ChildCompilation> {
    let ChildCompilerOptions {
      name,
      context,
      entry,
      entry_filenames,
      chunk_filenames,
      global_object,
      platform,
      wasm_loading,
      plugins,
      cache_namespace,
      cancellation_token,
    } = options;
    let entry_name = entry.name.clone();
    let request = entry.import.clone();
    tracing::debug!("{name}: starting child compiler for {request:?}");

    let parent = &self.parent_options;
    let child_options = normalize_options(BundlerOptions {
      input: Some(vec![entry]),
      cwd: Some(parent.cwd.clone()),
      context: Some(context),
      platform: Some(platform),
      entry_filenames: Some(entry_filenames),
      chunk_filenames: Some(chunk_filenames),
      asset_filenames: Some(parent.asset_filenames.clone()),
      dir: Some(parent.dir.clone()),
      public_path: Some(parent.public_path.clone()),
      global_object: Some(global_object),
      wasm_loading: Some(wasm_loading),
    })?;

    let (cache, partition_guard) = match (&self.cache, cache_namespace) {
      (Some(cache), Some(namespace)) => {
        (Some(cache.partition(&namespace)), Some(PartitionGuard::new(Arc::clone(cache), namespace)))
      }
      _ => (None, None),
    };

    let resolver = Arc::new(Resolver::new(child_options.platform, child_options.cwd.clone()));
    let result = build(BuildContext {
      fs: self.fs,
      options: Arc::new(child_options),
      resolver,
      plugins,
      cache,
      diagnostics: Arc::clone(&self.diagnostics),
      cancellation_token: cancellation_token.clone(),
    })
    .await;

    match result {
      Err(errors) if cancellation_token.is_cancelled() || errors.iter().any(BuildCancelled::is) => {
        tracing::debug!("{name}: child compiler for {request:?} was cancelled");
        // Dropping the guard releases the cache partition.
        drop(partition_guard);
        Err(BuildCancelled.into())
      }
      Err(errors) => {
        if let Some(guard) = partition_guard {
          guard.disarm();
        }
        Ok(ChildCompilation { entries: vec![], errors: errors.into_vec() })
      }
      Ok(assets) => {
        if let Some(guard) = partition_guard {
          guard.disarm();
        }
        let files = assets.iter().map(|asset| asset.filename.clone()).collect::<Vec<_>>();
        tracing::debug!("{name}: child compiler for {request:?} emitted {files:?}");
        self.emitted.lock().unwrap_or_else(PoisonError::into_inner).extend(assets);
        let entry = ChildEntry { name: entry_name, files };
        Ok(ChildCompilation { entries: vec![entry], errors: vec![] })
      }
    }
  }
}
