use std::sync::Arc;

use houdini_common::{NormalizedBundlerOptions, SharedNormalizedBundlerOptions};
use tokio_util::sync::CancellationToken;

use crate::{
  ChildCompilation, ChildCompilerOptions, ChildCompilerRunner, Diagnostics, SharedDiagnostics,
  SharedPlugin,
};

/// What a plugin sees of the build it is applied to.
#[derive(Clone)]
pub struct PluginContext {
  options: SharedNormalizedBundlerOptions,
  plugins: Vec<SharedPlugin>,
  diagnostics: SharedDiagnostics,
  child_compiler: Arc<dyn ChildCompilerRunner>,
  cancellation_token: CancellationToken,
}

impl PluginContext {
  pub fn new(
    options: SharedNormalizedBundlerOptions,
    plugins: Vec<SharedPlugin>,
    diagnostics: SharedDiagnostics,
    child_compiler: Arc<dyn ChildCompilerRunner>,
    cancellation_token: CancellationToken,
  ) -> Self {
    Self { options, plugins, diagnostics, child_compiler, cancellation_token }
  }

  pub fn options(&self) -> &NormalizedBundlerOptions {
    &self.options
  }

  /// Plugins applied to the current build, in order.
  pub fn plugins(&self) -> &[SharedPlugin] {
    &self.plugins
  }

  pub fn find_plugin_by_name(&self, name: &str) -> Option<&SharedPlugin> {
    self.plugins.iter().find(|plugin| plugin.name() == name)
  }

  pub fn diagnostics(&self) -> &Diagnostics {
    &self.diagnostics
  }

  /// Cancelled when the build is aborted. Nested builds should use a child token.
  pub fn cancellation_token(&self) -> &CancellationToken {
    &self.cancellation_token
  }

  pub async fn run_child_compiler(
    &self,
    options: ChildCompilerOptions,
  ) -> anyhow::Result<ChildCompilation> {
    self.child_compiler.run_as_child(options).await
  }
}

impl std::fmt::Debug for PluginContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PluginContext")
      .field("options", &self.options)
      .field("plugins", &self.plugins)
      .finish_non_exhaustive()
  }
}
