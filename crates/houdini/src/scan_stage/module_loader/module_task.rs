use houdini_common::{ModuleIdx, ModuleType, ResolvedId, StrOrBytes};

use crate::utils::load_source::load_source;

use super::task_context::TaskContext;

pub struct LoadedModule {
  pub idx: ModuleIdx,
  pub resolved_id: ResolvedId,
  pub source: StrOrBytes,
  pub module_type: ModuleType,
}

/// Loads the source of one module. Tasks of a wave run concurrently, scanning happens afterwards
/// in module order.
pub struct ModuleTask<'a> {
  ctx: &'a TaskContext,
  idx: ModuleIdx,
  resolved_id: ResolvedId,
}

impl<'a> ModuleTask<'a> {
  pub fn new(ctx: &'a TaskContext, idx: ModuleIdx, resolved_id: ResolvedId) -> Self {
    Self { ctx, idx, resolved_id }
  }

  pub async fn run(self) -> anyhow::Result<LoadedModule> {
    let (source, module_type) =
      load_source(&self.ctx.plugin_driver, &self.ctx.fs, &self.resolved_id).await?;
    Ok(LoadedModule { idx: self.idx, resolved_id: self.resolved_id, source, module_type })
  }
}
