pub mod ast_scanner;
pub mod module_loader;

use arcstr::ArcStr;
use futures::future::join_all;
use houdini_common::ImportKind;
use houdini_error::BuildResult;
use itertools::Itertools;
use module_loader::{task_context::TaskContext, ModuleLoader, ModuleLoaderOutput};

use crate::utils::resolve_id::resolve_id;

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage<'a> {
  ctx: &'a TaskContext,
}

impl<'a> ScanStage<'a> {
  pub fn new(ctx: &'a TaskContext) -> Self {
    Self { ctx }
  }

  pub async fn scan(&self) -> BuildResult<ScanStageOutput> {
    let TaskContext { options, resolver, plugin_driver, .. } = self.ctx;
    if options.input.is_empty() {
      Err(anyhow::anyhow!("You must supply at least one entry in `input`"))?;
    }

    let resolved = join_all(options.input.iter().map(|input_item| async move {
      let resolved_id = resolve_id(
        plugin_driver,
        resolver,
        &options.context,
        &input_item.import,
        None,
        ImportKind::Import,
      )
      .await?;
      anyhow::Ok((input_item.name.as_deref().map(ArcStr::from), resolved_id))
    }))
    .await;

    let (user_defined_entries, errors): (Vec<_>, Vec<_>) = resolved.into_iter().partition_result();
    if !errors.is_empty() {
      return Err(errors.into());
    }

    ModuleLoader::new(self.ctx).fetch_all_modules(user_defined_entries).await
  }
}
