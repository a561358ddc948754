pub mod asset_view;
pub mod ecma_view;

use std::sync::Arc;

use oxc_index::IndexVec;

use crate::{
  AssetView, EcmaView, ImportRecordIdx, ModuleId, ModuleIdx, ModuleType, ResolvedImportRecord,
};

#[derive(Debug, Clone)]
pub enum ModuleView {
  Ecma(Arc<EcmaView>),
  Asset(AssetView),
}

#[derive(Debug, Clone)]
pub struct Module {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  /// See [ModuleId::stabilize].
  pub stable_id: String,
  pub module_type: ModuleType,
  pub view: ModuleView,
  pub import_records: IndexVec<ImportRecordIdx, ResolvedImportRecord>,
}

impl Module {
  pub fn as_ecma(&self) -> Option<&EcmaView> {
    match &self.view {
      ModuleView::Ecma(view) => Some(view),
      ModuleView::Asset(_) => None,
    }
  }

  pub fn as_asset(&self) -> Option<&AssetView> {
    match &self.view {
      ModuleView::Asset(view) => Some(view),
      ModuleView::Ecma(_) => None,
    }
  }

  pub fn dependencies(&self) -> impl Iterator<Item = ModuleIdx> + '_ {
    self.import_records.iter().map(|rec| rec.resolved_module)
  }
}
