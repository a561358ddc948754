use arcstr::ArcStr;

use crate::{ModuleId, ModuleType};

#[derive(Debug, Clone)]
pub struct ResolvedId {
  pub id: ModuleId,
  /// Set by plugins that already know what kind of module they are going to load.
  pub module_type: Option<ModuleType>,
}

impl ResolvedId {
  pub fn new(id: impl Into<ArcStr>) -> Self {
    Self { id: ModuleId::new(id), module_type: None }
  }
}
