use houdini_common::{ImportKind, ModuleId};

#[derive(Debug)]
pub struct HookResolveIdArgs<'a> {
  /// `None` for entries.
  pub importer: Option<&'a ModuleId>,
  pub specifier: &'a str,
  pub kind: ImportKind,
}

impl HookResolveIdArgs<'_> {
  pub fn is_entry(&self) -> bool {
    self.importer.is_none()
  }
}
