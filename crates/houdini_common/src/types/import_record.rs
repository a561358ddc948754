use arcstr::ArcStr;
use oxc::span::Span;

use crate::{ImportKind, ModuleIdx};

#[derive(Debug, Clone)]
pub struct RawImportRecord {
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub specifier: ArcStr,
  pub kind: ImportKind,
  pub span: Span,
}

impl RawImportRecord {
  pub fn new(specifier: impl Into<ArcStr>, kind: ImportKind, span: Span) -> Self {
    Self { specifier: specifier.into(), kind, span }
  }

  pub fn into_resolved(self, resolved_module: ModuleIdx) -> ResolvedImportRecord {
    ResolvedImportRecord { specifier: self.specifier, kind: self.kind, resolved_module }
  }
}

#[derive(Debug, Clone)]
pub struct ResolvedImportRecord {
  pub specifier: ArcStr,
  pub kind: ImportKind,
  pub resolved_module: ModuleIdx,
}
