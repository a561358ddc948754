use arcstr::ArcStr;
use oxc::span::Span;
use oxc_index::IndexVec;

use crate::{ImportRecordIdx, RawImportRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportsKind {
  /// The module has `import` or `export` declarations.
  Esm,
  #[default]
  CommonJs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
  Default,
  Namespace,
  Named(String),
}

/// `local` in `import { imported as local } from '...'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
  pub local: String,
  pub imported: ImportedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBinding {
  /// `export { local as exported }` or an exported declaration.
  Local { exported: String, local: String },
  /// `export { imported as exported } from '...'`
  ReExport { exported: String, record: ImportRecordIdx, imported: ImportedName },
}

/// Source edits recorded while scanning a module, applied when the module is rendered.
#[derive(Debug, Clone)]
pub enum Mutation {
  /// Replace `span` with `content`. Plugins create these through constant dependencies.
  Replace { span: Span, content: String },
  /// Replace an import declaration (or a re-export) with `var` declarations reading the module.
  Import { span: Span, record: ImportRecordIdx, bindings: Vec<ImportBinding> },
  /// Replace a `require('...')` call with a call to the runtime.
  Require { span: Span, record: ImportRecordIdx },
}

/// The result of scanning a javascript-like module.
#[derive(Debug, Clone, Default)]
pub struct EcmaView {
  pub source: ArcStr,
  pub import_records: IndexVec<ImportRecordIdx, RawImportRecord>,
  pub mutations: Vec<Mutation>,
  pub exports_kind: ExportsKind,
  pub export_bindings: Vec<ExportBinding>,
  pub star_exports: Vec<ImportRecordIdx>,
  /// `var name = require(record)` declarations added by plugins, rendered at the top of the module.
  pub parsed_variables: Vec<(String, ImportRecordIdx)>,
  /// `false` if any plugin parser hook accepted a call in this module.
  pub cacheable: bool,
}
