mod impl_visit;

use arcstr::ArcStr;
use houdini_common::{
  ExportBinding, ExportsKind, ImportBinding, ImportKind, ImportRecordIdx, ImportedName, ModuleId,
  ModuleType, Mutation, RawImportRecord,
};
use houdini_plugin::{JavascriptParser, ParserHooks, ParserOutput};
use oxc::{
  ast::ast::{
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, ImportDeclaration, ImportDeclarationSpecifier, ModuleDeclaration,
    ModuleExportName, Program,
  },
  ast_visit::Visit,
  semantic::Scoping,
  span::{GetSpan, Span},
};
use oxc_index::IndexVec;

/// Local holding the value of an anonymous `export default`.
pub const DEFAULT_EXPORT_LOCAL: &str = "__houdini_default__";

#[derive(Debug, Default)]
pub struct ScanResult {
  pub import_records: IndexVec<ImportRecordIdx, RawImportRecord>,
  pub mutations: Vec<Mutation>,
  pub exports_kind: ExportsKind,
  pub export_bindings: Vec<ExportBinding>,
  pub star_exports: Vec<ImportRecordIdx>,
  /// Filled from the output of plugin parser hooks.
  pub parser_output: ParserOutput,
}

/// Collects import records and the source edits a module needs to be rendered into the chunk
/// runtime. Member calls on global objects are offered to plugin parser hooks on the way.
pub struct AstScanner<'me> {
  parser: JavascriptParser<'me>,
  parser_hooks: Option<&'me ParserHooks>,
  result: ScanResult,
}

impl<'me> AstScanner<'me> {
  pub fn new(
    module_id: &'me ModuleId,
    module_type: ModuleType,
    scoping: &'me Scoping,
    parser_hooks: Option<&'me ParserHooks>,
  ) -> Self {
    Self {
      parser: JavascriptParser::new(module_id, module_type, scoping),
      parser_hooks,
      result: ScanResult::default(),
    }
  }

  pub fn scan(mut self, program: &Program<'_>) -> ScanResult {
    self.visit_program(program);
    self.result.parser_output = self.parser.into_output();
    self.result
  }

  fn add_import_record(
    &mut self,
    specifier: &str,
    kind: ImportKind,
    span: Span,
  ) -> ImportRecordIdx {
    self.result.import_records.push(RawImportRecord::new(ArcStr::from(specifier), kind, span))
  }

  fn scan_module_decl(&mut self, decl: &ModuleDeclaration<'_>) {
    self.result.exports_kind = ExportsKind::Esm;
    match decl {
      ModuleDeclaration::ImportDeclaration(decl) => self.scan_import_decl(decl),
      ModuleDeclaration::ExportNamedDeclaration(decl) => self.scan_export_named_decl(decl),
      ModuleDeclaration::ExportDefaultDeclaration(decl) => self.scan_export_default_decl(decl),
      ModuleDeclaration::ExportAllDeclaration(decl) => self.scan_export_all_decl(decl),
      // Typescript only, already stripped.
      _ => {}
    }
  }

  fn scan_import_decl(&mut self, decl: &ImportDeclaration<'_>) {
    let record = self.add_import_record(&decl.source.value, ImportKind::Import, decl.source.span);
    let bindings = decl
      .specifiers
      .iter()
      .flatten()
      .map(|spec| match spec {
        ImportDeclarationSpecifier::ImportSpecifier(spec) => ImportBinding {
          local: spec.local.name.to_string(),
          imported: imported_name(&spec.imported),
        },
        ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
          ImportBinding { local: spec.local.name.to_string(), imported: ImportedName::Default }
        }
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
          ImportBinding { local: spec.local.name.to_string(), imported: ImportedName::Namespace }
        }
      })
      .collect();
    self.result.mutations.push(Mutation::Import { span: decl.span, record, bindings });
  }

  fn scan_export_named_decl(&mut self, decl: &ExportNamedDeclaration<'_>) {
    if let Some(source) = &decl.source {
      let record = self.add_import_record(&source.value, ImportKind::Import, source.span);
      for spec in &decl.specifiers {
        self.result.export_bindings.push(ExportBinding::ReExport {
          exported: spec.exported.name().to_string(),
          record,
          imported: imported_name(&spec.local),
        });
      }
      self.result.mutations.push(Mutation::Import { span: decl.span, record, bindings: vec![] });
      return;
    }

    if let Some(declaration) = &decl.declaration {
      for local in declared_names(declaration) {
        self.result.export_bindings.push(ExportBinding::Local { exported: local.clone(), local });
      }
      self.remove(Span::new(decl.span.start, declaration.span().start));
      return;
    }

    for spec in &decl.specifiers {
      self.result.export_bindings.push(ExportBinding::Local {
        exported: spec.exported.name().to_string(),
        local: spec.local.name().to_string(),
      });
    }
    self.remove(decl.span);
  }

  fn scan_export_default_decl(&mut self, decl: &ExportDefaultDeclaration<'_>) {
    let declaration_start = decl.declaration.span().start;
    let named_local = match &decl.declaration {
      ExportDefaultDeclarationKind::FunctionDeclaration(func) => func.id.as_ref(),
      ExportDefaultDeclarationKind::ClassDeclaration(class) => class.id.as_ref(),
      _ => None,
    };

    let local = if let Some(id) = named_local {
      self.remove(Span::new(decl.span.start, declaration_start));
      id.name.to_string()
    } else {
      self.result.mutations.push(Mutation::Replace {
        span: Span::new(decl.span.start, declaration_start),
        content: format!("var {DEFAULT_EXPORT_LOCAL} = "),
      });
      DEFAULT_EXPORT_LOCAL.to_string()
    };
    let binding = ExportBinding::Local { exported: "default".to_string(), local };
    self.result.export_bindings.push(binding);
  }

  fn scan_export_all_decl(&mut self, decl: &ExportAllDeclaration<'_>) {
    let record = self.add_import_record(&decl.source.value, ImportKind::Import, decl.source.span);
    if let Some(exported) = &decl.exported {
      self.result.export_bindings.push(ExportBinding::ReExport {
        exported: exported.name().to_string(),
        record,
        imported: ImportedName::Namespace,
      });
    } else {
      self.result.star_exports.push(record);
    }
    self.result.mutations.push(Mutation::Import { span: decl.span, record, bindings: vec![] });
  }

  fn remove(&mut self, span: Span) {
    self.result.mutations.push(Mutation::Replace { span, content: String::new() });
  }
}

fn imported_name(name: &ModuleExportName<'_>) -> ImportedName {
  match name.name().as_str() {
    "default" => ImportedName::Default,
    name => ImportedName::Named(name.to_string()),
  }
}

fn declared_names(declaration: &Declaration<'_>) -> Vec<String> {
  match declaration {
    Declaration::VariableDeclaration(decl) => decl
      .declarations
      .iter()
      .flat_map(|declarator| declarator.id.get_binding_identifiers())
      .map(|ident| ident.name.to_string())
      .collect(),
    Declaration::FunctionDeclaration(func) => {
      func.id.iter().map(|ident| ident.name.to_string()).collect()
    }
    Declaration::ClassDeclaration(class) => {
      class.id.iter().map(|ident| ident.name.to_string()).collect()
    }
    _ => vec![],
  }
}
