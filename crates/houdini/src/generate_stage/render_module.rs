use houdini_common::{
  EcmaView, ExportBinding, ExportsKind, ImportBinding, ImportRecordIdx, ImportedName,
  Module, Mutation, RuntimeGlobals, WasmLoading,
};
use houdini_utils::{
  concat_string,
  ecmascript::{property_access_str, to_js_string_literal},
};
use itertools::Itertools;
use string_wizard::MagicString;

use crate::types::IndexModules;

/// Renders the body of a module, ready to be wrapped in the chunk runtime.
pub struct ModuleRenderer<'a> {
  pub module: &'a Module,
  pub modules: &'a IndexModules,
}

impl ModuleRenderer<'_> {
  pub fn render_ecma(&self, view: &EcmaView) -> String {
    let mut magic_string = MagicString::new(view.source.as_str());

    for mutation in &view.mutations {
      match mutation {
        Mutation::Replace { span, content } => {
          if content.is_empty() {
            magic_string.remove(span.start as usize, span.end as usize);
          } else {
            magic_string.update(span.start as usize, span.end as usize, content.clone());
          }
        }
        Mutation::Import { span, record, bindings } => {
          let content = self.render_import(*record, bindings);
          magic_string.update(span.start as usize, span.end as usize, content);
        }
        Mutation::Require { span, record } => {
          let content = self.render_require(*record);
          magic_string.update(span.start as usize, span.end as usize, content);
        }
      }
    }

    let prologue = self.render_prologue(view);
    if !prologue.is_empty() {
      magic_string.prepend(prologue);
    }
    for record in &view.star_exports {
      magic_string.append(concat_string!(
        "\n",
        RuntimeGlobals::EXPORT_STAR,
        "(exports, ",
        import_local(*record),
        ");"
      ));
    }

    wrap_module(&magic_string.to_string())
  }

  /// Emitted files are referenced by their url, compiled first if the runtime loads wasm.
  pub fn render_asset(&self, filename: &str, wasm_loading: WasmLoading) -> String {
    let url = concat_string!(RuntimeGlobals::PUBLIC_PATH, " + ", to_js_string_literal(filename));
    let value = match wasm_loading {
      WasmLoading::Fetch => concat_string!(RuntimeGlobals::COMPILE_WASM, "(", url, ")"),
      WasmLoading::None => url,
    };
    wrap_module(&concat_string!("module.exports = ", value, ";"))
  }

  fn target_stable_id(&self, record: ImportRecordIdx) -> &str {
    let resolved_module = self.module.import_records[record].resolved_module;
    &self.modules[resolved_module].stable_id
  }

  fn render_require(&self, record: ImportRecordIdx) -> String {
    let target = to_js_string_literal(self.target_stable_id(record));
    concat_string!(RuntimeGlobals::REQUIRE, "(", target, ")")
  }

  fn render_import(&self, record: ImportRecordIdx, bindings: &[ImportBinding]) -> String {
    let namespace = import_local(record);
    let mut code = concat_string!("var ", namespace, " = ", self.render_require(record), ";");
    for binding in bindings {
      let value = match &binding.imported {
        ImportedName::Default => {
          concat_string!(RuntimeGlobals::INTEROP_DEFAULT, "(", namespace, ")")
        }
        ImportedName::Namespace => namespace.clone(),
        ImportedName::Named(name) => property_access_str(&namespace, name),
      };
      code.push_str(&concat_string!(" var ", binding.local, " = ", value, ";"));
    }
    code
  }

  fn render_prologue(&self, view: &EcmaView) -> String {
    let mut prologue = String::new();
    for (name, record) in &view.parsed_variables {
      prologue.push_str(&concat_string!("var ", name, " = ", self.render_require(*record), ";\n"));
    }
    if view.exports_kind == ExportsKind::Esm {
      prologue.push_str(&concat_string!(RuntimeGlobals::MAKE_NAMESPACE, "(exports);\n"));
    }
    if !view.export_bindings.is_empty() {
      let getters = view
        .export_bindings
        .iter()
        .map(|binding| match binding {
          ExportBinding::Local { exported, local } => {
            concat_string!(to_js_string_literal(exported), ": () => ", local)
          }
          ExportBinding::ReExport { exported, record, imported } => {
            let namespace = import_local(*record);
            let value = match imported {
              ImportedName::Default => {
                concat_string!(RuntimeGlobals::INTEROP_DEFAULT, "(", namespace, ")")
              }
              ImportedName::Namespace => namespace,
              ImportedName::Named(name) => property_access_str(&namespace, name),
            };
            concat_string!(to_js_string_literal(exported), ": () => ", value)
          }
        })
        .join(", ");
      prologue.push_str(&concat_string!(
        RuntimeGlobals::DEFINE_GETTERS,
        "(exports, { ",
        getters,
        " });\n"
      ));
    }
    prologue
  }
}

/// The local the namespace of an import record is stored in.
fn import_local(record: ImportRecordIdx) -> String {
  let mut buffer = itoa::Buffer::new();
  let idx = buffer.format(record.index());
  concat_string!("__houdini_import_", idx, "__")
}

fn wrap_module(body: &str) -> String {
  concat_string!("function (module, exports, ", RuntimeGlobals::REQUIRE, ") {\n", body, "\n}")
}
