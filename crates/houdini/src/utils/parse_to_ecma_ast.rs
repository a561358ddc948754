use std::path::Path;

use arcstr::ArcStr;
use houdini_common::ModuleType;
use houdini_ecmascript::{EcmaAst, EcmaCompiler};
use houdini_error::BuildResult;
use houdini_utils::concat_string;
use oxc::{
  codegen::Codegen,
  semantic::{Scoping, SemanticBuilder},
  span::SourceType as OxcSourceType,
  transformer::{ESTarget, TransformOptions, Transformer},
};

/// Parses the source of a javascript-like module. Typescript is stripped of its types and
/// reparsed, so spans of the returned ast always point into `ast.source()`.
pub fn parse_to_ecma_ast(
  source: ArcStr,
  source_path: &Path,
  module_type: ModuleType,
) -> BuildResult<(EcmaAst, Scoping)> {
  let source = match module_type {
    ModuleType::Json => {
      serde_json::from_str::<serde_json::Value>(&source).map_err(|err| {
        anyhow::anyhow!("Failed to parse JSON file {}: {err}", source_path.display())
      })?;
      concat_string!("module.exports = ", source.trim(), ";").into()
    }
    ModuleType::Empty => ArcStr::new(),
    ModuleType::Js | ModuleType::Ts | ModuleType::Wasm => source,
  };

  let oxc_source_type = {
    let default = OxcSourceType::default().with_module(true);
    if let ModuleType::Ts = module_type { default.with_typescript(true) } else { default }
  };

  let mut ast = EcmaCompiler::parse(source, oxc_source_type)?;
  let scoping = build_scoping(&mut ast)?;

  if !matches!(module_type, ModuleType::Ts) {
    return Ok((ast, scoping));
  }

  let stripped = ast.program.with_mut(|fields| {
    let options = TransformOptions::from(ESTarget::ESNext);
    let ret = Transformer::new(fields.allocator, source_path, &options)
      .build_with_scoping(scoping, fields.program);
    if ret.errors.is_empty() {
      Ok(Codegen::new().build(fields.program).code)
    } else {
      let messages = ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>();
      Err(anyhow::anyhow!("Failed to transform {}: {}", source_path.display(), messages.join("; ")))
    }
  })?;

  let mut ast = EcmaCompiler::parse(stripped, OxcSourceType::mjs())?;
  let scoping = build_scoping(&mut ast)?;
  Ok((ast, scoping))
}

fn build_scoping(ast: &mut EcmaAst) -> BuildResult<Scoping> {
  ast.program.with_mut(|fields| {
    let ret = SemanticBuilder::new().build(fields.program);
    if ret.errors.is_empty() {
      Ok(ret.semantic.into_scoping())
    } else {
      let messages = ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>();
      Err(anyhow::anyhow!("Failed to parse: {}", messages.join("; ")).into())
    }
  })
}

#[test]
fn test_typescript_is_stripped() {
  let (ast, _) = parse_to_ecma_ast(
    "const size: number = 10;\nexport default size;".into(),
    Path::new("/src/paint.ts"),
    ModuleType::Ts,
  )
  .unwrap();
  assert!(!ast.source().contains(": number"));
}

#[test]
fn test_json_becomes_module_exports() {
  let (ast, _) =
    parse_to_ecma_ast("{ \"a\": 1 }\n".into(), Path::new("/src/data.json"), ModuleType::Json)
      .unwrap();
  assert_eq!(ast.source().as_str(), "module.exports = { \"a\": 1 };");
}
