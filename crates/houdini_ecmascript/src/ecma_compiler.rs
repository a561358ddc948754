use arcstr::ArcStr;
use houdini_error::BuildResult;
use oxc::{
  codegen::{Codegen, CodegenReturn},
  parser::Parser,
  span::SourceType,
};

use crate::ecma_ast::{
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
  EcmaAst,
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  pub fn parse(source: impl Into<ArcStr>, source_type: SourceType) -> BuildResult<EcmaAst> {
    let allocator = oxc::allocator::Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).parse();
      if ret.errors.is_empty() {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        let messages = ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>();
        Err(anyhow::anyhow!("Failed to parse: {}", messages.join("; ")))
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }

  pub fn print(ast: &EcmaAst) -> CodegenReturn {
    Codegen::new().build(ast.program())
  }
}

#[test]
fn basic_test() {
  let ast = EcmaCompiler::parse("const a = 1;".to_string(), SourceType::default()).unwrap();
  let code = EcmaCompiler::print(&ast).code;
  assert_eq!(code, "const a = 1;\n");
}

#[test]
fn parse_error_is_reported() {
  let err = EcmaCompiler::parse("const = ;", SourceType::mjs()).unwrap_err();
  assert!(err.first().unwrap().to_string().starts_with("Failed to parse"));
}
