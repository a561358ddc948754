mod ecma_ast;
mod ecma_compiler;

pub use crate::{
  ecma_ast::{program_cell::WithMutFields, EcmaAst},
  ecma_compiler::EcmaCompiler,
};
