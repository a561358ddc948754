mod child_compiler;
mod diagnostics;
mod parser;
mod plugin;
mod plugin_context;
mod plugin_driver;
mod types;

pub use crate::{
  child_compiler::{ChildCompilation, ChildCompilerOptions, ChildCompilerRunner, ChildEntry},
  diagnostics::{Diagnostics, SharedDiagnostics},
  parser::{
    evaluated_expression::BasicEvaluatedExpression,
    parser_hooks::{CallMemberHook, ParserHooks},
    JavascriptParser, ParserOutput,
  },
  plugin::{
    HookLoadReturn, HookNoopReturn, HookResolveIdReturn, Plugin, SharedPlugin,
  },
  plugin_context::PluginContext,
  plugin_driver::{PluginDriver, SharedPluginDriver},
  types::{
    hook_load_args::HookLoadArgs, hook_load_output::HookLoadOutput,
    hook_resolve_id_args::HookResolveIdArgs,
  },
};
