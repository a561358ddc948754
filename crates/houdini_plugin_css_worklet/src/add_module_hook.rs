use std::sync::{
  atomic::{AtomicU32, Ordering},
  Arc,
};

use houdini_plugin::{CallMemberHook, JavascriptParser};
use houdini_utils::concat_string;
use oxc::{ast::ast::CallExpression, span::GetSpan};

use crate::request::{encode_loader_request, LoaderQuery};

const NON_STRING_ARGUMENT: &str = "addModule() worklet will only be bundled if passed a String.";

/// Rewrites `CSS.<worklet>.addModule("./paint.js")` to
/// `CSS.<worklet>.addModule(__houdini_worklet_0__)`, where `__houdini_worklet_0__` is bound to the
/// url of the worklet bundle.
pub struct AddModuleHook {
  next_worklet_id: Arc<AtomicU32>,
}

impl AddModuleHook {
  pub fn new(next_worklet_id: Arc<AtomicU32>) -> Self {
    Self { next_worklet_id }
  }
}

impl CallMemberHook for AddModuleHook {
  fn call_member(
    &self,
    parser: &mut JavascriptParser<'_>,
    call: &CallExpression<'_>,
    member: &str,
  ) -> bool {
    if member != "addModule" {
      return false;
    }

    let Some(argument) = call.arguments.first().and_then(|argument| argument.as_expression()) else {
      parser.add_warning(anyhow::anyhow!(NON_STRING_ARGUMENT));
      return false;
    };
    let evaluated = parser.evaluate_expression(argument);
    let Some(request) = evaluated.as_string() else {
      parser.add_warning(anyhow::anyhow!(NON_STRING_ARGUMENT));
      return false;
    };

    let name = self.next_worklet_id.fetch_add(1, Ordering::Relaxed).to_string();
    let identifier = concat_string!("__houdini_worklet_", name, "__");
    let loader_request = match encode_loader_request(&LoaderQuery { name }, request) {
      Ok(loader_request) => loader_request,
      Err(err) => {
        parser.add_warning(err.into());
        return false;
      }
    };

    parser.to_constant_dependency(argument.span(), identifier.as_str());
    parser.add_parsed_variable_to_module(identifier, loader_request);
    true
  }
}

#[cfg(test)]
mod tests {
  use houdini_common::{ModuleId, ModuleType};
  use houdini_plugin::ParserOutput;
  use oxc::{
    allocator::Allocator,
    ast::ast::{Expression, Statement},
    parser::Parser,
    semantic::SemanticBuilder,
    span::SourceType,
  };

  use super::*;

  /// Runs the hook on the call of every top level expression statement.
  fn run_hook(source: &str, hook: &AddModuleHook) -> (ParserOutput, Vec<bool>) {
    let allocator = Allocator::default();
    let program = Parser::new(&allocator, source, SourceType::mjs()).parse().program;
    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let id = ModuleId::new("/project/src/main.js");
    let mut parser = JavascriptParser::new(&id, ModuleType::Js, &scoping);
    let handled = program
      .body
      .iter()
      .filter_map(|stmt| match stmt {
        Statement::ExpressionStatement(stmt) => match &stmt.expression {
          Expression::CallExpression(call) => Some(call),
          _ => None,
        },
        _ => None,
      })
      .map(|call| {
        let (_, member) = parser.call_member_selector(call).unwrap();
        hook.call_member(&mut parser, call, member)
      })
      .collect();
    (parser.into_output(), handled)
  }

  #[test]
  fn rewrites_string_arguments() {
    let hook = AddModuleHook::new(Arc::default());
    let source = concat!(
      "CSS.paintWorklet.addModule('./paint.js');\n",
      "CSS.layoutWorklet.addModule(`./lay` + 'out.js');",
    );
    let (output, handled) = run_hook(source, &hook);

    assert_eq!(handled, [true, true]);
    assert!(output.warnings.is_empty());
    assert_eq!(
      output.parsed_variables,
      [
        (
          "__houdini_worklet_0__".to_string(),
          r#"css-worklet-loader?{"name":"0"}!./paint.js"#.to_string()
        ),
        (
          "__houdini_worklet_1__".to_string(),
          r#"css-worklet-loader?{"name":"1"}!./layout.js"#.to_string()
        ),
      ]
    );
    let replaced = output
      .constant_dependencies
      .iter()
      .map(|(span, code)| (&source[span.start as usize..span.end as usize], code.as_str()))
      .collect::<Vec<_>>();
    assert_eq!(
      replaced,
      [("'./paint.js'", "__houdini_worklet_0__"), ("`./lay` + 'out.js'", "__houdini_worklet_1__")]
    );
  }

  #[test]
  fn warns_on_non_string_arguments() {
    let hook = AddModuleHook::new(Arc::default());
    let (output, handled) =
      run_hook("CSS.paintWorklet.addModule(blobUrl);\nCSS.paintWorklet.addModule();", &hook);

    assert_eq!(handled, [false, false]);
    assert!(output.parsed_variables.is_empty());
    assert!(output.constant_dependencies.is_empty());
    let warnings = output.warnings.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(warnings, [NON_STRING_ARGUMENT, NON_STRING_ARGUMENT]);
  }

  #[test]
  fn ignores_other_members() {
    let hook = AddModuleHook::new(Arc::default());
    let (output, handled) = run_hook("CSS.paintWorklet.registerPaint('./paint.js');", &hook);

    assert_eq!(handled, [false]);
    assert!(output.warnings.is_empty());
    assert!(output.parsed_variables.is_empty());
  }

  #[test]
  fn ids_are_shared_between_hooks() {
    let ids = Arc::new(AtomicU32::new(0));
    let js = AddModuleHook::new(Arc::clone(&ids));
    let ts = AddModuleHook::new(Arc::clone(&ids));
    run_hook("CSS.paintWorklet.addModule('./a.js');", &js);
    let (output, _) = run_hook("CSS.paintWorklet.addModule('./b.js');", &ts);
    assert_eq!(output.parsed_variables[0].0, "__houdini_worklet_1__");
  }
}
