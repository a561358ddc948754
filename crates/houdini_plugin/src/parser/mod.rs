pub mod evaluated_expression;
pub mod parser_hooks;

use houdini_common::{ModuleId, ModuleType};
use oxc::{
  ast::ast::{CallExpression, Expression, IdentifierReference},
  semantic::Scoping,
  span::Span,
  syntax::operator::BinaryOperator,
};

use crate::BasicEvaluatedExpression;

/// What plugin parser hooks produced for a module.
#[derive(Debug, Default)]
pub struct ParserOutput {
  /// Source ranges to replace with generated code.
  pub constant_dependencies: Vec<(Span, String)>,
  /// `(name, request)`: `var name = require(request)` is added to the top of the module.
  pub parsed_variables: Vec<(String, String)>,
  pub warnings: Vec<anyhow::Error>,
  /// Number of calls a hook returned `true` for.
  pub handled_calls: usize,
}

/// The view of a module that parser hooks get while it is being scanned.
pub struct JavascriptParser<'me> {
  module_id: &'me ModuleId,
  module_type: ModuleType,
  scoping: &'me Scoping,
  output: ParserOutput,
}

impl<'me> JavascriptParser<'me> {
  pub fn new(module_id: &'me ModuleId, module_type: ModuleType, scoping: &'me Scoping) -> Self {
    Self { module_id, module_type, scoping, output: ParserOutput::default() }
  }

  pub fn module_id(&self) -> &ModuleId {
    self.module_id
  }

  pub fn module_type(&self) -> ModuleType {
    self.module_type
  }

  /// `true` if `ident` doesn't refer to a binding declared in the module.
  pub fn is_global_reference(&self, ident: &IdentifierReference) -> bool {
    ident.reference_id.get().is_none_or(|reference_id| {
      self.scoping.get_reference(reference_id).symbol_id().is_none()
    })
  }

  /// For `CSS.paintWorklet.addModule(url)` returns `("CSS.paintWorklet", "addModule")`.
  /// Chains not rooted at a global identifier return `None`.
  pub fn call_member_selector<'b>(
    &self,
    call: &'b CallExpression<'_>,
  ) -> Option<(String, &'b str)> {
    let Expression::StaticMemberExpression(callee) = &call.callee else {
      return None;
    };
    let selector = self.global_member_chain(&callee.object)?;
    Some((selector, callee.property.name.as_str()))
  }

  fn global_member_chain(&self, expr: &Expression) -> Option<String> {
    match expr {
      Expression::Identifier(ident) if self.is_global_reference(ident) => {
        Some(ident.name.to_string())
      }
      Expression::StaticMemberExpression(member) => {
        let mut chain = self.global_member_chain(&member.object)?;
        chain.push('.');
        chain.push_str(&member.property.name);
        Some(chain)
      }
      _ => None,
    }
  }

  pub fn evaluate_expression(&self, expr: &Expression) -> BasicEvaluatedExpression {
    match expr {
      Expression::StringLiteral(lit) => BasicEvaluatedExpression::String(lit.value.to_string()),
      Expression::NumericLiteral(lit) => BasicEvaluatedExpression::Number(lit.value),
      Expression::BooleanLiteral(lit) => BasicEvaluatedExpression::Boolean(lit.value),
      Expression::NullLiteral(_) => BasicEvaluatedExpression::Null,
      Expression::Identifier(ident)
        if ident.name == "undefined" && self.is_global_reference(ident) =>
      {
        BasicEvaluatedExpression::Undefined
      }
      Expression::ParenthesizedExpression(paren) => self.evaluate_expression(&paren.expression),
      Expression::TemplateLiteral(tpl) => {
        let mut value = String::new();
        for (i, quasi) in tpl.quasis.iter().enumerate() {
          let Some(cooked) = &quasi.value.cooked else {
            return BasicEvaluatedExpression::Unknown;
          };
          value.push_str(cooked);
          if let Some(expr) = tpl.expressions.get(i) {
            let Some(evaluated) = self.evaluate_expression(expr).to_js_string() else {
              return BasicEvaluatedExpression::Unknown;
            };
            value.push_str(&evaluated);
          }
        }
        BasicEvaluatedExpression::String(value)
      }
      Expression::BinaryExpression(bin) if bin.operator == BinaryOperator::Addition => {
        let left = self.evaluate_expression(&bin.left);
        let right = self.evaluate_expression(&bin.right);
        match (&left, &right) {
          (BasicEvaluatedExpression::Number(l), BasicEvaluatedExpression::Number(r)) => {
            BasicEvaluatedExpression::Number(l + r)
          }
          _ if left.is_string() || right.is_string() => {
            match (left.to_js_string(), right.to_js_string()) {
              (Some(l), Some(r)) => BasicEvaluatedExpression::String(l + &r),
              _ => BasicEvaluatedExpression::Unknown,
            }
          }
          _ => BasicEvaluatedExpression::Unknown,
        }
      }
      _ => BasicEvaluatedExpression::Unknown,
    }
  }

  /// Replaces `span` of the module source with `code` when the module is rendered.
  pub fn to_constant_dependency(&mut self, span: Span, code: impl Into<String>) {
    self.output.constant_dependencies.push((span, code.into()));
  }

  /// Declares `var name = require(request)` at the top of the module. `request` is resolved like
  /// any other import of the module.
  pub fn add_parsed_variable_to_module(
    &mut self,
    name: impl Into<String>,
    request: impl Into<String>,
  ) {
    self.output.parsed_variables.push((name.into(), request.into()));
  }

  pub fn add_warning(&mut self, warning: anyhow::Error) {
    self.output.warnings.push(warning);
  }

  pub fn record_handled_call(&mut self) {
    self.output.handled_calls += 1;
  }

  pub fn into_output(self) -> ParserOutput {
    self.output
  }
}

#[cfg(test)]
mod tests {
  use oxc::{
    allocator::Allocator, ast::ast::Statement, parser::Parser, semantic::SemanticBuilder,
    span::SourceType,
  };

  use super::*;

  fn with_last_call(source: &str, f: impl FnOnce(&JavascriptParser<'_>, &CallExpression<'_>)) {
    let allocator = Allocator::default();
    let program = Parser::new(&allocator, source, SourceType::mjs()).parse().program;
    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let id = ModuleId::new("/src/main.js");
    let parser = JavascriptParser::new(&id, ModuleType::Js, &scoping);
    let Some(Statement::ExpressionStatement(stmt)) = program.body.last() else {
      panic!("expected an expression statement");
    };
    let Expression::CallExpression(call) = &stmt.expression else {
      panic!("expected a call expression");
    };
    f(&parser, call);
  }

  #[test]
  fn call_member_selector_of_global_chain() {
    with_last_call("CSS.paintWorklet.addModule('./paint.js')", |parser, call| {
      assert_eq!(
        parser.call_member_selector(call),
        Some(("CSS.paintWorklet".to_string(), "addModule"))
      );
    });
  }

  #[test]
  fn call_member_selector_ignores_local_bindings() {
    with_last_call("const CSS = {}; CSS.paintWorklet.addModule('./paint.js')", |parser, call| {
      assert_eq!(parser.call_member_selector(call), None);
    });
  }

  #[test]
  fn evaluate_static_strings() {
    with_last_call("f('./' + `paint${1}` + '.js', 1 + 2, foo, undefined)", |parser, call| {
      let args = call.arguments.iter().filter_map(|arg| arg.as_expression()).collect::<Vec<_>>();
      assert_eq!(
        parser.evaluate_expression(args[0]),
        BasicEvaluatedExpression::String("./paint1.js".to_string())
      );
      assert_eq!(parser.evaluate_expression(args[1]), BasicEvaluatedExpression::Number(3.0));
      assert_eq!(parser.evaluate_expression(args[2]), BasicEvaluatedExpression::Unknown);
      assert_eq!(parser.evaluate_expression(args[3]), BasicEvaluatedExpression::Undefined);
    });
  }
}
