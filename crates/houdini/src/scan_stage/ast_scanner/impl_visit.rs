use houdini_common::{ImportKind, Mutation};
use oxc::{
  ast::ast::{self, Expression},
  ast_visit::{walk, Visit},
};

use super::AstScanner;

impl<'ast> Visit<'ast> for AstScanner<'_> {
  fn visit_statement(&mut self, stmt: &ast::Statement<'ast>) {
    if let Some(decl) = stmt.as_module_declaration() {
      self.scan_module_decl(decl);
    }
    walk::walk_statement(self, stmt);
  }

  fn visit_call_expression(&mut self, expr: &ast::CallExpression<'ast>) {
    self.try_call_member_hooks(expr);
    self.try_scan_require(expr);
    walk::walk_call_expression(self, expr);
  }
}

impl AstScanner<'_> {
  fn try_call_member_hooks(&mut self, expr: &ast::CallExpression<'_>) {
    let Some(hooks) = self.parser_hooks else {
      return;
    };
    let Some((selector, member)) = self.parser.call_member_selector(expr) else {
      return;
    };
    for hook in hooks.call_any_member(&selector) {
      if hook.call_member(&mut self.parser, expr, member) {
        self.parser.record_handled_call();
        break;
      }
    }
  }

  /// `require("./lib")` where `require` isn't declared in the module.
  fn try_scan_require(&mut self, expr: &ast::CallExpression<'_>) {
    let Expression::Identifier(callee) = &expr.callee else {
      return;
    };
    if callee.name != "require" || !self.parser.is_global_reference(callee) {
      return;
    }
    let [argument] = &expr.arguments[..] else {
      return;
    };
    let Some(argument) = argument.as_expression() else {
      return;
    };
    if let Some(specifier) = self.parser.evaluate_expression(argument).as_string() {
      let record = self.add_import_record(specifier, ImportKind::Require, expr.span);
      self.result.mutations.push(Mutation::Require { span: expr.span, record });
    }
  }
}
