use std::sync::Arc;

use oxc::ast::ast::CallExpression;
use rustc_hash::FxHashMap;

use crate::JavascriptParser;

pub trait CallMemberHook: Send + Sync {
  /// `member` is the called property, e.g. `addModule` in `CSS.paintWorklet.addModule(url)`.
  /// Returns `true` if the hook handled the call.
  fn call_member(
    &self,
    parser: &mut JavascriptParser<'_>,
    call: &CallExpression<'_>,
    member: &str,
  ) -> bool;
}

/// Per-dialect hooks plugins register on the javascript parser.
#[derive(Default)]
pub struct ParserHooks {
  call_any_member: FxHashMap<String, Vec<Arc<dyn CallMemberHook>>>,
}

impl ParserHooks {
  /// `selector` is a member chain rooted at a global identifier, e.g. `CSS.paintWorklet`.
  /// The hook is called for every method call on it.
  pub fn tap_call_any_member(
    &mut self,
    selector: impl Into<String>,
    hook: Arc<dyn CallMemberHook>,
  ) {
    self.call_any_member.entry(selector.into()).or_default().push(hook);
  }

  pub fn call_any_member(&self, selector: &str) -> &[Arc<dyn CallMemberHook>] {
    self.call_any_member.get(selector).map_or(&[], Vec::as_slice)
  }

  pub fn is_empty(&self) -> bool {
    self.call_any_member.is_empty()
  }
}

impl std::fmt::Debug for ParserHooks {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ParserHooks")
      .field("call_any_member", &self.call_any_member.keys().collect::<Vec<_>>())
      .finish()
  }
}
