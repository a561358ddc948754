use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

static MODULE_PATH_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?:[A-Za-z_][A-Za-z0-9_]*::)+").expect("valid regex"));

/// `std::any::type_name` without module paths, e.g. `CountApplyPlugin` instead of
/// `my_crate::plugins::CountApplyPlugin`.
pub fn pretty_type_name<T: ?Sized>() -> Cow<'static, str> {
  strip_module_paths(std::any::type_name::<T>())
}

pub fn strip_module_paths(type_name: &'static str) -> Cow<'static, str> {
  MODULE_PATH_RE.replace_all(type_name, "")
}

#[test]
fn test_pretty_type_name() {
  struct Custom;
  assert_eq!(pretty_type_name::<std::option::Option<std::string::String>>(), "Option<String>");
  assert_eq!(pretty_type_name::<std::option::Option<Custom>>(), "Option<Custom>");
  assert_eq!(pretty_type_name::<Custom>(), "Custom");
}
