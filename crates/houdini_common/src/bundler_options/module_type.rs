use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleType {
  Js,
  Ts,
  Json,
  Wasm,
  Empty,
}

impl ModuleType {
  /// ref: https://github.com/evanw/esbuild/blob/9c13ae1f06dfa909eb4a53882e3b7e4216a503fe/internal/bundler/bundler.go#L1161-L1183
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext {
      "js" | "mjs" | "cjs" => Some(Self::Js),
      "ts" | "mts" | "cts" => Some(Self::Ts),
      "json" => Some(Self::Json),
      "wasm" => Some(Self::Wasm),
      _ => None,
    }
  }

  pub fn from_id(id: &str) -> Option<Self> {
    id.rsplit('.').next().filter(|ext| *ext != id).and_then(Self::from_extension)
  }

  /// Module types whose source is parsed as JavaScript, each with its own parser hooks.
  pub fn is_javascript_dialect(self) -> bool {
    matches!(self, Self::Js | Self::Ts)
  }

  pub fn javascript_dialects() -> [Self; 2] {
    [Self::Js, Self::Ts]
  }
}

impl Display for ModuleType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Js => write!(f, "javascript/auto"),
      Self::Ts => write!(f, "javascript/typescript"),
      Self::Json => write!(f, "json"),
      Self::Wasm => write!(f, "webassembly/async"),
      Self::Empty => write!(f, "empty"),
    }
  }
}

#[test]
fn test_module_type_from_id() {
  assert_eq!(ModuleType::from_id("/src/paint.js"), Some(ModuleType::Js));
  assert_eq!(ModuleType::from_id("/src/paint.worklet.mts"), Some(ModuleType::Ts));
  assert_eq!(ModuleType::from_id("/src/noise.wasm"), Some(ModuleType::Wasm));
  assert_eq!(ModuleType::from_id("/src/readme"), None);
  assert_eq!(ModuleType::from_id("js"), None);
}
